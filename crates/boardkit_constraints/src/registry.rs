//! The resource registry a board definition is assembled into.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::connector::Connector;
use crate::error::ConstraintError;
use crate::pin::{parse_connector_ref, AnyPin, PinExpression, PinGrammar};
use crate::resource::{Resource, ResourceId};

/// Collects the resources and connectors of one board definition.
///
/// A registry is created once per platform, threaded through the resource
/// generators, and then handed to [`Platform::new`](crate::Platform::new).
/// Every insertion is checked against the pin grammar, known connectors and
/// already registered ids; a failed insertion leaves the registry unchanged.
#[derive(Debug)]
pub struct RegistryBuilder {
    grammar: Box<dyn PinGrammar>,
    resources: Vec<Resource>,
    by_id: HashMap<ResourceId, usize>,
    connectors: Vec<Connector>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Creates a registry accepting any pin name.
    pub fn new() -> Self {
        Self::with_grammar(Box::new(AnyPin))
    }

    /// Creates a registry that checks physical pin ids with `grammar`.
    pub fn with_grammar(grammar: Box<dyn PinGrammar>) -> Self {
        Self {
            grammar,
            resources: Vec::new(),
            by_id: HashMap::new(),
            connectors: Vec::new(),
        }
    }

    /// Registers a connector. Connectors must be added before the resources that use them.
    pub fn add_connector(&mut self, connector: Connector) -> Result<(), ConstraintError> {
        if self.connector(connector.name(), connector.number()).is_some() {
            return Err(ConstraintError::DuplicateConnector {
                name: connector.name().to_string(),
                number: connector.number(),
            });
        }
        for (label, pin) in connector.pins() {
            self.grammar.check(pin).map_err(|reason| ConstraintError::Format {
                token: format!("{}_{}:{label} -> {pin}", connector.name(), connector.number()),
                reason,
            })?;
        }
        debug!(
            "registered connector {}_{} ({} pins)",
            connector.name(),
            connector.number(),
            connector.pins().count()
        );
        self.connectors.push(connector);
        Ok(())
    }

    /// Registers one resource.
    pub fn add(&mut self, resource: Resource) -> Result<&Resource, ConstraintError> {
        self.check(&resource)?;
        if self.by_id.contains_key(resource.id()) {
            return Err(ConstraintError::DuplicateResource(resource.id().clone()));
        }
        Ok(self.push(resource))
    }

    /// Registers a batch of resources, all or nothing.
    ///
    /// Every resource is checked, including for duplicates within the batch,
    /// before any of them is inserted.
    pub fn add_all(
        &mut self,
        resources: Vec<Resource>,
    ) -> Result<Vec<ResourceId>, ConstraintError> {
        {
            let mut seen = HashSet::new();
            for resource in &resources {
                self.check(resource)?;
                if self.by_id.contains_key(resource.id()) || !seen.insert(resource.id()) {
                    return Err(ConstraintError::DuplicateResource(resource.id().clone()));
                }
            }
        }
        Ok(resources
            .into_iter()
            .map(|r| self.push(r).id().clone())
            .collect())
    }

    fn push(&mut self, resource: Resource) -> &Resource {
        debug!(
            "registered {} on {}",
            resource.id(),
            resource.pin_tokens().join(" ")
        );
        self.by_id.insert(resource.id().clone(), self.resources.len());
        self.resources.push(resource);
        &self.resources[self.resources.len() - 1]
    }

    fn check(&self, resource: &Resource) -> Result<(), ConstraintError> {
        for pins in resource.pin_expressions() {
            self.physical_pins(pins)?;
        }
        Ok(())
    }

    /// Resolves a pin expression to physical pin ids, checking each one.
    ///
    /// Connector references are replaced by the pin they map to; plain ids
    /// are checked against the registry's pin grammar.
    pub fn physical_pins(&self, pins: &PinExpression) -> Result<Vec<String>, ConstraintError> {
        pins.tokens()
            .into_iter()
            .map(|token| self.physical_pin(token))
            .collect()
    }

    fn physical_pin(&self, token: &str) -> Result<String, ConstraintError> {
        if token.contains(':') {
            let (name, number, label) = parse_connector_ref(token)
                .ok_or_else(|| ConstraintError::UnknownConnector(token.to_string()))?;
            return self
                .connector(name, number)
                .and_then(|c| c.resolve(label))
                .map(str::to_string)
                .ok_or_else(|| ConstraintError::UnknownConnector(token.to_string()));
        }
        self.grammar
            .check(token)
            .map_err(|reason| ConstraintError::Format {
                token: token.to_string(),
                reason,
            })?;
        Ok(token.to_string())
    }

    /// Returns the resource `kind#index`, if registered.
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.by_id.get(id).map(|&i| &self.resources[i])
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns the connector `name_number`, if registered.
    pub fn connector(&self, name: &str, number: u32) -> Option<&Connector> {
        self.connectors
            .iter()
            .find(|c| c.name() == name && c.number() == number)
    }

    /// Returns the resources in registration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Returns the connectors in registration order.
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Returns the number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if no resource is registered.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Checks that no physical pin is claimed by two resources.
    ///
    /// See [`validate`](crate::validate::validate).
    pub fn validate(&self) -> Result<(), ConstraintError> {
        crate::validate::validate(self)
    }
}
