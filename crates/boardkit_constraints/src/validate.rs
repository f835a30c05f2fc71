//! Physical pin conflict detection.

use std::collections::HashMap;

use crate::error::ConstraintError;
use crate::registry::RegistryBuilder;
use crate::resource::ResourceId;

/// Checks that no physical pin is claimed by two different resources.
///
/// Resources are walked in registration order and every pin expression is
/// expanded to physical pins (bus members, both legs of a differential pair,
/// connector references resolved). The first pin seen again under a different
/// resource produces [`ConstraintError::Conflict`] with the earlier owner as
/// `a` and the later one as `b`. A resource reusing its own pin is not a
/// conflict. The registry is not modified, so validation can be repeated.
pub fn validate(registry: &RegistryBuilder) -> Result<(), ConstraintError> {
    let mut owners: HashMap<String, &ResourceId> = HashMap::new();

    for resource in registry.resources() {
        for pins in resource.pin_expressions() {
            for pin in registry.physical_pins(pins)? {
                match owners.get(&pin) {
                    Some(&owner) if owner != resource.id() => {
                        return Err(ConstraintError::Conflict {
                            a: owner.clone(),
                            b: resource.id().clone(),
                            pin,
                        });
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(pin, resource.id());
                    }
                }
            }
        }
    }
    Ok(())
}
