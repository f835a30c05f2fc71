//! The assembled, validated board model and the toolchain seams it drives.

use std::fmt;

use boardkit_common::Frequency;
use log::info;
use serde::Serialize;

use crate::attrs::AttributeSet;
use crate::connector::Connector;
use crate::error::{BuildError, ConstraintError, ProgramError};
use crate::pin::{Direction, PinExpression};
use crate::products::BuildProducts;
use crate::registry::RegistryBuilder;
use crate::resource::{Resource, ResourceBody, ResourceId};

/// The FPGA a board carries, as the vendor tools name it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    /// Device id, e.g. `"5CGXFC5"`.
    pub device: String,
    /// Package id, e.g. `"C6F27"`.
    pub package: String,
    /// Speed grade, e.g. `"C7"`.
    pub speed: String,
}

impl DeviceIdentity {
    /// Creates a device identity.
    pub fn new(device: &str, package: &str, speed: &str) -> Self {
        Self {
            device: device.to_string(),
            package: package.to_string(),
            speed: speed.to_string(),
        }
    }

    /// Returns the full part number (device, package and speed concatenated).
    pub fn part_number(&self) -> String {
        format!("{}{}{}", self.device, self.package, self.speed)
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.device, self.package, self.speed)
    }
}

/// The fixed facts of a board besides its resources.
#[derive(Debug, Clone)]
pub struct PlatformSpec {
    /// Board name, e.g. `"cyclonev_gx_starter_kit"`.
    pub name: String,
    /// The FPGA on the board.
    pub device: DeviceIdentity,
    /// The resource designs are clocked from unless they say otherwise.
    pub default_clk: ResourceId,
    /// The resource driving the design's reset unless it says otherwise.
    pub default_rst: ResourceId,
    /// Attributes applied to every pin unless a resource or subsignal overrides them.
    pub default_attrs: AttributeSet,
}

/// A vendor toolchain able to put a build artifact onto the device.
pub trait Toolchain: fmt::Debug {
    /// Returns a short name for logs and listings.
    fn name(&self) -> &str;

    /// Returns the extension of the artifact the programmer loads (e.g. `"sof"`).
    fn artifact_extension(&self) -> &str;

    /// Programs the artifact `<name>.<artifact_extension>` found in `products`.
    ///
    /// Blocks until the programmer process exits. Exactly one attempt is made.
    fn program(&self, products: &BuildProducts, name: &str) -> Result<(), ProgramError>;
}

/// What a synthesis backend is asked to build.
#[derive(Debug)]
pub struct BuildRequest<'a, D: ?Sized> {
    /// The validated board model.
    pub platform: &'a Platform,
    /// The hardware design.
    pub design: &'a D,
    /// Base name of the artifacts to produce.
    pub name: &'a str,
}

/// An external synthesis flow turning a design into build products.
pub trait SynthesisBackend<D: ?Sized> {
    /// Failure reported by the backend.
    type Error: std::error::Error + 'static;

    /// Runs synthesis for `request`.
    fn synthesize(&self, request: BuildRequest<'_, D>) -> Result<BuildProducts, Self::Error>;
}

/// One constrained top-level port: the physical placement of a leaf
/// resource or of one subsignal of a composite resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinAssignment {
    /// Port name: `<kind>_<index>` or `<kind>_<index>__<subsignal>`.
    pub port: String,
    /// The resource the port belongs to.
    pub resource: ResourceId,
    /// The subsignal, for composite resources.
    pub subsignal: Option<String>,
    /// Physical pins, in bus order (p before n for a differential pair).
    pub pins: Vec<String>,
    /// Direction seen from the design.
    pub dir: Direction,
    /// Active-low.
    pub invert: bool,
    /// The pins form a differential pair.
    pub differential: bool,
    /// Platform, resource and subsignal attributes merged.
    pub attrs: AttributeSet,
    /// Clock constraint of the port, if any.
    pub clock: Option<Frequency>,
}

/// A validated board: device identity, resources, connectors, and the
/// toolchain used to program it.
///
/// Construction validates the whole resource set and resolves the default
/// clock and reset; a `Platform` that exists is conflict-free.
#[derive(Debug)]
pub struct Platform {
    spec: PlatformSpec,
    registry: RegistryBuilder,
    default_clk: usize,
    default_rst: usize,
    assignments: Vec<PinAssignment>,
    toolchain: Box<dyn Toolchain>,
}

impl Platform {
    /// Validates `registry` and assembles the platform.
    pub fn new(
        spec: PlatformSpec,
        registry: RegistryBuilder,
        toolchain: Box<dyn Toolchain>,
    ) -> Result<Self, ConstraintError> {
        registry.validate()?;

        let position = |role: &'static str, id: &ResourceId| {
            registry
                .resources()
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| ConstraintError::UnresolvedDefault {
                    role,
                    id: id.clone(),
                })
        };
        let default_clk = position("clock", &spec.default_clk)?;
        let default_rst = position("reset", &spec.default_rst)?;
        let assignments = assign_pins(&spec.default_attrs, &registry)?;

        info!(
            "assembled platform {} ({}): {} resources, {} connectors, {} ports",
            spec.name,
            spec.device.part_number(),
            registry.len(),
            registry.connectors().len(),
            assignments.len()
        );

        Ok(Self {
            spec,
            registry,
            default_clk,
            default_rst,
            assignments,
            toolchain,
        })
    }

    /// Returns the board name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Returns the FPGA identity.
    pub fn device(&self) -> &DeviceIdentity {
        &self.spec.device
    }

    /// Returns the platform-level default attributes.
    pub fn default_attrs(&self) -> &AttributeSet {
        &self.spec.default_attrs
    }

    /// Returns the resources in registration order.
    pub fn resources(&self) -> &[Resource] {
        self.registry.resources()
    }

    /// Returns the connectors in registration order.
    pub fn connectors(&self) -> &[Connector] {
        self.registry.connectors()
    }

    /// Returns the resource `kind#index`.
    pub fn lookup(&self, kind: &str, index: u32) -> Option<&Resource> {
        self.registry.get(&ResourceId::new(kind, index))
    }

    /// Returns the default clock resource.
    pub fn default_clock(&self) -> &Resource {
        &self.registry.resources()[self.default_clk]
    }

    /// Returns the default reset resource.
    pub fn default_reset(&self) -> &Resource {
        &self.registry.resources()[self.default_rst]
    }

    /// Returns the frequency of the default clock, if it carries one.
    pub fn default_clock_frequency(&self) -> Option<Frequency> {
        self.default_clock().clock().map(|c| c.frequency)
    }

    /// Returns the attributes in effect for a resource, or one of its subsignals.
    ///
    /// Platform defaults are overlaid by the resource's attributes, which are
    /// overlaid by the subsignal's. `None` if the resource or subsignal does
    /// not exist.
    pub fn effective_attrs(
        &self,
        id: &ResourceId,
        subsignal: Option<&str>,
    ) -> Option<AttributeSet> {
        let resource = self.registry.get(id)?;
        let attrs = AttributeSet::merge(&self.spec.default_attrs, resource.attrs());
        match subsignal {
            None => Some(attrs),
            Some(name) => resource
                .subsignal(name)
                .map(|sub| AttributeSet::merge(&attrs, &sub.attrs)),
        }
    }

    /// Returns every constrained port, resources in registration order and
    /// subsignals in declaration order.
    pub fn pin_assignments(&self) -> &[PinAssignment] {
        &self.assignments
    }

    /// Returns the toolchain that programs this board.
    pub fn toolchain(&self) -> &dyn Toolchain {
        self.toolchain.as_ref()
    }

    /// Hands the platform and `design` to `backend`.
    pub fn build<D, B>(
        &self,
        design: &D,
        backend: &B,
        name: &str,
    ) -> Result<BuildProducts, B::Error>
    where
        D: ?Sized,
        B: SynthesisBackend<D>,
    {
        info!("building {name} for {}", self.spec.name);
        backend.synthesize(BuildRequest {
            platform: self,
            design,
            name,
        })
    }

    /// Programs the artifact `name` from `products` with the platform's toolchain.
    pub fn program(&self, products: &BuildProducts, name: &str) -> Result<(), ProgramError> {
        info!(
            "programming {name}.{} onto {} with {}",
            self.toolchain.artifact_extension(),
            self.spec.name,
            self.toolchain.name()
        );
        self.toolchain.program(products, name)
    }

    /// Builds `design` and programs the resulting artifact `name`.
    ///
    /// Returns the build products so the caller can keep reports and images.
    pub fn build_and_program<D, B>(
        &self,
        design: &D,
        backend: &B,
        name: &str,
    ) -> Result<BuildProducts, BuildError<B::Error>>
    where
        D: ?Sized,
        B: SynthesisBackend<D>,
    {
        let products = self.build(design, backend, name).map_err(BuildError::Backend)?;
        self.program(&products, name)?;
        Ok(products)
    }
}

fn assign_pins(
    defaults: &AttributeSet,
    registry: &RegistryBuilder,
) -> Result<Vec<PinAssignment>, ConstraintError> {
    let mut out = Vec::new();
    for resource in registry.resources() {
        let id = resource.id();
        let attrs = AttributeSet::merge(defaults, resource.attrs());
        let port = format!("{}_{}", id.kind, id.index);
        let assignment = |port: String, subsignal: Option<String>, pins: &PinExpression, attrs| {
            Ok::<_, ConstraintError>(PinAssignment {
                port,
                resource: id.clone(),
                subsignal,
                pins: registry.physical_pins(pins)?,
                dir: pins.dir(),
                invert: pins.invert(),
                differential: pins.is_differential(),
                attrs,
                clock: None,
            })
        };
        match resource.body() {
            ResourceBody::Pins(pins) => {
                let mut leaf = assignment(port, None, pins, attrs)?;
                leaf.clock = resource.clock().map(|c| c.frequency);
                out.push(leaf);
            }
            ResourceBody::Subsignals(subs) => {
                for sub in subs {
                    out.push(assignment(
                        format!("{port}__{}", sub.name),
                        Some(sub.name.clone()),
                        &sub.pins,
                        AttributeSet::merge(&attrs, &sub.attrs),
                    )?);
                }
            }
        }
    }
    Ok(out)
}
