//! Exposed intakes and air-breathing engines on the current vessel.

use aero_core::constants::INTAKE_AIR;
use tracing::{debug, warn};

/// Handle of a part owned by the host simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

/// Handle of an engine module owned by the host simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(pub u32);

/// Handle of a model transform (the intake mouth) owned by the host simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformId(pub u32);

/// Static description of an intake module on a part.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeModule {
    pub area_m2: f64,
    /// Cosine of the angle between intake facing and flow below which the intake is ignored.
    pub aoa_threshold: f64,
    pub transform_name: String,
}

/// Static description of an engine module on a part.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineModule {
    pub id: EngineId,
    pub propellants: Vec<String>,
}

impl EngineModule {
    /// Engines burning atmospheric air also suffer ram drag.
    pub fn is_air_breathing(&self) -> bool {
        self.propellants.iter().any(|p| p == INTAKE_AIR)
    }
}

/// Aerodynamic surface of a single part, with the sibling modules resolved up front.
#[derive(Debug, Clone, PartialEq)]
pub struct AeroSurface {
    pub part: PartId,
    pub intake: Option<IntakeModule>,
    pub engines: Vec<EngineModule>,
}

/// Resolves named model transforms once per rebuild.
pub trait TransformLookup {
    fn find_model_transform(&self, part: PartId, name: &str) -> Option<TransformId>;
}

/// An exposed intake tracked between rebuilds.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedIntake {
    /// Force receiver; drag is applied through this part.
    pub part: PartId,
    pub transform: TransformId,
    pub area_m2: f64,
    pub aoa_threshold: f64,
}

/// Intakes and engines found on the vessel at the last composition change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeInventory {
    intakes: Vec<TrackedIntake>,
    engines: Vec<EngineId>,
}

impl IntakeInventory {
    /// Build a fresh inventory.
    ///
    /// Intakes are only taken from `used` surfaces. Engines are taken from both: a covered
    /// engine still swallows air and still produces ram drag.
    pub fn build<L: TransformLookup + ?Sized>(
        used: &[Option<AeroSurface>],
        unused: &[Option<AeroSurface>],
        lookup: &L,
    ) -> Self {
        let mut inventory = Self::default();

        for surface in used.iter().flatten() {
            if let Some(intake) = &surface.intake {
                match lookup.find_model_transform(surface.part, &intake.transform_name) {
                    Some(transform) => inventory.intakes.push(TrackedIntake {
                        part: surface.part,
                        transform,
                        area_m2: intake.area_m2,
                        aoa_threshold: intake.aoa_threshold,
                    }),
                    None => warn!(
                        part = surface.part.0,
                        transform = %intake.transform_name,
                        "intake transform not found; intake ignored"
                    ),
                }
            }
            inventory.collect_engines(surface);
        }

        for surface in unused.iter().flatten() {
            inventory.collect_engines(surface);
        }

        debug!(
            intakes = inventory.intakes.len(),
            engines = inventory.engines.len(),
            "intake inventory rebuilt"
        );
        inventory
    }

    fn collect_engines(&mut self, surface: &AeroSurface) {
        self.engines.extend(
            surface
                .engines
                .iter()
                .filter(|engine| engine.is_air_breathing())
                .map(|engine| engine.id),
        );
    }

    pub fn intakes(&self) -> &[TrackedIntake] {
        &self.intakes
    }

    pub fn engines(&self) -> &[EngineId] {
        &self.engines
    }

    pub fn is_empty(&self) -> bool {
        self.intakes.is_empty() && self.engines.is_empty()
    }
}
