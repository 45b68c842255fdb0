//! Per-tick ram drag application across the tracked intakes.

use aero_core::constants::RAM_DRAG_FORCE_SCALE;
use aero_core::vector::{self, Vector3};

use crate::inventory::{
    AeroSurface, EngineId, IntakeInventory, PartId, TransformId, TransformLookup,
};
use crate::model::{drag_per_area, ram_drag};

/// Live vessel state read and written by the applicator each tick.
pub trait RamDragHost {
    /// Current throttle of an engine, nominally in `[0, 1]`.
    fn engine_throttle(&self, engine: EngineId) -> f64;
    fn intake_enabled(&self, part: PartId) -> bool;
    /// World-space forward (outward) direction of an intake transform.
    fn transform_forward(&self, transform: TransformId) -> Vector3;
    /// Normalized velocity of the part expressed in its own frame.
    fn part_local_velocity_norm(&self, part: PartId) -> Vector3;
    fn add_local_force(&mut self, part: PartId, force: Vector3, torque: Vector3);
}

/// Values derived during one application pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RamDragSample {
    pub mach: f64,
    pub mean_throttle: f64,
    pub drag_per_area: f64,
    pub ram_drag: f64,
    /// Number of intakes that received a force this tick.
    pub loaded_intakes: usize,
    /// Sum of force magnitudes posted this tick.
    pub total_force: f64,
}

/// Vessel-level ram drag engine.
#[derive(Debug, Clone, Default)]
pub struct RamDragApplicator {
    inventory: IntakeInventory,
    last_sample: Option<RamDragSample>,
}

impl RamDragApplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked intakes and engines after a composition change.
    ///
    /// The new inventory is built completely before it replaces the old one.
    pub fn update_aero_data<L: TransformLookup + ?Sized>(
        &mut self,
        used: &[Option<AeroSurface>],
        unused: &[Option<AeroSurface>],
        lookup: &L,
    ) {
        self.inventory = IntakeInventory::build(used, unused, lookup);
    }

    pub fn inventory(&self) -> &IntakeInventory {
        &self.inventory
    }

    pub fn last_sample(&self) -> Option<&RamDragSample> {
        self.last_sample.as_ref()
    }

    /// Mean throttle over tracked engines; zero when there are none.
    pub fn mean_throttle<H: RamDragHost + ?Sized>(&self, host: &H) -> f64 {
        let engines = self.inventory.engines();
        if engines.is_empty() {
            return 0.0;
        }
        let total: f64 = engines
            .iter()
            .map(|engine| host.engine_throttle(*engine).clamp(0.0, 1.0))
            .sum();
        total / engines.len() as f64
    }

    /// Compute ram drag for this tick and post a force through every intake facing the flow.
    pub fn apply_intake_ram_drag<H: RamDragHost + ?Sized>(
        &mut self,
        host: &mut H,
        mach: f64,
        vessel_vel_norm: Vector3,
        dynamic_pressure: f64,
    ) -> RamDragSample {
        let mean_throttle = self.mean_throttle(host);
        let per_area = drag_per_area(mach);
        // No air-breathing engines means nothing is decelerating captured air.
        let current_ram_drag = if self.inventory.engines().is_empty() {
            0.0
        } else {
            ram_drag(mach, mean_throttle)
        };

        let mut sample = RamDragSample {
            mach,
            mean_throttle,
            drag_per_area: per_area,
            ram_drag: current_ram_drag,
            loaded_intakes: 0,
            total_force: 0.0,
        };

        if current_ram_drag > 0.0 {
            for intake in self.inventory.intakes() {
                if !host.intake_enabled(intake.part) {
                    continue;
                }

                let forward = host.transform_forward(intake.transform);
                let cos_aoa = vector::dot(&forward, &vessel_vel_norm).max(0.0);
                if cos_aoa <= intake.aoa_threshold {
                    continue;
                }

                let magnitude = dynamic_pressure
                    * cos_aoa
                    * current_ram_drag
                    * intake.area_m2
                    * RAM_DRAG_FORCE_SCALE;
                let local_vel = host.part_local_velocity_norm(intake.part);
                let force = vector::scale(&local_vel, -magnitude);
                host.add_local_force(intake.part, force, vector::ZERO);

                sample.loaded_intakes += 1;
                sample.total_force += vector::norm(&force);
            }
        }

        self.last_sample = Some(sample);
        sample
    }
}
