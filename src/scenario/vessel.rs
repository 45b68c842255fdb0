//! Scripted stand-in for the host vessel during replays.

use aero_config::PartConfig;
use aero_core::vector::{self, Vector3};
use aero_ramdrag::{
    AeroSurface, EngineId, EngineModule, IntakeModule, PartId, RamDragHost, TransformId,
    TransformLookup,
};

#[derive(Debug, Clone)]
struct ScriptedPart {
    config: PartConfig,
    attached: bool,
}

/// Vessel whose parts come from configuration and whose attitude is fixed to the flight frame.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedVessel {
    parts: Vec<ScriptedPart>,
    /// Current throttle, indexed by engine handle.
    throttles: Vec<f64>,
    velocity_norm: Vector3,
    applied: Vec<(PartId, Vector3)>,
}

impl ScriptedVessel {
    pub(crate) fn new(parts: &[PartConfig]) -> Self {
        let throttles = parts
            .iter()
            .flat_map(|part| part.engines.iter().map(|engine| engine.throttle))
            .collect();
        Self {
            parts: parts
                .iter()
                .map(|config| ScriptedPart {
                    config: config.clone(),
                    attached: true,
                })
                .collect(),
            throttles,
            velocity_norm: vector::ZERO,
            applied: Vec::new(),
        }
    }

    /// Surfaces split into exposed ("used") and covered ("unused") sets.
    pub(crate) fn aero_surfaces(&self) -> (Vec<Option<AeroSurface>>, Vec<Option<AeroSurface>>) {
        let mut used = Vec::new();
        let mut unused = Vec::new();
        let mut next_engine = 0u32;

        for (index, part) in self.parts.iter().enumerate() {
            let engines: Vec<EngineModule> = part
                .config
                .engines
                .iter()
                .map(|engine| {
                    let id = EngineId(next_engine);
                    next_engine += 1;
                    EngineModule {
                        id,
                        propellants: engine.propellants.clone(),
                    }
                })
                .collect();

            if !part.attached {
                used.push(None);
                continue;
            }

            let surface = AeroSurface {
                part: PartId(index as u32),
                intake: part.config.intake.as_ref().map(|intake| IntakeModule {
                    area_m2: intake.area_m2,
                    aoa_threshold: intake.aoa_threshold,
                    transform_name: intake.transform.clone(),
                }),
                engines,
            };
            if part.config.exposed {
                used.push(Some(surface));
            } else {
                unused.push(Some(surface));
            }
        }

        (used, unused)
    }

    /// Detach every part scheduled to leave by `time_s`. Returns true when anything changed.
    pub(crate) fn detach_due(&mut self, time_s: f64) -> bool {
        let mut changed = false;
        for part in &mut self.parts {
            if part.attached && part.config.detach_s.is_some_and(|at| at <= time_s) {
                part.attached = false;
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn set_throttle(&mut self, throttle: f64) {
        for value in &mut self.throttles {
            *value = throttle;
        }
    }

    pub(crate) fn set_velocity_norm(&mut self, velocity_norm: Vector3) {
        self.velocity_norm = velocity_norm;
    }

    /// Forces applied since the last call.
    pub(crate) fn take_applied(&mut self) -> Vec<(PartId, Vector3)> {
        std::mem::take(&mut self.applied)
    }

    fn part(&self, part: PartId) -> Option<&ScriptedPart> {
        self.parts.get(part.0 as usize).filter(|p| p.attached)
    }
}

impl TransformLookup for ScriptedVessel {
    fn find_model_transform(&self, part: PartId, name: &str) -> Option<TransformId> {
        let intake = self.part(part)?.config.intake.as_ref()?;
        (intake.transform == name).then_some(TransformId(part.0))
    }
}

impl RamDragHost for ScriptedVessel {
    fn engine_throttle(&self, engine: EngineId) -> f64 {
        self.throttles.get(engine.0 as usize).copied().unwrap_or(0.0)
    }

    fn intake_enabled(&self, part: PartId) -> bool {
        self.part(part)
            .and_then(|p| p.config.intake.as_ref())
            .is_some_and(|intake| intake.enabled)
    }

    fn transform_forward(&self, transform: TransformId) -> Vector3 {
        self.part(PartId(transform.0))
            .and_then(|p| p.config.intake.as_ref())
            .map(|intake| vector::normalize(&intake.forward))
            .unwrap_or(vector::ZERO)
    }

    fn part_local_velocity_norm(&self, _part: PartId) -> Vector3 {
        self.velocity_norm
    }

    fn add_local_force(&mut self, part: PartId, force: Vector3, _torque: Vector3) {
        self.applied.push((part, force));
    }
}
