//! Deferred commands produced by planning and applied by the mutation layer
//!
//! A command captures every value it needs at plan time and is never mutated
//! after creation. It is applied exactly once, in queue order, against the
//! [`AiControls`] facade; stale preconditions make the facade no-op rather
//! than fail.

pub mod controls;

pub use controls::AiControls;

use crate::core::types::{BuildingTypeId, FleetId, PlanetId, TechId, UnitKind};
use crate::snapshot::FleetTask;
use serde::{Deserialize, Serialize};

/// A deferred, self-contained operation queued during planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    MoveFleet {
        fleet: FleetId,
        target: PlanetId,
        task: FleetTask,
    },
    StopFleet {
        fleet: FleetId,
    },
    CreateFleet {
        planet: PlanetId,
        cargo: Vec<(UnitKind, u32)>,
    },
    Colonize {
        fleet: FleetId,
        planet: PlanetId,
    },
    PlaceBuilding {
        planet: PlanetId,
        building: BuildingTypeId,
    },
    RepairBuilding {
        planet: PlanetId,
        building: BuildingTypeId,
    },
    UpgradeBuilding {
        planet: PlanetId,
        building: BuildingTypeId,
        to_level: u32,
    },
    DemolishBuilding {
        planet: PlanetId,
        building: BuildingTypeId,
    },
    StartResearch {
        tech: TechId,
        speed: u32,
    },
    OrderUnits {
        planet: PlanetId,
        kind: UnitKind,
        count: u32,
    },
    ChangeInventory {
        kind: UnitKind,
        delta: i64,
    },
    ClearColonizationTarget {
        planet: PlanetId,
    },
}

impl Command {
    /// Apply this command against the mutation facade
    pub fn apply(&self, controls: &mut dyn AiControls) {
        match self {
            Command::MoveFleet { fleet, target, task } => {
                controls.move_fleet(*fleet, *target, *task)
            }
            Command::StopFleet { fleet } => controls.stop_fleet(*fleet),
            Command::CreateFleet { planet, cargo } => controls.create_fleet(*planet, cargo),
            Command::Colonize { fleet, planet } => controls.colonize(*fleet, *planet),
            Command::PlaceBuilding { planet, building } => {
                controls.place_building(*planet, building.clone())
            }
            Command::RepairBuilding { planet, building } => {
                controls.repair_building(*planet, building.clone())
            }
            Command::UpgradeBuilding { planet, building, to_level } => {
                controls.upgrade_building(*planet, building.clone(), *to_level)
            }
            Command::DemolishBuilding { planet, building } => {
                controls.demolish_building(*planet, building.clone())
            }
            Command::StartResearch { tech, speed } => {
                controls.start_research(tech.clone(), *speed)
            }
            Command::OrderUnits { planet, kind, count } => {
                controls.order_units(*planet, *kind, *count)
            }
            Command::ChangeInventory { kind, delta } => controls.change_inventory(*kind, *delta),
            Command::ClearColonizationTarget { planet } => {
                controls.clear_colonization_target(*planet)
            }
        }
    }
}
