//! Read-only fleet projection

use crate::core::types::{FleetId, PlanetId, UnitKind, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current mission classification of a fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FleetTask {
    Idle,
    Colonize,
    Attack,
    Transport,
}

/// Read-only view of one of the faction's own fleets this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetView {
    pub id: FleetId,
    pub position: Vec2,
    pub task: FleetTask,
    pub target_planet: Option<PlanetId>,
    /// Planet the fleet is currently stationed at, if any
    pub arrived_at: Option<PlanetId>,
    pub moving: bool,
    pub cargo: BTreeMap<UnitKind, u32>,
}

impl FleetView {
    pub fn idle_at(id: FleetId, planet: PlanetId, position: Vec2) -> Self {
        Self {
            id,
            position,
            task: FleetTask::Idle,
            target_planet: None,
            arrived_at: Some(planet),
            moving: false,
            cargo: BTreeMap::new(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// True if the fleet carries at least one unit of the given kind
    pub fn carries(&self, kind: UnitKind) -> bool {
        self.cargo.get(&kind).copied().unwrap_or(0) > 0
    }
}
