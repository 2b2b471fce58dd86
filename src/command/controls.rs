//! Mutation facade trait — the sole writer of authoritative world state
//!
//! Implemented outside this crate by the simulation host. Every operation
//! must re-check its own precondition against live state and silently no-op
//! when it no longer holds (the planning snapshot may be a tick stale), so
//! draining a command queue can never corrupt the world.

use crate::core::types::{BuildingTypeId, FleetId, PlanetId, TechId, UnitKind};
use crate::snapshot::FleetTask;

/// Imperative operations the command queue is drained into
///
/// All operations run on a single serialized execution context: one command
/// runs to completion before the next starts.
pub trait AiControls {
    /// Send a fleet toward a planet on the given mission
    fn move_fleet(&mut self, fleet: FleetId, target: PlanetId, task: FleetTask);

    /// Stop a fleet and reset its task to [`FleetTask::Idle`]
    fn stop_fleet(&mut self, fleet: FleetId);

    /// Create a fleet in orbit of an owned planet carrying the given cargo.
    /// Inventory bookkeeping is issued as separate `change_inventory`
    /// commands, never implied here.
    fn create_fleet(&mut self, planet: PlanetId, cargo: &[(UnitKind, u32)]);

    /// Colonize a planet with a fleet; only succeeds if the planet is still
    /// unowned and the fleet is stationed there with a colony ship. Resets
    /// the fleet to idle on success.
    fn colonize(&mut self, fleet: FleetId, planet: PlanetId);

    /// Begin constructing a building on a planet
    fn place_building(&mut self, planet: PlanetId, building: BuildingTypeId);

    /// Repair one damaged instance of a building type
    fn repair_building(&mut self, planet: PlanetId, building: BuildingTypeId);

    /// Upgrade one instance of a building type to the given level
    fn upgrade_building(&mut self, planet: PlanetId, building: BuildingTypeId, to_level: u32);

    /// Demolish one instance of a building type
    fn demolish_building(&mut self, planet: PlanetId, building: BuildingTypeId);

    /// Start a research item with a money-speed multiplier
    fn start_research(&mut self, tech: TechId, speed: u32);

    /// Place a production order for units at a planet
    fn order_units(&mut self, planet: PlanetId, kind: UnitKind, count: u32);

    /// Adjust the faction inventory count for a unit kind
    fn change_inventory(&mut self, kind: UnitKind, delta: i64);

    /// Remove a planet from the faction's explicit colonization target set
    fn clear_colonization_target(&mut self, planet: PlanetId);
}
