//! Shared fixtures for the integration tests

// Not every test binary uses every fixture
#![allow(dead_code)]

use std::path::PathBuf;

use stellar_dominion::core::types::{
    BuildingTypeId, FactionId, FleetId, PlanetId, UnitKind, Vec2,
};
use stellar_dominion::rules::loader::load_rule_tables;
use stellar_dominion::rules::RuleTables;
use stellar_dominion::snapshot::{
    BuildingInstance, BuildingState, FleetTask, FleetView, PlacementGrid, PlanetKnowledge,
    PlanetView, WorldSnapshot,
};

/// The rule tables shipped in data/
pub fn shipped_rules() -> RuleTables {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    load_rule_tables(&dir).expect("shipped rule tables should load")
}

/// A fully known owned planet with room to build
pub fn owned_planet(id: u32, faction: FactionId, position: Vec2) -> PlanetView {
    let mut planet = PlanetView::sighted(PlanetId(id), format!("Colony-{}", id), position);
    planet.owner = Some(faction);
    planet.knowledge = PlanetKnowledge::Owner;
    planet.grid = PlacementGrid::open(12, 12);
    planet
}

/// An unowned, fully scanned planet eligible for colonization
pub fn open_planet(id: u32, position: Vec2) -> PlanetView {
    let mut planet = PlanetView::sighted(PlanetId(id), format!("Frontier-{}", id), position);
    planet.knowledge = PlanetKnowledge::Owner;
    planet.grid = PlacementGrid::open(12, 12);
    planet
}

pub fn active(type_id: &str) -> BuildingInstance {
    BuildingInstance {
        type_id: BuildingTypeId::new(type_id),
        level: 1,
        state: BuildingState::Active,
    }
}

pub fn damaged(type_id: &str) -> BuildingInstance {
    BuildingInstance {
        type_id: BuildingTypeId::new(type_id),
        level: 1,
        state: BuildingState::Damaged,
    }
}

/// Snapshot with one developed home planet at the origin
pub fn home_snapshot(faction: FactionId, rules: &RuleTables) -> WorldSnapshot {
    let mut snap = WorldSnapshot::new(faction, 1);
    snap.money = 400_000;
    let mut home = owned_planet(1, faction, Vec2::new(0.0, 0.0));
    home.buildings.push(active("colony_base"));
    home.buildings.push(active("solar_plant"));
    snap.own_planets.insert(home.id, home);
    snap.refresh_stats(rules);
    snap
}

/// An idle fleet stationed at a planet, loaded with one colony ship
pub fn colony_fleet_at(planet: PlanetId, position: Vec2) -> FleetView {
    let mut fleet = FleetView::idle_at(FleetId::new(), planet, position);
    fleet.cargo.insert(UnitKind::ColonyShip, 1);
    fleet
}

/// A fleet en route to colonize the given planet
pub fn colonizer_bound_for(target: PlanetId, position: Vec2) -> FleetView {
    FleetView {
        id: FleetId::new(),
        position,
        task: FleetTask::Colonize,
        target_planet: Some(target),
        arrived_at: None,
        moving: true,
        cargo: [(UnitKind::ColonyShip, 1)].into_iter().collect(),
    }
}
