//! Shared read-only query helpers used by every planner

use crate::command::Command;
use crate::core::types::BuildingTypeId;
use crate::rules::{BuildingType, Capability, RuleTables};
use crate::snapshot::{FleetTask, FleetView, PlanetView, WorldSnapshot};
use std::cmp::Ordering;

/// Treasury must exceed the auto-build reserve by this factor before
/// money-spending actions are allowed (unless the faction is established)
pub const SPEND_RESERVE_FACTOR: i64 = 2;

/// First building type declaring the given capability
///
/// `None` means the static rule tables are missing a required type — a
/// configuration error the caller logs and skips, never a runtime failure.
pub fn find_building(rules: &RuleTables, capability: Capability) -> Option<&BuildingType> {
    rules.buildings.iter().find(|b| b.provides(capability))
}

/// Fleets not yet committed to `task` (eligible for new assignment) that
/// satisfy the predicate, in stable id order
pub fn find_fleets_for<'a>(
    snapshot: &'a WorldSnapshot,
    task: FleetTask,
    predicate: impl Fn(&FleetView) -> bool,
) -> Vec<&'a FleetView> {
    snapshot
        .own_fleets
        .values()
        .filter(|f| f.task != task && predicate(f))
        .collect()
}

/// Fleets already committed to `task` that satisfy the predicate, in stable
/// id order
pub fn find_fleets_with_task<'a>(
    snapshot: &'a WorldSnapshot,
    task: FleetTask,
    predicate: impl Fn(&FleetView) -> bool,
) -> Vec<&'a FleetView> {
    snapshot
        .own_fleets
        .values()
        .filter(|f| f.task == task && predicate(f))
        .collect()
}

/// Number of completed-or-constructing instances of a building type on a
/// planet
pub fn count(planet: &PlanetView, building: &BuildingTypeId) -> usize {
    planet.buildings.iter().filter(|b| &b.type_id == building).count()
}

/// Number of instances of any building type sharing `kind` on a planet
pub fn count_kind(planet: &PlanetView, kind: &str, rules: &RuleTables) -> usize {
    planet
        .buildings
        .iter()
        .filter(|b| {
            rules
                .building(&b.type_id)
                .map(|bt| bt.kind == kind)
                .unwrap_or(false)
        })
        .count()
}

/// Whether a building type may be placed on a planet: surface compatibility,
/// per-type/per-kind limits, and a free footprint on the placement grid
pub fn can_place(planet: &PlanetView, building: &BuildingType, rules: &RuleTables) -> bool {
    if building.except.contains(&planet.surface) {
        return false;
    }
    if building.limit > 0 && count(planet, &building.id) >= building.limit as usize {
        return false;
    }
    if building.limit < 0 && count_kind(planet, &building.kind, rules) >= (-building.limit) as usize
    {
        return false;
    }
    planet.grid.has_free_area(building.size)
}

/// Spend policy shared by the planners: money-spending actions are allowed
/// once the treasury clears the auto-build reserve by a margin, or once the
/// faction is established beyond its first two planets
pub fn may_spend_money(snapshot: &WorldSnapshot) -> bool {
    snapshot.money > snapshot.policy.auto_build_limit * SPEND_RESERVE_FACTOR
        || snapshot.own_planets.len() > 2
}

/// Pick the best planet/building combination and return place-building
/// commands for it
///
/// Planets are drawn from the faction's own planets, filtered and ranked by
/// the given functions; within the chosen planet the building candidates are
/// filtered, checked against [`can_place`] and ranked by cost order. With
/// `allow_multiple` every matching planet gets a command, otherwise only the
/// best one does.
pub fn plan_category(
    snapshot: &WorldSnapshot,
    rules: &RuleTables,
    planet_filter: impl Fn(&PlanetView) -> bool,
    planet_order: impl Fn(&PlanetView, &PlanetView) -> Ordering,
    building_filter: impl Fn(&BuildingType, &PlanetView) -> bool,
    cost_order: impl Fn(&BuildingType, &BuildingType) -> Ordering,
    allow_multiple: bool,
) -> Vec<Command> {
    let mut planets: Vec<&PlanetView> = snapshot
        .own_planets
        .values()
        .filter(|p| planet_filter(p))
        .collect();
    planets.sort_by(|a, b| planet_order(a, b).then(a.id.cmp(&b.id)));

    let mut commands = Vec::new();
    for planet in planets {
        let mut buildings: Vec<&BuildingType> = rules
            .buildings
            .iter()
            .filter(|bt| building_filter(bt, planet) && can_place(planet, bt, rules))
            .collect();
        buildings.sort_by(|a, b| cost_order(a, b).then(a.id.cmp(&b.id)));

        if let Some(building) = buildings.first() {
            commands.push(Command::PlaceBuilding {
                planet: planet.id,
                building: building.id.clone(),
            });
            if !allow_multiple {
                break;
            }
        }
    }
    commands
}
