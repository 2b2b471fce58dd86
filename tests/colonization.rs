//! Integration tests for the colonization planner's per-tick flow

mod common;

use common::*;
use stellar_dominion::command::Command;
use stellar_dominion::core::types::{BuildingTypeId, FactionId, PlanetId, UnitKind, Vec2};
use stellar_dominion::planner::{ColonizationPlanner, Planner};
use stellar_dominion::snapshot::FleetTask;

#[test]
fn test_colonizer_en_route_blocks_new_expansion_work() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    let frontier = open_planet(9, Vec2::new(100.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);
    let fleet = colonizer_bound_for(PlanetId(9), Vec2::new(40.0, 0.0));
    snap.own_fleets.insert(fleet.id, fleet);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert!(queue.is_empty(), "a valid colonizer on mission is this tick's action");
}

#[test]
fn test_arrival_fires_colonize_and_clears_target() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    let frontier = open_planet(9, Vec2::new(100.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);
    snap.colonization_targets.insert(PlanetId(9));

    let mut fleet = colonizer_bound_for(PlanetId(9), Vec2::new(100.0, 0.0));
    fleet.moving = false;
    fleet.arrived_at = Some(PlanetId(9));
    let fleet_id = fleet.id;
    snap.own_fleets.insert(fleet.id, fleet);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![
            Command::Colonize { fleet: fleet_id, planet: PlanetId(9) },
            Command::ClearColonizationTarget { planet: PlanetId(9) },
        ]
    );
}

#[test]
fn test_cancellation_precedes_reassignment() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let rival = FactionId(2);
    let mut snap = home_snapshot(faction, &rules);

    // The planet a colonizer was flying to has been claimed by a rival
    let mut lost = open_planet(5, Vec2::new(50.0, 0.0));
    lost.owner = Some(rival);
    snap.enemy_planets.insert(lost.id, lost);
    let stale = colonizer_bound_for(PlanetId(5), Vec2::new(20.0, 0.0));
    let stale_id = stale.id;
    snap.own_fleets.insert(stale.id, stale);

    // A fresh candidate and an idle fleet able to take it
    let frontier = open_planet(9, Vec2::new(100.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);
    let idle = colony_fleet_at(PlanetId(1), Vec2::new(0.0, 0.0));
    let idle_id = idle.id;
    snap.own_fleets.insert(idle.id, idle);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(queue[0], Command::StopFleet { fleet: stale_id });
    assert_eq!(
        queue[1],
        Command::MoveFleet {
            fleet: idle_id,
            target: PlanetId(9),
            task: FleetTask::Colonize,
        }
    );
    assert_eq!(queue.len(), 2);

    // Reconciliation is a pure function of the snapshot: planning the same
    // state again yields the identical queue
    let again = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(queue, again);
}

#[test]
fn test_assignment_picks_nearest_candidate() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    let far = open_planet(7, Vec2::new(400.0, 0.0));
    let near = open_planet(8, Vec2::new(120.0, 0.0));
    snap.unknown_planets.insert(far.id, far);
    snap.unknown_planets.insert(near.id, near);

    let idle = colony_fleet_at(PlanetId(1), Vec2::new(0.0, 0.0));
    let idle_id = idle.id;
    snap.own_fleets.insert(idle.id, idle);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::MoveFleet {
            fleet: idle_id,
            target: PlanetId(8),
            task: FleetTask::Colonize,
        }]
    );
}

#[test]
fn test_deploys_colony_ship_from_inventory_at_spaceport() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    snap.own_planets
        .get_mut(&PlanetId(1))
        .unwrap()
        .buildings
        .push(active("military_spaceport"));
    snap.refresh_stats(&rules);
    snap.inventory.insert(UnitKind::ColonyShip, 1);

    let frontier = open_planet(9, Vec2::new(150.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![
            Command::CreateFleet {
                planet: PlanetId(1),
                cargo: vec![(UnitKind::ColonyShip, 1)],
            },
            Command::ChangeInventory { kind: UnitKind::ColonyShip, delta: -1 },
        ]
    );
}

#[test]
fn test_builds_spaceport_before_anything_else_can_launch() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);
    snap.inventory.insert(UnitKind::ColonyShip, 1);

    let frontier = open_planet(9, Vec2::new(150.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::PlaceBuilding {
            planet: PlanetId(1),
            building: BuildingTypeId::new("military_spaceport"),
        }]
    );
}

#[test]
fn test_orders_one_colony_ship_when_idle_in_opportunistic_mode() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let rival = FactionId(2);
    let mut snap = home_snapshot(faction, &rules);

    let home = snap.own_planets.get_mut(&PlanetId(1)).unwrap();
    home.buildings.push(active("military_spaceport"));
    home.buildings.push(active("orbital_factory"));
    snap.refresh_stats(&rules);

    // Rival planet lead triggers expansion without any ships at hand
    for id in 20..24 {
        let mut held = open_planet(id, Vec2::new(300.0, id as f32));
        held.owner = Some(rival);
        snap.enemy_planets.insert(held.id, held);
    }
    let frontier = open_planet(9, Vec2::new(150.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::OrderUnits {
            planet: PlanetId(1),
            kind: UnitKind::ColonyShip,
            count: 1,
        }]
    );
}

#[test]
fn test_production_builds_orbital_factory_first() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    snap.own_planets
        .get_mut(&PlanetId(1))
        .unwrap()
        .buildings
        .push(active("military_spaceport"));
    snap.refresh_stats(&rules);

    let frontier = open_planet(9, Vec2::new(150.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);
    // colony_modules needs two civil labs but only one planet is owned, so
    // research is blocked on expansion even with no ships anywhere
    snap.remaining_research
        .push(stellar_dominion::core::types::TechId::new("colony_modules"));

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::PlaceBuilding {
            planet: PlanetId(1),
            building: BuildingTypeId::new("orbital_factory"),
        }]
    );
}

#[test]
fn test_explicit_mode_is_inert_without_targets() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    let frontier = open_planet(9, Vec2::new(150.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);
    let idle = colony_fleet_at(PlanetId(1), Vec2::new(0.0, 0.0));
    snap.own_fleets.insert(idle.id, idle);

    let queue = ColonizationPlanner::explicit().plan(&snap, &rules);
    assert!(queue.is_empty());
}

#[test]
fn test_explicit_mode_assigns_only_listed_targets() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);

    let listed = open_planet(9, Vec2::new(150.0, 0.0));
    let unlisted = open_planet(10, Vec2::new(50.0, 0.0));
    snap.unknown_planets.insert(listed.id, listed);
    snap.unknown_planets.insert(unlisted.id, unlisted);
    snap.colonization_targets.insert(PlanetId(9));

    let idle = colony_fleet_at(PlanetId(1), Vec2::new(0.0, 0.0));
    let idle_id = idle.id;
    snap.own_fleets.insert(idle.id, idle);

    let queue = ColonizationPlanner::explicit().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::MoveFleet {
            fleet: idle_id,
            target: PlanetId(9),
            task: FleetTask::Colonize,
        }]
    );
}

#[test]
fn test_explicit_mode_orders_ships_in_bulk() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);
    snap.money = 400_000;

    let home = snap.own_planets.get_mut(&PlanetId(1)).unwrap();
    home.buildings.push(active("military_spaceport"));
    home.buildings.push(active("orbital_factory"));
    snap.refresh_stats(&rules);

    let listed = open_planet(9, Vec2::new(150.0, 0.0));
    snap.unknown_planets.insert(listed.id, listed);
    snap.colonization_targets.insert(PlanetId(9));

    // (400k - 100k reserve) / 25k per ship
    let queue = ColonizationPlanner::explicit().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::OrderUnits {
            planet: PlanetId(1),
            kind: UnitKind::ColonyShip,
            count: 12,
        }]
    );
}

#[test]
fn test_opportunistic_range_limit_excludes_far_planets() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let mut snap = home_snapshot(faction, &rules);
    snap.inventory.insert(UnitKind::ColonyShip, 1);

    let far = open_planet(9, Vec2::new(900.0, 0.0));
    snap.unknown_planets.insert(far.id, far);

    // The far planet never gets a fleet, but readiness work still proceeds
    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::PlaceBuilding {
            planet: PlanetId(1),
            building: BuildingTypeId::new("military_spaceport"),
        }]
    );
}

#[test]
fn test_enemy_planets_are_never_assignment_targets() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let rival = FactionId(2);
    let mut snap = home_snapshot(faction, &rules);

    let mut held = open_planet(9, Vec2::new(150.0, 0.0));
    held.owner = Some(rival);
    snap.enemy_planets.insert(held.id, held);

    let idle = colony_fleet_at(PlanetId(1), Vec2::new(0.0, 0.0));
    let idle_id = idle.id;
    snap.own_fleets.insert(idle.id, idle);

    // Even with conquest allowed, fleets only ever fly to unclaimed planets
    for may_conquer in [false, true] {
        snap.policy.may_conquer = may_conquer;
        let queue = ColonizationPlanner::new().plan(&snap, &rules);
        assert!(
            queue.iter().all(|c| !matches!(c, Command::MoveFleet { .. })),
            "no fleet assignment toward a held planet (may_conquer={})",
            may_conquer
        );
    }

    // An unclaimed planet in range does get the fleet
    let frontier = open_planet(10, Vec2::new(200.0, 0.0));
    snap.unknown_planets.insert(frontier.id, frontier);
    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![Command::MoveFleet {
            fleet: idle_id,
            target: PlanetId(10),
            task: FleetTask::Colonize,
        }]
    );
}

#[test]
fn test_deployment_proceeds_when_only_candidate_is_enemy_held() {
    let rules = shipped_rules();
    let faction = FactionId(1);
    let rival = FactionId(2);
    let mut snap = home_snapshot(faction, &rules);
    snap.money = 500_000;

    snap.own_planets
        .get_mut(&PlanetId(1))
        .unwrap()
        .buildings
        .push(active("military_spaceport"));
    let second = owned_planet(2, faction, Vec2::new(80.0, 0.0));
    snap.own_planets.insert(second.id, second);
    snap.refresh_stats(&rules);
    snap.inventory.insert(UnitKind::ColonyShip, 1);

    // The only known expansion target is held by a rival and conquest is
    // off, yet the ship at hand must still be readied for deployment
    let mut held = open_planet(9, Vec2::new(150.0, 0.0));
    held.owner = Some(rival);
    snap.enemy_planets.insert(held.id, held);

    let queue = ColonizationPlanner::new().plan(&snap, &rules);
    assert_eq!(
        queue,
        vec![
            Command::CreateFleet {
                planet: PlanetId(1),
                cargo: vec![(UnitKind::ColonyShip, 1)],
            },
            Command::ChangeInventory { kind: UnitKind::ColonyShip, delta: -1 },
        ]
    );
}
