//! Stellar Dominion - headless demo run
//!
//! Generates a small seeded galaxy, then runs the standard planner stack for
//! a number of ticks against an in-memory world that implements the mutation
//! facade. Useful for watching the AI bootstrap itself: spaceport, orbital
//! factory, colony ships, expansion, research.

use clap::Parser;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use stellar_dominion::command::AiControls;
use stellar_dominion::core::error::Result;
use stellar_dominion::core::types::{
    BuildingTypeId, FactionId, FleetId, PlanetId, SurfaceKind, TechId, Tick, UnitKind, Vec2,
};
use stellar_dominion::planner::TickPlanner;
use stellar_dominion::rules::loader::load_rule_tables;
use stellar_dominion::rules::RuleTables;
use stellar_dominion::snapshot::{
    BuildingInstance, BuildingState, FleetTask, FleetView, GlobalStats, PlacementGrid,
    PlanetKnowledge, PlanetView, WorldSnapshot,
};

/// Distance a fleet covers per tick
const FLEET_SPEED: f32 = 60.0;
/// Income per owned planet per tick
const PLANET_INCOME: i64 = 15_000;
/// Sensor range beyond owned territory within which planets are fully known
const SENSOR_RANGE: f32 = 700.0;

#[derive(Parser)]
#[command(name = "stellar-dominion", about = "Headless faction AI demo run")]
struct Args {
    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 60)]
    ticks: u64,

    /// Galaxy generation seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Directory containing the rule table TOML files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump_snapshot: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "stellar_dominion=debug".into()),
        )
        .init();

    let args = Args::parse();
    let rules = load_rule_tables(&args.data_dir)?;

    let faction = FactionId(1);
    let mut world = SimWorld::generate(faction, args.seed, &rules);
    let tick_planner = TickPlanner::standard(faction);

    tracing::info!(planets = world.planets.len(), seed = args.seed, "galaxy generated");

    let mut snapshot = world.snapshot(&rules, 0);
    for tick in 0..args.ticks {
        snapshot = world.snapshot(&rules, tick);
        let queue = tick_planner.plan_tick(&snapshot, &rules);
        for command in &queue {
            tracing::info!(tick, ?command, "applying");
            command.apply(&mut world);
        }
        world.advance();
    }

    let owned = world.planets.values().filter(|p| p.owner == Some(faction)).count();
    println!(
        "after {} ticks: {} planets owned, {} money, research done: {:?}",
        args.ticks, owned, world.money, world.completed_research
    );
    if args.dump_snapshot {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

struct SimPlanet {
    name: String,
    position: Vec2,
    surface: SurfaceKind,
    owner: Option<FactionId>,
    buildings: Vec<BuildingInstance>,
    grid: PlacementGrid,
}

struct SimFleet {
    position: Vec2,
    task: FleetTask,
    target: Option<PlanetId>,
    arrived_at: Option<PlanetId>,
    cargo: BTreeMap<UnitKind, u32>,
}

/// Minimal authoritative world for the demo; the engine itself only ever
/// sees snapshots of it and the mutation facade below
struct SimWorld {
    faction: FactionId,
    money: i64,
    planets: BTreeMap<PlanetId, SimPlanet>,
    fleets: BTreeMap<FleetId, SimFleet>,
    inventory: BTreeMap<UnitKind, u32>,
    colonization_targets: BTreeSet<PlanetId>,
    completed_research: Vec<TechId>,
    running_research: Option<(TechId, u64)>,
    production_orders: Vec<(UnitKind, u32, u64)>,
    building_costs: BTreeMap<BuildingTypeId, i64>,
    unit_costs: BTreeMap<UnitKind, i64>,
}

impl SimWorld {
    fn generate(faction: FactionId, seed: u64, rules: &RuleTables) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut planets = BTreeMap::new();

        let surfaces = [
            SurfaceKind::Terran,
            SurfaceKind::Rock,
            SurfaceKind::Ice,
            SurfaceKind::Ocean,
            SurfaceKind::Gas,
        ];
        for id in 0..14u32 {
            let position = Vec2::new(rng.gen_range(0.0..1500.0), rng.gen_range(0.0..1500.0));
            planets.insert(
                PlanetId(id),
                SimPlanet {
                    name: format!("System-{:02}", id),
                    position,
                    surface: surfaces[rng.gen_range(0..surfaces.len())],
                    owner: None,
                    buildings: Vec::new(),
                    grid: PlacementGrid::open(10, 10),
                },
            );
        }

        // Home planet with a main building and a power plant
        let home = planets.get_mut(&PlanetId(0)).expect("home planet exists");
        home.owner = Some(faction);
        home.surface = SurfaceKind::Terran;
        for type_id in ["colony_base", "solar_plant"] {
            home.buildings.push(BuildingInstance {
                type_id: BuildingTypeId::new(type_id),
                level: 1,
                state: BuildingState::Active,
            });
        }
        // One rival holding a few planets, to make the galaxy contested
        let rival = FactionId(2);
        for id in [11u32, 12, 13] {
            if let Some(planet) = planets.get_mut(&PlanetId(id)) {
                planet.owner = Some(rival);
            }
        }

        let building_costs = rules
            .buildings
            .iter()
            .map(|b| (b.id.clone(), b.cost))
            .collect();
        let unit_costs = rules.units.iter().map(|u| (u.kind, u.cost)).collect();

        Self {
            faction,
            money: 400_000,
            planets,
            fleets: BTreeMap::new(),
            inventory: BTreeMap::new(),
            colonization_targets: BTreeSet::new(),
            completed_research: Vec::new(),
            running_research: None,
            production_orders: Vec::new(),
            building_costs,
            unit_costs,
        }
    }

    fn territory_distance(&self, position: Vec2) -> f32 {
        self.planets
            .values()
            .filter(|p| p.owner == Some(self.faction))
            .map(|p| ordered_float::OrderedFloat(p.position.distance(&position)))
            .min()
            .map(|d| d.into_inner())
            .unwrap_or(f32::MAX)
    }

    /// Project the authoritative state into this tick's read-only snapshot
    fn snapshot(&self, rules: &RuleTables, tick: Tick) -> WorldSnapshot {
        let mut snapshot = WorldSnapshot::new(self.faction, tick);
        snapshot.money = self.money;
        snapshot.inventory = self.inventory.clone();
        snapshot.colonization_targets = self.colonization_targets.clone();
        snapshot.policy.may_conquer = false;
        snapshot.running_research = self.running_research.as_ref().map(|(id, _)| id.clone());

        for research in &rules.research {
            if self.completed_research.contains(&research.id) {
                continue;
            }
            if Some(&research.id) == snapshot.running_research.as_ref() {
                continue;
            }
            let unlocked = research
                .prerequisites
                .iter()
                .all(|p| self.completed_research.contains(p));
            if unlocked {
                snapshot.remaining_research.push(research.id.clone());
            } else {
                snapshot.further_research.push(research.id.clone());
            }
        }

        for (&id, planet) in &self.planets {
            let distance = self.territory_distance(planet.position);
            let knowledge = if planet.owner == Some(self.faction) || distance <= SENSOR_RANGE {
                PlanetKnowledge::Owner
            } else {
                PlanetKnowledge::Name
            };
            let mut view = PlanetView {
                id,
                name: planet.name.clone(),
                owner: planet.owner,
                knowledge,
                position: planet.position,
                surface: planet.surface,
                buildings: planet.buildings.clone(),
                stats: Default::default(),
                grid: planet.grid.clone(),
            };
            view.recompute_stats(rules);
            if planet.owner == Some(self.faction) {
                snapshot.own_planets.insert(id, view);
            } else if planet.owner.is_some() && knowledge >= PlanetKnowledge::Owner {
                snapshot.enemy_planets.insert(id, view);
            } else {
                snapshot.unknown_planets.insert(id, view);
            }
        }

        for (&id, fleet) in &self.fleets {
            snapshot.own_fleets.insert(
                id,
                FleetView {
                    id,
                    position: fleet.position,
                    task: fleet.task,
                    target_planet: fleet.target,
                    arrived_at: fleet.arrived_at,
                    moving: fleet.arrived_at.is_none() && fleet.target.is_some(),
                    cargo: fleet.cargo.clone(),
                },
            );
        }

        snapshot.global = GlobalStats::aggregate(&snapshot.own_planets);
        snapshot
    }

    /// Advance the simulation one tick after commands were applied
    fn advance(&mut self) {
        let owned = self
            .planets
            .values()
            .filter(|p| p.owner == Some(self.faction))
            .count() as i64;
        self.money += owned * PLANET_INCOME;

        // Construction completes one tick after placement
        for planet in self.planets.values_mut() {
            for instance in &mut planet.buildings {
                if instance.state == BuildingState::Constructing {
                    instance.state = BuildingState::Active;
                }
            }
        }

        // Fleet movement
        let targets: BTreeMap<FleetId, Option<Vec2>> = self
            .fleets
            .iter()
            .map(|(&id, f)| (id, f.target.and_then(|t| self.planets.get(&t)).map(|p| p.position)))
            .collect();
        for (id, fleet) in &mut self.fleets {
            let Some(Some(goal)) = targets.get(id).copied() else {
                continue;
            };
            let distance = fleet.position.distance(&goal);
            if distance <= FLEET_SPEED {
                fleet.position = goal;
                fleet.arrived_at = fleet.target;
            } else {
                let step = FLEET_SPEED / distance;
                fleet.position = Vec2::new(
                    fleet.position.x + (goal.x - fleet.position.x) * step,
                    fleet.position.y + (goal.y - fleet.position.y) * step,
                );
                fleet.arrived_at = None;
            }
        }

        // Production orders deliver after three ticks
        let mut delivered = Vec::new();
        for order in &mut self.production_orders {
            order.2 -= 1;
            if order.2 == 0 {
                delivered.push((order.0, order.1));
            }
        }
        self.production_orders.retain(|o| o.2 > 0);
        for (kind, amount) in delivered {
            *self.inventory.entry(kind).or_default() += amount;
        }

        // Research progress
        if let Some((tech, remaining)) = self.running_research.take() {
            if remaining <= 1 {
                tracing::info!(%tech, "research completed");
                self.completed_research.push(tech);
            } else {
                self.running_research = Some((tech, remaining - 1));
            }
        }
    }
}

/// The mutation facade: every operation validates against live state and
/// silently no-ops when its precondition no longer holds
impl AiControls for SimWorld {
    fn move_fleet(&mut self, fleet: FleetId, target: PlanetId, task: FleetTask) {
        if !self.planets.contains_key(&target) {
            return;
        }
        if let Some(f) = self.fleets.get_mut(&fleet) {
            f.task = task;
            f.target = Some(target);
            f.arrived_at = None;
        }
    }

    fn stop_fleet(&mut self, fleet: FleetId) {
        if let Some(f) = self.fleets.get_mut(&fleet) {
            f.task = FleetTask::Idle;
            f.target = None;
        }
    }

    fn create_fleet(&mut self, planet: PlanetId, cargo: &[(UnitKind, u32)]) {
        let Some(p) = self.planets.get(&planet) else { return };
        if p.owner != Some(self.faction) {
            return;
        }
        for (kind, amount) in cargo {
            if self.inventory.get(kind).copied().unwrap_or(0) < *amount {
                return;
            }
        }
        let position = p.position;
        self.fleets.insert(
            FleetId::new(),
            SimFleet {
                position,
                task: FleetTask::Idle,
                target: None,
                arrived_at: Some(planet),
                cargo: cargo.iter().copied().collect(),
            },
        );
    }

    fn colonize(&mut self, fleet: FleetId, planet: PlanetId) {
        let faction = self.faction;
        let Some(f) = self.fleets.get_mut(&fleet) else { return };
        if f.arrived_at != Some(planet) || !matches!(f.cargo.get(&UnitKind::ColonyShip), Some(n) if *n > 0)
        {
            return;
        }
        let Some(p) = self.planets.get_mut(&planet) else { return };
        if p.owner.is_some() {
            return;
        }
        p.owner = Some(faction);
        p.buildings.push(BuildingInstance {
            type_id: BuildingTypeId::new("colony_base"),
            level: 1,
            state: BuildingState::Constructing,
        });
        *f.cargo.entry(UnitKind::ColonyShip).or_default() -= 1;
        f.task = FleetTask::Idle;
        f.target = None;
    }

    fn place_building(&mut self, planet: PlanetId, building: BuildingTypeId) {
        let faction = self.faction;
        let Some(cost) = self.building_costs.get(&building).copied() else {
            return;
        };
        if self.money < cost {
            return;
        }
        let Some(p) = self.planets.get_mut(&planet) else { return };
        if p.owner != Some(faction) {
            return;
        }
        self.money -= cost;
        p.buildings.push(BuildingInstance {
            type_id: building,
            level: 1,
            state: BuildingState::Constructing,
        });
    }

    fn repair_building(&mut self, planet: PlanetId, building: BuildingTypeId) {
        if let Some(p) = self.planets.get_mut(&planet) {
            if let Some(instance) = p
                .buildings
                .iter_mut()
                .find(|b| b.type_id == building && b.state == BuildingState::Damaged)
            {
                instance.state = BuildingState::Active;
            }
        }
    }

    fn upgrade_building(&mut self, planet: PlanetId, building: BuildingTypeId, to_level: u32) {
        if let Some(p) = self.planets.get_mut(&planet) {
            if let Some(instance) = p
                .buildings
                .iter_mut()
                .find(|b| b.type_id == building && b.level + 1 == to_level)
            {
                instance.level = to_level;
            }
        }
    }

    fn demolish_building(&mut self, planet: PlanetId, building: BuildingTypeId) {
        if let Some(p) = self.planets.get_mut(&planet) {
            if let Some(index) = p.buildings.iter().position(|b| b.type_id == building) {
                p.buildings.remove(index);
            }
        }
    }

    fn start_research(&mut self, tech: TechId, speed: u32) {
        if self.running_research.is_some() || self.completed_research.contains(&tech) {
            return;
        }
        // Faster research costs proportionally more per tick; modeled here
        // as a flat duration reduction
        let duration = if speed >= 2 { 4 } else { 8 };
        self.running_research = Some((tech, duration));
    }

    fn order_units(&mut self, planet: PlanetId, kind: UnitKind, count: u32) {
        let Some(unit_cost) = self.unit_costs.get(&kind).copied() else {
            return;
        };
        let total = unit_cost * count as i64;
        let owned = self
            .planets
            .get(&planet)
            .map(|p| p.owner == Some(self.faction))
            .unwrap_or(false);
        if !owned || self.money < total {
            return;
        }
        self.money -= total;
        self.production_orders.push((kind, count, 3));
    }

    fn change_inventory(&mut self, kind: UnitKind, delta: i64) {
        let entry = self.inventory.entry(kind).or_default();
        let next = *entry as i64 + delta;
        *entry = next.max(0) as u32;
    }

    fn clear_colonization_target(&mut self, planet: PlanetId) {
        self.colonization_targets.remove(&planet);
    }
}
