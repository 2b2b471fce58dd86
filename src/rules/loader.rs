//! Load rule tables from TOML data files

use crate::core::error::{EngineError, Result};
use crate::core::types::{BuildingTypeId, SurfaceKind};
use crate::rules::building::{BuildingType, Capability, UpgradeTier};
use crate::rules::research::ResearchType;
use crate::rules::{RuleTables, UnitType};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Load all rule tables from a data directory containing
/// `buildings.toml`, `research.toml` and `units.toml`
pub fn load_rule_tables(data_dir: &Path) -> Result<RuleTables> {
    let buildings = load_buildings(&data_dir.join("buildings.toml"))?;
    let research = load_research(&data_dir.join("research.toml"))?;
    let units = load_units(&data_dir.join("units.toml"))?;

    let tables = RuleTables { buildings, research, units };
    validate(&tables)?;

    tracing::info!(
        buildings = tables.buildings.len(),
        research = tables.research.len(),
        units = tables.units.len(),
        "loaded rule tables"
    );
    Ok(tables)
}

#[derive(Deserialize)]
struct BuildingFile {
    #[serde(default)]
    building: Vec<BuildingDef>,
}

/// Raw building definition as written in the TOML file
#[derive(Deserialize)]
struct BuildingDef {
    id: BuildingTypeId,
    kind: String,
    cost: i64,
    size: [u32; 2],
    #[serde(default)]
    limit: i32,
    #[serde(default)]
    capacities: BTreeMap<String, u32>,
    #[serde(default)]
    except: BTreeSet<SurfaceKind>,
    /// Upgrade tier costs, in level order
    #[serde(default)]
    upgrades: Vec<i64>,
}

fn load_buildings(path: &Path) -> Result<Vec<BuildingType>> {
    let content = fs::read_to_string(path)?;
    let file: BuildingFile = toml::from_str(&content)?;

    let mut buildings = Vec::with_capacity(file.building.len());
    for def in file.building {
        let mut capacities = BTreeMap::new();
        for (name, amount) in &def.capacities {
            let capability = Capability::parse(name).ok_or_else(|| EngineError::InvalidRuleData {
                file: path.display().to_string(),
                message: format!("building {}: unknown capability {:?}", def.id, name),
            })?;
            capacities.insert(capability, *amount);
        }
        buildings.push(BuildingType {
            id: def.id,
            kind: def.kind,
            cost: def.cost,
            size: (def.size[0], def.size[1]),
            capacities,
            limit: def.limit,
            except: def.except,
            upgrades: def.upgrades.into_iter().map(|cost| UpgradeTier { cost }).collect(),
        });
    }
    Ok(buildings)
}

#[derive(Deserialize)]
struct ResearchFile {
    #[serde(default)]
    research: Vec<ResearchType>,
}

fn load_research(path: &Path) -> Result<Vec<ResearchType>> {
    let content = fs::read_to_string(path)?;
    let file: ResearchFile = toml::from_str(&content)?;
    Ok(file.research)
}

#[derive(Deserialize)]
struct UnitFile {
    #[serde(default)]
    unit: Vec<UnitType>,
}

fn load_units(path: &Path) -> Result<Vec<UnitType>> {
    let content = fs::read_to_string(path)?;
    let file: UnitFile = toml::from_str(&content)?;
    Ok(file.unit)
}

/// Cross-reference validation after all tables are loaded
fn validate(tables: &RuleTables) -> Result<()> {
    for research in &tables.research {
        for prereq in &research.prerequisites {
            if tables.research(prereq).is_none() {
                return Err(EngineError::InvalidRuleData {
                    file: "research.toml".into(),
                    message: format!(
                        "research {} lists unknown prerequisite {}",
                        research.id, prereq
                    ),
                });
            }
        }
    }

    let mut seen = BTreeSet::new();
    for building in &tables.buildings {
        if !seen.insert(&building.id) {
            return Err(EngineError::InvalidRuleData {
                file: "buildings.toml".into(),
                message: format!("duplicate building id {}", building.id),
            });
        }
    }
    Ok(())
}
