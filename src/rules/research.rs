//! Research type definitions and lab capacity accounting

use crate::core::types::{LabCategory, TechId};
use serde::{Deserialize, Serialize};

/// Lab counts per category, used both as research requirements and as
/// aggregated planet/faction capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabLevels {
    #[serde(default)]
    pub civil: u32,
    #[serde(default)]
    pub mechanical: u32,
    #[serde(default)]
    pub computer: u32,
    #[serde(default)]
    pub ai: u32,
    #[serde(default)]
    pub military: u32,
}

impl LabLevels {
    pub fn get(&self, category: LabCategory) -> u32 {
        match category {
            LabCategory::Civil => self.civil,
            LabCategory::Mechanical => self.mechanical,
            LabCategory::Computer => self.computer,
            LabCategory::Ai => self.ai,
            LabCategory::Military => self.military,
        }
    }

    pub fn set(&mut self, category: LabCategory, value: u32) {
        match category {
            LabCategory::Civil => self.civil = value,
            LabCategory::Mechanical => self.mechanical = value,
            LabCategory::Computer => self.computer = value,
            LabCategory::Ai => self.ai = value,
            LabCategory::Military => self.military = value,
        }
    }

    pub fn add(&mut self, category: LabCategory, amount: u32) {
        self.set(category, self.get(category) + amount);
    }

    /// True if this capacity satisfies every category of `required`
    pub fn meets(&self, required: &LabLevels) -> bool {
        LabCategory::ALL
            .iter()
            .all(|&c| self.get(c) >= required.get(c))
    }

    pub fn total(&self) -> u32 {
        LabCategory::ALL.iter().map(|&c| self.get(c)).sum()
    }
}

/// A research item from the static rule tables
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResearchType {
    pub id: TechId,
    pub research_cost: i64,
    pub production_cost: i64,
    /// Active lab capacity required to run this research
    #[serde(default)]
    pub labs: LabLevels,
    #[serde(default)]
    pub prerequisites: Vec<TechId>,
    #[serde(default)]
    pub requires_orbital_factory: bool,
}
