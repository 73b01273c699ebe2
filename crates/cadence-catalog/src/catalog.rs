//! The read-only [`Catalog`] container and its integrity checks.
//!
//! Lookups return `Option`; a miss is an integrity fault that callers
//! report as `MissingDefinition`.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use cadence_types::{
    AchievementId, ActivityId, FurnitureId, GameMode, ItemId, MissionFrequency, MissionId,
    MonsterId, NpcId, PetId, QuestId,
};

use crate::definitions::{
    AchievementDef, FamilyActivityDef, FurnitureDef, HouseLevelDef, KeyItemIds, MissionDef,
    MonsterDef, NpcDef, PetDef, QuestDef, QuestObjective, ShopItemDef, TrainingItemDef,
};
use crate::error::CatalogError;

/// Every static definition the engine consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Cumulative XP needed for each level, ascending, starting at 0.
    pub xp_thresholds: Vec<u64>,
    /// Achievements, evaluated in this order.
    pub achievements: Vec<AchievementDef>,
    /// Mission pool.
    pub missions: Vec<MissionDef>,
    /// Narrative quests.
    pub quests: Vec<QuestDef>,
    /// Trainable items.
    pub training_items: Vec<TrainingItemDef>,
    /// Arena monsters.
    pub monsters: Vec<MonsterDef>,
    /// Pet species, including evolved forms.
    pub pets: Vec<PetDef>,
    /// Furniture.
    pub furniture: Vec<FurnitureDef>,
    /// House levels 1..=max (level 0 is the starting shack).
    pub house_levels: Vec<HouseLevelDef>,
    /// Shop entries.
    pub shop: Vec<ShopItemDef>,
    /// NPCs.
    pub npcs: Vec<NpcDef>,
    /// Family activities.
    pub family_activities: Vec<FamilyActivityDef>,
    /// Items with engine-level meaning.
    pub key_items: KeyItemIds,
}

impl Catalog {
    /// Parse a catalog from YAML and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a YAML file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&contents)?;
        info!(
            path = %path.display(),
            achievements = catalog.achievements.len(),
            missions = catalog.missions.len(),
            pets = catalog.pets.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Achievement by id.
    pub fn achievement(&self, id: &AchievementId) -> Option<&AchievementDef> {
        self.achievements.iter().find(|d| &d.id == id)
    }

    /// Mission by id.
    pub fn mission(&self, id: &MissionId) -> Option<&MissionDef> {
        self.missions.iter().find(|d| &d.id == id)
    }

    /// Missions of one frequency, in catalog order.
    pub fn missions_of(&self, frequency: MissionFrequency) -> impl Iterator<Item = &MissionDef> {
        self.missions.iter().filter(move |d| d.frequency == frequency)
    }

    /// Quest by id.
    pub fn quest(&self, id: &QuestId) -> Option<&QuestDef> {
        self.quests.iter().find(|d| &d.id == id)
    }

    /// Training item by id.
    pub fn training_item(&self, id: &ItemId) -> Option<&TrainingItemDef> {
        self.training_items.iter().find(|d| &d.id == id)
    }

    /// Training items trained in one mode.
    pub fn training_items_in(&self, mode: GameMode) -> impl Iterator<Item = &TrainingItemDef> {
        self.training_items.iter().filter(move |d| d.mode == mode)
    }

    /// Monster by id.
    pub fn monster(&self, id: &MonsterId) -> Option<&MonsterDef> {
        self.monsters.iter().find(|d| &d.id == id)
    }

    /// Pet species by id.
    pub fn pet(&self, id: &PetId) -> Option<&PetDef> {
        self.pets.iter().find(|d| &d.id == id)
    }

    /// The species that evolves into `id`, if any.
    pub fn pet_evolving_into(&self, id: &PetId) -> Option<&PetDef> {
        self.pets
            .iter()
            .find(|d| d.evolution.as_ref().is_some_and(|e| &e.into == id))
    }

    /// Furniture by id.
    pub fn furniture(&self, id: &FurnitureId) -> Option<&FurnitureDef> {
        self.furniture.iter().find(|d| &d.id == id)
    }

    /// House level definition.
    pub fn house_level(&self, level: u32) -> Option<&HouseLevelDef> {
        self.house_levels.iter().find(|d| d.level == level)
    }

    /// Highest house level.
    pub fn max_house_level(&self) -> u32 {
        self.house_levels.iter().map(|d| d.level).max().unwrap_or(0)
    }

    /// Shop entry by id.
    pub fn shop_item(&self, id: &ItemId) -> Option<&ShopItemDef> {
        self.shop.iter().find(|d| &d.id == id)
    }

    /// NPC by id.
    pub fn npc(&self, id: &NpcId) -> Option<&NpcDef> {
        self.npcs.iter().find(|d| &d.id == id)
    }

    /// Family activity by id.
    pub fn family_activity(&self, id: &ActivityId) -> Option<&FamilyActivityDef> {
        self.family_activities.iter().find(|d| &d.id == id)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check ids are unique and every cross-reference resolves.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.validate_thresholds()?;

        unique("achievement", self.achievements.iter().map(|d| d.id.as_str()))?;
        unique("mission", self.missions.iter().map(|d| d.id.as_str()))?;
        unique("quest", self.quests.iter().map(|d| d.id.as_str()))?;
        unique("training item", self.training_items.iter().map(|d| d.id.as_str()))?;
        unique("monster", self.monsters.iter().map(|d| d.id.as_str()))?;
        unique("pet", self.pets.iter().map(|d| d.id.as_str()))?;
        unique("furniture", self.furniture.iter().map(|d| d.id.as_str()))?;
        unique("shop item", self.shop.iter().map(|d| d.id.as_str()))?;
        unique("npc", self.npcs.iter().map(|d| d.id.as_str()))?;
        unique("family activity", self.family_activities.iter().map(|d| d.id.as_str()))?;

        for mission in &self.missions {
            if mission.target == 0 {
                return Err(invalid("mission", mission.id.as_str(), "target must be positive"));
            }
        }

        for pet in &self.pets {
            if let Some(evolution) = &pet.evolution {
                if self.pet(&evolution.into).is_none() {
                    return Err(unknown("pet", pet.id.as_str(), "pet", evolution.into.as_str()));
                }
                if evolution.level < 2 {
                    return Err(invalid("pet", pet.id.as_str(), "evolution level below 2"));
                }
            }
        }

        for quest in &self.quests {
            if let Some(pre) = &quest.prerequisite {
                if self.quest(pre).is_none() {
                    return Err(unknown("quest", quest.id.as_str(), "quest", pre.as_str()));
                }
            }
            if quest.objectives.is_empty() {
                return Err(invalid("quest", quest.id.as_str(), "no objectives"));
            }
            for objective in &quest.objectives {
                match objective {
                    QuestObjective::TalkTo { npc_id } if self.npc(npc_id).is_none() => {
                        return Err(unknown("quest", quest.id.as_str(), "npc", npc_id.as_str()));
                    }
                    QuestObjective::DefeatMonster { monster_id }
                        if self.monster(monster_id).is_none() =>
                    {
                        return Err(unknown(
                            "quest",
                            quest.id.as_str(),
                            "monster",
                            monster_id.as_str(),
                        ));
                    }
                    _ => {}
                }
            }
        }

        for item in &self.shop {
            if let Some(furniture) = &item.furniture_id {
                if self.furniture(furniture).is_none() {
                    return Err(unknown(
                        "shop item",
                        item.id.as_str(),
                        "furniture",
                        furniture.as_str(),
                    ));
                }
            }
        }

        for (expected, house) in (1_u32..).zip(&self.house_levels) {
            if house.level != expected {
                return Err(invalid(
                    "house level",
                    &house.level.to_string(),
                    "levels must be contiguous from 1",
                ));
            }
        }

        Ok(())
    }

    fn validate_thresholds(&self) -> Result<(), CatalogError> {
        if self.xp_thresholds.first() != Some(&0) {
            return Err(invalid("xp table", "thresholds", "must start at 0"));
        }
        let ascending = self
            .xp_thresholds
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a < b));
        if !ascending {
            return Err(invalid("xp table", "thresholds", "must be strictly ascending"));
        }
        Ok(())
    }
}

fn unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::Duplicate {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn unknown(kind: &'static str, id: &str, target: &'static str, target_id: &str) -> CatalogError {
    CatalogError::UnknownReference {
        kind,
        id: id.to_owned(),
        target,
        target_id: target_id.to_owned(),
    }
}

fn invalid(kind: &'static str, id: &str, reason: &str) -> CatalogError {
    CatalogError::Invalid {
        kind,
        id: id.to_owned(),
        reason: reason.to_owned(),
    }
}
