//! Tunable constants for every progression subsystem.
//!
//! [`ProgressionConfig`] is read from the `progression` section of
//! `cadence-config.yaml`. Every field has a default, so a partial section
//! (or none at all) is valid.

use serde::{Deserialize, Serialize};

/// All progression tunables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Economy, busking, practice nook and login rewards.
    pub economy: EconomyConfig,
    /// Pet care.
    pub pets: PetConfig,
    /// NPC relationships and marriage.
    pub relationships: RelationshipConfig,
    /// Child simulation.
    pub family: FamilyConfig,
    /// Mission rotation.
    pub missions: MissionConfig,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// Economy tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Pet XP granted to the active pet per correct answer (default: 2).
    pub training_pet_xp: u64,
    /// Seconds between busking performances (default: 3600).
    pub busking_cooldown_secs: i64,
    /// Base busking coins (default: 10).
    pub busking_base_coins: u64,
    /// Extra busking coins per player level (default: 5).
    pub busking_coins_per_level: u64,
    /// XP per busking performance (default: 10).
    pub busking_xp: u64,
    /// Base practice nook cooldown before reductions (default: 4h).
    pub practice_nook_cooldown_secs: u64,
    /// XP per practice nook session (default: 50).
    pub practice_nook_xp: u64,
    /// Active pet happiness per practice nook session (default: 10).
    pub practice_nook_pet_happiness: u32,
    /// Base daily login reward (default: 25).
    pub daily_login_base: u64,
    /// Extra login coins per consecutive day (default: 5).
    pub daily_login_per_streak_day: u64,
    /// Streak days that still raise the reward (default: 7).
    pub daily_login_streak_cap: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            training_pet_xp: 2,
            busking_cooldown_secs: 3600,
            busking_base_coins: 10,
            busking_coins_per_level: 5,
            busking_xp: 10,
            practice_nook_cooldown_secs: 14_400,
            practice_nook_xp: 50,
            practice_nook_pet_happiness: 10,
            daily_login_base: 25,
            daily_login_per_streak_day: 5,
            daily_login_streak_cap: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// Pet care tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Hunger and happiness of a freshly adopted pet (default: 80).
    pub starting_meter: u32,
    /// Hunger restored per feeding (default: 30).
    pub feed_hunger: u32,
    /// Happiness gained per feeding, before furniture bonuses (default: 5).
    pub feed_happiness: u32,
    /// Pet XP per feeding, before multipliers (default: 10).
    pub feed_xp: u64,
    /// Happiness gained per play session (default: 15).
    pub play_happiness: u32,
    /// Seconds between play sessions (default: 300).
    pub play_cooldown_secs: i64,
    /// Hunger lost per whole hour (default: 5).
    pub hunger_decay_per_hour: u32,
    /// Seconds without interaction before one boredom step (default: 2h).
    pub boredom_window_secs: i64,
    /// Happiness lost per boredom step (default: 5).
    pub boredom_decay: u32,
    /// Level N to N+1 needs `N * xp_per_level_step` XP (default: 50).
    pub xp_per_level_step: u64,
    /// Hard level cap (default: 10).
    pub max_level: u32,
    /// Chance per tick, in percent, of a special request (default: 20).
    pub request_chance_percent: u32,
    /// Seconds between special requests (default: 3600).
    pub request_cooldown_secs: i64,
    /// Seconds a fulfilled request lingers before it is cleared (default: 600).
    pub request_clear_delay_secs: i64,
    /// Pet XP for fulfilling a request (default: 20).
    pub request_bonus_xp: u64,
    /// Happiness for fulfilling a request (default: 10).
    pub request_bonus_happiness: u32,
    /// Extra request reward for evolved pets, in percent (default: 50).
    pub evolved_bonus_percent: u32,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            starting_meter: 80,
            feed_hunger: 30,
            feed_happiness: 5,
            feed_xp: 10,
            play_happiness: 15,
            play_cooldown_secs: 300,
            hunger_decay_per_hour: 5,
            boredom_window_secs: 7_200,
            boredom_decay: 5,
            xp_per_level_step: 50,
            max_level: 10,
            request_chance_percent: 20,
            request_cooldown_secs: 3600,
            request_clear_delay_secs: 600,
            request_bonus_xp: 20,
            request_bonus_happiness: 10,
            evolved_bonus_percent: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// NPC relationship and marriage tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    /// RP ceiling of every tier (default: 100).
    pub rp_cap: u32,
    /// RP at which Neutral becomes Friendly (default: 30).
    pub friendly_threshold: u32,
    /// RP per first interaction of the day (default: 5).
    pub interaction_rp: u32,
    /// RP for a loved gift (default: +15).
    pub gift_loved: i32,
    /// RP for a liked gift (default: +8).
    pub gift_liked: i32,
    /// RP for a neutral gift (default: +2).
    pub gift_neutral: i32,
    /// RP for a disliked gift (default: -8).
    pub gift_disliked: i32,
    /// Days without a positive interaction before RP decays (default: 3).
    pub decay_after_days: i64,
    /// RP lost per decayed day (default: 2).
    pub decay_amount: u32,
    /// Marriage happiness right after the wedding (default: 70).
    pub starting_marriage_happiness: u32,
    /// Marriage happiness per daily spouse interaction (default: 5).
    pub spouse_interaction_happiness: u32,
    /// Happiness needed for the spouse bonus and to leave heartsick (default: 50).
    pub content_threshold: u32,
    /// Happiness below which the marriage turns heartsick (default: 20).
    pub heartsick_threshold: u32,
    /// Days without spouse interaction before neglect decay (default: 2).
    pub neglect_after_days: i64,
    /// Marriage happiness lost per neglected day (default: 5).
    pub neglect_decay: u32,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            rp_cap: 100,
            friendly_threshold: 30,
            interaction_rp: 5,
            gift_loved: 15,
            gift_liked: 8,
            gift_neutral: 2,
            gift_disliked: -8,
            decay_after_days: 3,
            decay_amount: 2,
            starting_marriage_happiness: 70,
            spouse_interaction_happiness: 5,
            content_threshold: 50,
            heartsick_threshold: 20,
            neglect_after_days: 2,
            neglect_decay: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

/// Child simulation tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyConfig {
    /// Days of marriage before a child is born (default: 7).
    pub days_until_child: i64,
    /// Names a newborn is drawn from.
    pub child_names: Vec<String>,
    /// Hunger lost per hour (default: 4).
    pub hunger_decay_per_hour: u32,
    /// Cleanliness lost per hour (default: 3).
    pub cleanliness_decay_per_hour: u32,
    /// Affection lost per hour (default: 3).
    pub affection_decay_per_hour: u32,
    /// Happiness lost per hour (default: 2).
    pub happiness_decay_per_hour: u32,
    /// Sleepiness gained per hour (default: 5).
    pub sleepiness_rise_per_hour: u32,
    /// Meters below this raise a pending need (default: 30).
    pub need_floor: u32,
    /// Sleepiness above this raises the sleep need (default: 70).
    pub sleep_ceiling: u32,
    /// Happiness lost per pending need per hour (default: 2).
    pub need_happiness_penalty: u32,
    /// Happiness or needs below this make the child sick (default: 15).
    pub sick_threshold: u32,
    /// Days until sickness clears on its own (default: 3).
    pub sick_days_to_recover: u32,
    /// Ages in days for Crawler, Toddler and `SchoolAge` (default: 3, 7, 14).
    pub growth_ages: [u32; 3],
    /// Study points per grade step (default: 3).
    pub points_per_grade: u32,
    /// Days without homework before the grade drops (default: 3).
    pub homework_neglect_days: u32,
    /// Consecutive low-happiness days before the grade drops (default: 3).
    pub low_happiness_days: u32,
    /// Happiness under this counts as a low-happiness day (default: 40).
    pub low_happiness_threshold: u32,
    /// Weekly tuition price (default: 200).
    pub tuition_cost: u64,
    /// Hunger restored by feeding (default: 40).
    pub feed_amount: u32,
    /// Affection restored by playing (default: 25).
    pub play_affection: u32,
    /// Happiness restored by playing (default: 15).
    pub play_happiness: u32,
    /// Cleanliness restored by a diaper change (default: 50).
    pub diaper_cleanliness: u32,
    /// Sleepiness removed by soothing (default: 60).
    pub soothe_amount: u32,
    /// Happiness restored by a care kit (default: 10).
    pub care_kit_happiness: u32,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            days_until_child: 7,
            child_names: ["Lyra", "Aria", "Cadenza", "Felix", "Harmony", "Rhys"]
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            hunger_decay_per_hour: 4,
            cleanliness_decay_per_hour: 3,
            affection_decay_per_hour: 3,
            happiness_decay_per_hour: 2,
            sleepiness_rise_per_hour: 5,
            need_floor: 30,
            sleep_ceiling: 70,
            need_happiness_penalty: 2,
            sick_threshold: 15,
            sick_days_to_recover: 3,
            growth_ages: [3, 7, 14],
            points_per_grade: 3,
            homework_neglect_days: 3,
            low_happiness_days: 3,
            low_happiness_threshold: 40,
            tuition_cost: 200,
            feed_amount: 40,
            play_affection: 25,
            play_happiness: 15,
            diaper_cleanliness: 50,
            soothe_amount: 60,
            care_kit_happiness: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Mission rotation tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Fresh daily missions drawn per refresh (default: 3).
    pub daily_count: usize,
    /// Fresh weekly missions drawn per refresh (default: 3).
    pub weekly_count: usize,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            daily_count: 3,
            weekly_count: 3,
        }
    }
}
