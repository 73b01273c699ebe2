//! Built-in content shipped with the engine.
//!
//! Used when no catalog file is configured, and as the fixture for tests.

use std::collections::BTreeMap;

use cadence_types::{
    GameMode, GiftPreference, GrowthStage, ItemId, MissionFrequency, MultiplierKind,
    MusicalItemKind, NpcId, PetStat, RelationshipStatus, ShopItemKind,
};

use crate::catalog::Catalog;
use crate::definitions::{
    AchievementCondition, AchievementDef, FamilyActivityDef, FurnitureBonus, FurnitureDef,
    HouseLevelDef, KeyItemIds, MissionDef, MissionEventKind, MonsterDef, NpcDef, PetAbility,
    PetDef, PetEvolution, ProgressRule, QuestDef, QuestObjective, Reward, ShopItemDef,
    SpouseBonus, TrainingItemDef,
};

/// Cumulative XP per level.
const XP_THRESHOLDS: [u64; 20] = [
    0, 100, 250, 450, 700, 1000, 1400, 1900, 2500, 3200, 4000, 5000, 6200, 7600, 9200, 11000,
    13000, 15500, 18500, 22000,
];

impl Catalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            xp_thresholds: XP_THRESHOLDS.to_vec(),
            achievements: achievements(),
            missions: missions(),
            quests: quests(),
            training_items: training_items(),
            monsters: monsters(),
            pets: pets(),
            furniture: furniture(),
            house_levels: house_levels(),
            shop: shop(),
            npcs: npcs(),
            family_activities: family_activities(),
            key_items: KeyItemIds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn achievement(id: &str, name: &str, description: &str, condition: AchievementCondition) -> AchievementDef {
    AchievementDef {
        id: id.into(),
        name: name.to_owned(),
        description: description.to_owned(),
        condition,
    }
}

const fn rule(event: MissionEventKind) -> ProgressRule {
    ProgressRule {
        event,
        item_id: None,
        mode: None,
        monster_id: None,
        pet_stat: None,
    }
}

const fn reward(currency: u64, xp: u64, pet_xp: u64) -> Reward {
    Reward {
        currency,
        xp,
        pet_xp,
    }
}

fn mission(
    id: &str,
    frequency: MissionFrequency,
    target: u32,
    rule: ProgressRule,
    reward: Reward,
) -> MissionDef {
    MissionDef {
        id: id.into(),
        title_ref: format!("mission.{id}"),
        frequency,
        target,
        rule,
        reward,
    }
}

fn item(id: &str, name: &str, kind: MusicalItemKind, mode: GameMode, advanced: bool) -> TrainingItemDef {
    TrainingItemDef {
        id: id.into(),
        name: name.to_owned(),
        kind,
        mode,
        advanced,
    }
}

fn pet(
    id: &str,
    name: &str,
    cost: u64,
    ability: (MultiplierKind, u32, u32),
    evolution: Option<(u32, &str)>,
) -> PetDef {
    let (kind, percent, min_level) = ability;
    PetDef {
        id: id.into(),
        name: name.to_owned(),
        cost,
        evolution: evolution.map(|(level, into)| PetEvolution {
            level,
            into: into.into(),
        }),
        ability: Some(PetAbility {
            kind,
            percent,
            min_level,
        }),
    }
}

fn furniture_piece(
    id: &str,
    name: &str,
    min_house_level: u32,
    bonuses: Vec<FurnitureBonus>,
    pet_happiness_bonus: u32,
) -> FurnitureDef {
    FurnitureDef {
        id: id.into(),
        name: name.to_owned(),
        min_house_level,
        bonuses,
        pet_happiness_bonus,
    }
}

const fn percent(kind: MultiplierKind, percent: u32) -> FurnitureBonus {
    FurnitureBonus {
        kind,
        percent,
        flat: 0,
    }
}

const fn flat(kind: MultiplierKind, flat: u64) -> FurnitureBonus {
    FurnitureBonus {
        kind,
        percent: 0,
        flat,
    }
}

fn shop_item(id: &str, name: &str, kind: ShopItemKind, price: u64, quantity: u32) -> ShopItemDef {
    ShopItemDef {
        id: id.into(),
        name: name.to_owned(),
        kind,
        price,
        quantity,
        furniture_id: (kind == ShopItemKind::Furniture).then(|| id.into()),
    }
}

fn npc(
    id: &str,
    name: &str,
    romanceable: bool,
    preferences: &[(&str, GiftPreference)],
    spouse_bonus: Option<(MultiplierKind, u32)>,
) -> NpcDef {
    NpcDef {
        id: id.into(),
        name: name.to_owned(),
        romanceable,
        preferences: preferences
            .iter()
            .map(|(item, pref)| (ItemId::from(*item), *pref))
            .collect(),
        spouse_bonus: spouse_bonus.map(|(kind, percent)| SpouseBonus { kind, percent }),
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn achievements() -> Vec<AchievementDef> {
    use AchievementCondition as C;
    vec![
        achievement("warming_up", "Warming Up", "Reach level 2", C::ReachLevel { level: 2 }),
        achievement("apprentice", "Apprentice", "Reach level 5", C::ReachLevel { level: 5 }),
        achievement("virtuoso", "Virtuoso", "Reach level 10", C::ReachLevel { level: 10 }),
        achievement("first_note", "First Note", "Answer correctly once", C::CorrectAnswers { count: 1 }),
        achievement("sharp_ear", "Sharp Ear", "Answer 100 questions correctly", C::CorrectAnswers { count: 100 }),
        achievement(
            "third_time_charm",
            "Third Time's the Charm",
            "Identify 50 major thirds",
            C::Mastery {
                item_id: "major_third".into(),
                mode: None,
                count: 50,
            },
        ),
        achievement("on_a_roll", "On a Roll", "Reach a streak of 10", C::Streak { mode: None, length: 10 }),
        achievement("nest_egg", "Nest Egg", "Hold 1,000 coins", C::CurrencyHeld { amount: 1000 }),
        achievement(
            "busker_baron",
            "Busker Baron",
            "Earn 10,000 coins in total",
            C::TotalCurrencyEarned { amount: 10_000 },
        ),
        achievement("new_friend", "New Friend", "Adopt a pet", C::PetsOwned { count: 1 }),
        achievement("best_buddies", "Best Buddies", "Raise a pet to level 5", C::PetLevel { level: 5 }),
        achievement("metamorphosis", "Metamorphosis", "Evolve a pet", C::PetEvolved),
        achievement(
            "devoted_keeper",
            "Devoted Keeper",
            "Feed or play with pets 50 times",
            C::PetInteractions { count: 50 },
        ),
        achievement("home_sweet_home", "Home Sweet Home", "Upgrade the house to level 2", C::HouseLevel { level: 2 }),
        achievement("interior_designer", "Interior Designer", "Own 3 furniture pieces", C::FurnitureOwned { count: 3 }),
        achievement(
            "butterflies",
            "Butterflies",
            "Start dating someone",
            C::Relationship {
                status: RelationshipStatus::Dating,
                npc_id: None,
            },
        ),
        achievement("wedding_bells", "Wedding Bells", "Get married", C::Married),
        achievement("new_arrival", "New Arrival", "Welcome a child", C::HasChild),
        achievement(
            "first_day_of_school",
            "First Day of School",
            "Your child reaches school age",
            C::ChildStage {
                stage: GrowthStage::SchoolAge,
            },
        ),
        achievement("taskmaster", "Taskmaster", "Claim 10 mission rewards", C::MissionsClaimed { count: 10 }),
        achievement("storyteller", "Storyteller", "Complete a quest", C::QuestsClaimed { count: 1 }),
        achievement("monster_hunter", "Monster Hunter", "Defeat 25 monsters", C::MonstersDefeated { count: 25 }),
        achievement(
            "street_performer",
            "Street Performer",
            "Busk 10 times",
            C::BuskingPerformances { count: 10 },
        ),
        achievement("collector", "Collector", "Unlock 5 items", C::UnlockedItems { count: 5 }),
        achievement("dedicated", "Dedicated", "Log in 7 days in a row", C::LoginStreak { days: 7 }),
    ]
}

#[allow(clippy::too_many_lines)] // One entry per mission; splitting would obscure the pool.
fn missions() -> Vec<MissionDef> {
    use MissionEventKind as E;
    use MissionFrequency::{Daily, Weekly};
    vec![
        mission("daily_correct_answers", Daily, 20, rule(E::CorrectAnswer), reward(50, 40, 0)),
        mission(
            "daily_major_thirds",
            Daily,
            5,
            ProgressRule {
                item_id: Some("major_third".into()),
                ..rule(E::CorrectAnswer)
            },
            reward(40, 30, 10),
        ),
        mission(
            "daily_chord_practice",
            Daily,
            10,
            ProgressRule {
                mode: Some(GameMode::Chords),
                ..rule(E::CorrectAnswer)
            },
            reward(45, 35, 0),
        ),
        mission("daily_feed_pet", Daily, 2, rule(E::FeedPet), reward(20, 20, 15)),
        mission("daily_play_pet", Daily, 1, rule(E::PlayWithPet), reward(15, 15, 15)),
        mission("daily_visit_friend", Daily, 1, rule(E::InteractNpc), reward(20, 15, 0)),
        mission("daily_earn_coins", Daily, 100, rule(E::EarnCurrency), reward(30, 30, 0)),
        mission("daily_busking", Daily, 1, rule(E::Busking), reward(25, 20, 0)),
        mission("weekly_monsters", Weekly, 10, rule(E::DefeatMonster), reward(200, 200, 30)),
        mission("weekly_earn_xp", Weekly, 1000, rule(E::EarnXp), reward(150, 0, 40)),
        mission("weekly_streak", Weekly, 15, rule(E::ReachStreak), reward(150, 150, 0)),
        mission("weekly_gifts", Weekly, 3, rule(E::GiveGift), reward(120, 100, 0)),
        mission(
            "weekly_pet_happy",
            Weekly,
            100,
            ProgressRule {
                pet_stat: Some(PetStat::Happiness),
                ..rule(E::PetStat)
            },
            reward(100, 80, 50),
        ),
        mission("weekly_child_care", Weekly, 10, rule(E::CareForChild), reward(150, 120, 0)),
        mission("weekly_quest", Weekly, 1, rule(E::CompleteQuest), reward(200, 150, 0)),
        mission("weekly_unlock", Weekly, 1, rule(E::UnlockItem), reward(100, 100, 0)),
    ]
}

fn quests() -> Vec<QuestDef> {
    vec![
        QuestDef {
            id: "first_steps".into(),
            name: "First Steps".to_owned(),
            min_level: 1,
            prerequisite: None,
            objectives: vec![
                QuestObjective::Manual {
                    description_ref: "quest.first_steps.tutorial".to_owned(),
                },
                QuestObjective::TalkTo {
                    npc_id: "old_maestro".into(),
                },
            ],
            reward: reward(100, 100, 0),
        },
        QuestDef {
            id: "goblin_trouble".into(),
            name: "Goblin Trouble".to_owned(),
            min_level: 2,
            prerequisite: Some("first_steps".into()),
            objectives: vec![
                QuestObjective::DefeatMonster {
                    monster_id: "off_key_goblin".into(),
                },
                QuestObjective::TalkTo {
                    npc_id: "aria".into(),
                },
            ],
            reward: reward(150, 200, 20),
        },
        QuestDef {
            id: "dragon_of_dissonance".into(),
            name: "Dragon of Dissonance".to_owned(),
            min_level: 5,
            prerequisite: Some("goblin_trouble".into()),
            objectives: vec![
                QuestObjective::DefeatMonster {
                    monster_id: "tone_deaf_troll".into(),
                },
                QuestObjective::DefeatMonster {
                    monster_id: "dissonance_dragon".into(),
                },
                QuestObjective::Manual {
                    description_ref: "quest.dragon_of_dissonance.report".to_owned(),
                },
            ],
            reward: reward(500, 600, 50),
        },
    ]
}

fn training_items() -> Vec<TrainingItemDef> {
    use GameMode::{Chords, Intervals, Scales};
    use MusicalItemKind::{Chord, Interval, Scale};
    vec![
        item("minor_second", "Minor Second", Interval, Intervals, false),
        item("major_second", "Major Second", Interval, Intervals, false),
        item("minor_third", "Minor Third", Interval, Intervals, false),
        item("major_third", "Major Third", Interval, Intervals, false),
        item("perfect_fourth", "Perfect Fourth", Interval, Intervals, false),
        item("tritone", "Tritone", Interval, Intervals, true),
        item("perfect_fifth", "Perfect Fifth", Interval, Intervals, false),
        item("minor_sixth", "Minor Sixth", Interval, Intervals, true),
        item("major_sixth", "Major Sixth", Interval, Intervals, true),
        item("minor_seventh", "Minor Seventh", Interval, Intervals, true),
        item("major_seventh", "Major Seventh", Interval, Intervals, true),
        item("octave", "Octave", Interval, Intervals, false),
        item("major_triad", "Major Triad", Chord, Chords, false),
        item("minor_triad", "Minor Triad", Chord, Chords, false),
        item("diminished_triad", "Diminished Triad", Chord, Chords, true),
        item("augmented_triad", "Augmented Triad", Chord, Chords, true),
        item("dominant_seventh", "Dominant Seventh", Chord, Chords, true),
        item("major_seventh_chord", "Major Seventh Chord", Chord, Chords, true),
        item("major_scale", "Major Scale", Scale, Scales, false),
        item("natural_minor", "Natural Minor", Scale, Scales, false),
        item("harmonic_minor", "Harmonic Minor", Scale, Scales, true),
        item("dorian", "Dorian", Scale, Scales, true),
        item("mixolydian", "Mixolydian", Scale, Scales, true),
    ]
}

fn monsters() -> Vec<MonsterDef> {
    vec![
        MonsterDef {
            id: "off_key_goblin".into(),
            name: "Off-Key Goblin".to_owned(),
            currency: 20,
            xp: 15,
        },
        MonsterDef {
            id: "tone_deaf_troll".into(),
            name: "Tone-Deaf Troll".to_owned(),
            currency: 40,
            xp: 30,
        },
        MonsterDef {
            id: "dissonance_dragon".into(),
            name: "Dissonance Dragon".to_owned(),
            currency: 120,
            xp: 100,
        },
    ]
}

fn pets() -> Vec<PetDef> {
    use MultiplierKind::{CurrencyGainTraining, PetXpGain, UnlockCostDiscount, XpGainTraining};
    vec![
        pet("melody_cat", "Melody Cat", 150, (CurrencyGainTraining, 5, 1), Some((5, "harmony_cat"))),
        pet("harmony_cat", "Harmony Cat", 0, (CurrencyGainTraining, 10, 1), None),
        pet("rhythm_pup", "Rhythm Pup", 200, (XpGainTraining, 5, 1), Some((6, "tempo_hound"))),
        pet("tempo_hound", "Tempo Hound", 0, (XpGainTraining, 10, 1), None),
        pet("echo_owl", "Echo Owl", 300, (UnlockCostDiscount, 10, 3), Some((7, "resonance_owl"))),
        pet("resonance_owl", "Resonance Owl", 0, (UnlockCostDiscount, 20, 1), None),
        pet("treble_bunny", "Treble Bunny", 120, (PetXpGain, 10, 1), None),
    ]
}

fn furniture() -> Vec<FurnitureDef> {
    use MultiplierKind::{
        CurrencyGainTraining, DailyLoginBonus, PetXpGain, PracticeNookCooldownReduction,
        UnlockCostDiscount, XpGainTraining,
    };
    vec![
        furniture_piece("cozy_rug", "Cozy Rug", 0, Vec::new(), 5),
        furniture_piece("practice_nook", "Practice Nook", 1, vec![percent(XpGainTraining, 5)], 0),
        furniture_piece("metronome_shelf", "Metronome Shelf", 1, vec![flat(CurrencyGainTraining, 1)], 0),
        furniture_piece("velvet_pet_bed", "Velvet Pet Bed", 1, vec![percent(PetXpGain, 10)], 5),
        furniture_piece("calendar_wall", "Calendar Wall", 1, vec![percent(DailyLoginBonus, 20)], 0),
        furniture_piece("grand_piano", "Grand Piano", 2, vec![percent(XpGainTraining, 10)], 0),
        furniture_piece("bargain_ledger", "Bargain Ledger", 2, vec![flat(UnlockCostDiscount, 5)], 0),
        furniture_piece(
            "hourglass",
            "Hourglass",
            2,
            vec![percent(PracticeNookCooldownReduction, 25)],
            0,
        ),
    ]
}

fn house_levels() -> Vec<HouseLevelDef> {
    use MultiplierKind::{CurrencyGainTraining, PetXpGain, XpGainTraining};
    vec![
        HouseLevelDef {
            level: 1,
            upgrade_cost: 500,
            min_player_level: 3,
            bonuses: BTreeMap::from([(XpGainTraining, 5)]),
        },
        HouseLevelDef {
            level: 2,
            upgrade_cost: 1500,
            min_player_level: 6,
            bonuses: BTreeMap::from([(XpGainTraining, 10), (CurrencyGainTraining, 5)]),
        },
        HouseLevelDef {
            level: 3,
            upgrade_cost: 4000,
            min_player_level: 10,
            bonuses: BTreeMap::from([
                (XpGainTraining, 15),
                (CurrencyGainTraining, 10),
                (PetXpGain, 10),
            ]),
        },
    ]
}

fn shop() -> Vec<ShopItemDef> {
    use ShopItemKind::{ChildCareKit, Furniture, Gift, KeyItem, PetFood};
    vec![
        shop_item("pet_food_pack", "Pet Food Pack", PetFood, 30, 5),
        shop_item("child_care_kit", "Child Care Kit", ChildCareKit, 60, 1),
        shop_item("locket", "Silver Locket", KeyItem, 500, 1),
        shop_item("wedding_ring", "Wedding Ring", KeyItem, 2000, 1),
        shop_item("sheet_music", "Sheet Music", Gift, 40, 1),
        shop_item("rosin", "Violin Rosin", Gift, 25, 1),
        shop_item("flower_bouquet", "Flower Bouquet", Gift, 30, 1),
        shop_item("chocolate_box", "Chocolate Box", Gift, 35, 1),
        shop_item("metronome_keychain", "Metronome Keychain", Gift, 20, 1),
        shop_item("cozy_rug", "Cozy Rug", Furniture, 80, 1),
        shop_item("practice_nook", "Practice Nook", Furniture, 400, 1),
        shop_item("metronome_shelf", "Metronome Shelf", Furniture, 250, 1),
        shop_item("velvet_pet_bed", "Velvet Pet Bed", Furniture, 300, 1),
        shop_item("calendar_wall", "Calendar Wall", Furniture, 200, 1),
        shop_item("grand_piano", "Grand Piano", Furniture, 2500, 1),
        shop_item("bargain_ledger", "Bargain Ledger", Furniture, 600, 1),
        shop_item("hourglass", "Hourglass", Furniture, 900, 1),
    ]
}

fn npcs() -> Vec<NpcDef> {
    use GiftPreference::{Disliked, Liked, Loved};
    use MultiplierKind::{CurrencyGainTraining, UnlockCostDiscount, XpGainTraining};
    vec![
        npc(
            "aria",
            "Aria",
            true,
            &[("sheet_music", Loved), ("flower_bouquet", Liked), ("rosin", Disliked)],
            Some((CurrencyGainTraining, 10)),
        ),
        npc(
            "leo",
            "Leo",
            true,
            &[("chocolate_box", Loved), ("sheet_music", Liked), ("flower_bouquet", Disliked)],
            Some((XpGainTraining, 10)),
        ),
        npc(
            "mira",
            "Mira",
            true,
            &[("rosin", Loved), ("metronome_keychain", Liked), ("chocolate_box", Disliked)],
            Some((UnlockCostDiscount, 10)),
        ),
        npc("old_maestro", "Old Maestro", false, &[("sheet_music", Loved)], None),
    ]
}

fn family_activities() -> Vec<FamilyActivityDef> {
    vec![
        FamilyActivityDef {
            id: "picnic".into(),
            name: "Picnic".to_owned(),
            cost: 20,
            marriage_happiness: 10,
            child_happiness: 0,
            requires_child: false,
        },
        FamilyActivityDef {
            id: "concert_date".into(),
            name: "Concert Date".to_owned(),
            cost: 60,
            marriage_happiness: 20,
            child_happiness: 0,
            requires_child: false,
        },
        FamilyActivityDef {
            id: "family_jam_session".into(),
            name: "Family Jam Session".to_owned(),
            cost: 0,
            marriage_happiness: 8,
            child_happiness: 15,
            requires_child: true,
        },
        FamilyActivityDef {
            id: "zoo_trip".into(),
            name: "Zoo Trip".to_owned(),
            cost: 40,
            marriage_happiness: 10,
            child_happiness: 20,
            requires_child: true,
        },
    ]
}
