//! Pet lifecycle: adoption, care, leveling, evolution and special requests.
//!
//! Pets live in [`PetCollection`](cadence_types::PetCollection) keyed by
//! definition id. Evolution is a one-way transition: the base instance is
//! removed and a new [`PetInstance`] for the evolved definition takes its
//! place in `owned`, `instances` and `active` in one index update.
//!
//! Meters are clamped to `0..=METER_MAX`. Decay is applied in whole hours
//! (hunger) and whole boredom windows (happiness); each clock advances only
//! by the time actually consumed so partial periods carry over.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use cadence_catalog::PetDef;
use cadence_types::{
    GameMode, ItemId, METER_MAX, MultiplierKind, NotificationKind, NotificationPayload, PetId,
    PetInstance, PetStat, PlayerAggregate, RejectionReason, SpecialRequest, UnlockRef,
};

use crate::config::PetConfig;
use crate::economy::{resolve, with_bonus_percent};
use crate::effects::{Effects, MissionEvent};
use crate::env::{Env, SECS_PER_HOUR, advance};
use crate::error::ProgressionError;

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 24;

fn meter_add(value: u32, delta: u32) -> u32 {
    value.saturating_add(delta).min(METER_MAX)
}

fn new_instance(def: &PetDef, config: &PetConfig, now: DateTime<Utc>) -> PetInstance {
    PetInstance {
        pet_id: def.id.clone(),
        display_name: def.name.clone(),
        hunger: config.starting_meter.min(METER_MAX),
        happiness: config.starting_meter.min(METER_MAX),
        xp: 0,
        level: 1,
        evolved: false,
        last_interaction: now,
        last_decay: now,
        ..PetInstance::default()
    }
}

fn owned_instance<'a>(
    agg: &'a mut PlayerAggregate,
    pet_id: &PetId,
) -> Result<&'a mut PetInstance, ProgressionError> {
    agg.pets
        .instances
        .get_mut(pet_id)
        .ok_or_else(|| ProgressionError::precondition(format!("pet {pet_id} is not owned")))
}

fn active_id(agg: &PlayerAggregate) -> Result<PetId, ProgressionError> {
    agg.pets
        .active
        .clone()
        .ok_or_else(|| ProgressionError::precondition("no active pet"))
}

// ---------------------------------------------------------------------------
// Adoption & management
// ---------------------------------------------------------------------------

/// How many pets the player may own at the current house level.
pub fn capacity(agg: &PlayerAggregate) -> usize {
    usize::try_from(agg.house.level)
        .unwrap_or(usize::MAX)
        .saturating_add(1)
}

/// Price of a species after the `UnlockCostDiscount` multiplier.
///
/// # Errors
///
/// `MissingDefinition` for an unknown species.
pub fn adoption_price(
    agg: &PlayerAggregate,
    env: &Env<'_>,
    pet_id: &PetId,
) -> Result<u64, ProgressionError> {
    let def = env
        .catalog
        .pet(pet_id)
        .ok_or_else(|| ProgressionError::missing("pet", pet_id))?;
    Ok(resolve(agg, env, MultiplierKind::UnlockCostDiscount).apply(def.cost))
}

/// Add a pet to the collection. The caller charges [`adoption_price`].
///
/// # Errors
///
/// - `AlreadyOwned` when the species, or its evolved form, is owned.
/// - `PreconditionNotMet` for evolved forms and when capacity is full.
/// - `MissingDefinition` for an unknown species.
pub fn adopt(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    pet_id: &PetId,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let def = env
        .catalog
        .pet(pet_id)
        .ok_or_else(|| ProgressionError::missing("pet", pet_id))?;

    let owns_evolved = def
        .evolution
        .as_ref()
        .is_some_and(|evo| agg.pets.owned.contains(&evo.into));
    if agg.pets.owned.contains(pet_id) || owns_evolved {
        return Err(ProgressionError::rejected(
            RejectionReason::AlreadyOwned,
            format!("pet {pet_id} already owned"),
        ));
    }
    if env.catalog.pet_evolving_into(pet_id).is_some() {
        return Err(ProgressionError::precondition(format!(
            "{pet_id} is an evolved form and cannot be adopted"
        )));
    }
    if agg.pets.owned.len() >= capacity(agg) {
        return Err(ProgressionError::precondition("pet capacity reached"));
    }

    agg.pets.owned.insert(pet_id.clone());
    agg.pets
        .instances
        .insert(pet_id.clone(), new_instance(def, &env.config.pets, env.now));
    if agg.pets.active.is_none() {
        agg.pets.active = Some(pet_id.clone());
    }
    debug!(pet = %pet_id, "pet adopted");
    effects.info("pet_adopted");
    Ok(())
}

/// Make an owned pet the active one.
///
/// # Errors
///
/// `PreconditionNotMet` when the pet is not owned.
pub fn set_active(agg: &mut PlayerAggregate, pet_id: &PetId) -> Result<(), ProgressionError> {
    if !agg.pets.owned.contains(pet_id) {
        return Err(ProgressionError::precondition(format!(
            "pet {pet_id} is not owned"
        )));
    }
    agg.pets.active = Some(pet_id.clone());
    Ok(())
}

/// Rename an owned pet.
///
/// # Errors
///
/// `PreconditionNotMet` when the pet is not owned or the name is blank or
/// longer than [`MAX_NAME_CHARS`].
pub fn rename(
    agg: &mut PlayerAggregate,
    pet_id: &PetId,
    name: &str,
) -> Result<(), ProgressionError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(ProgressionError::precondition("invalid pet name"));
    }
    owned_instance(agg, pet_id)?.display_name = name.to_owned();
    Ok(())
}

/// Set a cosmetic slot. An empty value clears the slot.
///
/// # Errors
///
/// `PreconditionNotMet` when the pet is not owned or the slot is blank.
pub fn customize(
    agg: &mut PlayerAggregate,
    pet_id: &PetId,
    slot: &str,
    value: &str,
) -> Result<(), ProgressionError> {
    let slot = slot.trim();
    if slot.is_empty() {
        return Err(ProgressionError::precondition("blank customization slot"));
    }
    let pet = owned_instance(agg, pet_id)?;
    if value.is_empty() {
        pet.customization.remove(slot);
    } else {
        pet.customization.insert(slot.to_owned(), value.to_owned());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Care
// ---------------------------------------------------------------------------

/// Feed the active pet one food portion.
///
/// # Errors
///
/// `PreconditionNotMet` without an active pet, `InsufficientResource`
/// without food. The aggregate is untouched on error.
pub fn feed(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let pet_id = active_id(agg)?;
    if agg.inventory.pet_food == 0 {
        return Err(ProgressionError::rejected(
            RejectionReason::InsufficientResource,
            "no pet food",
        ));
    }
    let config = &env.config.pets;
    let furniture_bonus: u32 = agg
        .house
        .furniture
        .iter()
        .filter_map(|id| env.catalog.furniture(id))
        .map(|def| def.pet_happiness_bonus)
        .fold(0, u32::saturating_add);
    let xp = resolve(agg, env, MultiplierKind::PetXpGain).apply(config.feed_xp);

    agg.inventory.pet_food = agg.inventory.pet_food.saturating_sub(1);
    agg.stats.pet_interactions = agg.stats.pet_interactions.saturating_add(1);
    let pet = owned_instance(agg, &pet_id)?;
    pet.hunger = meter_add(pet.hunger, config.feed_hunger);
    pet.happiness = meter_add(
        pet.happiness,
        config.feed_happiness.saturating_add(furniture_bonus),
    );
    pet.last_fed = Some(env.now);
    pet.lifetime_interactions = pet.lifetime_interactions.saturating_add(1);
    let (hunger, happiness) = (pet.hunger, pet.happiness);

    effects.event(MissionEvent::FeedPet);
    effects.event(MissionEvent::PetStat {
        stat: PetStat::Hunger,
        value: hunger,
    });
    effects.event(MissionEvent::PetStat {
        stat: PetStat::Happiness,
        value: happiness,
    });
    grant_pet_xp(agg, env, &pet_id, xp, effects)
}

/// Play with the active pet.
///
/// # Errors
///
/// `PreconditionNotMet` without an active pet, `CooldownActive` with the
/// remaining seconds while the play cooldown runs.
pub fn play(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let pet_id = active_id(agg)?;
    let config = &env.config.pets;
    let pet = owned_instance(agg, &pet_id)?;
    if let Some(last) = pet.last_played
        && let Some(remaining) = env.cooldown_remaining(last, config.play_cooldown_secs)
    {
        return Err(ProgressionError::cooldown(remaining, "play with pet"));
    }
    pet.happiness = meter_add(pet.happiness, config.play_happiness);
    pet.last_played = Some(env.now);
    pet.last_interaction = env.now;
    pet.lifetime_interactions = pet.lifetime_interactions.saturating_add(1);
    let happiness = pet.happiness;
    agg.stats.pet_interactions = agg.stats.pet_interactions.saturating_add(1);

    effects.event(MissionEvent::PlayWithPet);
    effects.event(MissionEvent::PetStat {
        stat: PetStat::Happiness,
        value: happiness,
    });
    Ok(())
}

/// Raise the active pet's happiness (practice nook, family outings).
/// No-op without an active pet.
pub fn cheer_active(agg: &mut PlayerAggregate, amount: u32, effects: &mut Effects) {
    if let Some(pet) = agg.active_pet_mut() {
        pet.happiness = meter_add(pet.happiness, amount);
        let value = pet.happiness;
        effects.event(MissionEvent::PetStat {
            stat: PetStat::Happiness,
            value,
        });
    }
}

// ---------------------------------------------------------------------------
// Leveling & evolution
// ---------------------------------------------------------------------------

/// Give XP to the active pet, if there is one.
///
/// # Errors
///
/// Propagates evolution lookups that miss the catalog.
pub fn grant_active_pet_xp(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    amount: u64,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    match agg.pets.active.clone() {
        Some(pet_id) => grant_pet_xp(agg, env, &pet_id, amount, effects),
        None => Ok(()),
    }
}

/// Give XP to one pet, leveling and evolving it as thresholds are crossed.
///
/// Level `N` to `N + 1` costs `N * xp_per_level_step`. At the level cap XP
/// stops accruing and is held at zero.
///
/// # Errors
///
/// `PreconditionNotMet` for an unowned pet; `MissingDefinition` when an
/// evolution target is absent from the catalog.
pub fn grant_pet_xp(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    pet_id: &PetId,
    amount: u64,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let config = &env.config.pets;
    let pet = owned_instance(agg, pet_id)?;
    if pet.level >= config.max_level {
        pet.xp = 0;
        return Ok(());
    }
    pet.xp = pet.xp.saturating_add(amount);

    let mut leveled = false;
    loop {
        if pet.level >= config.max_level {
            pet.xp = 0;
            break;
        }
        let needed = u64::from(pet.level).saturating_mul(config.xp_per_level_step);
        if needed == 0 || pet.xp < needed {
            break;
        }
        pet.xp = pet.xp.saturating_sub(needed);
        pet.level = pet.level.saturating_add(1);
        leveled = true;
        effects.notify(
            NotificationKind::PetLevelUp,
            "notification.pet_level_up",
            NotificationPayload::PetLevel {
                pet_id: pet_id.clone(),
                level: pet.level,
            },
        );
    }

    if leveled {
        let level = pet.level;
        effects.event(MissionEvent::PetStat {
            stat: PetStat::Level,
            value: level,
        });
        evolve_if_ready(agg, env, pet_id, effects)?;
    }
    Ok(())
}

/// Evolve a pet whose level reached its species' evolution level.
///
/// Returns the evolved id, or `None` when the pet does not evolve yet.
///
/// # Errors
///
/// `MissingDefinition` when the species or its evolution target is unknown.
pub fn evolve_if_ready(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    pet_id: &PetId,
    effects: &mut Effects,
) -> Result<Option<PetId>, ProgressionError> {
    let def = env
        .catalog
        .pet(pet_id)
        .ok_or_else(|| ProgressionError::missing("pet", pet_id))?;
    let Some(evolution) = def.evolution.as_ref() else {
        return Ok(None);
    };
    let level = agg.pets.instances.get(pet_id).map_or(0, |pet| pet.level);
    if level < evolution.level {
        return Ok(None);
    }
    let target = env
        .catalog
        .pet(&evolution.into)
        .ok_or_else(|| ProgressionError::missing("pet", &evolution.into))?;
    let Some(old) = agg.pets.instances.remove(pet_id) else {
        return Ok(None);
    };

    let renamed = old.display_name != def.name;
    let evolved = PetInstance {
        pet_id: target.id.clone(),
        display_name: if renamed {
            old.display_name
        } else {
            target.name.clone()
        },
        evolved: true,
        ..old
    };

    agg.pets.owned.remove(pet_id);
    agg.pets.owned.insert(target.id.clone());
    agg.pets.instances.insert(target.id.clone(), evolved);
    if agg.pets.active.as_ref() == Some(pet_id) {
        agg.pets.active = Some(target.id.clone());
    }
    agg.stats.pets_evolved = agg.stats.pets_evolved.saturating_add(1);

    debug!(from = %pet_id, to = %target.id, "pet evolved");
    effects.notify(
        NotificationKind::PetEvolution,
        "notification.pet_evolution",
        NotificationPayload::PetEvolution {
            from: pet_id.clone(),
            to: target.id.clone(),
        },
    );
    Ok(Some(target.id.clone()))
}

// ---------------------------------------------------------------------------
// Periodic tick & special requests
// ---------------------------------------------------------------------------

fn whole_periods(since: DateTime<Utc>, now: DateTime<Utc>, period_secs: i64) -> i64 {
    now.signed_duration_since(since)
        .num_seconds()
        .checked_div(period_secs)
        .unwrap_or(0)
        .max(0)
}

fn decay_amount(rate: u32, periods: i64) -> u32 {
    u32::try_from(periods)
        .unwrap_or(u32::MAX)
        .saturating_mul(rate)
}

/// Training items a pet may ask for: basic items plus unlocked advanced ones.
fn requestable_items(agg: &PlayerAggregate, env: &Env<'_>) -> Vec<(GameMode, ItemId)> {
    env.catalog
        .training_items
        .iter()
        .filter(|item| {
            !item.advanced
                || agg.unlocks.advanced_items.contains(&UnlockRef {
                    kind: item.kind,
                    id: item.id.clone(),
                })
        })
        .map(|item| (item.mode, item.id.clone()))
        .collect()
}

/// Apply time-based decay to every pet and maybe spawn a special request
/// for the active pet.
///
/// # Order of operations
///
/// 1. Hunger decays per whole hour since `last_decay`
/// 2. Happiness decays per whole boredom window since `last_interaction`
/// 3. Fulfilled requests older than the clear delay are removed
/// 4. The active pet may roll a new special request
pub fn periodic_tick(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    rng: &mut impl Rng,
    effects: &mut Effects,
) {
    let config = &env.config.pets;
    let now = env.now;

    for pet in agg.pets.instances.values_mut() {
        // 1. Hunger
        let hours = whole_periods(pet.last_decay, now, SECS_PER_HOUR);
        if hours > 0 {
            let was_fed = pet.hunger > 0;
            pet.hunger = pet
                .hunger
                .saturating_sub(decay_amount(config.hunger_decay_per_hour, hours));
            pet.last_decay = advance(pet.last_decay, hours.saturating_mul(SECS_PER_HOUR));
            if was_fed && pet.hunger == 0 {
                effects.info("pet_hungry");
            }
        }

        // 2. Boredom
        let windows = whole_periods(pet.last_interaction, now, config.boredom_window_secs);
        if windows > 0 {
            pet.happiness = pet
                .happiness
                .saturating_sub(decay_amount(config.boredom_decay, windows));
            pet.last_interaction = advance(
                pet.last_interaction,
                windows.saturating_mul(config.boredom_window_secs),
            );
        }

        // 3. Stale requests
        if let Some(fulfilled_at) = pet.special_request.as_ref().and_then(|r| r.fulfilled_at)
            && env
                .cooldown_remaining(fulfilled_at, config.request_clear_delay_secs)
                .is_none()
        {
            pet.special_request = None;
        }
    }

    // 4. New request
    let candidates = requestable_items(agg, env);
    let Some(pet) = agg.active_pet_mut() else {
        return;
    };
    if pet.special_request.is_some() {
        return;
    }
    if let Some(last) = pet.last_request_at
        && env
            .cooldown_remaining(last, config.request_cooldown_secs)
            .is_some()
    {
        return;
    }
    if rng.random_range(0..100_u32) >= config.request_chance_percent {
        return;
    }
    let Some((mode, item_id)) = candidates.choose(rng).cloned() else {
        return;
    };
    pet.special_request = Some(SpecialRequest {
        mode,
        item_id: item_id.clone(),
        requested_at: now,
        fulfilled_at: None,
    });
    pet.last_request_at = Some(now);
    effects.notify(
        NotificationKind::PetSpecialRequest,
        "notification.pet_request",
        NotificationPayload::PetRequest {
            pet_id: pet.pet_id.clone(),
            mode,
            item_id,
        },
    );
}

/// Fulfil the active pet's pending request when `mode` and `item_id` match.
///
/// Grants bonus XP and happiness, raised by `evolved_bonus_percent` for
/// evolved pets. Returns whether a request was fulfilled.
///
/// # Errors
///
/// Propagates errors from [`grant_pet_xp`].
pub fn fulfill_special_request(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    mode: GameMode,
    item_id: &ItemId,
    effects: &mut Effects,
) -> Result<bool, ProgressionError> {
    let config = &env.config.pets;
    let Some(pet) = agg.active_pet_mut() else {
        return Ok(false);
    };
    let Some(request) = pet.special_request.as_mut() else {
        return Ok(false);
    };
    if request.fulfilled_at.is_some() || request.mode != mode || &request.item_id != item_id {
        return Ok(false);
    }
    request.fulfilled_at = Some(env.now);

    let bonus_percent = if pet.evolved {
        config.evolved_bonus_percent
    } else {
        0
    };
    let xp = with_bonus_percent(config.request_bonus_xp, bonus_percent);
    let happiness = u32::try_from(with_bonus_percent(
        u64::from(config.request_bonus_happiness),
        bonus_percent,
    ))
    .unwrap_or(METER_MAX);
    pet.happiness = meter_add(pet.happiness, happiness);
    let (pet_id, value) = (pet.pet_id.clone(), pet.happiness);

    effects.info("pet_request_fulfilled");
    effects.event(MissionEvent::PetStat {
        stat: PetStat::Happiness,
        value,
    });
    grant_pet_xp(agg, env, &pet_id, xp, effects)?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadence_catalog::Catalog;
    use chrono::{Offset, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::ProgressionConfig;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn env_at<'a>(
        catalog: &'a Catalog,
        config: &'a ProgressionConfig,
        now: DateTime<Utc>,
    ) -> Env<'a> {
        Env::new(catalog, config, now, Utc.fix())
    }

    fn with_cat(catalog: &Catalog, config: &ProgressionConfig) -> PlayerAggregate {
        let mut agg = PlayerAggregate::default();
        let env = env_at(catalog, config, t0());
        let mut fx = Effects::new(t0());
        adopt(&mut agg, &env, &PetId::from("melody_cat"), &mut fx).unwrap();
        agg
    }

    #[test]
    fn first_pet_becomes_active() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let agg = with_cat(&catalog, &config);
        assert_eq!(agg.pets.active, Some(PetId::from("melody_cat")));
        let pet = agg.active_pet().unwrap();
        assert_eq!(pet.level, 1);
        assert_eq!(pet.hunger, 80);
        assert_eq!(pet.display_name, "Melody Cat");
    }

    #[test]
    fn adoption_rejections() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        let mut fx = Effects::new(t0());

        let again = adopt(&mut agg, &env, &PetId::from("melody_cat"), &mut fx);
        assert_eq!(again.unwrap_err().reason(), RejectionReason::AlreadyOwned);

        let full = adopt(&mut agg, &env, &PetId::from("rhythm_pup"), &mut fx);
        assert_eq!(full.unwrap_err().reason(), RejectionReason::PreconditionNotMet);

        agg.house.level = 1;
        let evolved = adopt(&mut agg, &env, &PetId::from("tempo_hound"), &mut fx);
        assert_eq!(evolved.unwrap_err().reason(), RejectionReason::PreconditionNotMet);

        assert!(adopt(&mut agg, &env, &PetId::from("rhythm_pup"), &mut fx).is_ok());
        assert_eq!(agg.pets.active, Some(PetId::from("melody_cat")));

        let ghost = adopt(&mut agg, &env, &PetId::from("ghost"), &mut fx);
        assert!(ghost.unwrap_err().is_fault());
    }

    #[test]
    fn feeding_without_food_changes_nothing() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        agg.inventory.pet_food = 0;
        let before = agg.clone();
        let mut fx = Effects::new(t0());
        let err = feed(&mut agg, &env, &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::InsufficientResource);
        assert_eq!(agg, before);
    }

    #[test]
    fn feeding_raises_meters_and_consumes_food() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        agg.house.furniture.insert("cozy_rug".into());
        let mut fx = Effects::new(t0());
        feed(&mut agg, &env, &mut fx).unwrap();
        let pet = agg.active_pet().unwrap();
        assert_eq!(pet.hunger, 100);
        assert_eq!(pet.happiness, 90);
        assert_eq!(pet.xp, 10);
        assert_eq!(agg.inventory.pet_food, 2);
        assert_eq!(agg.stats.pet_interactions, 1);
        assert_eq!(fx.next_event(), Some(MissionEvent::FeedPet));
    }

    #[test]
    fn feeding_needs_an_active_pet() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(t0());
        let err = feed(&mut agg, &env, &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::PreconditionNotMet);
    }

    #[test]
    fn play_respects_cooldown() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_cat(&catalog, &config);
        let mut fx = Effects::new(t0());
        play(&mut agg, &env_at(&catalog, &config, t0()), &mut fx).unwrap();
        let soon = advance(t0(), 100);
        let err = play(&mut agg, &env_at(&catalog, &config, soon), &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::CooldownActive);
        assert_eq!(err.retry_after_secs(), Some(200));
        let later = advance(t0(), 300);
        assert!(play(&mut agg, &env_at(&catalog, &config, later), &mut fx).is_ok());
        assert_eq!(agg.active_pet().unwrap().happiness, 100);
        assert_eq!(agg.stats.pet_interactions, 2);
    }

    #[test]
    fn xp_curve_and_level_cap() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        agg.house.level = 1;
        let mut fx = Effects::new(t0());
        let bunny = PetId::from("treble_bunny");
        adopt(&mut agg, &env, &bunny, &mut fx).unwrap();

        grant_pet_xp(&mut agg, &env, &bunny, 49, &mut fx).unwrap();
        assert_eq!(agg.pets.instances.get(&bunny).unwrap().level, 1);
        grant_pet_xp(&mut agg, &env, &bunny, 1, &mut fx).unwrap();
        assert_eq!(agg.pets.instances.get(&bunny).unwrap().level, 2);
        assert_eq!(agg.pets.instances.get(&bunny).unwrap().xp, 0);

        grant_pet_xp(&mut agg, &env, &bunny, 1_000_000, &mut fx).unwrap();
        let pet = agg.pets.instances.get(&bunny).unwrap();
        assert_eq!(pet.level, 10);
        assert_eq!(pet.xp, 0);
        grant_pet_xp(&mut agg, &env, &bunny, 500, &mut fx).unwrap();
        assert_eq!(agg.pets.instances.get(&bunny).unwrap().xp, 0);
    }

    #[test]
    fn evolution_replaces_the_instance() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        let cat = PetId::from("melody_cat");
        rename(&mut agg, &cat, "Whiskers").unwrap();
        customize(&mut agg, &cat, "collar", "red").unwrap();
        let mut fx = Effects::new(t0());

        // Levels 1..5 need 50 + 100 + 150 + 200.
        grant_pet_xp(&mut agg, &env, &cat, 500, &mut fx).unwrap();

        let harmony = PetId::from("harmony_cat");
        assert!(!agg.pets.owned.contains(&cat));
        assert!(agg.pets.owned.contains(&harmony));
        assert_eq!(agg.pets.active, Some(harmony.clone()));
        let pet = agg.pets.instances.get(&harmony).unwrap();
        assert!(pet.evolved);
        assert_eq!(pet.level, 5);
        assert_eq!(pet.display_name, "Whiskers");
        assert_eq!(pet.customization.get("collar").map(String::as_str), Some("red"));
        assert_eq!(agg.stats.pets_evolved, 1);
        assert!(
            fx.notifications()
                .iter()
                .any(|n| n.kind == NotificationKind::PetEvolution)
        );

        let again = adopt(&mut agg, &env, &cat, &mut fx).unwrap_err();
        assert_eq!(again.reason(), RejectionReason::AlreadyOwned);
    }

    #[test]
    fn unrenamed_pets_take_the_evolved_name() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        let mut fx = Effects::new(t0());
        grant_pet_xp(&mut agg, &env, &PetId::from("melody_cat"), 500, &mut fx).unwrap();
        assert_eq!(agg.active_pet().unwrap().display_name, "Harmony Cat");
    }

    #[test]
    fn hunger_decays_in_whole_hours_and_warns_once() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_cat(&catalog, &config);
        let mut rng = SmallRng::seed_from_u64(7);

        let later = advance(t0(), 9_000);
        let mut fx = Effects::new(later);
        periodic_tick(&mut agg, &env_at(&catalog, &config, later), &mut rng, &mut fx);
        let pet = agg.active_pet().unwrap();
        assert_eq!(pet.hunger, 70);
        assert_eq!(pet.last_decay, advance(t0(), 7_200));

        let much_later = advance(t0(), 144_000);
        let mut fx = Effects::new(much_later);
        periodic_tick(&mut agg, &env_at(&catalog, &config, much_later), &mut rng, &mut fx);
        periodic_tick(&mut agg, &env_at(&catalog, &config, much_later), &mut rng, &mut fx);
        assert_eq!(agg.active_pet().unwrap().hunger, 0);
        let warnings = fx
            .notifications()
            .iter()
            .filter(|n| {
                matches!(&n.payload, NotificationPayload::Message { key } if key == "pet_hungry")
            })
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn boredom_consumes_whole_windows_only() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_cat(&catalog, &config);
        let mut rng = SmallRng::seed_from_u64(7);
        let later = advance(t0(), 18_000);
        let mut fx = Effects::new(later);
        periodic_tick(&mut agg, &env_at(&catalog, &config, later), &mut rng, &mut fx);
        let pet = agg.active_pet().unwrap();
        assert_eq!(pet.happiness, 70);
        assert_eq!(pet.last_interaction, advance(t0(), 14_400));
    }

    #[test]
    fn requests_spawn_and_are_fulfilled() {
        let catalog = Catalog::builtin();
        let mut config = ProgressionConfig::default();
        config.pets.request_chance_percent = 100;
        let mut agg = with_cat(&catalog, &config);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut fx = Effects::new(t0());
        periodic_tick(&mut agg, &env_at(&catalog, &config, t0()), &mut rng, &mut fx);

        let request = agg.active_pet().unwrap().special_request.clone().unwrap();
        let item = catalog.training_item(&request.item_id).unwrap();
        assert!(!item.advanced);
        assert!(
            fx.notifications()
                .iter()
                .any(|n| n.kind == NotificationKind::PetSpecialRequest)
        );

        let env = env_at(&catalog, &config, t0());
        let wrong = fulfill_special_request(
            &mut agg,
            &env,
            request.mode,
            &ItemId::from("not_it"),
            &mut fx,
        );
        assert_eq!(wrong, Ok(false));
        let right = fulfill_special_request(&mut agg, &env, request.mode, &request.item_id, &mut fx);
        assert_eq!(right, Ok(true));
        let pet = agg.active_pet().unwrap();
        assert_eq!(pet.xp, 20);
        assert_eq!(pet.happiness, 90);
        assert!(pet.special_request.as_ref().unwrap().fulfilled_at.is_some());

        let cleared = advance(t0(), 600);
        let mut fx = Effects::new(cleared);
        config.pets.request_chance_percent = 0;
        periodic_tick(&mut agg, &env_at(&catalog, &config, cleared), &mut rng, &mut fx);
        assert!(agg.active_pet().unwrap().special_request.is_none());
    }

    #[test]
    fn evolved_pets_earn_more_from_requests() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, t0());
        let mut agg = with_cat(&catalog, &config);
        let mut fx = Effects::new(t0());
        grant_pet_xp(&mut agg, &env, &PetId::from("melody_cat"), 500, &mut fx).unwrap();

        let item = ItemId::from("major_third");
        let pet = agg.active_pet_mut().unwrap();
        assert!(pet.evolved);
        pet.happiness = 50;
        pet.special_request = Some(SpecialRequest {
            mode: GameMode::Intervals,
            item_id: item.clone(),
            requested_at: t0(),
            fulfilled_at: None,
        });
        let xp_before = pet.xp;

        let done = fulfill_special_request(&mut agg, &env, GameMode::Intervals, &item, &mut fx);
        assert_eq!(done, Ok(true));
        let pet = agg.active_pet().unwrap();
        // 20 XP and 10 happiness, raised by half.
        assert_eq!(pet.xp, xp_before.saturating_add(30));
        assert_eq!(pet.happiness, 65);
        assert_eq!(
            pet.xp.saturating_sub(xp_before),
            with_bonus_percent(config.pets.request_bonus_xp, config.pets.evolved_bonus_percent)
        );
    }

    #[test]
    fn set_active_requires_ownership() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_cat(&catalog, &config);
        let err = set_active(&mut agg, &PetId::from("rhythm_pup")).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::PreconditionNotMet);
        assert!(rename(&mut agg, &PetId::from("melody_cat"), "   ").is_err());
    }
}
