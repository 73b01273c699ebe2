//! NPC relationships and marriage.
//!
//! Each NPC moves through `Neutral -> Friendly -> Dating -> Married`.
//! Friendship is earned by daily conversation and gifts; dating and
//! marriage need relationship points at the cap plus a key item (the
//! locket, then the wedding ring and a house of level 2 or more).
//!
//! Marriage happiness is a separate meter on [`Family`]. Falling below the
//! heartsick threshold disables the spouse bonus until it climbs back to
//! the content threshold.

use chrono::NaiveDate;
use tracing::{debug, info};

use cadence_types::{
    Family, GiftPreference, ItemId, METER_MAX, NotificationKind, NotificationPayload, NpcId,
    PlayerAggregate, RejectionReason, RelationshipRecord, RelationshipStatus, ShopItemKind,
};

use crate::config::RelationshipConfig;
use crate::effects::{Effects, MissionEvent};
use crate::env::{Env, days_between};
use crate::error::ProgressionError;

/// House level needed before a proposal is accepted.
pub const MIN_HOUSE_LEVEL_TO_MARRY: u32 = 2;

fn announce(
    effects: &mut Effects,
    npc_id: Option<&NpcId>,
    status: Option<RelationshipStatus>,
    event: &str,
) {
    effects.notify(
        NotificationKind::RelationshipChanged,
        "notification.relationship",
        NotificationPayload::Relationship {
            npc_id: npc_id.cloned(),
            status,
            event: event.to_owned(),
        },
    );
}

fn apply_rp(record: &mut RelationshipRecord, delta: i32, cap: u32) {
    let magnitude = delta.unsigned_abs();
    record.rp = if delta >= 0 {
        record.rp.saturating_add(magnitude).min(cap)
    } else {
        record.rp.saturating_sub(magnitude)
    };
}

/// Promote Neutral to Friendly at the threshold, or demote Friendly back
/// to Neutral below it. Dating and Married never move here.
fn settle_friendship(record: &mut RelationshipRecord, config: &RelationshipConfig, effects: &mut Effects) {
    let next = match record.status {
        RelationshipStatus::Neutral if record.rp >= config.friendly_threshold => {
            RelationshipStatus::Friendly
        }
        RelationshipStatus::Friendly if record.rp < config.friendly_threshold => {
            RelationshipStatus::Neutral
        }
        _ => return,
    };
    record.status = next;
    let event = if next == RelationshipStatus::Friendly {
        "became_friends"
    } else {
        "drifted_apart"
    };
    announce(effects, Some(&record.npc_id), Some(next), event);
}

fn shift_marriage_happiness(family: &mut Family, delta: i32) {
    let magnitude = delta.unsigned_abs();
    family.marriage_happiness = if delta >= 0 {
        family.marriage_happiness.saturating_add(magnitude).min(METER_MAX)
    } else {
        family.marriage_happiness.saturating_sub(magnitude)
    };
}

fn as_signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn is_spouse(family: &Family, npc_id: &NpcId) -> bool {
    family.is_married && family.spouse.as_ref() == Some(npc_id)
}

/// Raise marriage happiness, then re-check the heartsick flag.
pub fn cheer_marriage(agg: &mut PlayerAggregate, env: &Env<'_>, amount: u32, effects: &mut Effects) {
    if !agg.family.is_married {
        return;
    }
    shift_marriage_happiness(&mut agg.family, as_signed(amount));
    refresh_heartsick(&mut agg.family, &env.config.relationships, effects);
}

/// Set or clear the heartsick flag from the current marriage happiness.
pub fn refresh_heartsick(family: &mut Family, config: &RelationshipConfig, effects: &mut Effects) {
    if !family.is_married {
        return;
    }
    let spouse = family.spouse.clone();
    if !family.heartsick && family.marriage_happiness < config.heartsick_threshold {
        family.heartsick = true;
        announce(effects, spouse.as_ref(), None, "heartsick");
    } else if family.heartsick && family.marriage_happiness >= config.content_threshold {
        family.heartsick = false;
        announce(effects, spouse.as_ref(), None, "reconciled");
    }
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// Talk to an NPC.
///
/// The first conversation of a calendar day grants `interaction_rp`; later
/// ones succeed without RP. Talking to the spouse also raises marriage
/// happiness once per day.
///
/// # Errors
///
/// `MissingDefinition` for an unknown NPC.
pub fn interact(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    npc_id: &NpcId,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    if env.catalog.npc(npc_id).is_none() {
        return Err(ProgressionError::missing("npc", npc_id));
    }
    let config = &env.config.relationships;
    let today = env.today();

    let record = agg.relationship_mut(npc_id);
    if record.last_daily_interaction == Some(today) {
        debug!(npc = %npc_id, "already talked today");
    } else {
        apply_rp(record, as_signed(config.interaction_rp), config.rp_cap);
        record.last_daily_interaction = Some(today);
        record.last_positive_interaction = Some(env.now);
        settle_friendship(record, config, effects);
    }
    effects.event(MissionEvent::InteractNpc(npc_id.clone()));

    let family = &mut agg.family;
    if is_spouse(family, npc_id) && family.last_spouse_interaction != Some(today) {
        family.last_spouse_interaction = Some(today);
        shift_marriage_happiness(family, as_signed(config.spouse_interaction_happiness));
        refresh_heartsick(family, config, effects);
    }
    Ok(())
}

/// Give a gift from the inventory to an NPC.
///
/// Gifts bypass the daily conversation cap. The RP change comes from the
/// NPC's preference for the item; gifts to the spouse move marriage
/// happiness by the same amount.
///
/// # Errors
///
/// - `PreconditionNotMet` when `kind` is not a gift.
/// - `InsufficientResource` when the gift is not in the inventory.
/// - `MissingDefinition` for an unknown NPC.
pub fn give_gift(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    npc_id: &NpcId,
    item_id: &ItemId,
    kind: ShopItemKind,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    if kind != ShopItemKind::Gift {
        return Err(ProgressionError::precondition(format!(
            "{item_id} is not a gift"
        )));
    }
    let npc = env
        .catalog
        .npc(npc_id)
        .ok_or_else(|| ProgressionError::missing("npc", npc_id))?;
    let config = &env.config.relationships;

    let held = agg.inventory.gifts.get(item_id).copied().unwrap_or(0);
    if held == 0 {
        return Err(ProgressionError::rejected(
            RejectionReason::InsufficientResource,
            format!("no {item_id} to give"),
        ));
    }
    let left = held.saturating_sub(1);
    if left == 0 {
        agg.inventory.gifts.remove(item_id);
    } else {
        agg.inventory.gifts.insert(item_id.clone(), left);
    }

    let delta = match npc.preference(item_id) {
        GiftPreference::Loved => config.gift_loved,
        GiftPreference::Liked => config.gift_liked,
        GiftPreference::Neutral => config.gift_neutral,
        GiftPreference::Disliked => config.gift_disliked,
    };
    let record = agg.relationship_mut(npc_id);
    apply_rp(record, delta, config.rp_cap);
    if delta > 0 {
        record.last_positive_interaction = Some(env.now);
    }
    settle_friendship(record, config, effects);
    agg.stats.gifts_given = agg.stats.gifts_given.saturating_add(1);
    effects.event(MissionEvent::GiveGift(npc_id.clone()));

    if is_spouse(&agg.family, npc_id) {
        shift_marriage_happiness(&mut agg.family, delta);
        refresh_heartsick(&mut agg.family, config, effects);
    }
    Ok(())
}

/// Confess to a friend and start dating.
///
/// # Errors
///
/// - `InvalidStateTransition` when the NPC is not romanceable, not
///   Friendly, or the player is already married.
/// - `PreconditionNotMet` when RP is below the cap or the locket is missing.
/// - `MissingDefinition` for an unknown NPC.
pub fn confess(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    npc_id: &NpcId,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let npc = env
        .catalog
        .npc(npc_id)
        .ok_or_else(|| ProgressionError::missing("npc", npc_id))?;
    let config = &env.config.relationships;
    if !npc.romanceable || agg.family.is_married {
        return Err(ProgressionError::invalid_transition(format!(
            "cannot date {npc_id}"
        )));
    }
    let (status, rp) = agg
        .relationship(npc_id)
        .map_or((RelationshipStatus::Neutral, 0), |r| (r.status, r.rp));
    if status != RelationshipStatus::Friendly {
        return Err(ProgressionError::invalid_transition(format!(
            "{npc_id} is {status:?}, not Friendly"
        )));
    }
    if rp < config.rp_cap {
        return Err(ProgressionError::precondition(format!(
            "needs {} RP with {npc_id}, has {rp}",
            config.rp_cap
        )));
    }
    let locket = &env.catalog.key_items.locket;
    if !agg.inventory.key_items.remove(locket) {
        return Err(ProgressionError::precondition("the locket is required"));
    }

    let record = agg.relationship_mut(npc_id);
    record.status = RelationshipStatus::Dating;
    record.rp = 0;
    record.last_positive_interaction = Some(env.now);
    info!(npc = %npc_id, "started dating");
    announce(effects, Some(npc_id), Some(RelationshipStatus::Dating), "started_dating");
    Ok(())
}

/// Propose to a partner.
///
/// # Errors
///
/// - `InvalidStateTransition` when already married or not dating the NPC.
/// - `PreconditionNotMet` when RP is below the cap, the house is below
///   level 2, or the wedding ring is missing.
/// - `MissingDefinition` for an unknown NPC.
pub fn propose(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    npc_id: &NpcId,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    if env.catalog.npc(npc_id).is_none() {
        return Err(ProgressionError::missing("npc", npc_id));
    }
    let config = &env.config.relationships;
    if agg.family.is_married {
        return Err(ProgressionError::invalid_transition("already married"));
    }
    let (status, rp) = agg
        .relationship(npc_id)
        .map_or((RelationshipStatus::Neutral, 0), |r| (r.status, r.rp));
    if status != RelationshipStatus::Dating {
        return Err(ProgressionError::invalid_transition(format!(
            "not dating {npc_id}"
        )));
    }
    if rp < config.rp_cap {
        return Err(ProgressionError::precondition(format!(
            "needs {} RP with {npc_id}, has {rp}",
            config.rp_cap
        )));
    }
    if agg.house.level < MIN_HOUSE_LEVEL_TO_MARRY {
        return Err(ProgressionError::precondition(format!(
            "house level {MIN_HOUSE_LEVEL_TO_MARRY} required"
        )));
    }
    let ring = &env.catalog.key_items.wedding_ring;
    if !agg.inventory.key_items.remove(ring) {
        return Err(ProgressionError::precondition("the wedding ring is required"));
    }

    let today = env.today();
    let record = agg.relationship_mut(npc_id);
    record.status = RelationshipStatus::Married;
    record.last_positive_interaction = Some(env.now);

    let family = &mut agg.family;
    family.is_married = true;
    family.spouse = Some(npc_id.clone());
    family.married_on = Some(today);
    family.marriage_happiness = config.starting_marriage_happiness.min(METER_MAX);
    family.heartsick = false;
    family.last_spouse_interaction = Some(today);
    info!(npc = %npc_id, "married");
    announce(effects, Some(npc_id), Some(RelationshipStatus::Married), "married");
    Ok(())
}

// ---------------------------------------------------------------------------
// Day boundary
// ---------------------------------------------------------------------------

/// Apply one calendar day of relationship decay and marriage neglect.
///
/// # Order of operations
///
/// 1. Every non-spouse NPC without a positive interaction for
///    `decay_after_days` loses `decay_amount` RP
/// 2. Marriage happiness decays when the spouse was ignored for more than
///    `neglect_after_days`
/// 3. The heartsick flag is re-evaluated
pub fn daily_decay(agg: &mut PlayerAggregate, env: &Env<'_>, day: NaiveDate, effects: &mut Effects) {
    let config = &env.config.relationships;
    let spouse = agg
        .family
        .is_married
        .then(|| agg.family.spouse.clone())
        .flatten();

    // 1. RP decay
    for record in agg.relationships.values_mut() {
        if spouse.as_ref() == Some(&record.npc_id) {
            continue;
        }
        let Some(last) = record.last_positive_interaction else {
            continue;
        };
        if days_between(env.local_date(last), day) < config.decay_after_days {
            continue;
        }
        let before = record.rp;
        record.rp = record.rp.saturating_sub(config.decay_amount);
        if record.rp != before {
            debug!(npc = %record.npc_id, rp = record.rp, "relationship decayed");
        }
        settle_friendship(record, config, effects);
    }

    // 2. Neglect
    let family = &mut agg.family;
    if family.is_married
        && let Some(since) = family.last_spouse_interaction.or(family.married_on)
        && days_between(since, day) > config.neglect_after_days
    {
        family.marriage_happiness = family.marriage_happiness.saturating_sub(config.neglect_decay);
    }

    // 3. Heartsick
    refresh_heartsick(family, config, effects);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadence_catalog::Catalog;
    use chrono::{DateTime, Days, Offset, TimeZone, Utc};

    use super::*;
    use crate::config::ProgressionConfig;

    fn day(n: u64) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        base.checked_add_days(Days::new(n)).unwrap()
    }

    fn env_on<'a>(catalog: &'a Catalog, config: &'a ProgressionConfig, n: u64) -> Env<'a> {
        Env::new(catalog, config, day(n), Utc.fix())
    }

    fn aria() -> NpcId {
        NpcId::from("aria")
    }

    fn friendly_at_cap(agg: &mut PlayerAggregate, npc: &NpcId) {
        let record = agg.relationship_mut(npc);
        record.status = RelationshipStatus::Friendly;
        record.rp = 100;
    }

    #[test]
    fn rp_is_granted_once_per_day() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(day(0));
        interact(&mut agg, &env_on(&catalog, &config, 0), &aria(), &mut fx).unwrap();
        interact(&mut agg, &env_on(&catalog, &config, 0), &aria(), &mut fx).unwrap();
        assert_eq!(agg.relationship(&aria()).unwrap().rp, 5);
        interact(&mut agg, &env_on(&catalog, &config, 1), &aria(), &mut fx).unwrap();
        assert_eq!(agg.relationship(&aria()).unwrap().rp, 10);
    }

    #[test]
    fn friendship_at_threshold() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = PlayerAggregate::default();
        agg.relationship_mut(&aria()).rp = 25;
        let mut fx = Effects::new(day(0));
        interact(&mut agg, &env_on(&catalog, &config, 0), &aria(), &mut fx).unwrap();
        assert_eq!(
            agg.relationship(&aria()).unwrap().status,
            RelationshipStatus::Friendly
        );
        assert!(
            fx.notifications()
                .iter()
                .any(|n| n.kind == NotificationKind::RelationshipChanged)
        );
    }

    #[test]
    fn gifts_follow_preferences() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_on(&catalog, &config, 0);
        let mut agg = PlayerAggregate::default();
        agg.inventory.gifts.insert(ItemId::from("sheet_music"), 1);
        agg.inventory.gifts.insert(ItemId::from("rosin"), 2);
        let mut fx = Effects::new(day(0));

        give_gift(&mut agg, &env, &aria(), &ItemId::from("sheet_music"), ShopItemKind::Gift, &mut fx)
            .unwrap();
        assert_eq!(agg.relationship(&aria()).unwrap().rp, 15);
        assert!(!agg.inventory.gifts.contains_key(&ItemId::from("sheet_music")));

        give_gift(&mut agg, &env, &aria(), &ItemId::from("rosin"), ShopItemKind::Gift, &mut fx)
            .unwrap();
        assert_eq!(agg.relationship(&aria()).unwrap().rp, 7);
        assert_eq!(agg.inventory.gifts.get(&ItemId::from("rosin")), Some(&1));
        assert_eq!(agg.stats.gifts_given, 2);

        let none = give_gift(
            &mut agg,
            &env,
            &aria(),
            &ItemId::from("sheet_music"),
            ShopItemKind::Gift,
            &mut fx,
        );
        assert_eq!(none.unwrap_err().reason(), RejectionReason::InsufficientResource);

        let not_gift = give_gift(
            &mut agg,
            &env,
            &aria(),
            &ItemId::from("rosin"),
            ShopItemKind::Furniture,
            &mut fx,
        );
        assert_eq!(not_gift.unwrap_err().reason(), RejectionReason::PreconditionNotMet);
    }

    #[test]
    fn disliked_gift_can_end_a_friendship() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = PlayerAggregate::default();
        let record = agg.relationship_mut(&aria());
        record.status = RelationshipStatus::Friendly;
        record.rp = 32;
        agg.inventory.gifts.insert(ItemId::from("rosin"), 1);
        let mut fx = Effects::new(day(0));
        give_gift(
            &mut agg,
            &env_on(&catalog, &config, 0),
            &aria(),
            &ItemId::from("rosin"),
            ShopItemKind::Gift,
            &mut fx,
        )
        .unwrap();
        assert_eq!(
            agg.relationship(&aria()).unwrap().status,
            RelationshipStatus::Neutral
        );
    }

    #[test]
    fn confession_rules() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_on(&catalog, &config, 0);
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(day(0));

        let stranger = confess(&mut agg, &env, &aria(), &mut fx).unwrap_err();
        assert_eq!(stranger.reason(), RejectionReason::InvalidStateTransition);

        friendly_at_cap(&mut agg, &aria());
        let no_locket = confess(&mut agg, &env, &aria(), &mut fx).unwrap_err();
        assert_eq!(no_locket.reason(), RejectionReason::PreconditionNotMet);

        agg.inventory.key_items.insert(catalog.key_items.locket.clone());
        confess(&mut agg, &env, &aria(), &mut fx).unwrap();
        let record = agg.relationship(&aria()).unwrap();
        assert_eq!(record.status, RelationshipStatus::Dating);
        assert_eq!(record.rp, 0);
        assert!(agg.inventory.key_items.is_empty());

        let maestro = NpcId::from("old_maestro");
        friendly_at_cap(&mut agg, &maestro);
        let platonic = confess(&mut agg, &env, &maestro, &mut fx).unwrap_err();
        assert_eq!(platonic.reason(), RejectionReason::InvalidStateTransition);
    }

    #[test]
    fn proposing_without_a_ring_is_rejected() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_on(&catalog, &config, 0);
        let mut agg = PlayerAggregate::default();
        let record = agg.relationship_mut(&aria());
        record.status = RelationshipStatus::Dating;
        record.rp = 100;
        agg.house.level = 2;
        let mut fx = Effects::new(day(0));

        let err = propose(&mut agg, &env, &aria(), &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::PreconditionNotMet);
        assert!(!agg.family.is_married);

        agg.inventory.key_items.insert(catalog.key_items.wedding_ring.clone());
        agg.house.level = 1;
        let small_house = propose(&mut agg, &env, &aria(), &mut fx).unwrap_err();
        assert_eq!(small_house.reason(), RejectionReason::PreconditionNotMet);

        agg.house.level = 2;
        propose(&mut agg, &env, &aria(), &mut fx).unwrap();
        assert!(agg.family.is_married);
        assert_eq!(agg.family.spouse, Some(aria()));
        assert_eq!(agg.family.marriage_happiness, 70);
        assert_eq!(
            agg.relationship(&aria()).unwrap().status,
            RelationshipStatus::Married
        );

        let twice = propose(&mut agg, &env, &aria(), &mut fx).unwrap_err();
        assert_eq!(twice.reason(), RejectionReason::InvalidStateTransition);
    }

    #[test]
    fn proposing_to_a_friend_is_an_invalid_transition() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = PlayerAggregate::default();
        friendly_at_cap(&mut agg, &aria());
        let mut fx = Effects::new(day(0));
        let err = propose(&mut agg, &env_on(&catalog, &config, 0), &aria(), &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::InvalidStateTransition);
    }

    #[test]
    fn decay_skips_recent_friends_and_the_spouse() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = PlayerAggregate::default();
        let leo = NpcId::from("leo");
        for npc in [aria(), leo.clone()] {
            let record = agg.relationship_mut(&npc);
            record.status = RelationshipStatus::Friendly;
            record.rp = 31;
            record.last_positive_interaction = Some(day(0));
        }
        agg.family.is_married = true;
        agg.family.spouse = Some(leo.clone());
        agg.family.married_on = Some(day(0).date_naive());
        agg.family.last_spouse_interaction = Some(day(0).date_naive());
        agg.family.marriage_happiness = 70;
        let mut fx = Effects::new(day(0));

        let env = env_on(&catalog, &config, 2);
        daily_decay(&mut agg, &env, env.today(), &mut fx);
        assert_eq!(agg.relationship(&aria()).unwrap().rp, 31);
        assert_eq!(agg.family.marriage_happiness, 70);

        let env = env_on(&catalog, &config, 3);
        daily_decay(&mut agg, &env, env.today(), &mut fx);
        let record = agg.relationship(&aria()).unwrap();
        assert_eq!(record.rp, 29);
        assert_eq!(record.status, RelationshipStatus::Neutral);
        assert_eq!(agg.relationship(&leo).unwrap().rp, 31);
        assert_eq!(agg.family.marriage_happiness, 65);
    }

    #[test]
    fn heartsick_until_content_again() {
        let config = RelationshipConfig::default();
        let mut family = Family {
            is_married: true,
            spouse: Some(aria()),
            marriage_happiness: 15,
            ..Family::default()
        };
        let mut fx = Effects::new(day(0));
        refresh_heartsick(&mut family, &config, &mut fx);
        assert!(family.heartsick);
        family.marriage_happiness = 40;
        refresh_heartsick(&mut family, &config, &mut fx);
        assert!(family.heartsick);
        family.marriage_happiness = 50;
        refresh_heartsick(&mut family, &config, &mut fx);
        assert!(!family.heartsick);
        assert_eq!(fx.notifications().len(), 2);
    }
}
