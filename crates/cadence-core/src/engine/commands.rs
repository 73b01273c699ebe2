//! Command handlers.
//!
//! Each handler mutates the working copy through the progression
//! subsystems and charges or grants currency itself; subsystems never
//! call each other. Handlers are only reached for commands that change
//! the aggregate ([`Command::ResetGame`] is handled by the reducer).

use rand::Rng;
use tracing::debug;

use cadence_catalog::Reward;
use cadence_progression::{
    Effects, Env, MissionEvent, ProgressionError, apply_xp, earn_currency, family, missions, pets,
    quests, relationships, resolve, spend_currency,
};
use cadence_types::{
    Command, GameMode, ItemId, MultiplierKind, MusicalItemKind, NotificationKind,
    NotificationPayload, PlayerAggregate, RejectionReason, ShopItemKind, TrainingContext,
    UnlockRef,
};

/// Route one command to its handler.
///
/// # Errors
///
/// Returns the first [`ProgressionError`] raised by a subsystem.
pub fn dispatch(
    agg: &mut PlayerAggregate,
    command: &Command,
    env: &Env<'_>,
    rng: &mut impl Rng,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    match command {
        Command::AddXpAndCoinsFromTraining {
            base_xp,
            base_coins,
            context,
        } => training(agg, env, *base_xp, *base_coins, context, effects),
        Command::UpdateHighestStreak { streak, mode } => {
            update_highest_streak(agg, *streak, *mode, effects);
            Ok(())
        }
        Command::UnlockMusicalItem {
            item_id,
            kind,
            cost,
        } => unlock_musical_item(agg, env, item_id, *kind, *cost, effects),
        Command::PurchaseShopItem { item_id } => purchase_shop_item(agg, env, item_id, effects),
        Command::AdoptPet { pet_id } => {
            let price = pets::adoption_price(agg, env, pet_id)?;
            pets::adopt(agg, env, pet_id, effects)?;
            spend_currency(&mut agg.economy, price, effects)
        }
        Command::FeedPet => pets::feed(agg, env, effects),
        Command::PlayWithPet => pets::play(agg, env, effects),
        Command::SetActivePet { pet_id } => pets::set_active(agg, pet_id),
        Command::RenamePet { pet_id, name } => pets::rename(agg, pet_id, name),
        Command::CustomizePet {
            pet_id,
            slot,
            value,
        } => pets::customize(agg, pet_id, slot, value),
        Command::UpgradeHouse => upgrade_house(agg, env, effects),
        Command::ActivatePracticeNook => activate_practice_nook(agg, env, effects),
        Command::ClaimMissionReward { mission_id } => {
            let reward = missions::claim(agg, env.catalog, mission_id, effects)?;
            grant_reward(agg, env, reward, effects)
        }
        Command::StartQuest { quest_id } => quests::start(agg, env.catalog, quest_id, effects),
        Command::ProgressQuest {
            quest_id,
            objective_index,
        } => quests::progress(agg, quest_id, *objective_index, effects),
        Command::CompleteQuest { quest_id } => {
            let reward = quests::complete(agg, env.catalog, quest_id, effects)?;
            grant_reward(agg, env, reward, effects)
        }
        Command::InteractWithNpc { npc_id } => relationships::interact(agg, env, npc_id, effects),
        Command::GiveGiftToNpc {
            npc_id,
            item_id,
            kind,
        } => relationships::give_gift(agg, env, npc_id, item_id, *kind, effects),
        Command::ConfessToNpc { npc_id } => relationships::confess(agg, env, npc_id, effects),
        Command::ProposeToNpc { npc_id } => relationships::propose(agg, env, npc_id, effects),
        Command::FeedChild => family::feed_child(agg, env, effects),
        Command::PlayWithChild => family::play_with_child(agg, env, effects),
        Command::ChangeChildDiaper => family::change_diaper(agg, env, effects),
        Command::SootheChildToSleep => family::soothe_to_sleep(agg, env, effects),
        Command::UseChildCareKit => family::use_care_kit(agg, env, effects),
        Command::PayTuition => {
            let cost = family::pay_tuition(agg, env, effects)?;
            spend_currency(&mut agg.economy, cost, effects)
        }
        Command::HelpWithHomework => family::help_with_homework(agg, env, effects),
        Command::PerformBusking => perform_busking(agg, env, effects),
        Command::PerformFamilyActivity { activity_id } => {
            let outcome = family::perform_family_activity(agg, env, activity_id, effects)?;
            spend_currency(&mut agg.economy, outcome.cost, effects)?;
            relationships::cheer_marriage(agg, env, outcome.marriage_happiness, effects);
            Ok(())
        }
        Command::CheckForDailyLoginReward => daily_login_reward(agg, env, effects),
        Command::Tick => {
            pets::periodic_tick(agg, env, rng, effects);
            family::hourly_decay(agg, env, effects);
            agg.timeline.last_tick = Some(env.now);
            Ok(())
        }
        Command::ResetGame | Command::SaveGameExplicitly => Ok(()),
    }
}

fn grant_xp(agg: &mut PlayerAggregate, env: &Env<'_>, xp: u64, effects: &mut Effects) {
    apply_xp(&mut agg.economy, &env.catalog.xp_thresholds, xp, effects);
}

/// Mission and quest rewards bypass the training multipliers.
fn grant_reward(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    reward: Reward,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    earn_currency(&mut agg.economy, reward.currency, effects);
    grant_xp(agg, env, reward.xp, effects);
    pets::grant_active_pet_xp(agg, env, reward.pet_xp, effects)
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// Grant training XP and coins.
///
/// # Order of operations
///
/// 1. XP and coins through the training multipliers
/// 2. A correct answer bumps counters, feeds missions and may fulfil the
///    active pet's special request
/// 3. The active pet earns training XP
/// 4. A defeated monster pays its bounty
fn training(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    base_xp: u64,
    base_coins: u64,
    context: &TrainingContext,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    // 1. Multiplied grants
    let xp = resolve(agg, env, MultiplierKind::XpGainTraining).apply(base_xp);
    let coins = resolve(agg, env, MultiplierKind::CurrencyGainTraining).apply(base_coins);
    grant_xp(agg, env, xp, effects);
    earn_currency(&mut agg.economy, coins, effects);

    if context.correct {
        // 2. Counters, missions, special requests
        agg.stats.correct_answers = agg.stats.correct_answers.saturating_add(1);
        if let Some(item) = &context.item_id {
            let count = agg
                .mastery
                .entry(context.mode)
                .or_default()
                .entry(item.clone())
                .or_insert(0);
            *count = count.saturating_add(1);
            pets::fulfill_special_request(agg, env, context.mode, item, effects)?;
        }
        effects.event(MissionEvent::CorrectAnswer {
            mode: context.mode,
            item_id: context.item_id.clone(),
        });

        // 3. Pet XP
        if agg.pets.active.is_some() {
            let pet_xp = resolve(agg, env, MultiplierKind::PetXpGain)
                .apply(env.config.economy.training_pet_xp);
            pets::grant_active_pet_xp(agg, env, pet_xp, effects)?;
        }
    }

    // 4. Monster bounty
    if context.monster_defeated
        && let Some(monster_id) = &context.monster_id
    {
        let def = env
            .catalog
            .monster(monster_id)
            .ok_or_else(|| ProgressionError::missing("monster", monster_id))?;
        earn_currency(&mut agg.economy, def.currency, effects);
        grant_xp(agg, env, def.xp, effects);
        agg.stats.monsters_defeated = agg.stats.monsters_defeated.saturating_add(1);
        debug!(monster = %monster_id, "monster defeated");
        effects.notify(
            NotificationKind::MonsterDefeated,
            "notification.monster_defeated",
            NotificationPayload::Monster {
                monster_id: monster_id.clone(),
                currency: def.currency,
                xp: def.xp,
            },
        );
        effects.event(MissionEvent::DefeatMonster(monster_id.clone()));
    }
    Ok(())
}

fn update_highest_streak(
    agg: &mut PlayerAggregate,
    streak: u32,
    mode: GameMode,
    effects: &mut Effects,
) {
    let best = agg.highest_streaks.entry(mode).or_insert(0);
    *best = (*best).max(streak);
    effects.event(MissionEvent::ReachStreak { mode, streak });
}

// ---------------------------------------------------------------------------
// Shop & house
// ---------------------------------------------------------------------------

fn discounted(agg: &PlayerAggregate, env: &Env<'_>, price: u64) -> u64 {
    resolve(agg, env, MultiplierKind::UnlockCostDiscount).apply(price)
}

fn unlock_musical_item(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    item_id: &ItemId,
    kind: MusicalItemKind,
    cost: u64,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let unlock = UnlockRef {
        kind,
        id: item_id.clone(),
    };
    if agg.unlocks.advanced_items.contains(&unlock) {
        return Err(ProgressionError::rejected(
            RejectionReason::AlreadyUnlocked,
            format!("{item_id} already unlocked"),
        ));
    }
    let price = discounted(agg, env, cost);
    spend_currency(&mut agg.economy, price, effects)?;
    agg.unlocks.advanced_items.insert(unlock);
    debug!(item = %item_id, price, "musical item unlocked");
    effects.event(MissionEvent::UnlockItem);
    Ok(())
}

fn already_owned(item_id: &ItemId) -> ProgressionError {
    ProgressionError::rejected(
        RejectionReason::AlreadyOwned,
        format!("{item_id} already owned"),
    )
}

/// Buy a shop item at its discounted price.
///
/// # Order of operations
///
/// 1. Validate the purchase for the item's kind
/// 2. Charge the discounted price
/// 3. Deliver the goods
fn purchase_shop_item(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    item_id: &ItemId,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let catalog = env.catalog;
    let def = catalog
        .shop_item(item_id)
        .ok_or_else(|| ProgressionError::missing("shop item", item_id))?;

    // 1. Validate
    let furniture = match def.kind {
        ShopItemKind::KeyItem if agg.inventory.key_items.contains(item_id) => {
            return Err(already_owned(item_id));
        }
        ShopItemKind::Furniture => {
            let furniture_id = def
                .furniture_id
                .as_ref()
                .ok_or_else(|| ProgressionError::missing("furniture", item_id))?;
            let furniture = catalog
                .furniture(furniture_id)
                .ok_or_else(|| ProgressionError::missing("furniture", furniture_id))?;
            if agg.house.furniture.contains(furniture_id) {
                return Err(already_owned(item_id));
            }
            if agg.house.level < furniture.min_house_level {
                return Err(ProgressionError::precondition(format!(
                    "{item_id} needs house level {}",
                    furniture.min_house_level
                )));
            }
            Some(furniture_id.clone())
        }
        _ => None,
    };

    // 2. Charge
    let price = discounted(agg, env, def.price);
    spend_currency(&mut agg.economy, price, effects)?;

    // 3. Deliver
    let inventory = &mut agg.inventory;
    match def.kind {
        ShopItemKind::PetFood => {
            inventory.pet_food = inventory.pet_food.saturating_add(def.quantity);
        }
        ShopItemKind::ChildCareKit => {
            inventory.care_kits = inventory.care_kits.saturating_add(def.quantity);
        }
        ShopItemKind::Gift => {
            let count = inventory.gifts.entry(item_id.clone()).or_insert(0);
            *count = count.saturating_add(def.quantity);
        }
        ShopItemKind::KeyItem => {
            inventory.key_items.insert(item_id.clone());
            agg.unlocks.purchased_items.insert(item_id.clone());
        }
        ShopItemKind::Furniture => {
            if let Some(furniture_id) = furniture {
                agg.house.furniture.insert(furniture_id);
            }
            agg.unlocks.purchased_items.insert(item_id.clone());
        }
    }
    debug!(item = %item_id, price, "shop purchase");
    effects.event(MissionEvent::PurchaseItem);
    Ok(())
}

fn upgrade_house(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let current = agg.house.level;
    if current >= env.catalog.max_house_level() {
        return Err(ProgressionError::invalid_transition(
            "house is already at the top level",
        ));
    }
    let next = current.saturating_add(1);
    let def = env
        .catalog
        .house_level(next)
        .ok_or_else(|| ProgressionError::missing("house level", next))?;
    if agg.economy.level < def.min_player_level {
        return Err(ProgressionError::precondition(format!(
            "house level {next} needs player level {}",
            def.min_player_level
        )));
    }
    spend_currency(&mut agg.economy, def.upgrade_cost, effects)?;
    agg.house.level = next;
    debug!(level = next, "house upgraded");
    effects.info("house_upgraded");
    Ok(())
}

fn activate_practice_nook(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let config = &env.config.economy;
    if !agg
        .house
        .furniture
        .contains(&env.catalog.key_items.practice_nook)
    {
        return Err(ProgressionError::precondition("no practice nook in the house"));
    }
    let cooldown = resolve(agg, env, MultiplierKind::PracticeNookCooldownReduction)
        .apply(config.practice_nook_cooldown_secs);
    let cooldown = i64::try_from(cooldown).unwrap_or(i64::MAX);
    if let Some(last) = agg.house.practice_nook_last_used
        && let Some(remaining) = env.cooldown_remaining(last, cooldown)
    {
        return Err(ProgressionError::cooldown(remaining, "practice nook is resting"));
    }
    agg.house.practice_nook_last_used = Some(env.now);
    agg.stats.practice_nook_uses = agg.stats.practice_nook_uses.saturating_add(1);
    grant_xp(agg, env, config.practice_nook_xp, effects);
    pets::cheer_active(agg, config.practice_nook_pet_happiness, effects);
    Ok(())
}

// ---------------------------------------------------------------------------
// Busking & login
// ---------------------------------------------------------------------------

fn perform_busking(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let config = &env.config.economy;
    if let Some(last) = agg.timeline.last_busking
        && let Some(remaining) = env.cooldown_remaining(last, config.busking_cooldown_secs)
    {
        return Err(ProgressionError::cooldown(remaining, "audience needs a break"));
    }
    let coins = config
        .busking_coins_per_level
        .saturating_mul(u64::from(agg.economy.level))
        .saturating_add(config.busking_base_coins);
    agg.timeline.last_busking = Some(env.now);
    agg.stats.busking_performances = agg.stats.busking_performances.saturating_add(1);
    earn_currency(&mut agg.economy, coins, effects);
    grant_xp(agg, env, config.busking_xp, effects);
    effects.event(MissionEvent::Busking);
    Ok(())
}

/// Claim today's login reward.
///
/// The streak continues when yesterday was claimed and restarts at 1
/// otherwise. Day `n` of a streak pays
/// `base + per_day * (min(n, cap) - 1)`, raised by `DailyLoginBonus`.
fn daily_login_reward(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let config = &env.config.economy;
    let today = env.today();
    let login = &mut agg.login;
    if login.last_login == Some(today) {
        return Err(ProgressionError::rejected(
            RejectionReason::AlreadyUnlocked,
            "login reward already claimed today",
        ));
    }
    let continues = login
        .last_login
        .and_then(|last| last.succ_opt())
        .is_some_and(|next| next == today);
    login.streak = if continues {
        login.streak.saturating_add(1)
    } else {
        1
    };
    login.last_login = Some(today);

    let counted = login.streak.min(config.daily_login_streak_cap).saturating_sub(1);
    let base = config
        .daily_login_per_streak_day
        .saturating_mul(u64::from(counted))
        .saturating_add(config.daily_login_base);
    let reward = resolve(agg, env, MultiplierKind::DailyLoginBonus).apply(base);
    debug!(streak = agg.login.streak, reward, "daily login reward");
    earn_currency(&mut agg.economy, reward, effects);
    effects.info("daily_login_reward");
    Ok(())
}
