//! Currency and the economy multiplier resolver.
//!
//! Multipliers compose four sources into one [`Multiplier`]: the house
//! level table, owned furniture, the active pet's ability and the spouse's
//! passive bonus. Gain kinds multiply `1 + p/100` per source; discount kinds
//! multiply `1 - p/100` and keep the product inside `[0, 1]`. Flat bonuses
//! are summed separately and applied after rounding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use cadence_types::{Economy, MultiplierKind, PlayerAggregate, RejectionReason};

use crate::effects::{Effects, MissionEvent};
use crate::env::Env;
use crate::error::ProgressionError;

/// A resolved multiplier for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplier {
    /// What the multiplier scales.
    pub kind: MultiplierKind,
    /// Product of every percentage source.
    pub factor: Decimal,
    /// Sum of flat bonuses (added for gains, subtracted for discounts).
    pub flat: u64,
}

impl Multiplier {
    /// A multiplier that leaves values unchanged.
    pub const fn identity(kind: MultiplierKind) -> Self {
        Self {
            kind,
            factor: Decimal::ONE,
            flat: 0,
        }
    }

    /// Scale a base amount.
    ///
    /// Gains: `round(base * factor) + flat`. Discounts:
    /// `max(0, round(base * factor) - flat)`. Rounding is half away from zero.
    ///
    /// A product outside `u64` saturates: gains cap at `u64::MAX`, and a
    /// discount factor never exceeds 1 so `base` bounds it.
    pub fn apply(&self, base: u64) -> u64 {
        let saturated = if self.kind.is_discount() { base } else { u64::MAX };
        let scaled = Decimal::from(base)
            .checked_mul(self.factor)
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|v| v.to_u64())
            .unwrap_or(saturated);
        if self.kind.is_discount() {
            scaled.saturating_sub(self.flat)
        } else {
            scaled.saturating_add(self.flat)
        }
    }

    fn push_percent(&mut self, percent: u32) {
        let factor = percent_factor(self.kind, percent);
        self.factor = self.factor.checked_mul(factor).unwrap_or(self.factor);
        if self.kind.is_discount() {
            self.factor = self.factor.clamp(Decimal::ZERO, Decimal::ONE);
        }
    }
}

fn percent_factor(kind: MultiplierKind, percent: u32) -> Decimal {
    let percent = i64::from(percent);
    if kind.is_discount() {
        Decimal::new(100_i64.saturating_sub(percent).max(0), 2)
    } else {
        Decimal::new(100_i64.saturating_add(percent), 2)
    }
}

/// `base` raised by `percent`, rounded like every other gain.
pub fn with_bonus_percent(base: u64, percent: u32) -> u64 {
    let mut multiplier = Multiplier::identity(MultiplierKind::PetXpGain);
    multiplier.push_percent(percent);
    multiplier.apply(base)
}

/// Resolve the current multiplier for `kind`.
pub fn resolve(agg: &PlayerAggregate, env: &Env<'_>, kind: MultiplierKind) -> Multiplier {
    let catalog = env.catalog;
    let mut multiplier = Multiplier::identity(kind);

    if let Some(percent) = catalog
        .house_level(agg.house.level)
        .and_then(|level| level.bonuses.get(&kind))
    {
        multiplier.push_percent(*percent);
    }

    for bonus in agg
        .house
        .furniture
        .iter()
        .filter_map(|id| catalog.furniture(id))
        .flat_map(|def| def.bonuses.iter())
        .filter(|bonus| bonus.kind == kind)
    {
        if bonus.percent > 0 {
            multiplier.push_percent(bonus.percent);
        }
        multiplier.flat = multiplier.flat.saturating_add(bonus.flat);
    }

    if let Some(ability) = agg.active_pet().and_then(|pet| {
        catalog
            .pet(&pet.pet_id)
            .and_then(|def| def.ability)
            .filter(|ability| ability.kind == kind && pet.level >= ability.min_level)
    }) {
        multiplier.push_percent(ability.percent);
    }

    let family = &agg.family;
    if family.is_married
        && !family.heartsick
        && family.marriage_happiness >= env.config.relationships.content_threshold
    {
        if let Some(bonus) = family
            .spouse
            .as_ref()
            .and_then(|id| catalog.npc(id))
            .and_then(|npc| npc.spouse_bonus)
            .filter(|bonus| bonus.kind == kind)
        {
            multiplier.push_percent(bonus.percent);
        }
    }

    multiplier
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

fn signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// Add currency, count it toward lifetime earnings and report the delta.
pub fn earn_currency(economy: &mut Economy, amount: u64, effects: &mut Effects) {
    if amount == 0 {
        return;
    }
    economy.currency = economy.currency.saturating_add(amount);
    economy.total_currency_earned = economy.total_currency_earned.saturating_add(amount);
    effects.event(MissionEvent::EarnCurrency(signed(amount)));
}

/// Remove currency, or reject with `InsufficientFunds` leaving it unchanged.
pub fn spend_currency(
    economy: &mut Economy,
    amount: u64,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let remaining = economy.currency.checked_sub(amount).ok_or_else(|| {
        ProgressionError::rejected(
            RejectionReason::InsufficientFunds,
            format!("needs {amount}, has {}", economy.currency),
        )
    })?;
    economy.currency = remaining;
    if amount > 0 {
        effects.event(MissionEvent::EarnCurrency(signed(amount).saturating_neg()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use cadence_catalog::Catalog;
    use cadence_types::{NpcId, PetId, PetInstance};
    use chrono::{Offset, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::ProgressionConfig;

    fn with_env<R>(f: impl FnOnce(&Env<'_>) -> R) -> R {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = Env::new(&catalog, &config, Utc::now(), Utc.fix());
        f(&env)
    }

    #[test]
    fn identity_leaves_values() {
        let m = Multiplier::identity(MultiplierKind::XpGainTraining);
        assert_eq!(m.apply(37), 37);
    }

    #[test]
    fn gains_round_half_away_from_zero() {
        let m = Multiplier {
            kind: MultiplierKind::XpGainTraining,
            factor: dec!(1.5),
            flat: 2,
        };
        assert_eq!(m.apply(5), 10);
        assert_eq!(m.apply(3), 7);
    }

    #[test]
    fn discounts_floor_at_zero() {
        let m = Multiplier {
            kind: MultiplierKind::UnlockCostDiscount,
            factor: dec!(0.9),
            flat: 50,
        };
        assert_eq!(m.apply(100), 40);
        assert_eq!(m.apply(10), 0);
    }

    #[test]
    fn oversized_products_saturate() {
        let gain = Multiplier {
            kind: MultiplierKind::XpGainTraining,
            factor: dec!(1.5),
            flat: 0,
        };
        assert_eq!(gain.apply(u64::MAX), u64::MAX);

        let discount = Multiplier {
            kind: MultiplierKind::UnlockCostDiscount,
            factor: dec!(0.5),
            flat: 0,
        };
        assert_eq!(discount.apply(u64::MAX), 9_223_372_036_854_775_808);
        assert_eq!(discount.apply(1_000), 500);
    }

    #[test]
    fn discount_factor_never_negative() {
        let mut m = Multiplier::identity(MultiplierKind::UnlockCostDiscount);
        m.push_percent(150);
        assert_eq!(m.factor, Decimal::ZERO);
        assert_eq!(m.apply(500), 0);
    }

    #[test]
    fn percent_bonus() {
        assert_eq!(with_bonus_percent(20, 50), 30);
        assert_eq!(with_bonus_percent(5, 50), 8);
        assert_eq!(with_bonus_percent(7, 0), 7);
    }

    #[test]
    fn fresh_player_has_identity_multipliers() {
        with_env(|env| {
            let agg = PlayerAggregate::default();
            let m = resolve(&agg, env, MultiplierKind::XpGainTraining);
            assert_eq!(m.factor, Decimal::ONE);
            assert_eq!(m.flat, 0);
        });
    }

    #[test]
    fn pet_ability_needs_its_level() {
        with_env(|env| {
            let mut agg = PlayerAggregate::default();
            let owl = PetId::from("echo_owl");
            agg.pets.owned.insert(owl.clone());
            agg.pets.active = Some(owl.clone());
            agg.pets.instances.insert(
                owl.clone(),
                PetInstance {
                    pet_id: owl,
                    level: 1,
                    ..PetInstance::default()
                },
            );
            let before = resolve(&agg, env, MultiplierKind::UnlockCostDiscount);
            assert_eq!(before.factor, Decimal::ONE);
            if let Some(pet) = agg.active_pet_mut() {
                pet.level = 3;
            }
            let after = resolve(&agg, env, MultiplierKind::UnlockCostDiscount);
            assert_eq!(after.factor, dec!(0.90));
            assert_eq!(after.apply(300), 270);
        });
    }

    #[test]
    fn spouse_bonus_requires_contentment() {
        with_env(|env| {
            let mut agg = PlayerAggregate::default();
            let spouse = env
                .catalog
                .npcs
                .iter()
                .find(|npc| npc.spouse_bonus.is_some())
                .map(|npc| (npc.id.clone(), npc.spouse_bonus))
                .unwrap_or((NpcId::from("none"), None));
            let Some(bonus) = spouse.1 else {
                panic!("builtin catalog has a spouse bonus");
            };
            agg.family.is_married = true;
            agg.family.spouse = Some(spouse.0);
            agg.family.marriage_happiness = 80;
            assert!(resolve(&agg, env, bonus.kind).factor != Decimal::ONE);
            agg.family.heartsick = true;
            assert_eq!(resolve(&agg, env, bonus.kind).factor, Decimal::ONE);
            agg.family.heartsick = false;
            agg.family.marriage_happiness = 10;
            assert_eq!(resolve(&agg, env, bonus.kind).factor, Decimal::ONE);
        });
    }

    #[test]
    fn furniture_flat_bonus_is_summed() {
        with_env(|env| {
            let mut agg = PlayerAggregate::default();
            let Some((id, bonus)) = env.catalog.furniture.iter().find_map(|def| {
                def.bonuses
                    .iter()
                    .find(|b| b.flat > 0)
                    .map(|b| (def.id.clone(), *b))
            }) else {
                panic!("builtin catalog has a flat furniture bonus");
            };
            agg.house.furniture.insert(id);
            let m = resolve(&agg, env, bonus.kind);
            assert_eq!(m.flat, bonus.flat);
        });
    }

    #[test]
    fn spending_more_than_held_is_rejected() {
        let mut economy = Economy::default();
        let mut fx = Effects::new(Utc::now());
        let err = spend_currency(&mut economy, 500, &mut fx);
        assert_eq!(
            err.map_err(|e| e.reason()),
            Err(RejectionReason::InsufficientFunds)
        );
        assert_eq!(economy.currency, 100);
        assert_eq!(fx.next_event(), None);
    }

    #[test]
    fn currency_deltas_are_signed() {
        let mut economy = Economy::default();
        let mut fx = Effects::new(Utc::now());
        earn_currency(&mut economy, 40, &mut fx);
        assert!(spend_currency(&mut economy, 30, &mut fx).is_ok());
        assert_eq!(economy.currency, 110);
        assert_eq!(economy.total_currency_earned, 40);
        assert_eq!(fx.next_event(), Some(MissionEvent::EarnCurrency(40)));
        assert_eq!(fx.next_event(), Some(MissionEvent::EarnCurrency(-30)));
    }
}
