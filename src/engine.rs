//! Engine
//!
//! Composes extraction and allocation into the recalculation pass, and
//! reconciles the basket's applied codes with the computed discount. One
//! `Engine` value exists per basket session; it owns nothing but the
//! in-flight flag that keeps a pass from re-entering itself.

use std::cell::Cell;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    basket::Basket,
    codes,
    config::PromotionConfig,
    discounts::{DiscountError, allocate},
    eligibility::eligible_unit_prices,
};

/// A basket mutation command emitted by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionAction {
    /// Apply the virtual code to the basket.
    Apply(String),

    /// Remove a stale virtual code from the basket.
    Remove(String),
}

/// Outcome of one recalculation pass.
#[derive(Debug)]
pub enum Recalculation<'a> {
    /// The pass ran: the computed discount and the actions applied.
    ///
    /// An empty action list means the basket already agreed with the
    /// computed state.
    Completed {
        /// Total discount computed for the basket.
        discount: Money<'a, Currency>,

        /// Mutations that were applied to the basket's codes.
        actions: SmallVec<[PromotionAction; 2]>,
    },

    /// A pass was already in flight; the basket was left untouched.
    Reentrant,
}

/// Computes the total discount for a basket under the given configuration.
///
/// Pure pairing math: the `active` flag is not consulted here. It gates
/// reconciliation and coupon resolution, not the arithmetic.
///
/// # Errors
///
/// Returns a [`DiscountError`] if allocation fails.
pub fn discount<'a>(
    basket: &Basket<'a>,
    config: &PromotionConfig,
) -> Result<Money<'a, Currency>, DiscountError> {
    let prices = eligible_unit_prices(basket, config);

    allocate(&prices, i32::from(config.percent_discount()))
}

/// Compares the desired promotion state against the basket's applied codes
/// and returns the minimal set of mutations needed to align them.
///
/// - Zero discount: every applied code matching the configured one is
///   removed, clearing stale promotions after the basket shrank.
/// - Positive discount with the code already applied: no actions. Repeated
///   recalculation never re-adds or duplicates the code.
/// - Positive discount, no code applied, promotion active: apply the code.
/// - `active` is a master override: nothing is applied while it is off,
///   whatever the arithmetic said.
#[must_use]
pub fn reconcile(
    discount: &Money<'_, Currency>,
    basket: &Basket<'_>,
    config: &PromotionConfig,
) -> SmallVec<[PromotionAction; 2]> {
    let mut actions = SmallVec::new();

    if discount.is_zero() {
        for code in basket.applied_codes() {
            if codes::matches(code, config.discount_code()) {
                actions.push(PromotionAction::Remove(code.to_string()));
            }
        }

        return actions;
    }

    let already_applied = basket
        .applied_codes()
        .any(|code| codes::matches(code, config.discount_code()));

    if !already_applied && config.active() {
        actions.push(PromotionAction::Apply(config.discount_code().to_string()));
    }

    actions
}

/// Scoped token marking a recalculation pass as in flight.
///
/// Dropping the guard releases the flag, so every exit path (including
/// early error returns) re-arms the engine for the next pass.
#[derive(Debug)]
struct RecalcGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> RecalcGuard<'a> {
    fn try_acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(RecalcGuard { flag })
        }
    }
}

impl Drop for RecalcGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// The promotion engine for one basket session.
#[derive(Debug, Default)]
pub struct Engine {
    in_flight: Cell<bool>,
}

impl Engine {
    /// Create a new engine with no pass in flight.
    #[must_use]
    pub fn new() -> Self {
        Engine::default()
    }

    /// Runs one recalculation pass: compute the discount, reconcile, and
    /// apply the resulting actions to the basket.
    ///
    /// Mutating applied codes is exactly what triggers totals recalculation
    /// in the surrounding checkout, so a pass arriving while another is in
    /// flight returns [`Recalculation::Reentrant`] without touching the
    /// basket instead of recursing.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if allocation fails; the in-flight flag
    /// is released regardless.
    pub fn recalculate<'a>(
        &self,
        basket: &mut Basket<'a>,
        config: &PromotionConfig,
    ) -> Result<Recalculation<'a>, DiscountError> {
        let Some(_guard) = RecalcGuard::try_acquire(&self.in_flight) else {
            return Ok(Recalculation::Reentrant);
        };

        let amount = discount(basket, config)?;
        let actions = reconcile(&amount, basket, config);

        for action in &actions {
            match action {
                PromotionAction::Apply(code) => basket.apply_code(code),
                PromotionAction::Remove(code) => basket.remove_code(code),
            }
        }

        Ok(Recalculation::Completed {
            discount: amount,
            actions,
        })
    }
}
