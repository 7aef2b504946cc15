//! Discounts
//!
//! The allocation step of the promotion: given the eligible unit prices,
//! decide how much money comes off the basket.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::eligibility::PriceMultiset;

/// Errors specific to discount allocation.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// A negative percent reached the allocator. The configuration layer
    /// clamps at write time, so this signals a broken upstream write path
    /// and must not be silently treated as zero.
    #[error("negative percent discount {0} reached the allocator")]
    NegativePercent(i32),

    /// The rounded discount total could not be represented in minor units.
    #[error("discount total overflowed or was not representable")]
    AmountConversion,
}

/// Calculates the total discount for a multiset of eligible unit prices.
///
/// Prices are stable-sorted from most to least expensive, then paired
/// highest-to-lowest: the most expensive unit with the cheapest, the second
/// most expensive with the second cheapest, and so on. The cheaper unit of
/// each pair funds the discount, so with `n` units the cheapest `n / 2`
/// prices contribute: each in full when `percent_discount` is 0, otherwise
/// at `percent_discount` percent. An odd middle unit is never paired.
///
/// Contributions accumulate in decimal space and the sum is rounded once, at
/// the end, half-up to minor units.
///
/// # Errors
///
/// - [`DiscountError::NegativePercent`]: a negative percent was supplied.
/// - [`DiscountError::AmountConversion`]: the rounded sum did not fit the
///   minor-unit range.
pub fn allocate<'a>(
    prices: &PriceMultiset<'a>,
    percent_discount: i32,
) -> Result<Money<'a, Currency>, DiscountError> {
    if percent_discount < 0 {
        return Err(DiscountError::NegativePercent(percent_discount));
    }

    let n = prices.len();

    if n < 2 {
        return Ok(Money::from_minor(0, prices.currency()));
    }

    // 0 means the cheaper unit of each pair is fully free; anything above
    // 100 is capped at a full refund of that unit.
    let effective_percent = match percent_discount {
        0 => 100,
        percent => percent.min(100),
    };

    let multiplier = Percentage::from(Decimal::from(effective_percent) / Decimal::ONE_HUNDRED);

    let mut sorted: SmallVec<[Money<'a, Currency>; 10]> = prices.iter().copied().collect();

    // Stable sort: equal prices keep extraction order, so any future
    // which-unit-was-free labelling stays reproducible.
    sorted.sort_by(|a, b| b.to_minor_units().cmp(&a.to_minor_units()));

    let pairs = n / 2;

    let total = sorted
        .iter()
        .rev()
        .take(pairs)
        .fold(Decimal::ZERO, |acc, price| {
            acc + multiplier * Decimal::from(price.to_minor_units())
        });

    let minor = total
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::AmountConversion)?;

    Ok(Money::from_minor(minor, prices.currency()))
}
