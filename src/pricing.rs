//! Pricing

use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// No lines were provided, so currency could not be determined.
    #[error("no lines provided; cannot determine currency")]
    NoItems,

    /// A quantity-weighted line total exceeded the representable range.
    #[error("line total overflowed the representable amount range")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the quantity-weighted total for a single line.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: the unit price times quantity exceeds the
///   representable minor-unit range.
pub fn line_total<'a>(line: &LineItem<'a>) -> Result<Money<'a, iso::Currency>, TotalPriceError> {
    let minor = line
        .unit_price()
        .to_minor_units()
        .checked_mul(i64::from(line.quantity()))
        .ok_or(TotalPriceError::Overflow)?;

    Ok(Money::from_minor(minor, line.unit_price().currency()))
}

/// Calculates the total price of a list of basket lines.
///
/// # Errors
///
/// - [`TotalPriceError::NoItems`]: no lines were provided, so currency could
///   not be determined.
/// - [`TotalPriceError::Overflow`]: a line total exceeded the representable
///   range.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency
///   mismatch error.
pub fn total_price<'a>(lines: &[LineItem<'a>]) -> Result<Money<'a, iso::Currency>, TotalPriceError> {
    let first = lines.first().ok_or(TotalPriceError::NoItems)?;

    let total = lines.iter().try_fold(
        Money::from_minor(0, first.unit_price().currency()),
        |acc, line| {
            let line_total = line_total(line)?;

            acc.add(line_total).map_err(TotalPriceError::from)
        },
    )?;

    Ok(total)
}
