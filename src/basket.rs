//! Basket

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    codes,
    items::LineItem,
    pricing::{TotalPriceError, total_price},
};

/// Errors related to basket construction or totals.
#[derive(Debug, Error)]
pub enum BasketError {
    /// A line's currency differs from the basket currency (index, line currency, basket currency).
    #[error("Line {0} has currency {1}, but basket has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line was not found in the basket.
    #[error("Line {0} not found")]
    LineNotFound(usize),
}

/// A shopping basket: ordered lines plus the currently applied promotional
/// codes (manual and virtual alike).
#[derive(Debug)]
pub struct Basket<'a> {
    lines: Vec<LineItem<'a>>,
    applied_codes: Vec<String>,
    currency: &'static Currency,
}

impl<'a> Basket<'a> {
    /// Create a new empty basket in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Basket {
            lines: Vec::new(),
            applied_codes: Vec::new(),
            currency,
        }
    }

    /// Create a new basket with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if any line's currency differs from the basket
    /// currency.
    pub fn with_lines(
        lines: impl Into<Vec<LineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, BasketError> {
        let lines = lines.into();

        lines.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.unit_price().currency();

            if line_currency == currency {
                Ok(())
            } else {
                Err(BasketError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Basket {
            lines,
            applied_codes: Vec::new(),
            currency,
        })
    }

    /// Calculate the subtotal of the basket before any promotion.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or
    /// overflow error.
    pub fn subtotal(&'a self) -> Result<Money<'a, Currency>, TotalPriceError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        total_price(&self.lines)
    }

    /// Get a line from the basket by its index.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::LineNotFound` if the line is not found.
    pub fn get_line(&'a self, line: usize) -> Result<&'a LineItem<'a>, BasketError> {
        self.lines.get(line).ok_or(BasketError::LineNotFound(line))
    }

    /// Iterate over the lines in the basket, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.lines.iter()
    }

    /// Get the number of lines in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the basket has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines; quantities count individually.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Add a line to the end of the basket.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::CurrencyMismatch` if the line's currency
    /// differs from the basket currency.
    pub fn add_line(&mut self, line: LineItem<'a>) -> Result<(), BasketError> {
        let line_currency = line.unit_price().currency();

        if line_currency != self.currency {
            return Err(BasketError::CurrencyMismatch(
                self.lines.len(),
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.lines.push(line);

        Ok(())
    }

    /// Remove a line from the basket by its index.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::LineNotFound` if the line is not found.
    pub fn remove_line(&mut self, line: usize) -> Result<LineItem<'a>, BasketError> {
        if line >= self.lines.len() {
            return Err(BasketError::LineNotFound(line));
        }

        Ok(self.lines.remove(line))
    }

    /// Iterate over the currently applied promotional codes.
    pub fn applied_codes(&self) -> impl Iterator<Item = &str> {
        self.applied_codes.iter().map(String::as_str)
    }

    /// Check whether a code is already applied, by normalised identity.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.applied_codes
            .iter()
            .any(|applied| codes::matches(applied, code))
    }

    /// Apply a promotional code. Re-applying a code that is already present
    /// (under normalised identity) is a no-op.
    pub fn apply_code(&mut self, code: &str) {
        if !self.has_code(code) {
            self.applied_codes.push(code.to_string());
        }
    }

    /// Remove every applied code matching the given one.
    pub fn remove_code(&mut self, code: &str) {
        self.applied_codes
            .retain(|applied| !codes::matches(applied, code));
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::products::ProductId;

    use super::*;

    fn test_lines<'a>() -> [LineItem<'a>; 3] {
        [
            LineItem::new(ProductId::new(1), Money::from_minor(100, GBP), 1),
            LineItem::new(ProductId::new(2), Money::from_minor(200, GBP), 2),
            LineItem::new(ProductId::new(3), Money::from_minor(300, GBP), 1),
        ]
    }

    #[test]
    fn with_lines_currency_mismatch_errors() {
        let lines = [
            LineItem::new(ProductId::new(1), Money::from_minor(100, GBP), 1),
            LineItem::new(ProductId::new(2), Money::from_minor(100, USD), 1),
        ];

        let result = Basket::with_lines(lines, GBP);

        match result {
            Err(BasketError::CurrencyMismatch(idx, line_currency, basket_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(line_currency, USD.iso_alpha_code);
                assert_eq!(basket_currency, GBP.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn subtotal_weights_quantities() -> TestResult {
        let basket = Basket::with_lines(test_lines(), GBP)?;

        assert_eq!(basket.subtotal()?, Money::from_minor(800, GBP));

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_basket_is_zero() -> TestResult {
        let basket = Basket::new(GBP);

        assert_eq!(basket.subtotal()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn unit_count_expands_quantities() -> TestResult {
        let basket = Basket::with_lines(test_lines(), GBP)?;

        assert_eq!(basket.len(), 3);
        assert_eq!(basket.unit_count(), 4);

        Ok(())
    }

    #[test]
    fn get_line_missing_returns_error() {
        let basket = Basket::new(GBP);

        let err = basket.get_line(0).err();

        assert!(matches!(err, Some(BasketError::LineNotFound(0))));
    }

    #[test]
    fn add_line_rejects_foreign_currency() -> TestResult {
        let mut basket = Basket::with_lines(test_lines(), GBP)?;

        let result = basket.add_line(LineItem::new(
            ProductId::new(4),
            Money::from_minor(100, USD),
            1,
        ));

        assert!(matches!(
            result,
            Err(BasketError::CurrencyMismatch(3, "USD", "GBP"))
        ));
        assert_eq!(basket.len(), 3);

        Ok(())
    }

    #[test]
    fn remove_line_returns_the_removed_line() -> TestResult {
        let mut basket = Basket::with_lines(test_lines(), GBP)?;

        let removed = basket.remove_line(1)?;

        assert_eq!(removed.product(), ProductId::new(2));
        assert_eq!(basket.len(), 2);
        assert!(matches!(
            basket.remove_line(5),
            Err(BasketError::LineNotFound(5))
        ));

        Ok(())
    }

    #[test]
    fn apply_code_deduplicates_by_normalised_identity() -> TestResult {
        let mut basket = Basket::with_lines(test_lines(), GBP)?;

        basket.apply_code("BOGOF");
        basket.apply_code(" bogof ");

        assert_eq!(basket.applied_codes().count(), 1);
        assert!(basket.has_code("Bogof"));

        Ok(())
    }

    #[test]
    fn remove_code_clears_every_normalised_match() -> TestResult {
        let mut basket = Basket::with_lines(test_lines(), GBP)?;

        basket.apply_code("BOGOF");
        basket.apply_code("SUMMER10");
        basket.remove_code("bogof");

        assert!(!basket.has_code("BOGOF"));
        assert!(basket.has_code("SUMMER10"));

        Ok(())
    }
}
