//! Fixtures
//!
//! YAML-described checkout scenarios for the integration tests and the demo:
//! a currency, an admin configuration record and the basket lines.

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    config::{ConfigError, PromotionConfig, RawPromotionConfig},
    items::LineItem,
    products::ProductId,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Configuration record error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),
}

/// Fixture file layout in YAML
#[derive(Debug, Deserialize)]
struct FixtureFile {
    /// ISO alpha code for every price in the set
    currency: String,

    /// Admin configuration record, raw form
    config: RawPromotionConfig,

    /// Basket lines
    lines: Vec<LineFixture>,
}

/// One basket line in YAML
#[derive(Debug, Deserialize)]
struct LineFixture {
    /// Product identifier
    product: ProductId,

    /// Display name for receipts
    name: String,

    /// Unit price as a decimal string, e.g. `"2.20"`
    price: String,

    /// Units on the line
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// A loaded checkout scenario.
#[derive(Debug)]
pub struct Fixture {
    currency: &'static iso::Currency,
    config: PromotionConfig,
    names: FxHashMap<ProductId, String>,
    lines: Vec<LineItem<'static>>,
}

impl Fixture {
    /// Load a named fixture set from the `fixtures/` directory.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_set(set: &str) -> Result<Self, FixtureError> {
        Self::from_path(Path::new("fixtures").join(format!("{set}.yaml")))
    }

    /// Load a fixture from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let document = fs::read_to_string(path)?;

        Self::from_yaml(&document)
    }

    /// Parse a fixture from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the document is malformed, names an
    /// unknown currency, or holds an unparseable price.
    pub fn from_yaml(document: &str) -> Result<Self, FixtureError> {
        let file: FixtureFile = serde_norway::from_str(document)?;

        let currency = iso::find(&file.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(file.currency.clone()))?;

        let config = PromotionConfig::try_from(file.config)?;

        let mut names = FxHashMap::default();
        let mut lines = Vec::with_capacity(file.lines.len());

        for line in file.lines {
            let price = parse_price(&line.price, currency)?;

            names.insert(line.product, line.name);
            lines.push(LineItem::new(line.product, price, line.quantity));
        }

        Ok(Fixture {
            currency,
            config,
            names,
            lines,
        })
    }

    /// Build a basket from the fixture lines, optionally limited to the
    /// first `n` lines.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the basket cannot be constructed.
    pub fn basket(&self, n: Option<usize>) -> Result<Basket<'static>, FixtureError> {
        let take = n.unwrap_or(self.lines.len());

        let lines: Vec<LineItem<'static>> = self.lines.iter().take(take).cloned().collect();

        Ok(Basket::with_lines(lines, self.currency)?)
    }

    /// The promotion configuration declared by the scenario.
    #[must_use]
    pub fn config(&self) -> &PromotionConfig {
        &self.config
    }

    /// Product display names keyed by product id.
    #[must_use]
    pub fn product_names(&self) -> &FxHashMap<ProductId, String> {
        &self.names
    }

    /// The scenario currency.
    #[must_use]
    pub fn currency(&self) -> &'static iso::Currency {
        self.currency
    }
}

/// Parse a decimal price string (e.g. `"2.20"`) into minor units of the
/// fixture currency.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal
/// amount or does not fit the minor-unit range.
fn parse_price(
    s: &str,
    currency: &'static iso::Currency,
) -> Result<Money<'static, iso::Currency>, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}
