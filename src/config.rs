//! Promotion Configuration
//!
//! The admin-owned settings record consumed read-only by the engine. A fresh
//! value is expected per recalculation pass; nothing here is cached.

use std::{fs, io, path::Path};

use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

use crate::products::ProductId;

/// Code shown to shoppers when the admin leaves the code field empty.
pub const DEFAULT_DISCOUNT_CODE: &str = "BOGOF";

/// Errors raised while reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A negative percent reached the configuration layer; the upstream
    /// write path is broken and the value must not be silently zeroed.
    #[error("negative percent discount {0}; the settings store is corrupt")]
    NegativePercent(i64),

    /// IO error reading a configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error.
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Raw configuration record as persisted by the admin settings store.
///
/// Every field is optional; [`PromotionConfig`] supplies the fail-safe
/// defaults during conversion.
#[derive(Debug, Default, Deserialize)]
pub struct RawPromotionConfig {
    /// Promotion enabled flag.
    #[serde(default)]
    pub active: Option<bool>,

    /// Percent discount, 0 meaning "cheapest of each pair free".
    #[serde(default)]
    pub percent_discount: Option<i64>,

    /// Comma-separated product ids excluded from the offer.
    #[serde(default)]
    pub excluded_products: Option<String>,

    /// Virtual code representing the automatic promotion.
    #[serde(default)]
    pub discount_code: Option<String>,
}

/// Validated promotion configuration.
#[derive(Debug, Clone)]
pub struct PromotionConfig {
    active: bool,
    percent_discount: u8,
    excluded_products: FxHashSet<ProductId>,
    discount_code: String,
}

impl Default for PromotionConfig {
    /// The fail-safe default: promotion inactive, nothing excluded.
    fn default() -> Self {
        PromotionConfig {
            active: false,
            percent_discount: 0,
            excluded_products: FxHashSet::default(),
            discount_code: DEFAULT_DISCOUNT_CODE.to_string(),
        }
    }
}

impl PromotionConfig {
    /// Creates a validated configuration from raw admin inputs.
    ///
    /// Percent values above 100 clamp to 100. Malformed entries in the
    /// exclusion list are skipped. An empty code falls back to
    /// [`DEFAULT_DISCOUNT_CODE`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NegativePercent`] for a negative percent; that
    /// signals a corrupt settings store rather than a zero discount.
    pub fn new(
        active: bool,
        percent_discount: i64,
        excluded_products: &str,
        discount_code: &str,
    ) -> Result<Self, ConfigError> {
        if percent_discount < 0 {
            return Err(ConfigError::NegativePercent(percent_discount));
        }

        let percent_discount = u8::try_from(percent_discount.min(100))
            .unwrap_or(100);

        let discount_code = if discount_code.trim().is_empty() {
            DEFAULT_DISCOUNT_CODE.to_string()
        } else {
            discount_code.to_string()
        };

        Ok(PromotionConfig {
            active,
            percent_discount,
            excluded_products: parse_excluded_products(excluded_products),
            discount_code,
        })
    }

    /// Parses a configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document cannot be parsed or holds a
    /// negative percent.
    pub fn from_yaml(document: &str) -> Result<Self, ConfigError> {
        let raw: RawPromotionConfig = serde_norway::from_str(document)?;

        raw.try_into()
    }

    /// Loads a configuration file, treating a missing file as "no
    /// configuration record exists": the inactive default, not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unreadable or malformed files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(document) => Self::from_yaml(&document),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Returns whether the promotion is enabled.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Returns the percent discount; 0 means the cheapest unit of each pair
    /// is fully free.
    #[must_use]
    pub fn percent_discount(&self) -> u8 {
        self.percent_discount
    }

    /// Returns whether units of this product are barred from the offer.
    #[must_use]
    pub fn is_excluded(&self, product: ProductId) -> bool {
        self.excluded_products.contains(&product)
    }

    /// Returns the number of excluded products.
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.excluded_products.len()
    }

    /// Returns the virtual code used to represent the promotion.
    #[must_use]
    pub fn discount_code(&self) -> &str {
        &self.discount_code
    }
}

impl TryFrom<RawPromotionConfig> for PromotionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawPromotionConfig) -> Result<Self, Self::Error> {
        PromotionConfig::new(
            raw.active.unwrap_or(false),
            raw.percent_discount.unwrap_or(0),
            raw.excluded_products.as_deref().unwrap_or(""),
            raw.discount_code.as_deref().unwrap_or(""),
        )
    }
}

/// Parses the admin's comma-separated exclusion list.
///
/// The list arrives hand-typed; empty, whitespace-only and non-numeric
/// entries are skipped so a trailing comma never disables the offer.
fn parse_excluded_products(list: &str) -> FxHashSet<ProductId> {
    list.split(',')
        .filter_map(|entry| entry.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn clamps_percent_above_one_hundred() -> TestResult {
        let config = PromotionConfig::new(true, 250, "", "BOGOF")?;

        assert_eq!(config.percent_discount(), 100);

        Ok(())
    }

    #[test]
    fn rejects_negative_percent() {
        let result = PromotionConfig::new(true, -10, "", "BOGOF");

        assert!(matches!(result, Err(ConfigError::NegativePercent(-10))));
    }

    #[test]
    fn skips_malformed_exclusion_entries() -> TestResult {
        let config = PromotionConfig::new(true, 0, " 12, ,abc, 34,,56 ,", "BOGOF")?;

        assert_eq!(config.excluded_count(), 3);
        assert!(config.is_excluded(ProductId::new(12)));
        assert!(config.is_excluded(ProductId::new(34)));
        assert!(config.is_excluded(ProductId::new(56)));
        assert!(!config.is_excluded(ProductId::new(0)));

        Ok(())
    }

    #[test]
    fn empty_code_falls_back_to_default() -> TestResult {
        let config = PromotionConfig::new(true, 0, "", "   ")?;

        assert_eq!(config.discount_code(), DEFAULT_DISCOUNT_CODE);

        Ok(())
    }

    #[test]
    fn default_is_inactive() {
        let config = PromotionConfig::default();

        assert!(!config.active());
        assert_eq!(config.percent_discount(), 0);
        assert_eq!(config.excluded_count(), 0);
        assert_eq!(config.discount_code(), DEFAULT_DISCOUNT_CODE);
    }

    #[test]
    fn parses_yaml_document() -> TestResult {
        let config = PromotionConfig::from_yaml(
            "active: true\npercent_discount: 50\nexcluded_products: \"7, 8\"\ndiscount_code: TWOFER\n",
        )?;

        assert!(config.active());
        assert_eq!(config.percent_discount(), 50);
        assert!(config.is_excluded(ProductId::new(7)));
        assert_eq!(config.discount_code(), "TWOFER");

        Ok(())
    }

    #[test]
    fn yaml_defaults_missing_fields() -> TestResult {
        let config = PromotionConfig::from_yaml("active: true\n")?;

        assert!(config.active());
        assert_eq!(config.percent_discount(), 0);
        assert_eq!(config.discount_code(), DEFAULT_DISCOUNT_CODE);

        Ok(())
    }

    #[test]
    fn load_missing_file_is_inactive_default() -> TestResult {
        let dir = tempfile::tempdir()?;

        let config = PromotionConfig::load(dir.path().join("absent.yaml"))?;

        assert!(!config.active());

        Ok(())
    }

    #[test]
    fn load_reads_file_from_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("promotion.yaml");

        let mut file = fs::File::create(&path)?;
        writeln!(file, "active: true")?;
        writeln!(file, "percent_discount: 25")?;

        let config = PromotionConfig::load(&path)?;

        assert!(config.active());
        assert_eq!(config.percent_discount(), 25);

        Ok(())
    }
}
