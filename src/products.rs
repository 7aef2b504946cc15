//! Products

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::Deserialize;

/// Numeric product identifier, assigned by the catalogue that owns the
/// products; the engine only ever compares these against the exclusion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a new product identifier.
    #[must_use]
    pub fn new(id: u64) -> Self {
        ProductId(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ProductId)
    }
}
