//! Eligibility
//!
//! Builds the multiset of discount-eligible unit prices from a basket. A
//! line with quantity above one is expanded into one entry per unit, so a
//! shopper buying two of the same thing still qualifies.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{basket::Basket, config::PromotionConfig};

/// An ordered multiset of eligible unit prices.
///
/// Derived and ephemeral: it exists for one recalculation pass and is never
/// persisted. The basket currency is carried so that an empty multiset still
/// yields a well-typed zero downstream.
#[derive(Debug)]
pub struct PriceMultiset<'a> {
    prices: SmallVec<[Money<'a, Currency>; 10]>,
    currency: &'static Currency,
}

impl<'a> PriceMultiset<'a> {
    /// Create an empty multiset in the given currency.
    #[must_use]
    pub fn empty(currency: &'static Currency) -> Self {
        PriceMultiset {
            prices: SmallVec::new(),
            currency,
        }
    }

    /// Iterate over the unit prices, in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = &Money<'a, Currency>> {
        self.prices.iter()
    }

    /// Get the number of eligible units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if no units are eligible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Get the currency of the multiset.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Extracts the eligible unit prices from a basket.
///
/// Pure function of its inputs. With fewer than two units in the basket no
/// discount is possible regardless of exclusions, so the extractor
/// short-circuits to an empty multiset. Otherwise lines are visited in basket
/// order; excluded products are skipped and each remaining line contributes
/// `quantity` copies of its unit price.
#[must_use]
pub fn eligible_unit_prices<'a>(
    basket: &Basket<'a>,
    config: &PromotionConfig,
) -> PriceMultiset<'a> {
    let mut multiset = PriceMultiset::empty(basket.currency());

    if basket.unit_count() < 2 {
        return multiset;
    }

    for line in basket.iter() {
        if config.is_excluded(line.product()) {
            continue;
        }

        for _ in 0..line.quantity() {
            multiset.prices.push(*line.unit_price());
        }
    }

    multiset
}
