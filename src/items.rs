//! Line Items

use rusty_money::{Money, iso::Currency};

use crate::products::ProductId;

/// One basket line: a product at a unit price, in some quantity.
///
/// Quantities above one are expanded into individual units wherever the
/// engine reasons about eligibility; a quantity of zero is permitted and
/// simply contributes no units.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductId,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item.
    #[must_use]
    pub fn new(product: ProductId, unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        LineItem {
            product,
            unit_price,
            quantity,
        }
    }

    /// Returns the product on this line.
    #[must_use]
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Returns the price of a single unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the number of units on this line.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn accessors_return_constructor_values() {
        let line = LineItem::new(ProductId::new(1001), Money::from_minor(220, GBP), 3);

        assert_eq!(line.product(), ProductId::new(1001));
        assert_eq!(line.unit_price(), &Money::from_minor(220, GBP));
        assert_eq!(line.quantity(), 3);
    }
}
