//! Receipt

use std::io;

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    basket::Basket,
    codes,
    config::PromotionConfig,
    coupons,
    discounts::DiscountError,
    engine,
    pricing::{TotalPriceError, line_total},
    products::ProductId,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating total price from basket lines.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Error valuing the applied promotion.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Checkout summary for a basket after a recalculation pass.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    promotion_label: Option<String>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a basket and the promotion configuration.
    ///
    /// The promotion line appears only when the basket actually carries the
    /// virtual code; its value is recomputed from the same pairing math the
    /// engine used to apply it.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the subtotal or discount cannot be
    /// calculated.
    pub fn from_basket(
        basket: &'a Basket<'a>,
        config: &PromotionConfig,
    ) -> Result<Self, ReceiptError> {
        let subtotal = basket.subtotal()?;

        let applied_code = basket
            .applied_codes()
            .find(|code| codes::matches(code, config.discount_code()));

        let Some(code) = applied_code else {
            return Ok(Receipt {
                subtotal,
                discount: Money::from_minor(0, basket.currency()),
                total: subtotal,
                promotion_label: None,
            });
        };

        let discount = engine::discount(basket, config)?;
        let total = subtotal.sub(discount)?;

        Ok(Receipt {
            subtotal,
            discount,
            total,
            promotion_label: coupons::label(code, config),
        })
    }

    /// Total cost before the promotion.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount taken by the promotion; zero when none is applied.
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable after the promotion.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Label of the applied promotion, if any.
    #[must_use]
    pub fn promotion_label(&self) -> Option<&str> {
        self.promotion_label.as_deref()
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line total cannot be calculated or
    /// the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        basket: &Basket<'_>,
        product_names: &FxHashMap<ProductId, String>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Line Total"]);

        for (line_idx, line) in basket.iter().enumerate() {
            let name = product_names
                .get(&line.product())
                .map_or("<unknown>", String::as_str);

            builder.push_record([
                format!("#{:<3}", line_idx + 1),
                name.to_string(),
                line.quantity().to_string(),
                format!("{}", line.unit_price()),
                format!("{}", line_total(line)?),
            ]);
        }

        if let Some(label) = self.promotion_label() {
            builder.push_record([
                String::new(),
                label.to_string(),
                String::new(),
                String::new(),
                format!("-{}", self.discount),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        writeln!(out, " Subtotal: {}", self.subtotal).map_err(|_err| ReceiptError::IO)?;

        if self.promotion_label().is_some() {
            writeln!(out, " Promotion: -{}", self.discount).map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out, " Total: {}", self.total).map_err(|_err| ReceiptError::IO)?;

        Ok(())
    }
}
