//! Coupons
//!
//! The boundary the basket subsystem consults when a promotional code is not
//! one it knows about. The engine answers only for its own virtual code and
//! passes through everything else, so a legitimately-named customer coupon
//! is never shadowed.

use rusty_money::{Money, iso::Currency};

use crate::{
    basket::Basket,
    codes,
    config::PromotionConfig,
    discounts::DiscountError,
    engine::discount,
};

/// Description attached to the virtual coupon.
pub const AUTOMATIC_DESCRIPTION: &str = "Automatic BOGOF Promotion";

/// A virtual coupon descriptor handed back to the basket subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponDescriptor<'a> {
    /// The configured virtual code.
    pub code: String,

    /// Human-readable description of the promotion.
    pub description: String,

    /// Discount value the coupon carries for the current basket.
    pub amount: Money<'a, Currency>,
}

/// Resolves a promotional code against the configured virtual code.
///
/// Returns `Some` descriptor only when the code matches (normalised) and the
/// promotion is active; in every other case `None` defers to whatever real
/// coupon resolver the basket subsystem runs next.
///
/// # Errors
///
/// Returns a [`DiscountError`] if allocation fails while valuing the coupon.
pub fn resolve<'a>(
    code: &str,
    basket: &Basket<'a>,
    config: &PromotionConfig,
) -> Result<Option<CouponDescriptor<'a>>, DiscountError> {
    if !config.active() || !codes::matches(code, config.discount_code()) {
        return Ok(None);
    }

    let amount = discount(basket, config)?;

    Ok(Some(CouponDescriptor {
        code: config.discount_code().to_string(),
        description: AUTOMATIC_DESCRIPTION.to_string(),
        amount,
    }))
}

/// Formats the distinguishing label for the automatic promotion.
///
/// Returns `None` for non-matching codes so the caller falls back to its
/// default coupon labelling.
#[must_use]
pub fn label(code: &str, config: &PromotionConfig) -> Option<String> {
    if codes::matches(code, config.discount_code()) {
        Some(format!("Automatic Promotion: {}", code.trim().to_uppercase()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{items::LineItem, products::ProductId};

    use super::*;

    fn qualifying_basket<'a>() -> Result<Basket<'a>, crate::basket::BasketError> {
        Basket::with_lines(
            [
                LineItem::new(ProductId::new(1), Money::from_minor(1000, GBP), 1),
                LineItem::new(ProductId::new(2), Money::from_minor(400, GBP), 1),
            ],
            GBP,
        )
    }

    #[test]
    fn resolves_the_configured_code_when_active() -> TestResult {
        let basket = qualifying_basket()?;
        let config = PromotionConfig::new(true, 0, "", "BOGOF")?;

        let descriptor = resolve(" bogof ", &basket, &config)?.ok_or("expected a descriptor")?;

        assert_eq!(descriptor.code, "BOGOF");
        assert_eq!(descriptor.description, AUTOMATIC_DESCRIPTION);
        assert_eq!(descriptor.amount, Money::from_minor(400, GBP));

        Ok(())
    }

    #[test]
    fn passes_through_unrecognised_codes() -> TestResult {
        let basket = qualifying_basket()?;
        let config = PromotionConfig::new(true, 0, "", "BOGOF")?;

        assert_eq!(resolve("SUMMER10", &basket, &config)?, None);

        Ok(())
    }

    #[test]
    fn passes_through_while_inactive() -> TestResult {
        let basket = qualifying_basket()?;
        let config = PromotionConfig::new(false, 0, "", "BOGOF")?;

        assert_eq!(resolve("BOGOF", &basket, &config)?, None);

        Ok(())
    }

    #[test]
    fn labels_the_matching_code() -> TestResult {
        let config = PromotionConfig::new(true, 0, "", "twofer")?;

        assert_eq!(
            label(" twofer ", &config).as_deref(),
            Some("Automatic Promotion: TWOFER")
        );

        Ok(())
    }

    #[test]
    fn defers_labelling_for_other_codes() -> TestResult {
        let config = PromotionConfig::new(true, 0, "", "BOGOF")?;

        assert_eq!(label("SUMMER10", &config), None);

        Ok(())
    }
}
