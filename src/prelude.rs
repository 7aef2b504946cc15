//! Twofer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError},
    config::{ConfigError, DEFAULT_DISCOUNT_CODE, PromotionConfig},
    coupons::{CouponDescriptor, label, resolve},
    discounts::{DiscountError, allocate},
    eligibility::{PriceMultiset, eligible_unit_prices},
    engine::{Engine, PromotionAction, Recalculation, discount, reconcile},
    fixtures::{Fixture, FixtureError},
    items::LineItem,
    pricing::{TotalPriceError, total_price},
    products::ProductId,
    receipt::{Receipt, ReceiptError},
};
