//! Checkout Demo
//!
//! Loads a fixture scenario, runs one promotion recalculation pass over the
//! basket and prints the resulting receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of basket lines taken from the fixture

use std::io;

use anyhow::Result;

use clap::Parser;
use twofer::{coupons, engine::Engine, fixtures::Fixture, receipt::Receipt, utils::DemoBasketArgs};

/// Checkout Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoBasketArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let config = fixture.config();

    let mut basket = fixture.basket(args.n)?;

    let engine = Engine::new();
    engine.recalculate(&mut basket, config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_basket(&basket, config)?.write_to(
        &mut handle,
        &basket,
        fixture.product_names(),
    )?;

    for code in basket.applied_codes() {
        if let Some(descriptor) = coupons::resolve(code, &basket, config)? {
            println!("\nApplied: {} ({})", descriptor.code, descriptor.description);
        }
    }

    Ok(())
}
