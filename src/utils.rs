//! Utils

use clap::Parser;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct DemoBasketArgs {
    /// Fixture set to use for the basket & promotion configuration
    #[clap(short, long, default_value = "weekend")]
    pub fixture: String,

    /// Number of basket lines to include from the fixture
    #[clap(short, long)]
    pub n: Option<usize>,
}
