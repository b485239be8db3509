use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Formats an amount the way the storefront shows prices, e.g. `$1,234.50`.
pub fn display_usd(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::USD).to_string()
}
