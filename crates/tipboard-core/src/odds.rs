//! Coupon payout math and odds parsing.

use anyhow::{Context, Result};

/// Notional stake used for the potential winnings figure.
pub const STAKE: f64 = 100.0;

/// Derived coupon figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payout {
    pub total_odds: f64,
    pub potential_winnings: f64,
}

/// Combine a sequence of decimal odds into a coupon payout.
///
/// The product of an empty sequence is 1.
pub fn recompute<I>(odds: I) -> Payout
where
    I: IntoIterator<Item = f64>,
{
    let total_odds = odds.into_iter().product::<f64>();
    Payout {
        total_odds,
        potential_winnings: total_odds * STAKE,
    }
}

/// Parse odds as typed by a user.
///
/// Accepts a comma decimal separator ("1,85"). The value must be a finite
/// number strictly greater than 1.0.
pub fn parse_odds(text: &str) -> Result<f64> {
    let normalized = text.trim().replacen(',', ".", 1);
    let value: f64 = normalized
        .parse()
        .with_context(|| format!("invalid odds '{}': not a number", text.trim()))?;
    anyhow::ensure!(
        value.is_finite() && value > 1.0,
        "invalid odds '{}': must be greater than 1",
        text.trim()
    );
    Ok(value)
}
