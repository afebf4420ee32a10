//! Construction of new records.
//!
//! The factory trusts its input; callers run the `validate` checks first.

use crate::model::{BetInput, CombinedCoupon, LivePrediction, Status};
use crate::validate::LiveFields;

/// Fresh, globally unique record id.
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn create_live(fields: LiveFields) -> LivePrediction {
    LivePrediction {
        id: fresh_id(),
        status: Status::Pending,
        timestamp: now_millis(),
        league: fields.league,
        home_team: fields.home_team,
        away_team: fields.away_team,
        prediction: fields.prediction,
        minute: fields.minute,
    }
}

/// Build a coupon with every bet pending and the payout computed.
pub fn create_combined(title: String, bets: Vec<BetInput>) -> CombinedCoupon {
    let mut coupon = CombinedCoupon {
        id: fresh_id(),
        status: Status::Pending,
        timestamp: now_millis(),
        title,
        bets: bets
            .into_iter()
            .map(|b| b.with_status(Status::Pending))
            .collect(),
        total_odds: 1.0,
        potential_winnings: 0.0,
    };
    coupon.refresh_payout();
    coupon
}
