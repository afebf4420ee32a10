//! In-place changes to a record collection.
//!
//! Every mutator returns `true` when something changed. An unknown id, an
//! out-of-range bet index or a record of the wrong kind leaves the
//! collection untouched and returns `false`.

use crate::model::{Bet, BetInput, CombinedCoupon, LivePrediction, Record, Status};
use crate::validate::LiveFields;

/// Replace the status of the record with `id`. Nested bet statuses are left alone.
pub fn set_status(records: &mut [Record], id: &str, status: Status) -> bool {
    match records.iter_mut().find(|r| r.id() == id) {
        Some(record) => {
            record.set_status(status);
            true
        }
        None => false,
    }
}

/// Replace the status of the bet at `bet_index` within coupon `coupon_id`.
///
/// The coupon's own status and payout are not touched.
pub fn set_bet_status(
    records: &mut [Record],
    coupon_id: &str,
    bet_index: usize,
    status: Status,
) -> bool {
    let Some(Record::Combined(coupon)) = records.iter_mut().find(|r| r.id() == coupon_id) else {
        return false;
    };
    match coupon.bets.get_mut(bet_index) {
        Some(bet) => {
            bet.status = status;
            true
        }
        None => false,
    }
}

pub fn remove(records: &mut Vec<Record>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() != before
}

/// Swap in `updated` at the position of the record sharing its id.
pub fn replace_edited(records: &mut [Record], updated: Record) -> bool {
    match records.iter_mut().find(|r| r.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Attach statuses to resubmitted bets.
///
/// A resubmitted bet inherits the status of the first original bet with the
/// same home team, away team and prediction; anything else starts pending.
/// Odds and league are taken from the resubmission.
pub fn merge_bet_statuses(original: &[Bet], resubmitted: Vec<BetInput>) -> Vec<Bet> {
    resubmitted
        .into_iter()
        .map(|input| {
            let status = original
                .iter()
                .find(|old| old.same_pick(&input))
                .map(|old| old.status)
                .unwrap_or_default();
            input.with_status(status)
        })
        .collect()
}

/// Produce the edited form of a coupon. Id, status and timestamp carry over.
pub fn edit_coupon(coupon: &CombinedCoupon, title: String, bets: Vec<BetInput>) -> CombinedCoupon {
    let mut edited = CombinedCoupon {
        title,
        bets: merge_bet_statuses(&coupon.bets, bets),
        ..coupon.clone()
    };
    edited.refresh_payout();
    edited
}

/// Produce the edited form of a live prediction. Id, status and timestamp carry over.
pub fn edit_live(prediction: &LivePrediction, fields: LiveFields) -> LivePrediction {
    LivePrediction {
        league: fields.league,
        home_team: fields.home_team,
        away_team: fields.away_team,
        prediction: fields.prediction,
        minute: fields.minute,
        ..prediction.clone()
    }
}
