//! Shape-sniffing upgrade of persisted record collections.
//!
//! There is no version field in storage. A blob is classified by looking at
//! it:
//! - not JSON, not a list, or a list whose first element is not an object:
//!   corrupt
//! - a non-empty list whose first element has no `type` field: legacy,
//!   discarded wholesale
//! - otherwise every coupon gets its payout recomputed from its bets, with
//!   missing bet odds set to 1 and missing bet statuses filled in as pending
//!
//! After the upgrade each element is decoded on its own. Elements that still
//! do not decode are skipped; the rest of the collection is kept.

use serde_json::{Map, Value};
use tracing::warn;

use crate::model::{Record, RecordKind, Status};
use crate::odds;

/// Outcome of decoding the stored collection.
#[derive(Debug)]
pub enum Decoded {
    Records {
        records: Vec<Record>,
        /// Elements dropped because they did not decode.
        skipped: usize,
    },
    /// Pre-discriminator layout from the first release.
    Legacy,
    Corrupt(String),
}

pub fn decode_collection(raw: &str) -> Decoded {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return Decoded::Corrupt(format!("not valid JSON: {e}")),
    };
    let Value::Array(mut items) = value else {
        return Decoded::Corrupt("stored value is not a list".to_string());
    };

    if let Some(first) = items.first() {
        match first.as_object() {
            Some(obj) if !obj.contains_key("type") => return Decoded::Legacy,
            Some(_) => {}
            None => return Decoded::Corrupt("first element is not an object".to_string()),
        }
    }

    for item in &mut items {
        if let Err(reason) = upgrade_record(item) {
            return Decoded::Corrupt(reason);
        }
    }

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable stored record");
                skipped += 1;
            }
        }
    }
    Decoded::Records { records, skipped }
}

fn upgrade_record(item: &mut Value) -> Result<(), String> {
    let Some(obj) = item.as_object_mut() else {
        return Ok(());
    };
    if obj.get("type").and_then(Value::as_str) != Some(RecordKind::Combined.wire_tag()) {
        return Ok(());
    }
    upgrade_coupon(obj)
}

fn upgrade_coupon(obj: &mut Map<String, Value>) -> Result<(), String> {
    let Some(bets) = obj.get_mut("bets").and_then(Value::as_array_mut) else {
        return Err("coupon without a bet list".to_string());
    };

    let pending = serde_json::to_value(Status::Pending).map_err(|e| e.to_string())?;
    let mut leg_odds = Vec::with_capacity(bets.len());
    for bet in bets.iter_mut() {
        let Some(bet) = bet.as_object_mut() else {
            leg_odds.push(1.0);
            continue;
        };
        leg_odds.push(leg_odds_or_neutral(bet.get("odds")));
        if matches!(bet.get("odds"), None | Some(Value::Null)) {
            bet.insert("odds".to_string(), number(1.0)?);
        }
        if !is_truthy(bet.get("status")) {
            bet.insert("status".to_string(), pending.clone());
        }
    }

    let payout = odds::recompute(leg_odds);
    obj.insert("totalOdds".to_string(), number(payout.total_odds)?);
    obj.insert(
        "potentialWinnings".to_string(),
        number(payout.potential_winnings)?,
    );
    Ok(())
}

/// Missing or zero odds count as 1 in the product.
fn leg_odds_or_neutral(value: Option<&Value>) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(o) if o != 0.0 && !o.is_nan() => o,
        _ => 1.0,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

fn number(v: f64) -> Result<Value, String> {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| format!("payout {v} is not representable"))
}
