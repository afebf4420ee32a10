//! Durable record collection on top of a [`KeyValueStorage`].
//!
//! The whole collection lives in one JSON blob under [`RECORDS_KEY`],
//! newest record first. Every save rewrites the blob.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::migrate::{decode_collection, Decoded};
use crate::model::Record;
use crate::storage::KeyValueStorage;

pub const RECORDS_KEY: &str = "predictions";
pub const SESSION_KEY: &str = "user";

pub struct RecordStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the collection, upgrading older shapes.
    ///
    /// A corrupt or legacy blob is removed and an empty collection returned.
    /// Only backend failures are errors.
    pub fn load(&mut self) -> Result<Vec<Record>> {
        let Some(raw) = self
            .storage
            .get(RECORDS_KEY)
            .context("reading stored predictions")?
        else {
            debug!("no stored predictions");
            return Ok(Vec::new());
        };

        match decode_collection(&raw) {
            Decoded::Records { records, skipped } => {
                debug!(count = records.len(), skipped, "loaded predictions");
                Ok(records)
            }
            Decoded::Legacy => {
                warn!("discarding predictions stored in the legacy layout");
                self.discard()?;
                Ok(Vec::new())
            }
            Decoded::Corrupt(reason) => {
                warn!(%reason, "discarding unreadable predictions");
                self.discard()?;
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the stored collection with `records`.
    pub fn save(&mut self, records: &[Record]) -> Result<()> {
        let blob = serde_json::to_string(records).context("serializing predictions")?;
        self.storage
            .set(RECORDS_KEY, &blob)
            .context("writing predictions")?;
        debug!(count = records.len(), bytes = blob.len(), "saved predictions");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn discard(&mut self) -> Result<()> {
        self.storage
            .remove(RECORDS_KEY)
            .context("clearing stored predictions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{create_combined, create_live};
    use crate::model::{BetInput, Status};
    use crate::storage::MemoryStorage;
    use crate::validate::LiveFields;

    fn sample_records() -> Vec<Record> {
        let live = create_live(LiveFields {
            league: "Süper Lig".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            prediction: "MS 1".to_string(),
            minute: "24".to_string(),
        });
        let mut coupon = create_combined(
            "Günün kuponu".to_string(),
            vec![
                BetInput {
                    league: "L".to_string(),
                    home_team: "X".to_string(),
                    away_team: "Y".to_string(),
                    prediction: "1".to_string(),
                    odds: 1.37,
                },
                BetInput {
                    league: "L".to_string(),
                    home_team: "Z".to_string(),
                    away_team: "W".to_string(),
                    prediction: "2".to_string(),
                    odds: 2.15,
                },
            ],
        );
        coupon.bets[1].status = Status::Won;
        vec![Record::Combined(coupon), Record::Live(live)]
    }

    #[test]
    fn missing_key_loads_empty() {
        let mut store = RecordStore::new(MemoryStorage::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let records = sample_records();
        let mut store = RecordStore::new(MemoryStorage::new());
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn corrupt_blob_is_cleared() {
        let storage = MemoryStorage::new().with_entry(RECORDS_KEY, "[{oops");
        let mut store = RecordStore::new(storage);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.storage().contains(RECORDS_KEY));
    }

    #[test]
    fn legacy_blob_is_cleared() {
        let legacy = r#"[{"id":"1","homeTeam":"A","awayTeam":"B","prediction":"MS 1","minute":"12"}]"#;
        let storage = MemoryStorage::new().with_entry(RECORDS_KEY, legacy);
        let mut store = RecordStore::new(storage);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.storage().contains(RECORDS_KEY));
    }

    #[test]
    fn readable_records_survive_an_unreadable_neighbour() {
        let records = sample_records();
        let mut items: Vec<serde_json::Value> =
            serde_json::from_value(serde_json::to_value(&records).unwrap()).unwrap();
        items.push(serde_json::json!({"id": "stray"}));
        let blob = serde_json::to_string(&items).unwrap();

        let mut store = RecordStore::new(MemoryStorage::new().with_entry(RECORDS_KEY, &blob));
        assert_eq!(store.load().unwrap(), records);
        assert!(store.storage().contains(RECORDS_KEY));
    }

    #[test]
    fn session_key_survives_a_discarded_collection() {
        let storage = MemoryStorage::new()
            .with_entry(RECORDS_KEY, "nope")
            .with_entry(SESSION_KEY, r#"{"email":"a@b.c","role":"user"}"#);
        let mut store = RecordStore::new(storage);
        store.load().unwrap();
        assert!(store.storage().contains(SESSION_KEY));
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let mut store = RecordStore::new(MemoryStorage::new());
        store.save(&sample_records()).unwrap();
        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(
            store.storage().get(RECORDS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }
}
