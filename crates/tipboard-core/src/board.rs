//! The board a front end talks to.
//!
//! `Board` owns the loaded collection and the current session. Every
//! successful change is followed by a full save, and publishing or changing
//! records requires the admin role.

use anyhow::Result;
use tracing::{debug, info};

use crate::auth::{self, Session};
use crate::config::BoardConfig;
use crate::factory;
use crate::model::{Record, Status};
use crate::mutate;
use crate::storage::KeyValueStorage;
use crate::store::RecordStore;
use crate::validate::{CouponDraft, LiveFields};
use crate::view::{self, View, ViewState};

pub struct Board<S> {
    store: RecordStore<S>,
    records: Vec<Record>,
    session: Option<Session>,
    admin_emails: Vec<String>,
}

impl<S: KeyValueStorage> Board<S> {
    /// Load records and session from `storage`.
    pub fn open(storage: S, config: &BoardConfig) -> Result<Self> {
        let mut store = RecordStore::new(storage);
        let records = store.load()?;
        let session = store.load_session()?;
        Ok(Self {
            store,
            records,
            session,
            admin_emails: config.admin_emails.clone(),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn view(&self, state: &ViewState) -> View<'_> {
        view::view(&self.records, state)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        auth::is_admin(self.session.as_ref())
    }

    pub fn login(&mut self, email: &str) -> Result<&Session> {
        anyhow::ensure!(!email.trim().is_empty(), "email must not be blank");
        let session = auth::login(email.trim(), &self.admin_emails);
        self.store.save_session(&session)?;
        Ok(self.session.insert(session))
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_session()?;
        if let Some(session) = self.session.take() {
            info!(email = %session.email, "signed out");
        }
        Ok(())
    }

    /// Publish a live prediction at the top of the board. Returns its id.
    pub fn publish_live(&mut self, fields: LiveFields) -> Result<String> {
        self.require_admin()?;
        fields.validate()?;
        let prediction = factory::create_live(fields);
        let id = prediction.id.clone();
        let mut next = self.records.clone();
        next.insert(0, Record::Live(prediction));
        self.commit(next)?;
        info!(%id, "published live prediction");
        Ok(id)
    }

    /// Publish a combined coupon at the top of the board. Returns its id.
    pub fn publish_coupon(&mut self, draft: CouponDraft) -> Result<String> {
        self.require_admin()?;
        draft.validate()?;
        let coupon = factory::create_combined(draft.title, draft.bets);
        let id = coupon.id.clone();
        let (bets, total_odds) = (coupon.bets.len(), coupon.total_odds);
        let mut next = self.records.clone();
        next.insert(0, Record::Combined(coupon));
        self.commit(next)?;
        info!(%id, bets, total_odds, "published coupon");
        Ok(id)
    }

    /// Settle or revert a record. Returns `false` for an unknown id.
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<bool> {
        self.require_admin()?;
        let Some(current) = self.find(id).map(Record::status) else {
            debug!(%id, "status change for unknown record ignored");
            return Ok(false);
        };
        check_transition(current, status)?;
        let mut next = self.records.clone();
        let changed = mutate::set_status(&mut next, id, status);
        self.commit(next)?;
        info!(%id, from = %current, to = %status, "record status changed");
        Ok(changed)
    }

    /// Settle or revert one bet of a coupon.
    ///
    /// Returns `false` when `coupon_id` is not a coupon or `bet_index` is out
    /// of range. Bets can only change while their coupon is pending.
    pub fn set_bet_status(&mut self, coupon_id: &str, bet_index: usize, status: Status) -> Result<bool> {
        self.require_admin()?;
        let Some(Record::Combined(coupon)) = self.find(coupon_id) else {
            debug!(%coupon_id, "bet status change for unknown coupon ignored");
            return Ok(false);
        };
        anyhow::ensure!(
            coupon.status == Status::Pending,
            "coupon is already {}; revert it to pending before changing its bets",
            coupon.status
        );
        let Some(current) = coupon.bets.get(bet_index).map(|b| b.status) else {
            debug!(%coupon_id, bet_index, "bet status change for unknown bet ignored");
            return Ok(false);
        };
        check_transition(current, status)?;
        let mut next = self.records.clone();
        let changed = mutate::set_bet_status(&mut next, coupon_id, bet_index, status);
        self.commit(next)?;
        info!(%coupon_id, bet_index, from = %current, to = %status, "bet status changed");
        Ok(changed)
    }

    pub fn edit_live(&mut self, id: &str, fields: LiveFields) -> Result<bool> {
        self.require_admin()?;
        fields.validate()?;
        let Some(Record::Live(original)) = self.find(id) else {
            return Ok(false);
        };
        let edited = mutate::edit_live(original, fields);
        let mut next = self.records.clone();
        let changed = mutate::replace_edited(&mut next, Record::Live(edited));
        self.commit(next)?;
        info!(%id, "live prediction edited");
        Ok(changed)
    }

    /// Replace a coupon's title and bets. Bets that keep their pick keep their status.
    pub fn edit_coupon(&mut self, id: &str, draft: CouponDraft) -> Result<bool> {
        self.require_admin()?;
        draft.validate()?;
        let Some(Record::Combined(original)) = self.find(id) else {
            return Ok(false);
        };
        let edited = mutate::edit_coupon(original, draft.title, draft.bets);
        let total_odds = edited.total_odds;
        let mut next = self.records.clone();
        let changed = mutate::replace_edited(&mut next, Record::Combined(edited));
        self.commit(next)?;
        info!(%id, total_odds, "coupon edited");
        Ok(changed)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        self.require_admin()?;
        let mut next = self.records.clone();
        let removed = mutate::remove(&mut next, id);
        if removed {
            self.commit(next)?;
            info!(%id, "record deleted");
        }
        Ok(removed)
    }

    pub fn into_storage(self) -> S {
        self.store.into_inner()
    }

    fn require_admin(&self) -> Result<()> {
        anyhow::ensure!(self.is_admin(), "admin role required");
        Ok(())
    }

    /// Save `next` and adopt it. On a failed save the board keeps its
    /// previous records.
    fn commit(&mut self, next: Vec<Record>) -> Result<()> {
        self.store.save(&next)?;
        self.records = next;
        Ok(())
    }
}

fn check_transition(from: Status, to: Status) -> Result<()> {
    anyhow::ensure!(
        from.can_transition_to(to),
        "cannot change status from {from} to {to}"
    );
    Ok(())
}
