//! The sent-reminder ledger.
//!
//! One record per day: today's date plus the set of reminder tags
//! already fired. Stored as JSON in the kv table so it survives agent
//! restarts; a missing or corrupt record degrades to an empty one
//! rather than wedging evaluation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::storage::Database;

/// kv key the ledger is stored under.
pub const SENT_LEDGER_KEY: &str = "sent-notifications";

/// The set of reminders already fired on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentLedger {
    pub date: NaiveDate,
    #[serde(default)]
    pub exams: BTreeMap<String, bool>,
}

impl SentLedger {
    /// Fresh, empty ledger for a given day.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            exams: BTreeMap::new(),
        }
    }

    /// Whether a tag has already fired on this ledger's day.
    pub fn contains(&self, tag: &str) -> bool {
        self.exams.get(tag).copied().unwrap_or(false)
    }

    /// Mark a tag as fired.
    pub fn mark(&mut self, tag: &str) {
        self.exams.insert(tag.to_string(), true);
    }

    pub fn sent_count(&self) -> usize {
        self.exams.len()
    }
}

/// Loads and saves the ledger in the database kv store.
pub struct LedgerStore<'a> {
    db: &'a Database,
}

impl<'a> LedgerStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Load the stored ledger. Missing, unreadable, or corrupt records
    /// all yield a fresh ledger for `today`; the returned record may
    /// still carry an older date, which the evaluator resets.
    pub fn load(&self, today: NaiveDate) -> SentLedger {
        match self.db.kv_get(SENT_LEDGER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(ledger) => ledger,
                Err(e) => {
                    log::warn!("sent ledger is corrupt ({e}); starting fresh");
                    SentLedger::for_date(today)
                }
            },
            Ok(None) => SentLedger::for_date(today),
            Err(e) => {
                log::warn!("failed to read sent ledger ({e}); starting fresh");
                SentLedger::for_date(today)
            }
        }
    }

    /// Persist the ledger, replacing the previous day's record.
    pub fn save(&self, ledger: &SentLedger) -> Result<(), StoreError> {
        let raw = serde_json::to_string(ledger)
            .map_err(|e| StoreError::QueryFailed(format!("serialize ledger: {e}")))?;
        self.db.kv_set(SENT_LEDGER_KEY, &raw)?;
        Ok(())
    }

    /// Drop the stored ledger entirely.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.kv_delete(SENT_LEDGER_KEY)?;
        Ok(())
    }
}
