//! Test doubles for the ports.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ports::{Clock, StateStorage, StorageError};

/// In-memory storage that can be told to reject writes, globally or per key.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    docs: Arc<Mutex<HashMap<String, serde_json::Value>>>,
    fail_writes: Arc<AtomicBool>,
    failing_key: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Rejects writes to `key` only.
    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock() = Some(key.to_string());
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<serde_json::Value> {
        self.docs.lock().get(key).cloned()
    }
}

impl StateStorage for MockStorage {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(value) = self.docs.lock().get(key).cloned() else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let rejected = self.failing_key.lock().as_deref() == Some(key);
        if rejected || self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "disk full".to_string(),
            });
        }
        let value = serde_json::to_value(value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.docs.lock().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A clock that advances one second on every read.
#[derive(Debug, Default)]
pub struct StepClock {
    ticks: AtomicUsize,
}

impl StepClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Self::epoch() + Duration::seconds(i64::try_from(tick).unwrap_or(i64::MAX))
    }
}
