use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token not found")]
    NotFound,
    #[error("token expired")]
    Expired,
}

struct Entry {
    payload: Value,
    expires_at: DateTime<Utc>,
}

/// Short-lived, in-process store for export payloads. Tokens are single
/// values, not sessions: reads do not extend the lifetime.
pub struct TokenStore {
    ttl: chrono::Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl TokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52)),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `payload` and returns its token (32 lowercase hex chars).
    pub fn put(&self, payload: Value) -> String {
        self.put_at(payload, Utc::now())
    }

    pub fn get(&self, token: &str) -> Result<Value, TokenError> {
        self.get_at(token, Utc::now())
    }

    fn put_at(&self, payload: Value, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.expires_at >= now);
        entries.insert(
            token.clone(),
            Entry {
                payload,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Result<Value, TokenError> {
        let mut entries = self.lock();
        let entry = entries.get(token).ok_or(TokenError::NotFound)?;
        if now > entry.expires_at {
            entries.remove(token);
            return Err(TokenError::Expired);
        }
        Ok(entry.payload.clone())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    // A panic while holding the lock cannot leave an entry half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
