//! Credential record for one staff identity.
//!
//! The identity is keyed by lowercase email and owns the full password
//! lifecycle state: current hash, bounded history, pending reset token and
//! the forced-change flag. Plaintext never lands here; callers hash before
//! storing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many prior password hashes are retained per identity.
pub const PASSWORD_HISTORY_DEPTH: usize = 5;

/// How many of the most recent history entries the reuse check compares
/// against (in addition to the current hash).
pub const PASSWORD_REUSE_DEPTH: usize = 3;

/// Reset tokens are valid for one hour from issuance.
pub const RESET_TOKEN_TTL_SECONDS: i64 = 3600;

/// One rotated-out password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHistoryEntry {
    pub hash: String,
    pub changed_at: DateTime<Utc>,
}

/// Hashed-at-rest reset token state. Holding hash and expiry in one struct
/// keeps the "both set or both absent" invariant structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReset {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingReset {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Lowercase email, the identity key.
    pub email: String,
    pub password_hash: String,
    /// Rotated-out hashes, oldest first, capped at [`PASSWORD_HISTORY_DEPTH`].
    pub password_history: Vec<PasswordHistoryEntry>,
    pub force_password_change: bool,
    pub pending_reset: Option<PendingReset>,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            email: email.to_lowercase(),
            password_hash,
            password_history: Vec::new(),
            force_password_change: false,
            pending_reset: None,
            password_changed_at: now,
            created_at: now,
        }
    }

    /// Append a rotated-out hash, evicting the oldest entry beyond the cap.
    pub fn push_history(&mut self, hash: String, changed_at: DateTime<Utc>) {
        self.password_history.push(PasswordHistoryEntry { hash, changed_at });
        if self.password_history.len() > PASSWORD_HISTORY_DEPTH {
            let excess = self.password_history.len() - PASSWORD_HISTORY_DEPTH;
            self.password_history.drain(..excess);
        }
    }

    /// The hashes the reuse check runs against: the most recent
    /// [`PASSWORD_REUSE_DEPTH`] history entries, newest last.
    pub fn recent_history(&self) -> impl Iterator<Item = &str> {
        let skip = self.password_history.len().saturating_sub(PASSWORD_REUSE_DEPTH);
        self.password_history[skip..].iter().map(|e| e.hash.as_str())
    }

    /// Whether a token issued at `token_iat` (Unix seconds) predates the
    /// most recent password change and is therefore void.
    pub fn changed_password_after(&self, token_iat: i64) -> bool {
        token_iat < self.password_changed_at.timestamp()
    }
}
