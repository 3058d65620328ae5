//! Credential lifecycle: the only module that writes password hashes.
//!
//! Argon2 work is deliberately expensive, so verification and hashing run
//! on the blocking pool against a snapshot of the identity, never under a
//! store lock. The commit then happens under the entry lock and re-checks
//! that the hash it verified against is still the stored one; a concurrent
//! rotation makes the loser fail rather than clobber the winner.

use chrono::Duration;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::models::{Identity, PendingReset, RESET_TOKEN_TTL_SECONDS};
use crate::services::policy::PasswordPolicy;
use crate::services::store::{now, CredentialStore};
use crate::services::ServiceError;
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

/// Outcome of the off-thread checks: the hash the checks ran against and
/// the freshly computed replacement.
struct PreparedRotation {
    observed_hash: String,
    new_hash: String,
}

pub struct CredentialService {
    store: CredentialStore,
}

impl CredentialService {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn exists(&self, email: &str) -> bool {
        self.store.contains(email)
    }

    pub fn find(&self, email: &str) -> Option<Identity> {
        self.store.find(email)
    }

    /// Create a credential for a new staff member. The initial password
    /// must already satisfy policy; `force_change` marks it as provisional.
    pub async fn create(
        &self,
        email: &str,
        password: &Password,
        force_change: bool,
    ) -> Result<(), ServiceError> {
        PasswordPolicy::check(password.as_str())?;
        let password = password.clone();
        let hash = run_blocking(move || hash_password(&password)).await??;
        let mut identity = Identity::new(email, hash.into_string());
        identity.force_password_change = force_change;
        self.store.insert(identity)
    }

    /// Verify a login attempt. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn verify(&self, email: &str, password: &Password) -> Result<Identity, ServiceError> {
        let identity = self
            .store
            .find(email)
            .ok_or(ServiceError::InvalidCredentials)?;
        let stored = PasswordHashString::new(identity.password_hash.clone());
        let password = password.clone();
        let ok = run_blocking(move || verify_password(&password, &stored)).await?;
        if ok {
            Ok(identity)
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }

    /// Self-service password change: requires the current password.
    pub async fn change_password(
        &self,
        email: &str,
        current: &Password,
        new: &Password,
    ) -> Result<(), ServiceError> {
        let snapshot = self
            .store
            .find(email)
            .ok_or(ServiceError::InvalidCredentials)?;
        let prepared =
            Self::prepare_rotation(snapshot, Some(current.clone()), new.clone(), true).await?;

        self.store.mutate(email, |identity| {
            if identity.password_hash != prepared.observed_hash {
                // A concurrent rotation landed first.
                return Err(ServiceError::InvalidCredentials);
            }
            Self::commit_rotation(identity, prepared.new_hash);
            Ok(())
        })
    }

    /// Issue a reset token: 32 random bytes, hex encoded. Only its SHA-256
    /// digest is stored; issuing again replaces any earlier pending reset.
    /// Returns `None` for an unknown email so callers can stay silent.
    pub fn issue_reset_token(&self, email: &str) -> Option<String> {
        if !self.store.contains(email) {
            return None;
        }

        let mut raw = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw);
        let token = hex::encode(raw);
        let token_hash = hex::encode(Sha256::digest(token.as_bytes()));

        let issued = self.store.mutate(email, |identity| {
            identity.pending_reset = Some(PendingReset {
                token_hash,
                expires_at: now() + Duration::seconds(RESET_TOKEN_TTL_SECONDS),
            });
            Ok(())
        });

        match issued {
            Ok(()) => Some(token),
            Err(_) => None,
        }
    }

    /// Roll back a pending reset, used when the notification email fails.
    pub fn clear_reset_token(&self, email: &str) {
        let _ = self.store.mutate(email, |identity| {
            identity.pending_reset = None;
            Ok(())
        });
    }

    /// Consume a reset token and set the new password. Single use: the
    /// pending reset is cleared on success, and on expiry. Returns the
    /// email of the identity whose password changed.
    pub async fn consume_reset_token(
        &self,
        raw_token: &str,
        new: &Password,
    ) -> Result<String, ServiceError> {
        let candidate_hash = hex::encode(Sha256::digest(raw_token.as_bytes()));

        let matches = |identity: &Identity| match &identity.pending_reset {
            Some(pending) => pending
                .token_hash
                .as_bytes()
                .ct_eq(candidate_hash.as_bytes())
                .into(),
            None => false,
        };

        let snapshot = self
            .store
            .find_where(&matches)
            .ok_or(ServiceError::InvalidResetToken)?;
        let pending = snapshot
            .pending_reset
            .clone()
            .ok_or(ServiceError::InvalidResetToken)?;
        if pending.is_expired(now()) {
            let _ = self.store.mutate(&snapshot.email, |identity| {
                let still_same = identity
                    .pending_reset
                    .as_ref()
                    .map(|p| p.token_hash == pending.token_hash)
                    .unwrap_or(false);
                if still_same {
                    identity.pending_reset = None;
                }
                Ok(())
            });
            return Err(ServiceError::InvalidResetToken);
        }

        // A policy failure must leave the token pending for a retry; the
        // reuse window applies to self-service changes only.
        let prepared = Self::prepare_rotation(snapshot, None, new.clone(), false).await?;

        self.store.consume_where(matches, |identity| {
            let pending = identity
                .pending_reset
                .clone()
                .ok_or(ServiceError::InvalidResetToken)?;
            if pending.is_expired(now()) {
                identity.pending_reset = None;
                return Err(ServiceError::InvalidResetToken);
            }
            if identity.password_hash != prepared.observed_hash {
                return Err(ServiceError::InvalidResetToken);
            }
            Self::commit_rotation(identity, prepared.new_hash);
            Ok(identity.email.clone())
        })
    }

    /// Flip the forced-change flag on an identity.
    pub fn set_force_flag(&self, email: &str, value: bool) -> Result<(), ServiceError> {
        self.store.mutate(email, |identity| {
            identity.force_password_change = value;
            Ok(())
        })
    }

    /// Run every check against the snapshot on the blocking pool: the
    /// current-password verification when one is required, the policy
    /// check, the optional reuse check, and the new hash. Nothing in the
    /// store is touched.
    async fn prepare_rotation(
        snapshot: Identity,
        current: Option<Password>,
        new: Password,
        check_reuse: bool,
    ) -> Result<PreparedRotation, ServiceError> {
        PasswordPolicy::check(new.as_str())?;

        run_blocking(move || {
            let observed = PasswordHashString::new(snapshot.password_hash.clone());
            if let Some(current) = current {
                if !verify_password(&current, &observed) {
                    return Err(ServiceError::InvalidCredentials);
                }
            }

            if check_reuse {
                if verify_password(&new, &observed) {
                    return Err(ServiceError::PasswordReused);
                }
                for old_hash in snapshot.recent_history() {
                    let old = PasswordHashString::new(old_hash.to_string());
                    if verify_password(&new, &old) {
                        return Err(ServiceError::PasswordReused);
                    }
                }
            }

            let new_hash = hash_password(&new)?;
            Ok(PreparedRotation {
                observed_hash: snapshot.password_hash,
                new_hash: new_hash.into_string(),
            })
        })
        .await?
    }

    /// Rotate the hash and bookkeeping. Runs under the caller's entry lock
    /// after the optimistic hash re-check has passed.
    fn commit_rotation(identity: &mut Identity, new_hash: String) {
        let changed_at = now();
        let retired = std::mem::replace(&mut identity.password_hash, new_hash);
        identity.push_history(retired, changed_at);
        identity.password_changed_at = changed_at;
        identity.force_password_change = false;
        identity.pending_reset = None;
    }
}

async fn run_blocking<T: Send + 'static>(
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<T, ServiceError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("password hashing task failed: {e}")))
}
