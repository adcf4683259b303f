//! One-time codes for service bookings.
//!
//! Codes live in memory keyed by booking id. Every operation takes `now` so
//! expiry, cooldown and lockout can be exercised without sleeping.
//!
//! An entry outlives its code: expiry purges and failed deliveries only clear
//! the code, the resend count and cooldown stay until the booking leaves the
//! pending state ([`OtpStore::discard`]) or the code is verified.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

pub const CODE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OtpPolicy {
    pub ttl: Duration,
    pub resend_cooldown: Duration,
    pub max_attempts: u32,
    pub max_resends: u32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self::from(&configs::OtpConfig::default())
    }
}

impl From<&configs::OtpConfig> for OtpPolicy {
    fn from(c: &configs::OtpConfig) -> Self {
        Self {
            ttl: Duration::seconds(c.ttl_secs as i64),
            resend_cooldown: Duration::seconds(c.resend_cooldown_secs as i64),
            max_attempts: c.max_attempts,
            max_resends: c.max_resends,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("no verification code is pending; request a new one")]
    NotIssued,
    #[error("verification code expired; request a new one")]
    Expired,
    #[error("too many wrong codes; request a new one")]
    Locked,
    #[error("wrong code, {remaining} attempt(s) left")]
    Mismatch { remaining: u32 },
    #[error("a new code can be requested in {retry_after_secs}s")]
    Cooldown { retry_after_secs: i64 },
    #[error("resend limit reached")]
    ResendLimit,
}

#[derive(Debug, Clone)]
struct OtpEntry {
    /// `None` once the code was purged or never reached the customer.
    code: Option<String>,
    expires_at: DateTime<Utc>,
    attempts: u32,
    resends: u32,
    last_sent_at: DateTime<Utc>,
}

pub struct OtpStore {
    policy: OtpPolicy,
    entries: DashMap<Uuid, OtpEntry>,
}

fn generate_code() -> String {
    format!("{:0width$}", rand::thread_rng().gen_range(0..1_000_000u32), width = CODE_LEN)
}

/// Compare without bailing out at the first differing byte.
fn codes_match(expected: &str, given: &str) -> bool {
    expected.len() == given.len()
        && expected.bytes().zip(given.bytes()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

impl OtpStore {
    pub fn new(policy: OtpPolicy) -> Self {
        Self { policy, entries: DashMap::new() }
    }

    pub fn policy(&self) -> &OtpPolicy { &self.policy }

    /// Start a fresh code for `key`, replacing any previous one.
    pub fn issue(&self, key: Uuid, now: DateTime<Utc>) -> String {
        let code = generate_code();
        self.entries.insert(key, OtpEntry {
            code: Some(code.clone()),
            expires_at: now + self.policy.ttl,
            attempts: 0,
            resends: 0,
            last_sent_at: now,
        });
        code
    }

    /// Replace the code after the cooldown, at most `max_resends` times.
    ///
    /// Without any entry (the process restarted since the booking was made)
    /// this behaves like [`issue`](Self::issue).
    pub fn resend(&self, key: Uuid, now: DateTime<Utc>) -> Result<String, OtpError> {
        let Some(mut entry) = self.entries.get_mut(&key) else {
            return Ok(self.issue(key, now));
        };
        let ready_at = entry.last_sent_at + self.policy.resend_cooldown;
        if now < ready_at {
            let wait = ready_at - now;
            // round partial seconds up
            let secs = (wait.num_milliseconds() + 999) / 1000;
            return Err(OtpError::Cooldown { retry_after_secs: secs.max(1) });
        }
        if entry.resends >= self.policy.max_resends {
            return Err(OtpError::ResendLimit);
        }
        let code = generate_code();
        entry.code = Some(code.clone());
        entry.expires_at = now + self.policy.ttl;
        entry.attempts = 0;
        entry.resends += 1;
        entry.last_sent_at = now;
        Ok(code)
    }

    /// Check `code`; a match consumes the entry.
    pub fn verify(&self, key: Uuid, code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        let outcome = {
            let mut entry = self.entries.get_mut(&key).ok_or(OtpError::NotIssued)?;
            if entry.attempts >= self.policy.max_attempts {
                Err(OtpError::Locked)
            } else if now >= entry.expires_at {
                Err(OtpError::Expired)
            } else if let Some(expected) = entry.code.as_deref() {
                if codes_match(expected, code.trim()) {
                    Ok(())
                } else {
                    entry.attempts += 1;
                    let remaining = self.policy.max_attempts.saturating_sub(entry.attempts);
                    if remaining == 0 { Err(OtpError::Locked) } else { Err(OtpError::Mismatch { remaining }) }
                }
            } else {
                Err(OtpError::NotIssued)
            }
        };
        if outcome.is_ok() {
            self.entries.remove(&key);
        }
        outcome
    }

    /// Forget everything about `key`, throttling state included.
    pub fn discard(&self, key: Uuid) {
        self.entries.remove(&key);
    }

    /// Invalidate the current code but keep the resend count and cooldown.
    pub fn revoke(&self, key: Uuid) {
        if let Some(mut entry) = self.entries.get_mut(&key) {
            entry.code = None;
        }
    }

    /// Clear codes that expired before `now`; returns how many were cleared.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut cleared = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.code.is_some() && entry.expires_at <= now {
                entry.code = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Number of tracked bookings, with or without a live code.
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
