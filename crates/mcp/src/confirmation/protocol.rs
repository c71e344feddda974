//! Validate and consume transitions over a [`ConfirmationStore`].
//!
//! A token is `PENDING` from creation until it is consumed or expires. Absent,
//! consumed, expired and mismatched tokens all validate to `None`; the reason
//! is only visible in debug logs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use forge_gate_util::token_prefix;
use tracing::debug;

use super::store::{ConfirmationEntry, ConfirmationStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Unknown,
    Consumed,
    Expired,
    Mismatch,
}

impl Rejection {
    fn as_str(self) -> &'static str {
        match self {
            Rejection::Unknown => "unknown",
            Rejection::Consumed => "consumed",
            Rejection::Expired => "expired",
            Rejection::Mismatch => "parameter mismatch",
        }
    }
}

impl<P: Clone> ConfirmationStore<P> {
    /// Validate a token without checking parameters.
    pub fn validate(&self, token: &str) -> Option<ConfirmationEntry<P>> {
        self.validate_at(token, None, Instant::now())
    }

    /// Validate a token and require `matches` to accept the stored parameters.
    pub fn validate_with(&self, token: &str, matches: impl Fn(&P) -> bool) -> Option<ConfirmationEntry<P>> {
        self.validate_at(token, Some(&matches as &dyn Fn(&P) -> bool), Instant::now())
    }

    /// Validation against an explicit clock.
    ///
    /// Expired entries are removed here; nothing sweeps them in the background.
    /// Validation never changes the `consumed` flag.
    pub fn validate_at(
        &self,
        token: &str,
        matches: Option<&dyn Fn(&P) -> bool>,
        now: Instant,
    ) -> Option<ConfirmationEntry<P>> {
        let mut entries = self.lock();
        match check(&mut entries, token, matches, self.ttl(), now) {
            Ok(()) => entries.get(token).cloned(),
            Err(rejection) => {
                self.log_rejection(token, rejection);
                None
            }
        }
    }

    /// Mark a pending token consumed. Returns `false` when the token is unknown
    /// or already consumed.
    pub fn mark_used(&self, token: &str) -> bool {
        match self.lock().get_mut(token) {
            Some(entry) if !entry.consumed => {
                entry.consumed = true;
                true
            }
            _ => false,
        }
    }

    /// Validate and consume under one lock acquisition.
    ///
    /// Of several concurrent claims on the same token at most one returns the
    /// entry.
    pub fn claim(&self, token: &str, matches: impl Fn(&P) -> bool) -> Option<ConfirmationEntry<P>> {
        self.claim_at(token, &matches, Instant::now())
    }

    pub fn claim_at(&self, token: &str, matches: &dyn Fn(&P) -> bool, now: Instant) -> Option<ConfirmationEntry<P>> {
        let mut entries = self.lock();
        if let Err(rejection) = check(&mut entries, token, Some(matches), self.ttl(), now) {
            self.log_rejection(token, rejection);
            return None;
        }
        let entry = entries.get_mut(token)?;
        entry.consumed = true;
        debug!(kind = self.kind(), token = token_prefix(token), "confirmation consumed");
        Some(entry.clone())
    }

    fn log_rejection(&self, token: &str, rejection: Rejection) {
        debug!(
            kind = self.kind(),
            token = token_prefix(token),
            reason = rejection.as_str(),
            "confirmation rejected"
        );
    }
}

fn check<P>(
    entries: &mut HashMap<String, ConfirmationEntry<P>>,
    token: &str,
    matches: Option<&dyn Fn(&P) -> bool>,
    ttl: Duration,
    now: Instant,
) -> Result<(), Rejection> {
    let entry = entries.get(token).ok_or(Rejection::Unknown)?;
    if entry.consumed {
        return Err(Rejection::Consumed);
    }
    if now.saturating_duration_since(entry.created_at) > ttl {
        entries.remove(token);
        return Err(Rejection::Expired);
    }
    if let Some(matches) = matches
        && !matches(&entry.parameters)
    {
        return Err(Rejection::Mismatch);
    }
    Ok(())
}
