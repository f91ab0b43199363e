//! Email verification codes
//!
//! Per-email lifecycle during signup/checkout: `NoCode -> Active ->
//! {Consumed | Expired}`. Codes are six random digits, valid for ten
//! minutes, single-use. The clock is always an explicit argument.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use crate::domain::events::{DomainEvent, VerificationEvent};

pub const CODE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid verification code")]
    InvalidCode,
    #[error("verification code expired")]
    Expired,
    #[error("no active verification code")]
    NoActiveCode,
}

#[derive(Debug, Error)]
#[error("code delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Outbound delivery collaborator (email/SMS gateway). Delivery failure
/// never rolls back an issued code.
pub trait CodeSender {
    fn send(&mut self, email: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Sender for flows that deliver the code out of band.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSender;

impl CodeSender for NullSender {
    fn send(&mut self, _email: &str, _code: &str) -> Result<(), DeliveryError> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CodeStatus {
    Active,
    Consumed,
    Expired,
}

#[derive(Clone, Debug)]
struct CodeRecord {
    code: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    status: CodeStatus,
}

/// Owns the code registry for one signup/checkout session.
pub struct VerificationCodeService<N: CodeSender> {
    codes: HashMap<String, CodeRecord>,
    ttl: Duration,
    sender: N,
    events: Vec<DomainEvent>,
}

impl<N: CodeSender> VerificationCodeService<N> {
    pub fn new(sender: N) -> Self {
        Self {
            codes: HashMap::new(),
            ttl: Duration::minutes(CODE_TTL_MINUTES),
            sender,
            events: vec![],
        }
    }

    /// Issues a fresh code for `email`, invalidating any prior one, and
    /// hands it to the delivery collaborator. Returns the issued code.
    pub fn issue(&mut self, email: &str, now: DateTime<Utc>) -> Result<String, VerificationError> {
        if !validator::validate_email(email) {
            return Err(VerificationError::InvalidEmail);
        }
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let expires_at = now + self.ttl;
        self.codes.insert(
            email.to_string(),
            CodeRecord {
                code: code.clone(),
                issued_at: now,
                expires_at,
                status: CodeStatus::Active,
            },
        );
        self.events.push(DomainEvent::Verification(VerificationEvent::CodeIssued {
            email: email.to_string(),
            expires_at,
        }));
        if let Err(err) = self.sender.send(email, &code) {
            // The code stays valid until expiry; the shopper can hit resend.
            tracing::warn!(%email, %err, "verification code delivery failed");
        }
        tracing::debug!(%email, %expires_at, "verification code issued");
        Ok(code)
    }

    /// Checks `submitted` against the active code for `email`.
    ///
    /// A mismatch leaves the record active so the shopper can retry; a
    /// match consumes it, so repeating the same correct code fails with
    /// `NoActiveCode`. Expiry is reported once and frees the email for
    /// re-issue.
    pub fn validate(
        &mut self,
        email: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        let record = self.codes.get_mut(email).ok_or(VerificationError::NoActiveCode)?;
        match record.status {
            CodeStatus::Consumed | CodeStatus::Expired => Err(VerificationError::NoActiveCode),
            CodeStatus::Active if now > record.expires_at => {
                record.status = CodeStatus::Expired;
                Err(VerificationError::Expired)
            }
            CodeStatus::Active if record.code != submitted => Err(VerificationError::InvalidCode),
            CodeStatus::Active => {
                record.status = CodeStatus::Consumed;
                tracing::debug!(%email, "verification code consumed");
                Ok(())
            }
        }
    }

    /// When the last code for `email` was issued, regardless of its state.
    /// Callers use this to cap resend frequency.
    pub fn last_issued_at(&self, email: &str) -> Option<DateTime<Utc>> {
        self.codes.get(email).map(|r| r.issued_at)
    }

    /// Drains events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }
}
