//! User aggregate: identity, role, skills, moderator scoring, and the
//! credit ledger counters.

mod history;
mod reset_token;

pub use history::{
    newest_first_capped, PaymentHistoryEntry, ResolvedTicketEntry, SOLVED_HISTORY_CAP,
};
pub use reset_token::{generate_reset_token, hash_reset_token, ResetToken};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Role, Timestamp, UserId};

/// Credits granted to a fresh account.
pub const SIGNUP_CREDITS: i32 = 5;

/// Subscription lifecycle on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Inactive,
    Active,
    PastDue,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inactive" => Some(SubscriptionStatus::Inactive),
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered account.
///
/// Invariant: `credits_remaining` never goes negative; the only code path
/// that decrements it is the repository's guarded debit, whose predicate
/// re-checks `credits_remaining > 0` at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub issues_resolved: i32,
    pub score: i32,
    pub credits_remaining: i32,
    pub credits_used: i32,
    pub subscription_status: SubscriptionStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl User {
    /// Builds a fresh account with the signup credit grant.
    pub fn signup(email: impl Into<String>, password_hash: impl Into<String>, skills: Vec<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: Role::User,
            skills,
            issues_resolved: 0,
            score: 0,
            credits_remaining: SIGNUP_CREDITS,
            credits_used: 0,
            subscription_status: SubscriptionStatus::Inactive,
            gateway_order_id: None,
            gateway_payment_id: None,
            reset_token_hash: None,
            reset_token_expires: None,
            created_at: Timestamp::now(),
        }
    }

    /// Display name shown to the payment widget: the local part of the email.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Whether a stored reset token is still usable at `now`.
    pub fn reset_token_valid(&self, now: Timestamp) -> bool {
        match (&self.reset_token_hash, &self.reset_token_expires) {
            (Some(_), Some(expires)) => expires.is_after(&now),
            _ => false,
        }
    }
}

/// Post-debit (or post-credit) view of the ledger counters, returned by
/// the guarded repository updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSnapshot {
    pub credits_remaining: i32,
    pub credits_used: i32,
    pub subscription_status: SubscriptionStatus,
}
