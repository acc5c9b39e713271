//! User repository port.
//!
//! Besides plain CRUD this port carries the credit-ledger operations.
//! Every "exactly once" mutation is specified as a single guarded write:
//! the implementation must re-check the precondition at write time, not
//! at read time.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Role, TicketId, Timestamp, UserId};
use crate::domain::triage::AssigneeCandidate;
use crate::domain::user::{CreditSnapshot, PaymentHistoryEntry, ResolvedTicketEntry, User};

/// Port for user persistence and the credit ledger.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account. A duplicate email yields
    /// `ErrorCode::DuplicateEmail`.
    async fn insert(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// All users, for the admin panel.
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Admin update of role and skills, keyed by email.
    async fn update_role_and_skills(
        &self,
        email: &str,
        role: Role,
        skills: &[String],
    ) -> Result<(), DomainError>;

    // === Credit ledger ===

    /// Debits one credit if and only if `credits_remaining > 0` at the
    /// moment of the write. Returns the post-update counters, or `None`
    /// when the guarded write matched no row (exhausted).
    async fn debit_credit(&self, id: &UserId) -> Result<Option<CreditSnapshot>, DomainError>;

    /// Compensating increment after a downstream failure consumed a debit.
    async fn refund_credit(&self, id: &UserId) -> Result<(), DomainError>;

    /// Applies a verified payment: adds credits, activates the
    /// subscription, stamps the last gateway ids, and appends a payment
    /// history entry. Returns the post-update counters.
    async fn credit_verified_payment(
        &self,
        id: &UserId,
        credits: i32,
        entry: &PaymentHistoryEntry,
    ) -> Result<Option<CreditSnapshot>, DomainError>;

    /// Current counters without mutation.
    async fn credit_snapshot(&self, id: &UserId) -> Result<Option<CreditSnapshot>, DomainError>;

    // === Moderator scoring & history ===

    /// Awards a resolution: +1 issues_resolved, +`points` score, and
    /// replaces any history entry for the same ticket id (so re-resolving
    /// after a reopen does not duplicate history).
    async fn record_resolution(
        &self,
        id: &UserId,
        entry: &ResolvedTicketEntry,
        points: i32,
    ) -> Result<(), DomainError>;

    /// Reverses a resolution award: -1 issues_resolved, -`points` score.
    async fn reverse_resolution(&self, id: &UserId, points: i32) -> Result<(), DomainError>;

    /// Soft-deletes the resolver's history entry for a ticket.
    async fn mark_history_deleted(
        &self,
        resolver: &UserId,
        ticket_id: &TicketId,
        deleted_at: Timestamp,
    ) -> Result<(), DomainError>;

    /// Resolved-ticket history for a moderator.
    async fn resolved_history(
        &self,
        id: &UserId,
    ) -> Result<Vec<ResolvedTicketEntry>, DomainError>;

    // === Password reset ===

    /// Stores the hashed reset token and its expiry.
    async fn set_reset_token(
        &self,
        id: &UserId,
        token_hash: &str,
        expires: Timestamp,
    ) -> Result<(), DomainError>;

    /// Finds the user holding an unexpired reset token hash.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<User>, DomainError>;

    /// Replaces the password hash and clears any reset token.
    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DomainError>;

    // === Triage candidates ===

    /// All moderators, as assignment candidates.
    async fn moderator_candidates(&self) -> Result<Vec<AssigneeCandidate>, DomainError>;

    /// All admins, as assignment candidates.
    async fn admin_candidates(&self) -> Result<Vec<AssigneeCandidate>, DomainError>;

    /// A single user as an assignment candidate (creator fallback).
    async fn candidate(&self, id: &UserId) -> Result<Option<AssigneeCandidate>, DomainError>;
}
