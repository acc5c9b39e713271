//! In-memory implementation of UserRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, Role, TicketId, Timestamp, UserId};
use crate::domain::triage::AssigneeCandidate;
use crate::domain::user::{
    CreditSnapshot, PaymentHistoryEntry, ResolvedTicketEntry, SubscriptionStatus, User,
};
use crate::ports::UserRepository;

/// In-memory user store with ledger semantics matching the SQL adapter.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    resolved: Mutex<HashMap<UserId, Vec<ResolvedTicketEntry>>>,
    payments: Mutex<HashMap<UserId, Vec<PaymentHistoryEntry>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user, for test setup.
    pub fn seed(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    fn snapshot_of(user: &User) -> CreditSnapshot {
        CreditSnapshot {
            credits_remaining: user.credits_remaining,
            credits_used: user.credits_used,
            subscription_status: user.subscription_status,
        }
    }

    fn candidate_of(user: &User) -> AssigneeCandidate {
        AssigneeCandidate {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            skills: user.skills.clone(),
            issues_resolved: user.issues_resolved,
            score: user.score,
            created_at: user.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::new(
                ErrorCode::DuplicateEmail,
                "An account with this email already exists",
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_role_and_skills(
        &self,
        email: &str,
        role: Role,
        skills: &[String],
    ) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;
        user.role = role;
        user.skills = skills.to_vec();
        Ok(())
    }

    async fn debit_credit(&self, id: &UserId) -> Result<Option<CreditSnapshot>, DomainError> {
        // Check and mutate under one lock: two concurrent debits of a
        // single remaining credit cannot both succeed.
        let mut users = self.users.lock().unwrap();
        let user = match users.iter_mut().find(|u| &u.id == id) {
            Some(u) => u,
            None => return Ok(None),
        };
        if user.credits_remaining <= 0 {
            return Ok(None);
        }
        user.credits_remaining -= 1;
        user.credits_used += 1;
        Ok(Some(Self::snapshot_of(user)))
    }

    async fn refund_credit(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| &u.id == id) {
            user.credits_remaining += 1;
            user.credits_used -= 1;
        }
        Ok(())
    }

    async fn credit_verified_payment(
        &self,
        id: &UserId,
        credits: i32,
        entry: &PaymentHistoryEntry,
    ) -> Result<Option<CreditSnapshot>, DomainError> {
        let mut users = self.users.lock().unwrap();
        let user = match users.iter_mut().find(|u| &u.id == id) {
            Some(u) => u,
            None => return Ok(None),
        };
        user.credits_remaining += credits;
        user.subscription_status = SubscriptionStatus::Active;
        user.gateway_order_id = Some(entry.gateway_order_id.clone());
        user.gateway_payment_id = Some(entry.gateway_payment_id.clone());
        let snapshot = Self::snapshot_of(user);
        drop(users);

        self.payments
            .lock()
            .unwrap()
            .entry(*id)
            .or_default()
            .push(entry.clone());
        Ok(Some(snapshot))
    }

    async fn credit_snapshot(&self, id: &UserId) -> Result<Option<CreditSnapshot>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.id == id)
            .map(Self::snapshot_of))
    }

    async fn record_resolution(
        &self,
        id: &UserId,
        entry: &ResolvedTicketEntry,
        points: i32,
    ) -> Result<(), DomainError> {
        {
            let mut users = self.users.lock().unwrap();
            if let Some(user) = users.iter_mut().find(|u| &u.id == id) {
                user.issues_resolved += 1;
                user.score += points;
            }
        }
        let mut resolved = self.resolved.lock().unwrap();
        let entries = resolved.entry(*id).or_default();
        entries.retain(|e| e.ticket_id != entry.ticket_id);
        entries.push(entry.clone());
        Ok(())
    }

    async fn reverse_resolution(&self, id: &UserId, points: i32) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| &u.id == id) {
            user.issues_resolved -= 1;
            user.score -= points;
        }
        Ok(())
    }

    async fn mark_history_deleted(
        &self,
        resolver: &UserId,
        ticket_id: &TicketId,
        deleted_at: Timestamp,
    ) -> Result<(), DomainError> {
        let mut resolved = self.resolved.lock().unwrap();
        if let Some(entries) = resolved.get_mut(resolver) {
            for entry in entries.iter_mut() {
                if entry.ticket_id == Some(*ticket_id) {
                    entry.deleted_at = Some(deleted_at);
                }
            }
        }
        Ok(())
    }

    async fn resolved_history(
        &self,
        id: &UserId,
    ) -> Result<Vec<ResolvedTicketEntry>, DomainError> {
        Ok(self
            .resolved
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_reset_token(
        &self,
        id: &UserId,
        token_hash: &str,
        expires: Timestamp,
    ) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| &u.id == id) {
            user.reset_token_hash = Some(token_hash.to_string());
            user.reset_token_expires = Some(expires);
        }
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.reset_token_hash.as_deref() == Some(token_hash) && u.reset_token_valid(now)
            })
            .cloned())
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| &u.id == id) {
            user.password_hash = password_hash.to_string();
            user.reset_token_hash = None;
            user.reset_token_expires = None;
        }
        Ok(())
    }

    async fn moderator_candidates(&self) -> Result<Vec<AssigneeCandidate>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == Role::Moderator)
            .map(Self::candidate_of)
            .collect())
    }

    async fn admin_candidates(&self) -> Result<Vec<AssigneeCandidate>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == Role::Admin)
            .map(Self::candidate_of)
            .collect())
    }

    async fn candidate(&self, id: &UserId) -> Result<Option<AssigneeCandidate>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.id == id)
            .map(Self::candidate_of))
    }
}
