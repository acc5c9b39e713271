//! Triage assignment rule.
//!
//! A pure selection function: given the skill tags inferred for a ticket
//! and the available staff, pick the assignee. Callers fetch candidates
//! and persist the choice; this module only decides.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, UserId};

/// The slice of a user the assignment rule looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeCandidate {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub issues_resolved: i32,
    pub score: i32,
    pub created_at: Timestamp,
}

impl AssigneeCandidate {
    /// Whether any skill contains any of the normalized tags as a
    /// case-insensitive substring. Tags are matched literally, so
    /// pattern metacharacters in model output carry no meaning here.
    fn matches_any(&self, normalized_tags: &[String]) -> bool {
        self.skills.iter().any(|skill| {
            let skill = skill.to_lowercase();
            normalized_tags.iter().any(|tag| skill.contains(tag.as_str()))
        })
    }

    /// Work flows to the least-loaded, lowest-scoring, longest-tenured
    /// moderator first.
    fn load_key(&self) -> (i32, i32, Timestamp) {
        (self.issues_resolved, self.score, self.created_at)
    }
}

/// Lowercases, trims, and drops empty tags.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Selects the assignee for a ticket.
///
/// Tried in order until one yields a match:
/// 1. a moderator with a skill matching any inferred tag,
/// 2. any moderator,
/// 3. any admin (earliest account first),
/// 4. the ticket's creator,
/// 5. nobody.
pub fn select_assignee<'a>(
    tags: &[String],
    moderators: &'a [AssigneeCandidate],
    admins: &'a [AssigneeCandidate],
    creator: Option<&'a AssigneeCandidate>,
) -> Option<&'a AssigneeCandidate> {
    let normalized = normalize_tags(tags);

    if !normalized.is_empty() {
        if let Some(candidate) = moderators
            .iter()
            .filter(|m| m.matches_any(&normalized))
            .min_by_key(|m| m.load_key())
        {
            return Some(candidate);
        }
    }

    if let Some(candidate) = moderators.iter().min_by_key(|m| m.load_key()) {
        return Some(candidate);
    }

    if let Some(candidate) = admins.iter().min_by_key(|a| a.created_at) {
        return Some(candidate);
    }

    creator
}
