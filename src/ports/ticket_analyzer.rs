//! AI ticket analyzer port.

use async_trait::async_trait;

use crate::domain::analysis::TicketAnalysis;

/// Port for the external summarization model.
///
/// Returns `None` for every failure mode — missing credentials, transport
/// errors, unusable output. "No analysis available" is a normal outcome;
/// the pipeline substitutes defaults.
#[async_trait]
pub trait TicketAnalyzer: Send + Sync {
    async fn analyze(&self, title: &str, description: &str) -> Option<TicketAnalysis>;
}
