//! Structured result of AI ticket analysis.
//!
//! The external model returns free text expected to contain a JSON object,
//! possibly fenced in a code block. Parsing is deliberately tolerant:
//! anything unusable becomes "no analysis available" rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket priority inferred by analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parses leniently; anything unrecognized falls back to `Medium`.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }

    /// Parses strictly, for stored values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed analysis of a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketAnalysis {
    pub summary: String,
    pub priority: Priority,
    pub helpful_notes: String,
    pub related_skills: Vec<String>,
}

/// Raw shape the model is asked to produce. All fields optional; defaults
/// are applied during conversion.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default, rename = "helpfulNotes")]
    helpful_notes: Option<String>,
    #[serde(default, rename = "relatedSkills")]
    related_skills: Option<Vec<serde_json::Value>>,
}

/// Extracts the JSON object embedded in a model reply.
///
/// Tries, in order: a ```json fenced block, the outermost `{..}` slice,
/// the trimmed text itself.
pub fn extract_json_object(raw: &str) -> &str {
    if let Some(fenced) = extract_fenced(raw) {
        return fenced;
    }
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return &raw[start..=end];
        }
    }
    raw.trim()
}

fn extract_fenced(raw: &str) -> Option<&str> {
    let lower = raw.to_lowercase();
    let open = lower.find("```json")?;
    let body_start = open + "```json".len();
    let close = lower[body_start..].find("```")?;
    Some(raw[body_start..body_start + close].trim())
}

/// Parses a model reply into a [`TicketAnalysis`].
///
/// Returns `None` when no JSON object can be recovered; individual missing
/// or malformed fields are defaulted instead.
pub fn parse_analysis(raw: &str) -> Option<TicketAnalysis> {
    let json = extract_json_object(raw);
    let parsed: RawAnalysis = serde_json::from_str(json).ok()?;

    let related_skills = parsed
        .related_skills
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Some(TicketAnalysis {
        summary: parsed.summary.unwrap_or_default(),
        priority: parsed
            .priority
            .as_deref()
            .map(Priority::parse_or_default)
            .unwrap_or_default(),
        helpful_notes: parsed.helpful_notes.unwrap_or_default(),
        related_skills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let raw = r#"{"summary":"Login broken","priority":"high","helpfulNotes":"Check SSO","relatedSkills":["React","Auth"]}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.summary, "Login broken");
        assert_eq!(analysis.priority, Priority::High);
        assert_eq!(analysis.helpful_notes, "Check SSO");
        assert_eq!(analysis.related_skills, vec!["React", "Auth"]);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "Here is the analysis:\n```json\n{\"summary\":\"s\",\"priority\":\"low\"}\n```\nDone.";
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.summary, "s");
        assert_eq!(analysis.priority, Priority::Low);
    }

    #[test]
    fn parses_object_embedded_in_prose() {
        let raw = "Sure! {\"summary\":\"embedded\"} hope that helps";
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.summary, "embedded");
    }

    #[test]
    fn invalid_priority_defaults_to_medium() {
        let raw = r#"{"summary":"s","priority":"urgent"}"#;
        assert_eq!(parse_analysis(raw).unwrap().priority, Priority::Medium);
    }

    #[test]
    fn missing_priority_defaults_to_medium() {
        let raw = r#"{"summary":"s"}"#;
        assert_eq!(parse_analysis(raw).unwrap().priority, Priority::Medium);
    }

    #[test]
    fn skills_are_trimmed_and_filtered() {
        let raw = r#"{"relatedSkills":[" React ", "", "  "]}"#;
        assert_eq!(parse_analysis(raw).unwrap().related_skills, vec!["React"]);
    }

    #[test]
    fn garbage_yields_none() {
        assert!(parse_analysis("the model refused to answer").is_none());
        assert!(parse_analysis("").is_none());
    }

    #[test]
    fn priority_parse_or_default_is_case_insensitive() {
        assert_eq!(Priority::parse_or_default("HIGH"), Priority::High);
        assert_eq!(Priority::parse_or_default(" Low "), Priority::Low);
        assert_eq!(Priority::parse_or_default("???"), Priority::Medium);
    }
}
