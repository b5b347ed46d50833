// Interpretation of the analysis service's JSON reply.
//
// The service may answer with free-text markdown (`{"md": "..."}`), with a
// structured assessment (`{"analysis": {...}}`), or with anything else. A
// narrative always wins over a structured body; a reply matching neither is
// shown as pretty-printed JSON.

use serde_json::Value;
use tracing::debug;

use super::Analysis;

/// A successful reply, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteReply {
    /// Free-text (markdown) narrative, shown as-is.
    Narrative(String),
    /// A reply carrying a well-formed `Analysis`.
    Structured(Analysis),
    /// Anything else, pretty-printed for display.
    Opaque(String),
}

impl RemoteReply {
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteReply::Narrative(_) => "narrative",
            RemoteReply::Structured(_) => "structured",
            RemoteReply::Opaque(_) => "opaque",
        }
    }
}

/// Classify a decoded reply. Total: every JSON value maps to exactly one variant.
pub fn reconcile(reply: &Value) -> RemoteReply {
    if let Some(md) = narrative_text(reply) {
        debug!(len = md.len(), "reply carries a narrative");
        return RemoteReply::Narrative(md.to_string());
    }

    if let Some(analysis) = structured_analysis(reply) {
        debug!(archetype = %analysis.archetype, "reply carries a structured analysis");
        return RemoteReply::Structured(analysis);
    }

    debug!("reply matches no known shape, treating as opaque");
    RemoteReply::Opaque(pretty(reply))
}

/// Non-empty `md` string field.
pub(crate) fn narrative_text(reply: &Value) -> Option<&str> {
    reply
        .get("md")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// `analysis` field with all five attributes present and correctly typed,
/// and both lists non-empty.
pub(crate) fn structured_analysis(reply: &Value) -> Option<Analysis> {
    let raw = reply.get("analysis")?;
    let analysis: Analysis = serde_json::from_value(raw.clone()).ok()?;
    analysis.is_populated().then_some(analysis)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
