//! Reasoning step payload

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of a reasoning step.
///
/// Unrecognized kinds are kept verbatim in [`StepKind::Other`] so they can be
/// rendered generically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepKind {
    Analysis,
    ToolSelection,
    ToolExecution,
    ToolResult,
    Conclusion,
    Other(String),
}

impl StepKind {
    /// Parse a wire kind. Case-insensitive, `-` and `_` are interchangeable,
    /// and the older `thinking` / `tool_decision` names are accepted.
    pub fn from_wire(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "analysis" | "thinking" => StepKind::Analysis,
            "tool_selection" | "tool_decision" => StepKind::ToolSelection,
            "tool_execution" => StepKind::ToolExecution,
            "tool_result" => StepKind::ToolResult,
            "conclusion" => StepKind::Conclusion,
            _ => StepKind::Other(raw.to_string()),
        }
    }

    /// Canonical wire name
    pub fn as_str(&self) -> &str {
        match self {
            StepKind::Analysis => "analysis",
            StepKind::ToolSelection => "tool_selection",
            StepKind::ToolExecution => "tool_execution",
            StepKind::ToolResult => "tool_result",
            StepKind::Conclusion => "conclusion",
            StepKind::Other(raw) => raw,
        }
    }

    /// Short human label for display
    pub fn label(&self) -> String {
        match self {
            StepKind::Analysis => "Thinking".to_string(),
            StepKind::ToolSelection => "Using tool".to_string(),
            StepKind::ToolExecution => "Searching".to_string(),
            StepKind::ToolResult => "Found information".to_string(),
            StepKind::Conclusion => "Preparing response".to_string(),
            StepKind::Other(raw) => format!("Step ({raw})"),
        }
    }
}

impl From<String> for StepKind {
    fn from(raw: String) -> Self {
        StepKind::from_wire(&raw)
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One discrete unit of agent deliberation, as carried by a `reasoning` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Tool input. Producers sometimes send an object here; it is kept as
    /// compact JSON text.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_input"
    )]
    pub input: Option<String>,
}

impl ReasoningStep {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            reasoning: None,
            content: None,
            tool: None,
            input: None,
        }
    }

    #[must_use]
    pub fn with_reasoning(mut self, text: impl Into<String>) -> Self {
        self.reasoning = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>, input: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self.input = Some(input.into());
        self
    }

    /// Reasoning text if present, else content text, else empty. Empty strings
    /// count as absent.
    pub fn primary_text(&self) -> &str {
        self.reasoning
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.content.as_deref().filter(|t| !t.is_empty()))
            .unwrap_or("")
    }
}

fn deserialize_input<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
