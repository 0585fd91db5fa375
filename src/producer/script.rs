//! Scripted responses

use crate::config::ProducerConfig;
use crate::protocol::{ReasoningStep, StepKind, StreamEvent};
use std::time::Duration;

/// Tool the scripted agent pretends to call
pub const TOOL_NAME: &str = "rag_query";

/// One event and how long to wait before sending it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedEvent {
    pub delay: Duration,
    pub event: StreamEvent,
}

/// Build the event sequence answering `message`.
pub fn script_for(message: &str, config: &ProducerConfig) -> Vec<ScriptedEvent> {
    let mut events: Vec<(Duration, StreamEvent)> = reasoning_steps(message)
        .into_iter()
        .map(|step| (config.step_delay, StreamEvent::reasoning(step)))
        .collect();

    events.push((Duration::ZERO, StreamEvent::ContentStart));
    let answer = answer_for(message);
    let limit = config.abort_after_chars.unwrap_or(usize::MAX);
    events.extend(answer.chars().take(limit).enumerate().map(|(index, ch)| {
        (
            config.char_delay,
            StreamEvent::content_char(ch.to_string(), Some(index.to_string())),
        )
    }));
    if config.abort_after_chars.is_none() {
        events.push((Duration::ZERO, StreamEvent::ContentEnd));
    }

    let mut script = Vec::with_capacity(events.len() * 2);
    for (delay, event) in events {
        if config.redeliver {
            script.push(ScriptedEvent {
                delay,
                event: event.clone(),
            });
            script.push(ScriptedEvent {
                delay: Duration::ZERO,
                event,
            });
        } else {
            script.push(ScriptedEvent { delay, event });
        }
    }
    script
}

fn reasoning_steps(message: &str) -> Vec<ReasoningStep> {
    vec![
        ReasoningStep::new(StepKind::Analysis).with_content("Analyzing your request..."),
        ReasoningStep::new(StepKind::ToolSelection)
            .with_reasoning(format!(
                "I need to use the {TOOL_NAME} tool to find information about: {message}"
            ))
            .with_tool(TOOL_NAME, message),
        ReasoningStep::new(StepKind::ToolExecution)
            .with_content(format!("Searching for: {message}"))
            .with_tool(TOOL_NAME, message),
        ReasoningStep::new(StepKind::ToolResult)
            .with_content("Found relevant information. Processing..."),
        ReasoningStep::new(StepKind::Conclusion)
            .with_content("Formulating response based on the information found..."),
    ]
}

fn answer_for(message: &str) -> String {
    format!(
        "Here is what I found about \"{message}\": this answer comes from the demo producer, \
         streamed one character at a time."
    )
}
