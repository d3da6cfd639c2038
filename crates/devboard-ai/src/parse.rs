use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// A structured action requested by the model inside its reply text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("fenced json regex"))
}

/// Splits a model reply into displayable text and an optional tool call.
///
/// Fenced ```json blocks are preferred; when several appear, the last one
/// wins. Without a fence, the last balanced top-level JSON object that
/// mentions a "tool" key is tried. Candidates that fail to parse are left
/// in the text untouched.
pub fn extract_tool_call(reply: &str) -> (String, Option<ToolCall>) {
    if let Some(captures) = fenced_json().captures_iter(reply).last() {
        let whole = captures.get(0).expect("match");
        let body = captures.get(1).expect("group").as_str();
        match serde_json::from_str::<ToolCall>(body) {
            Ok(call) => {
                let mut text = String::with_capacity(reply.len());
                text.push_str(&reply[..whole.start()]);
                text.push_str(&reply[whole.end()..]);
                return (text.trim().to_string(), Some(call));
            }
            Err(err) => {
                tracing::debug!(%err, "fenced block is not a tool call");
            }
        }
    }

    // Last qualifying object wins when several are present.
    for (start, end) in balanced_objects(reply).into_iter().rev() {
        let body = &reply[start..end];
        if !body.contains("\"tool\"") {
            continue;
        }
        match serde_json::from_str::<ToolCall>(body) {
            Ok(call) => {
                let mut text = String::with_capacity(reply.len());
                text.push_str(&reply[..start]);
                text.push_str(&reply[end..]);
                return (text.trim().to_string(), Some(call));
            }
            Err(err) => {
                tracing::debug!(%err, "bare object is not a tool call");
            }
        }
    }

    (reply.trim().to_string(), None)
}

/// Byte ranges of every top-level `{ ... }` group, tracking string literals
/// so braces inside them do not count.
fn balanced_objects(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        result.push((start, i + 1));
                    }
                }
            }
            _ => {}
        }
    }
    result
}
