//! Turns whatever JSON the backend sent back into a single line of chat text.
//!
//! The backend has shipped several response layouts over time. Each known
//! layout is a [`ResponseShape`] variant; [`classify`] tries the rules in
//! priority order and [`normalize`] renders the winner.

use serde::Serialize;
use serde_json::Value;

pub const UNEXPECTED_FORMAT: &str = "I received an unexpected response format from the backend.";
pub const MISSING_DISPLAY_TEXT: &str = "Error: 'display_text' field is missing from the response.";
pub const UNRECOGNIZED_STRUCTURE: &str = "Error: unrecognized response structure from the backend.";

/// What gets shown to the user for one backend reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedDisplay {
    pub display_text: String,
    pub secondary_data: Option<Value>,
}

impl DerivedDisplay {
    fn text(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            secondary_data: None,
        }
    }
}

/// The recognised layouts of a backend reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// Neither an object nor a non-empty list
    NoContainer,
    /// `{"response": {"display_text": ..., "full_data": ...}}`
    Structured {
        display_text: Option<&'a Value>,
        full_data: Option<&'a Value>,
    },
    /// `{"response": "text"}`
    Plain(&'a str),
    /// `{"response": <number | bool | null | list>}`
    UnexpectedResponseValue(&'static str),
    /// `{"error": ...}` reported by the backend itself
    BackendError(&'a Value),
    /// No `response` or `error` field, including non-object list heads
    Unrecognized,
}

/// Pick the value the remaining rules look into: element 0 of a non-empty
/// list, or the object itself.
fn working_container(raw: &Value) -> Option<&Value> {
    match raw {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(raw),
        _ => None,
    }
}

/// Name of a JSON value's type, used in user-facing error text.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Match `raw` against the known layouts, first rule wins.
pub fn classify(raw: &Value) -> ResponseShape<'_> {
    let Some(container) = working_container(raw) else {
        return ResponseShape::NoContainer;
    };
    // A first list element without fields matches none of the field rules
    let Some(container) = container.as_object() else {
        return ResponseShape::Unrecognized;
    };

    if let Some(response) = container.get("response") {
        return match response {
            Value::Object(inner) => ResponseShape::Structured {
                display_text: inner.get("display_text"),
                full_data: inner.get("full_data").filter(|v| !v.is_null()),
            },
            Value::String(text) => ResponseShape::Plain(text),
            other => ResponseShape::UnexpectedResponseValue(kind_of(other)),
        };
    }

    if let Some(error) = container.get("error") {
        return ResponseShape::BackendError(error);
    }

    ResponseShape::Unrecognized
}

/// Render a scalar as text; nested values are a processing failure.
fn scalar_text(field: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(format!("'{field}' is null")),
        Value::Array(_) | Value::Object(_) => {
            Err(format!("'{field}' is a {}, expected text", kind_of(value)))
        }
    }
}

impl From<ResponseShape<'_>> for DerivedDisplay {
    fn from(shape: ResponseShape<'_>) -> Self {
        match shape {
            ResponseShape::NoContainer => DerivedDisplay::text(UNEXPECTED_FORMAT),
            ResponseShape::Structured {
                display_text,
                full_data,
            } => {
                let display_text = match display_text {
                    None => MISSING_DISPLAY_TEXT.to_string(),
                    Some(value) => match scalar_text("display_text", value) {
                        Ok(text) => text,
                        Err(detail) => return processing_failure(&detail),
                    },
                };
                DerivedDisplay {
                    display_text,
                    secondary_data: full_data.cloned(),
                }
            }
            ResponseShape::Plain(text) => DerivedDisplay::text(text),
            ResponseShape::UnexpectedResponseValue(kind) => {
                DerivedDisplay::text(format!("Error: unexpected 'response' value of type {kind}."))
            }
            ResponseShape::BackendError(error) => match error {
                Value::String(text) => DerivedDisplay::text(text.as_str()),
                other => DerivedDisplay::text(other.to_string()),
            },
            ResponseShape::Unrecognized => DerivedDisplay::text(UNRECOGNIZED_STRUCTURE),
        }
    }
}

fn processing_failure(detail: &str) -> DerivedDisplay {
    DerivedDisplay::text(format!("Error processing response: {detail}"))
}

/// Extract display text and secondary payload from a raw backend reply.
///
/// Pure and total: every input maps to some text, nothing here can fail.
pub fn normalize(raw: &Value) -> DerivedDisplay {
    DerivedDisplay::from(classify(raw))
}
