#![forbid(unsafe_code)]

//! JSON input parser for host-encoded window events.
//!
//! A JS shim forwards `pointermove` and `resize` as small JSON objects:
//!
//! ```json
//! {"kind":"pointer","x":412.5,"y":96}
//! {"kind":"resize","width":1280,"height":720}
//! ```
//!
//! [`parse_host_event`] turns those into [`HostEvent`]s. Browser event kinds
//! the field does not react to (keys, wheel, touch, focus) parse to `Ok(None)`
//! so a shim can forward its whole stream unfiltered.

use driftfield_core::event::{HostEvent, PointerEvent};
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unrecognized `kind` value.
    UnknownKind(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownKind(kind) => write!(f, "unknown event kind: {kind}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

/// Parse one JSON-encoded host event.
///
/// Returns `Ok(None)` for browser event kinds with no field counterpart and
/// `Err` for malformed JSON, missing coordinates or an unrecognized kind.
pub fn parse_host_event(json: &str) -> Result<Option<HostEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    convert(raw)
}

/// Parse a JSON array of encoded events, skipping kinds with no counterpart.
///
/// Fails on the first malformed entry.
pub fn parse_host_events(json: &str) -> Result<Vec<HostEvent>, InputParseError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    let mut events = Vec::with_capacity(items.len());
    for item in items {
        let raw: RawInput =
            serde_json::from_value(item).map_err(|e| InputParseError::Json(e.to_string()))?;
        if let Some(event) = convert(raw)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn convert(raw: RawInput) -> Result<Option<HostEvent>, InputParseError> {
    match raw.kind.as_str() {
        "pointer" | "pointermove" | "mousemove" => {
            let x = raw.x.ok_or(InputParseError::MissingField("x"))?;
            let y = raw.y.ok_or(InputParseError::MissingField("y"))?;
            Ok(Some(HostEvent::PointerMove(PointerEvent::new(x, y))))
        }
        "resize" => {
            let width = raw.width.ok_or(InputParseError::MissingField("width"))?;
            let height = raw.height.ok_or(InputParseError::MissingField("height"))?;
            Ok(Some(HostEvent::Resize { width, height }))
        }
        "key" | "wheel" | "touch" | "focus" | "mouse" => Ok(None),
        other => Err(InputParseError::UnknownKind(other.to_string())),
    }
}
