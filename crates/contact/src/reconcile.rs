use serde_json::Value;

use crate::SinkKind;

pub const NETWORK_ERROR: &str = "Network error";
pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const SUBMISSION_FAILED: &str = "Submission failed. Please try again.";
pub const NOT_RECORDED_NOTICE: &str = "Your message has been sent successfully! However, there was an issue saving to our database. We have received your email and will respond soon.";
pub const NOT_NOTIFIED_NOTICE: &str = "Your message has been received! However, email notification failed. We have your information and will contact you soon.";

/// A sink response body, classified once and pattern-matched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }

        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx response whose JSON payload reports failure.
    #[error("{}", .0.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Application(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResult {
    pub sink: SinkKind,
    pub outcome: Result<(), SinkError>,
}

impl SinkResult {
    pub fn success(sink: SinkKind) -> Self {
        Self {
            sink,
            outcome: Ok(()),
        }
    }

    pub fn failure(sink: SinkKind, error: SinkError) -> Self {
        Self {
            sink,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error_detail(&self) -> Option<String> {
        self.outcome.as_ref().err().map(ToString::to_string)
    }

    /// Message shown to the user when this is the last failure of a submission.
    pub fn failure_message(&self) -> Option<String> {
        let error = self.outcome.as_ref().err()?;

        Some(match error {
            SinkError::Application(Some(message)) => message.to_owned(),
            SinkError::Application(None) => format!("{} failed", self.sink),
            other => format!("{}: {other}", self.sink),
        })
    }
}

pub fn classify_transport(sink: SinkKind, error: impl std::fmt::Display) -> SinkResult {
    let message = error.to_string();
    let message = if message.trim().is_empty() {
        NETWORK_ERROR.to_owned()
    } else {
        message
    };

    SinkResult::failure(sink, SinkError::Transport(message))
}

pub fn classify_response(sink: SinkKind, status: u16, body: ResponseBody) -> SinkResult {
    if !(200..300).contains(&status) {
        let message = match body {
            ResponseBody::Json(value) => error_field(&value),
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Empty => None,
        }
        .unwrap_or_else(|| format!("Status {status}"));

        return SinkResult::failure(sink, SinkError::Http { status, message });
    }

    match body {
        ResponseBody::Json(value) => {
            if value.get("success").is_some_and(is_truthy) {
                SinkResult::success(sink)
            } else {
                SinkResult::failure(sink, SinkError::Application(error_field(&value)))
            }
        }
        // Legacy sinks answer with HTML or nothing at all on success.
        ResponseBody::Text(_) | ResponseBody::Empty => SinkResult::success(sink),
    }
}

fn error_field(value: &Value) -> Option<String> {
    let error = value.get("error").filter(|v| is_truthy(v))?;

    Some(match error {
        Value::String(message) => message.to_owned(),
        other => other.to_string(),
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success { notice: Option<String> },
    Failure { message: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { notice } => notice.as_deref(),
            Self::Failure { message } => Some(message),
        }
    }
}

/// Folds per-sink results, given in sink declaration order.
pub fn reduce(results: &[SinkResult]) -> SubmissionOutcome {
    let succeeded = |kind: SinkKind| results.iter().any(|r| r.sink == kind && r.is_success());

    if !results.iter().any(SinkResult::is_success) {
        let message = results
            .iter()
            .filter_map(SinkResult::failure_message)
            .last()
            .unwrap_or_else(|| SUBMISSION_FAILED.to_owned());

        return SubmissionOutcome::Failure { message };
    }

    let degraded = results.len() > 1 && results.iter().any(|r| !r.is_success());
    if !degraded {
        return SubmissionOutcome::Success { notice: None };
    }

    let notice = match (
        succeeded(SinkKind::Notification),
        succeeded(SinkKind::Webhook),
    ) {
        (true, false) => Some(NOT_RECORDED_NOTICE.to_owned()),
        (false, true) => Some(NOT_NOTIFIED_NOTICE.to_owned()),
        _ => None,
    };

    SubmissionOutcome::Success { notice }
}
