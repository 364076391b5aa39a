use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Used when the server rejects a request without explaining why.
pub const FALLBACK_REJECTION_MESSAGE: &str = "Some error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ResultCode {
    Success,
    Rejected,
    CaptchaRequired,
    Other(i32),
}

impl From<i32> for ResultCode {
    fn from(value: i32) -> Self {
        match value {
            0 => ResultCode::Success,
            1 => ResultCode::Rejected,
            10 => ResultCode::CaptchaRequired,
            other => ResultCode::Other(other),
        }
    }
}

impl From<ResultCode> for i32 {
    fn from(value: ResultCode) -> Self {
        match value {
            ResultCode::Success => 0,
            ResultCode::Rejected => 1,
            ResultCode::CaptchaRequired => 10,
            ResultCode::Other(other) => other,
        }
    }
}

impl ResultCode {
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }
}

/// A structurally valid response whose result code signals a business-logic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", rejection_message(.messages))]
pub struct ApiRejection {
    pub code: ResultCode,
    pub messages: Vec<String>,
}

impl ApiRejection {
    pub fn new(code: ResultCode, messages: Vec<String>) -> Self {
        Self { code, messages }
    }

    /// Server messages joined into one line, or a generic fallback when there are none.
    pub fn message(&self) -> String {
        rejection_message(&self.messages)
    }
}

fn rejection_message(messages: &[String]) -> String {
    let parts: Vec<&str> = messages
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();
    if parts.is_empty() {
        FALLBACK_REJECTION_MESSAGE.to_string()
    } else {
        parts.join("; ")
    }
}
