use serde::{Deserialize, Serialize};

/// Outcome of one tool invocation. Exactly one shape is populated.
///
/// On the wire this keeps the flat `{"success": bool, ...}` object that
/// tool callers already parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInvocationResult", into = "RawInvocationResult")]
pub enum ToolInvocationResult {
    Success { file_path: String, message: String },
    Failure { error: String },
}

impl ToolInvocationResult {
    pub fn success(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Success {
            file_path: file_path.into(),
            message: message.into(),
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self::Failure {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            Self::Success { file_path, .. } => Some(file_path),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawInvocationResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TryFrom<RawInvocationResult> for ToolInvocationResult {
    type Error = String;

    fn try_from(raw: RawInvocationResult) -> Result<Self, Self::Error> {
        match raw {
            RawInvocationResult {
                success: true,
                file_path: Some(file_path),
                message: Some(message),
                error: None,
            } => Ok(Self::Success { file_path, message }),
            RawInvocationResult {
                success: false,
                file_path: None,
                message: None,
                error: Some(error),
            } => Ok(Self::Failure { error }),
            RawInvocationResult { success, .. } => Err(format!(
                "malformed tool result: fields do not match success={success}"
            )),
        }
    }
}

impl From<ToolInvocationResult> for RawInvocationResult {
    fn from(result: ToolInvocationResult) -> Self {
        match result {
            ToolInvocationResult::Success { file_path, message } => Self {
                success: true,
                file_path: Some(file_path),
                message: Some(message),
                error: None,
            },
            ToolInvocationResult::Failure { error } => Self {
                success: false,
                file_path: None,
                message: None,
                error: Some(error),
            },
        }
    }
}
