//! Wire models for the NextCaptcha endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::task::CaptchaTask;

/// createTask request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTaskRequest {
    pub client_key: String,
    pub soft_id: String,
    pub callback_url: String,
    pub task: CaptchaTask,
}

/// createTask response body
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CreateTaskResponse {
    pub error_id: i32,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    #[serde(deserialize_with = "opt_string_or_number")]
    pub task_id: Option<String>,
}

/// getTaskResult request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskResultRequest {
    pub client_key: String,
    pub task_id: String,
}

/// getBalance response body
#[derive(Debug, Deserialize)]
pub(crate) struct BalanceResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub balance: String,
}

/// Task lifecycle states reported by getTaskResult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Queued, not yet picked up by a worker
    #[default]
    Pending,
    /// A worker is on it
    Processing,
    /// Solved, solution attached
    Ready,
    /// The service gave up, or the poll loop ran out of time
    Failed,
    /// Anything the service reports that is not one of the above;
    /// treated as non-terminal by the poll loop
    Unknown,
}

impl TaskStatus {
    fn from_wire(status: &str) -> Self {
        match status {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "ready" => Self::Ready,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

/// Outcome of a captcha task.
///
/// [`solve`](crate::NextCaptchaClient::solve) returns these as the service
/// reported them: a ready result carries the solution, a failed one carries
/// the service's error fields. A poll loop that exceeds the solve timeout
/// synthesizes a failed result with error id 12.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskResult {
    /// Zero on success, a service error code otherwise
    pub error_id: i32,
    /// Machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Task lifecycle state
    #[serde(deserialize_with = "status_or_unknown")]
    pub status: TaskStatus,
    /// Solution payload, present once the status is ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Solution>,
}

impl TaskResult {
    /// Synthetic failure for a poll loop that ran out of time.
    pub(crate) fn timeout() -> Self {
        Self {
            error_id: 12,
            error_description: Some("Timeout".to_string()),
            status: TaskStatus::Failed,
            ..Default::default()
        }
    }

    /// The task was solved.
    pub fn is_ready(&self) -> bool {
        self.status == TaskStatus::Ready
    }

    /// The task failed or timed out.
    pub fn is_failed(&self) -> bool {
        self.status == TaskStatus::Failed
    }

    /// Terminal results stop the poll loop.
    pub fn is_terminal(&self) -> bool {
        self.is_ready() || self.is_failed()
    }

    /// Solved token, if any.
    pub fn get_token(&self) -> Option<&str> {
        self.solution.as_ref().and_then(|s| s.get_token())
    }
}

/// Solution payload of a ready result.
///
/// The fields depend on the captcha kind; anything beyond the common token
/// fields lands in `extra` (v3 scores, cookies, user agents).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Solution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g_recaptcha_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Solution {
    /// The solved token, whichever field the service put it in.
    pub fn get_token(&self) -> Option<&str> {
        self.g_recaptcha_response
            .as_deref()
            .or(self.token.as_deref())
            .or(self.text.as_deref())
    }
}

// The service is inconsistent about numeric fields: taskId and balance arrive
// as JSON numbers or strings depending on the endpoint version.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

// Statuses this crate does not know about decode as Unknown, which the
// poll loop treats as non-terminal.
fn status_or_unknown<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let status = String::deserialize(deserializer)?;
    Ok(TaskStatus::from_wire(&status))
}
