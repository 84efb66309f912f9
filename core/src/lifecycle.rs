//! Lifecycle record for a single algorithm invocation.
//!
//! An [`AlgorithmRequest`] moves through four states:
//!
//! ```text
//! pending ──► processing ──┬──► completed
//!                          └──► failed
//! ```
//!
//! Transitions consume the record and hand back a new one, so a record
//! observed in a terminal state can never be changed through that binding.
//! Invalid transitions are reported as [`LifecycleError::InvalidTransition`]
//! instead of panicking.
//!
//! The record is decoupled from storage: [`AlgorithmRequest::to_record`] and
//! [`AlgorithmRequest::completion_fields`] produce the rows the dispatcher
//! writes, and [`AlgorithmRequest::from_record`] decodes history rows.

use crate::algorithm::AlgorithmKind;
use crate::record_store::Record;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Default table holding lifecycle records.
pub const DEFAULT_TABLE: &str = "algorithm_requests";

/// Unique identifier of one algorithm invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random (v4) request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Status of a lifecycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Created, not yet started
    Pending,
    /// Routine is running
    Processing,
    /// Routine succeeded; `result` is set
    Completed,
    /// Routine failed; `error` is set
    Failed,
}

impl RequestStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed | Self::Failed)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by lifecycle transitions and record decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// A transition was attempted from a state that does not allow it.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: RequestStatus,
        /// Requested status.
        to: RequestStatus,
    },

    /// A stored row could not be decoded into a lifecycle record.
    #[error("Malformed lifecycle record: {0}")]
    MalformedRecord(String),
}

/// One invocation of an algorithm, tracked from creation to a terminal state.
///
/// Invariants, upheld by the transition methods and checked by
/// [`AlgorithmRequest::from_record`]:
///
/// - `completed_at` is set iff the status is terminal
/// - `result` is set iff the status is [`RequestStatus::Completed`]
/// - `error` is set iff the status is [`RequestStatus::Failed`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRequest {
    id: RequestId,
    user_id: String,
    #[serde(rename = "algorithm_type")]
    algorithm_kind: AlgorithmKind,
    input_data: Value,
    status: RequestStatus,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl AlgorithmRequest {
    /// Create a new pending record with a fresh [`RequestId`].
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        algorithm_kind: AlgorithmKind,
        input_data: Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            user_id: user_id.into(),
            algorithm_kind,
            input_data,
            status: RequestStatus::Pending,
            result: None,
            error: None,
            created_at,
            completed_at: None,
        }
    }

    /// Record identifier.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Identity of the caller that issued the request.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Algorithm invoked.
    #[must_use]
    pub const fn algorithm_kind(&self) -> AlgorithmKind {
        self.algorithm_kind
    }

    /// Payload the routine was invoked with.
    #[must_use]
    pub const fn input_data(&self) -> &Value {
        &self.input_data
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Routine output, present once completed.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Failure message, present once failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the terminal transition.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn transition(&self, to: RequestStatus) -> Result<(), LifecycleError> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }

    /// `pending → processing`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::InvalidTransition`] unless the record is pending.
    pub fn mark_processing(mut self) -> Result<Self, LifecycleError> {
        self.transition(RequestStatus::Processing)?;
        self.status = RequestStatus::Processing;
        Ok(self)
    }

    /// `processing → completed`, storing the routine output.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::InvalidTransition`] unless the record is processing.
    pub fn mark_completed(
        mut self,
        result: Value,
        now: DateTime<Utc>,
    ) -> Result<Self, LifecycleError> {
        self.transition(RequestStatus::Completed)?;
        self.status = RequestStatus::Completed;
        self.result = Some(result);
        self.completed_at = Some(now);
        Ok(self)
    }

    /// `processing → failed`, storing the failure message.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::InvalidTransition`] unless the record is processing.
    pub fn mark_failed(
        mut self,
        error: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, LifecycleError> {
        self.transition(RequestStatus::Failed)?;
        self.status = RequestStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(now);
        Ok(self)
    }

    /// Wall time between creation and the terminal transition, e.g. `"42ms"` or `"1.50s"`.
    ///
    /// `None` until the record is terminal.
    #[must_use]
    pub fn processing_time(&self) -> Option<String> {
        let elapsed = self.completed_at?.signed_duration_since(self.created_at);
        let millis = elapsed.num_milliseconds().max(0);
        if millis < 1000 {
            Some(format!("{millis}ms"))
        } else {
            #[allow(clippy::cast_precision_loss)]
            let seconds = millis as f64 / 1000.0;
            Some(format!("{seconds:.2}s"))
        }
    }

    /// The full row written when the record is first persisted.
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("id".into(), Value::String(self.id.to_string()));
        record.insert("user_id".into(), Value::String(self.user_id.clone()));
        record.insert(
            "algorithm_type".into(),
            Value::String(self.algorithm_kind.as_str().into()),
        );
        record.insert("input_data".into(), self.input_data.clone());
        record.insert("created_at".into(), timestamp(self.created_at));
        record.extend(self.completion_fields());
        record
    }

    /// The mutable columns: `status`, `result`, `error` and `completed_at`.
    #[must_use]
    pub fn completion_fields(&self) -> Record {
        let mut fields = Record::new();
        fields.insert("status".into(), Value::String(self.status.as_str().into()));
        fields.insert("result".into(), self.result.clone().unwrap_or(Value::Null));
        fields.insert(
            "error".into(),
            self.error.clone().map_or(Value::Null, Value::String),
        );
        fields.insert(
            "completed_at".into(),
            self.completed_at.map_or(Value::Null, timestamp),
        );
        fields
    }

    /// Decode a stored row, rejecting rows that break the status invariants.
    ///
    /// Unknown columns are ignored.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::MalformedRecord`] if a column is missing, has the
    /// wrong type, or the row is internally inconsistent.
    pub fn from_record(record: Record) -> Result<Self, LifecycleError> {
        let request: Self = serde_json::from_value(Value::Object(record))
            .map_err(|e| LifecycleError::MalformedRecord(e.to_string()))?;
        request.check_invariants()?;
        Ok(request)
    }

    fn check_invariants(&self) -> Result<(), LifecycleError> {
        let terminal = self.status.is_terminal();
        let consistent = self.completed_at.is_some() == terminal
            && self.result.is_some() == (self.status == RequestStatus::Completed)
            && self.error.is_some() == (self.status == RequestStatus::Failed);

        if consistent {
            Ok(())
        } else {
            Err(LifecycleError::MalformedRecord(format!(
                "record {} is inconsistent with status {}",
                self.id, self.status
            )))
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn processing() -> AlgorithmRequest {
        AlgorithmRequest::new("u1", AlgorithmKind::Fibonacci, json!({ "n": 10 }), start())
            .mark_processing()
            .unwrap()
    }

    #[test]
    fn test_new_record_is_pending() {
        let request =
            AlgorithmRequest::new("u1", AlgorithmKind::Sorting, json!({}), start());
        assert_eq!(request.status(), RequestStatus::Pending);
        assert!(request.result().is_none());
        assert!(request.error().is_none());
        assert!(request.completed_at().is_none());
        assert!(request.processing_time().is_none());
    }

    #[test]
    fn test_happy_path_to_completed() {
        let done = processing()
            .mark_completed(json!({ "result": 55 }), start() + Duration::milliseconds(42))
            .unwrap();

        assert_eq!(done.status(), RequestStatus::Completed);
        assert_eq!(done.result(), Some(&json!({ "result": 55 })));
        assert_eq!(done.error(), None);
        assert_eq!(done.completed_at(), Some(start() + Duration::milliseconds(42)));
        assert_eq!(done.processing_time().as_deref(), Some("42ms"));
    }

    #[test]
    fn test_failure_sets_error_and_timestamp() {
        let failed = processing()
            .mark_failed("number is required", start() + Duration::milliseconds(1500))
            .unwrap();

        assert_eq!(failed.status(), RequestStatus::Failed);
        assert_eq!(failed.error(), Some("number is required"));
        assert!(failed.result().is_none());
        assert_eq!(failed.processing_time().as_deref(), Some("1.50s"));
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let done = processing().mark_completed(json!({}), start()).unwrap();
        assert_eq!(
            done.clone().mark_failed("late", start()).unwrap_err(),
            LifecycleError::InvalidTransition {
                from: RequestStatus::Completed,
                to: RequestStatus::Failed,
            }
        );
        assert!(done.mark_processing().is_err());

        let failed = processing().mark_failed("boom", start()).unwrap();
        assert!(failed.mark_completed(json!({}), start()).is_err());
    }

    #[test]
    fn test_pending_cannot_skip_processing() {
        let pending = AlgorithmRequest::new("u1", AlgorithmKind::Fibonacci, json!({}), start());
        assert_eq!(
            pending.mark_completed(json!({}), start()).unwrap_err(),
            LifecycleError::InvalidTransition {
                from: RequestStatus::Pending,
                to: RequestStatus::Completed,
            }
        );
    }

    #[test]
    fn test_status_transition_table() {
        use RequestStatus::{Completed, Failed, Pending, Processing};
        let all = [Pending, Processing, Completed, Failed];
        let legal = [(Pending, Processing), (Processing, Completed), (Processing, Failed)];

        for from in all {
            for to in all {
                assert_eq!(from.can_transition_to(to), legal.contains(&(from, to)));
            }
        }
    }

    #[test]
    fn test_record_shape() {
        let request = processing();
        let record = request.to_record();

        assert_eq!(record["id"], json!(request.id().to_string()));
        assert_eq!(record["user_id"], "u1");
        assert_eq!(record["algorithm_type"], "fibonacci");
        assert_eq!(record["input_data"], json!({ "n": 10 }));
        assert_eq!(record["status"], "processing");
        assert_eq!(record["result"], Value::Null);
        assert_eq!(record["error"], Value::Null);
        assert_eq!(record["created_at"], "2025-01-01T00:00:00.000000Z");
        assert_eq!(record["completed_at"], Value::Null);
    }

    #[test]
    fn test_completion_fields_only_carry_mutable_columns() {
        let done = processing().mark_completed(json!([1]), start()).unwrap();
        let fields = done.completion_fields();

        let mut keys: Vec<_> = fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["completed_at", "error", "result", "status"]);
        assert_eq!(fields["status"], "completed");
    }

    #[test]
    fn test_from_record_round_trip() {
        let done = processing()
            .mark_completed(json!({ "result": 55 }), start() + Duration::seconds(2))
            .unwrap();
        let mut record = done.to_record();
        record.insert("updated_at".into(), json!("ignored"));

        assert_eq!(AlgorithmRequest::from_record(record).unwrap(), done);
    }

    #[test]
    fn test_from_record_accepts_offset_timestamps() {
        let record: Record = serde_json::from_value(json!({
            "id": "6f1c1c1e-8b0a-4a53-9f0e-2b8f4a3e9d11",
            "user_id": "u1",
            "algorithm_type": "prime_check",
            "input_data": {},
            "status": "failed",
            "result": null,
            "error": "number is required",
            "created_at": "2025-01-01T00:00:00+00:00",
            "completed_at": "2025-01-01T00:00:01+00:00"
        }))
        .unwrap();

        let request = AlgorithmRequest::from_record(record).unwrap();
        assert_eq!(request.algorithm_kind(), AlgorithmKind::PrimeCheck);
        assert_eq!(request.processing_time().as_deref(), Some("1.00s"));
    }

    #[test]
    fn test_from_record_rejects_inconsistent_rows() {
        let mut record = processing().to_record();
        record.insert("status".into(), json!("completed"));

        assert!(matches!(
            AlgorithmRequest::from_record(record),
            Err(LifecycleError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_from_record_rejects_unknown_kind() {
        let mut record = processing().to_record();
        record.insert("algorithm_type".into(), json!("quantum_sort"));
        assert!(AlgorithmRequest::from_record(record).is_err());
    }
}
