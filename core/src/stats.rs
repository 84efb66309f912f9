//! Per-user usage statistics over request history.

use crate::algorithm::AlgorithmKind;
use crate::lifecycle::{AlgorithmRequest, RequestStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts over one caller's lifecycle records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Every record, whatever its status
    pub total_requests: usize,
    /// Records that reached `completed`
    pub completed_requests: usize,
    /// Records that reached `failed`
    pub failed_requests: usize,
    /// Record count per algorithm kind; kinds never used are absent
    pub algorithm_usage: BTreeMap<AlgorithmKind, usize>,
}

impl UsageStats {
    /// Tally `requests`.
    #[must_use]
    pub fn from_requests<'a>(requests: impl IntoIterator<Item = &'a AlgorithmRequest>) -> Self {
        requests
            .into_iter()
            .fold(Self::default(), |mut stats, request| {
                stats.total_requests += 1;
                match request.status() {
                    RequestStatus::Completed => stats.completed_requests += 1,
                    RequestStatus::Failed => stats.failed_requests += 1,
                    RequestStatus::Pending | RequestStatus::Processing => {}
                }
                *stats
                    .algorithm_usage
                    .entry(request.algorithm_kind())
                    .or_default() += 1;
                stats
            })
    }
}
