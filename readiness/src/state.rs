//! Controller state management
//!
//! Evaluation sequencing, registered subscriptions and the record of the
//! last applied decision. Nothing here feeds back into an evaluation: every
//! evaluation recomputes its signals from the page.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use shared::{EvaluationId, PageEvent, ReadinessDecision};
use tokio::sync::{Mutex, RwLock};

use crate::config::OrderingPolicy;
use crate::error::{ReadinessError, ReadinessResult};
use crate::subscriptions::Subscription;

/// Counters describing the controller's activity so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationStats {
    pub started: u64,
    pub applied: u64,
    pub superseded: u64,
    pub control_missing: u64,
    pub probes_issued: u64,
}

/// Result of trying to apply one evaluation's decision
#[derive(Debug)]
pub enum CommitOutcome {
    Applied,
    /// A newer evaluation was already applied
    Superseded { newest: EvaluationId },
    /// The proceed control could not be written
    ControlMissing(ReadinessError),
}

#[derive(Debug, Default)]
struct AppliedDecision {
    evaluation: Option<EvaluationId>,
    decision: Option<ReadinessDecision>,
}

pub struct ControllerState {
    ordering: OrderingPolicy,
    last_id: AtomicU64,
    subscriptions: RwLock<Vec<Subscription>>,
    // Held while writing the proceed control so check-and-apply is atomic
    applied: Mutex<AppliedDecision>,
    applied_count: AtomicU64,
    superseded_count: AtomicU64,
    control_missing_count: AtomicU64,
    probes_issued: AtomicU64,
}

impl ControllerState {
    pub fn new(ordering: OrderingPolicy) -> Self {
        Self {
            ordering,
            last_id: AtomicU64::new(0),
            subscriptions: RwLock::new(Vec::new()),
            applied: Mutex::new(AppliedDecision::default()),
            applied_count: AtomicU64::new(0),
            superseded_count: AtomicU64::new(0),
            control_missing_count: AtomicU64::new(0),
            probes_issued: AtomicU64::new(0),
        }
    }

    /// Allocate the id of a new evaluation; ids start at 1
    pub fn next_evaluation_id(&self) -> EvaluationId {
        EvaluationId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn record_probe(&self) {
        self.probes_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn register(&self, subscriptions: Vec<Subscription>) {
        *self.subscriptions.write().await = subscriptions;
    }

    pub async fn is_subscribed(&self, event: &PageEvent) -> bool {
        self.subscriptions
            .read()
            .await
            .iter()
            .any(|subscription| subscription.matches(event))
    }

    /// Write a decision through `apply` unless the ordering policy drops it
    pub async fn commit<F>(&self, id: EvaluationId, decision: ReadinessDecision, apply: F) -> CommitOutcome
    where
        F: FnOnce(bool) -> ReadinessResult<()>,
    {
        let mut applied = self.applied.lock().await;

        if self.ordering == OrderingPolicy::DiscardSuperseded {
            if let Some(newest) = applied.evaluation.filter(|newest| *newest > id) {
                self.superseded_count.fetch_add(1, Ordering::Relaxed);
                return CommitOutcome::Superseded { newest };
            }
        }

        match apply(decision.proceed_disabled()) {
            Ok(()) => {
                applied.evaluation = Some(id);
                applied.decision = Some(decision);
                self.applied_count.fetch_add(1, Ordering::Relaxed);
                CommitOutcome::Applied
            }
            Err(err) => {
                self.control_missing_count.fetch_add(1, Ordering::Relaxed);
                CommitOutcome::ControlMissing(err)
            }
        }
    }

    pub async fn last_decision(&self) -> Option<ReadinessDecision> {
        self.applied.lock().await.decision
    }

    pub fn stats(&self) -> EvaluationStats {
        EvaluationStats {
            started: self.last_id.load(Ordering::SeqCst),
            applied: self.applied_count.load(Ordering::Relaxed),
            superseded: self.superseded_count.load(Ordering::Relaxed),
            control_missing: self.control_missing_count.load(Ordering::Relaxed),
            probes_issued: self.probes_issued.load(Ordering::Relaxed),
        }
    }
}
