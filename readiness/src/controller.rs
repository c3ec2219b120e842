//! Readiness controller with dependency injection
//!
//! Each evaluation reads every signal fresh, awaits the quotation probe only
//! when the shipping address is complete, and writes the combined decision
//! to the proceed control. Evaluations triggered in quick succession run
//! concurrently; none is cancelled or debounced.

use std::sync::Arc;

use shared::{eval_debug, eval_info, eval_warn, EvaluationId, PageEvent, ReadinessDecision, ReadinessSignals};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::ReadinessResult;
use crate::state::{CommitOutcome, ControllerState, EvaluationStats};
use crate::subscriptions::Subscription;
use crate::traits::{FormProbe, ItemProbe, PaymentProbe, ProceedControl, QuotationProbe};

/// Readiness controller over injected probes and proceed control
pub struct ReadinessController<F, P, I, Q, C>
where
    F: FormProbe,
    P: PaymentProbe,
    I: ItemProbe,
    Q: QuotationProbe,
    C: ProceedControl,
{
    form: Arc<F>,
    payment: Arc<P>,
    items: Arc<I>,
    quotation: Arc<Q>,
    proceed: Arc<C>,
    state: Arc<ControllerState>,
    config: Arc<ControllerConfig>,
}

impl<F, P, I, Q, C> Clone for ReadinessController<F, P, I, Q, C>
where
    F: FormProbe,
    P: PaymentProbe,
    I: ItemProbe,
    Q: QuotationProbe,
    C: ProceedControl,
{
    fn clone(&self) -> Self {
        Self {
            form: Arc::clone(&self.form),
            payment: Arc::clone(&self.payment),
            items: Arc::clone(&self.items),
            quotation: Arc::clone(&self.quotation),
            proceed: Arc::clone(&self.proceed),
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        }
    }
}

impl<F, P, I, Q, C> ReadinessController<F, P, I, Q, C>
where
    F: FormProbe + 'static,
    P: PaymentProbe + 'static,
    I: ItemProbe + 'static,
    Q: QuotationProbe + 'static,
    C: ProceedControl + 'static,
{
    pub fn new(form: F, payment: P, items: I, quotation: Q, proceed: C, config: ControllerConfig) -> Self {
        Self {
            form: Arc::new(form),
            payment: Arc::new(payment),
            items: Arc::new(items),
            quotation: Arc::new(quotation),
            proceed: Arc::new(proceed),
            state: Arc::new(ControllerState::new(config.ordering)),
            config: Arc::new(config),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn stats(&self) -> EvaluationStats {
        self.state.stats()
    }

    /// Register the page subscriptions and evaluate once so the proceed
    /// control reflects whatever the page was loaded with
    pub async fn initialize(&self) -> ReadinessDecision {
        let subscriptions = Subscription::for_page(&self.config.selectors);
        debug!(count = subscriptions.len(), "Registering page subscriptions");
        self.state.register(subscriptions).await;

        self.evaluate().await
    }

    /// Recompute the readiness decision from the page and apply it
    pub async fn evaluate(&self) -> ReadinessDecision {
        let id = self.state.next_evaluation_id();
        let signals = self.read_signals(id).await;
        let decision = signals.decision();

        eval_debug!(
            id,
            all_required_valid = signals.all_required_valid,
            payment_selected = signals.payment_selected,
            address_complete = signals.address_complete,
            quotation_exists = signals.quotation_exists,
            items_checked = signals.items_checked,
            decision = %decision,
            "Readiness signals combined"
        );

        match self
            .state
            .commit(id, decision, |disabled| self.proceed.set_disabled(disabled))
            .await
        {
            CommitOutcome::Applied => {}
            CommitOutcome::Superseded { newest } => {
                eval_debug!(id, newest = %newest, "Discarding result of superseded evaluation");
            }
            CommitOutcome::ControlMissing(err) => {
                eval_warn!(id, error = %err, "Proceed control unavailable; decision not applied");
            }
        }

        decision
    }

    async fn read_signals(&self, id: EvaluationId) -> ReadinessSignals {
        let Some(form) = self.form.shipping_form() else {
            eval_debug!(id, "Shipping form not found; form not ready");
            return ReadinessSignals::default();
        };

        let all_required_valid = self.form.required_fields_valid();
        let payment_selected = self.payment.payment_selected();
        let address_complete = form.address_complete();

        let quotation_exists = if address_complete {
            self.probe_quotation(id).await
        } else {
            eval_debug!(
                id,
                missing = ?form.incomplete_fields(),
                "Address incomplete; skipping quotation probe"
            );
            false
        };

        // Read after the probe resolves so the freshest selection is used
        let items_checked = self.items.items_checked();

        ReadinessSignals {
            all_required_valid,
            payment_selected,
            address_complete,
            quotation_exists,
            items_checked,
        }
    }

    async fn probe_quotation(&self, id: EvaluationId) -> bool {
        self.state.record_probe();
        match self.quotation.quotation_exists().await {
            Ok(exists) => exists,
            Err(err) => {
                eval_warn!(id, error = %err, "Quotation status probe failed; treating as no quotation");
                false
            }
        }
    }

    /// Whether the event matches a registered subscription
    pub async fn is_trigger(&self, event: &PageEvent) -> bool {
        self.state.is_subscribed(event).await
    }

    /// Start an evaluation for a matching event
    pub async fn dispatch(&self, event: &PageEvent) -> Option<JoinHandle<ReadinessDecision>> {
        if !self.is_trigger(event).await {
            return None;
        }

        let controller = self.clone();
        Some(tokio::spawn(async move { controller.evaluate().await }))
    }

    /// Consume page events until the channel closes, then abort evaluations
    /// still in flight, as navigating away from the page would
    pub async fn run(&self, events: mpsc::Receiver<PageEvent>) -> ReadinessResult<EvaluationStats> {
        self.event_loop(events, false).await
    }

    /// Like [`run`](Self::run) but waits for in-flight evaluations to finish
    /// once the channel closes
    pub async fn run_to_completion(&self, events: mpsc::Receiver<PageEvent>) -> ReadinessResult<EvaluationStats> {
        self.event_loop(events, true).await
    }

    async fn event_loop(
        &self,
        mut events: mpsc::Receiver<PageEvent>,
        drain: bool,
    ) -> ReadinessResult<EvaluationStats> {
        let mut in_flight: JoinSet<ReadinessDecision> = JoinSet::new();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        break;
                    };

                    if self.is_trigger(&event).await {
                        debug!(kind = event.kind(), target = ?event.target().id, "Page event triggers evaluation");
                        let controller = self.clone();
                        in_flight.spawn(async move { controller.evaluate().await });
                    }
                }

                Some(finished) = in_flight.join_next(), if !in_flight.is_empty() => {
                    finished?;
                }
            }
        }

        if drain {
            while let Some(finished) = in_flight.join_next().await {
                finished?;
            }
        } else if !in_flight.is_empty() {
            warn!(pending = in_flight.len(), "Event channel closed; aborting in-flight evaluations");
            in_flight.shutdown().await;
        }

        let stats = self.state.stats();
        if let Some(decision) = self.state.last_decision().await {
            eval_info!(
                EvaluationId::new(stats.started),
                decision = %decision,
                applied = stats.applied,
                probes = stats.probes_issued,
                "Readiness controller stopped"
            );
        } else {
            info!(started = stats.started, "Readiness controller stopped before any decision was applied");
        }

        Ok(stats)
    }
}
