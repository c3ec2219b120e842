//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number attached to each readiness evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvaluationId(u64);

impl EvaluationId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eval_{}", self.0)
    }
}

/// One required shipping field as read from the page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub name: String,
    pub value: String,
    /// Non-blank after trimming
    pub valid: bool,
}

impl FieldState {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let valid = !value.trim().is_empty();
        Self {
            name: name.into(),
            value,
            valid,
        }
    }
}

/// Required fields of the shipping form at the moment of an evaluation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub fields: Vec<FieldState>,
}

impl FormState {
    pub fn new(fields: Vec<FieldState>) -> Self {
        Self { fields }
    }

    /// Structural completeness: every required field holds a non-blank value.
    /// A form without required fields is complete.
    pub fn address_complete(&self) -> bool {
        self.fields.iter().all(|field| field.valid)
    }

    pub fn incomplete_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| !field.valid)
            .map(|field| field.name.as_str())
            .collect()
    }
}

/// The signals read during one evaluation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSignals {
    pub all_required_valid: bool,
    pub payment_selected: bool,
    pub address_complete: bool,
    pub quotation_exists: bool,
    pub items_checked: bool,
}

impl ReadinessSignals {
    /// `address_complete` only gates the quotation probe; it is not part of
    /// the conjunction itself.
    pub fn decision(&self) -> ReadinessDecision {
        ReadinessDecision::from_bool(
            self.all_required_valid
                && self.payment_selected
                && self.quotation_exists
                && self.items_checked,
        )
    }
}

/// Whether the proceed control may be enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessDecision {
    ready: bool,
}

impl ReadinessDecision {
    pub fn ready() -> Self {
        Self { ready: true }
    }

    pub fn not_ready() -> Self {
        Self { ready: false }
    }

    pub fn from_bool(ready: bool) -> Self {
        Self { ready }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Value to write to the proceed control's disabled state
    pub fn proceed_disabled(&self) -> bool {
        !self.ready
    }
}

impl fmt::Display for ReadinessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ready {
            write!(f, "ready")
        } else {
            write!(f, "not_ready")
        }
    }
}

/// Element an event was dispatched on, with the ids of its enclosing containers
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Ancestor ids, innermost first
    #[serde(default)]
    pub ancestors: Vec<String>,
}

impl EventTarget {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn within(&self, id: &str) -> bool {
        self.ancestors.iter().any(|ancestor| ancestor == id)
    }

    pub fn is_or_within(&self, id: &str) -> bool {
        self.is(id) || self.within(id)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Browser-level events that may trigger re-evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Value of an editable element changed while typing
    Input(EventTarget),
    /// Committed change of a value or checked state
    Change(EventTarget),
    /// A partial-page update issued by the element completed
    AfterRequest(EventTarget),
}

impl PageEvent {
    pub fn target(&self) -> &EventTarget {
        match self {
            PageEvent::Input(target) | PageEvent::Change(target) | PageEvent::AfterRequest(target) => target,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::Input(_) => "input",
            PageEvent::Change(_) => "change",
            PageEvent::AfterRequest(_) => "after_request",
        }
    }
}
