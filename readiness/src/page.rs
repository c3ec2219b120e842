//! In-memory cart page document
//!
//! A flat list of elements linked to their containers by `parent` id. It
//! answers the queries the page-backed probes need (required elements inside
//! a container, checked inputs by name, constraint validation) and performs
//! the user actions a browser would, returning the events it would dispatch.

use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use shared::{EventTarget, PageEvent, SharedError};
use url::Url;

use crate::error::{ReadinessError, ReadinessResult};

/// Page shared between the probes, the proceed control and the code driving it
pub type SharedPage = Arc<RwLock<Page>>;

pub fn shared_page(page: Page) -> SharedPage {
    Arc::new(RwLock::new(page))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    #[default]
    Container,
    Text,
    Email,
    Tel,
    Number,
    Url,
    Select,
    Radio,
    Checkbox,
    Button,
}

impl ElementKind {
    pub fn is_checkable(self) -> bool {
        matches!(self, ElementKind::Radio | ElementKind::Checkbox)
    }

    pub fn is_editable(self) -> bool {
        matches!(
            self,
            ElementKind::Text
                | ElementKind::Email
                | ElementKind::Tel
                | ElementKind::Number
                | ElementKind::Url
                | ElementKind::Select
        )
    }

    /// Kinds that honor `pattern`, `minlength` and `maxlength`
    fn is_text_like(self) -> bool {
        matches!(
            self,
            ElementKind::Text | ElementKind::Email | ElementKind::Tel | ElementKind::Url
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: ElementKind,
    pub value: String,
    pub required: bool,
    pub checked: bool,
    pub disabled: bool,
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Id of the enclosing container
    pub parent: Option<String>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn container(id: impl Into<String>) -> Self {
        Self::new(ElementKind::Container).with_id(id)
    }

    pub fn input(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(kind)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn within(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Value a script reads from the element. Checkboxes and radios without
    /// an explicit value report `on`.
    pub fn form_value(&self) -> &str {
        if self.kind.is_checkable() && self.value.is_empty() {
            "on"
        } else {
            &self.value
        }
    }

    /// Value after the browser's sanitization for the element's type
    fn sanitized_value(&self) -> &str {
        match self.kind {
            ElementKind::Email | ElementKind::Url => {
                self.value.trim_matches(|c: char| c.is_ascii_whitespace())
            }
            _ => &self.value,
        }
    }
}

/// User actions that can be replayed against a page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PageAction {
    Fill { id: String, value: String },
    Check { id: String },
    Uncheck { id: String },
    /// Remove an element and everything inside it, as a partial update would
    Remove { id: String },
    AfterRequest { id: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    elements: Vec<Element>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn from_json(json: &str) -> ReadinessResult<Self> {
        Ok(serde_json::from_str(json).map_err(SharedError::from)?)
    }

    pub fn load(path: &Path) -> ReadinessResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|element| element.id.as_deref() == Some(id))
    }

    fn element_mut(&mut self, id: &str) -> ReadinessResult<&mut Element> {
        self.elements
            .iter_mut()
            .find(|element| element.id.as_deref() == Some(id))
            .ok_or_else(|| ReadinessError::missing(id))
    }

    /// Ancestor ids of an element, innermost first
    pub fn ancestors(&self, element: &Element) -> Vec<String> {
        let mut ancestors: Vec<String> = Vec::new();
        let mut next = element.parent.as_deref();

        while let Some(id) = next {
            // Malformed snapshots may link containers in a cycle
            if ancestors.iter().any(|seen| seen == id) {
                break;
            }
            ancestors.push(id.to_string());
            next = self.element(id).and_then(|parent| parent.parent.as_deref());
        }

        ancestors
    }

    pub fn is_within(&self, element: &Element, container: &str) -> bool {
        self.ancestors(element).iter().any(|id| id == container)
    }

    /// Required elements inside a container, or `None` if the container is
    /// not on the page
    pub fn required_within(&self, container: &str) -> Option<Vec<&Element>> {
        self.element(container)?;
        Some(
            self.elements
                .iter()
                .filter(|element| element.required && self.is_within(element, container))
                .collect(),
        )
    }

    /// Whether a checked radio or checkbox with this name exists, optionally
    /// restricted to a container. A missing container has no checked inputs.
    pub fn any_checked(&self, name: &str, container: Option<&str>) -> bool {
        if let Some(container) = container {
            if self.element(container).is_none() {
                return false;
            }
        }

        self.elements.iter().any(|element| {
            element.kind.is_checkable()
                && element.checked
                && element.name.as_deref() == Some(name)
                && container.map_or(true, |container| self.is_within(element, container))
        })
    }

    /// Constraint validation of a single element. Disabled elements are
    /// barred from validation and always pass.
    pub fn check_validity(&self, element: &Element) -> bool {
        if element.disabled {
            return true;
        }

        match element.kind {
            ElementKind::Container | ElementKind::Button => true,
            ElementKind::Checkbox => !element.required || element.checked,
            ElementKind::Radio => !element.required || self.radio_group_checked(element),
            _ => value_satisfies_constraints(element),
        }
    }

    fn radio_group_checked(&self, radio: &Element) -> bool {
        match radio.name.as_deref() {
            None => radio.checked,
            Some(name) => self.elements.iter().any(|element| {
                element.kind == ElementKind::Radio
                    && element.checked
                    && element.name.as_deref() == Some(name)
            }),
        }
    }

    pub fn is_disabled(&self, id: &str) -> Option<bool> {
        self.element(id).map(|element| element.disabled)
    }

    pub fn set_disabled(&mut self, id: &str, disabled: bool) -> ReadinessResult<()> {
        self.element_mut(id)?.disabled = disabled;
        Ok(())
    }

    pub fn event_target(&self, element: &Element) -> EventTarget {
        EventTarget {
            id: element.id.clone(),
            name: element.name.clone(),
            ancestors: self.ancestors(element),
        }
    }

    fn target_of(&self, id: &str) -> ReadinessResult<EventTarget> {
        self.element(id)
            .map(|element| self.event_target(element))
            .ok_or_else(|| ReadinessError::missing(id))
    }

    /// Enter a value into an editable element. Text-like elements emit
    /// `input` followed by `change`; selects emit only `change`.
    pub fn fill(&mut self, id: &str, value: impl Into<String>) -> ReadinessResult<Vec<PageEvent>> {
        let element = self.element_mut(id)?;
        if !element.kind.is_editable() {
            return Err(unsupported(id, "fill"));
        }
        element.value = value.into();
        let is_select = element.kind == ElementKind::Select;

        let target = self.target_of(id)?;
        if is_select {
            Ok(vec![PageEvent::Change(target)])
        } else {
            Ok(vec![PageEvent::Input(target.clone()), PageEvent::Change(target)])
        }
    }

    /// Check a checkbox or select a radio, unchecking the rest of its group.
    /// Checking an already checked input dispatches nothing.
    pub fn check(&mut self, id: &str) -> ReadinessResult<Vec<PageEvent>> {
        let (kind, name, already_checked) = {
            let element = self.element(id).ok_or_else(|| ReadinessError::missing(id))?;
            (element.kind, element.name.clone(), element.checked)
        };
        if !kind.is_checkable() {
            return Err(unsupported(id, "check"));
        }
        if already_checked {
            return Ok(Vec::new());
        }

        if let (ElementKind::Radio, Some(name)) = (kind, name.as_deref()) {
            for radio in self.elements.iter_mut().filter(|element| {
                element.kind == ElementKind::Radio && element.name.as_deref() == Some(name)
            }) {
                radio.checked = false;
            }
        }
        self.element_mut(id)?.checked = true;

        Ok(vec![PageEvent::Change(self.target_of(id)?)])
    }

    /// Uncheck a checkbox. Radios cannot be unchecked by the user.
    pub fn uncheck(&mut self, id: &str) -> ReadinessResult<Vec<PageEvent>> {
        let element = self.element_mut(id)?;
        if element.kind != ElementKind::Checkbox {
            return Err(unsupported(id, "uncheck"));
        }
        if !element.checked {
            return Ok(Vec::new());
        }
        element.checked = false;

        Ok(vec![PageEvent::Change(self.target_of(id)?)])
    }

    /// Remove an element together with its descendants
    pub fn remove(&mut self, id: &str) -> ReadinessResult<()> {
        if self.element(id).is_none() {
            return Err(ReadinessError::missing(id));
        }

        let doomed: Vec<bool> = self
            .elements
            .iter()
            .map(|element| element.id.as_deref() == Some(id) || self.is_within(element, id))
            .collect();
        let mut flags = doomed.into_iter();
        self.elements.retain(|_| !flags.next().unwrap_or(false));
        Ok(())
    }

    /// Completion of a partial-page update issued by an element
    pub fn after_request(&self, id: &str) -> ReadinessResult<PageEvent> {
        Ok(PageEvent::AfterRequest(self.target_of(id)?))
    }

    pub fn apply(&mut self, action: &PageAction) -> ReadinessResult<Vec<PageEvent>> {
        match action {
            PageAction::Fill { id, value } => self.fill(id, value.clone()),
            PageAction::Check { id } => self.check(id),
            PageAction::Uncheck { id } => self.uncheck(id),
            PageAction::Remove { id } => self.remove(id).map(|_| Vec::new()),
            PageAction::AfterRequest { id } => Ok(vec![self.after_request(id)?]),
        }
    }
}

fn unsupported(id: &str, action: &str) -> ReadinessError {
    ReadinessError::UnsupportedAction {
        id: id.to_string(),
        action: action.to_string(),
    }
}

fn value_satisfies_constraints(element: &Element) -> bool {
    let value = element.sanitized_value();
    if value.is_empty() {
        return !element.required;
    }

    let type_matches = match element.kind {
        ElementKind::Email => email_pattern().is_match(value),
        ElementKind::Number => {
            float_pattern().is_match(value) && value.parse::<f64>().is_ok_and(f64::is_finite)
        }
        ElementKind::Url => Url::parse(value).is_ok(),
        _ => true,
    };

    if !element.kind.is_text_like() {
        return type_matches;
    }

    // Lengths count UTF-16 code units
    let length = value.encode_utf16().count();
    let length_ok = element.min_length.map_or(true, |min| length >= min)
        && element.max_length.map_or(true, |max| length <= max);

    type_matches && length_ok && pattern_matches(element.pattern.as_deref(), value)
}

/// The pattern must match the whole value; an invalid pattern is ignored
fn pattern_matches(pattern: Option<&str>, value: &str) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex.is_match(value),
        Err(_) => true,
    }
}

/// Valid floating-point number as HTML defines it: no leading `+`, no
/// trailing `.`
fn float_pattern() -> &'static Regex {
    static FLOAT: OnceLock<Regex> = OnceLock::new();
    FLOAT.get_or_init(|| {
        Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("float pattern is a valid regex")
    })
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is a valid regex")
    })
}
