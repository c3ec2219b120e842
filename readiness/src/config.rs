//! Controller configuration
//!
//! Element ids and names the controller reads from the cart page, the
//! quotation status endpoint, and the ordering policy for overlapping
//! evaluations. Every field has a default matching the storefront's cart
//! page, so an empty JSON object is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::SharedError;
use url::Url;

use crate::error::ReadinessResult;

/// How results of overlapping evaluations are applied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Every evaluation applies its decision when its probe resolves
    #[default]
    LastResolved,
    /// Results older than the newest applied evaluation are dropped
    DiscardSuperseded,
}

/// Element ids and names on the cart page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    /// Container whose required elements must pass constraint validation
    pub shipping_container: String,
    /// Form whose required elements must all be filled in
    pub shipping_form: String,
    pub payment_container: String,
    pub payment_radio_name: String,
    pub item_checkbox_name: String,
    pub proceed_control: String,
    pub cart_lines: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            shipping_container: "cart-shipping".to_string(),
            shipping_form: "shipping-form".to_string(),
            payment_container: "cart-payments".to_string(),
            payment_radio_name: "checked_payment_method".to_string(),
            item_checkbox_name: "checked_item".to_string(),
            proceed_control: "btn-proceed".to_string(),
            cart_lines: "cart-lines".to_string(),
        }
    }
}

impl PageSelectors {
    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("selectors.shipping_container", self.shipping_container.as_str()),
            ("selectors.shipping_form", self.shipping_form.as_str()),
            ("selectors.payment_container", self.payment_container.as_str()),
            ("selectors.payment_radio_name", self.payment_radio_name.as_str()),
            ("selectors.item_checkbox_name", self.item_checkbox_name.as_str()),
            ("selectors.proceed_control", self.proceed_control.as_str()),
            ("selectors.cart_lines", self.cart_lines.as_str()),
        ]
    }
}

/// Remote shipping quotation status check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotationEndpoint {
    pub base_url: String,
    pub status_path: String,
    /// Value of the `Cookie` header carrying the storefront session
    pub session_cookie: Option<String>,
}

impl Default for QuotationEndpoint {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:7000".to_string(),
            status_path: "/cchoice/shipping/quotation/status".to_string(),
            session_cookie: None,
        }
    }
}

impl QuotationEndpoint {
    pub fn status_url(&self) -> ReadinessResult<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(&self.status_path)?)
    }
}

/// Complete controller configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub selectors: PageSelectors,
    pub quotation: QuotationEndpoint,
    pub ordering: OrderingPolicy,
}

impl ControllerConfig {
    pub fn from_json(json: &str) -> ReadinessResult<Self> {
        let config: ControllerConfig = serde_json::from_str(json).map_err(SharedError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ReadinessResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> ReadinessResult<()> {
        for (field, value) in self.selectors.entries() {
            if value.trim().is_empty() {
                return Err(SharedError::InvalidConfig {
                    field: field.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        }

        let url = self.quotation.status_url().map_err(|_| SharedError::InvalidConfig {
            field: "quotation.base_url".to_string(),
            value: self.quotation.base_url.clone(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SharedError::InvalidConfig {
                field: "quotation.base_url".to_string(),
                value: self.quotation.base_url.clone(),
            }
            .into());
        }

        Ok(())
    }
}
