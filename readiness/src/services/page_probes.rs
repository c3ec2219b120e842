//! Probes and proceed control backed by the in-memory page

use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use shared::{FieldState, FormState};
use tracing::debug;

use crate::config::PageSelectors;
use crate::error::ReadinessResult;
use crate::page::{Page, SharedPage};
use crate::traits::{FormProbe, ItemProbe, PaymentProbe, ProceedControl};

// A panic while the page was locked leaves it readable; probes keep going.
fn read_page(page: &SharedPage) -> RwLockReadGuard<'_, Page> {
    page.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_page(page: &SharedPage) -> RwLockWriteGuard<'_, Page> {
    page.write().unwrap_or_else(PoisonError::into_inner)
}

/// Shipping form probe over the page
pub struct PageFormProbe {
    page: SharedPage,
    selectors: PageSelectors,
}

impl PageFormProbe {
    pub fn new(page: SharedPage, selectors: PageSelectors) -> Self {
        Self { page, selectors }
    }
}

impl FormProbe for PageFormProbe {
    fn required_fields_valid(&self) -> bool {
        let page = read_page(&self.page);
        match page.required_within(&self.selectors.shipping_container) {
            Some(required) => required.iter().all(|element| page.check_validity(element)),
            None => {
                debug!(container = %self.selectors.shipping_container, "Shipping container not found");
                false
            }
        }
    }

    fn shipping_form(&self) -> Option<FormState> {
        let page = read_page(&self.page);
        let required = page.required_within(&self.selectors.shipping_form)?;

        let fields = required
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let name = element
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .or_else(|| element.id.clone())
                    .unwrap_or_else(|| format!("field-{index}"));
                FieldState::new(name, element.form_value())
            })
            .collect();

        Some(FormState::new(fields))
    }
}

/// Payment selection probe over the page
pub struct PagePaymentProbe {
    page: SharedPage,
    selectors: PageSelectors,
}

impl PagePaymentProbe {
    pub fn new(page: SharedPage, selectors: PageSelectors) -> Self {
        Self { page, selectors }
    }
}

impl PaymentProbe for PagePaymentProbe {
    fn payment_selected(&self) -> bool {
        read_page(&self.page).any_checked(
            &self.selectors.payment_radio_name,
            Some(&self.selectors.payment_container),
        )
    }
}

/// Cart line selection probe over the page
pub struct PageItemProbe {
    page: SharedPage,
    selectors: PageSelectors,
}

impl PageItemProbe {
    pub fn new(page: SharedPage, selectors: PageSelectors) -> Self {
        Self { page, selectors }
    }
}

impl ItemProbe for PageItemProbe {
    fn items_checked(&self) -> bool {
        read_page(&self.page).any_checked(&self.selectors.item_checkbox_name, None)
    }
}

/// Proceed control on the page
pub struct PageProceedControl {
    page: SharedPage,
    selectors: PageSelectors,
}

impl PageProceedControl {
    pub fn new(page: SharedPage, selectors: PageSelectors) -> Self {
        Self { page, selectors }
    }

    pub fn is_disabled(&self) -> Option<bool> {
        read_page(&self.page).is_disabled(&self.selectors.proceed_control)
    }
}

impl ProceedControl for PageProceedControl {
    fn set_disabled(&self, disabled: bool) -> ReadinessResult<()> {
        write_page(&self.page).set_disabled(&self.selectors.proceed_control, disabled)
    }
}
