//! Page event subscriptions that trigger re-evaluation

use shared::PageEvent;

use crate::config::PageSelectors;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subscription {
    /// `input` dispatched on or inside a container
    InputWithin { container: String },
    /// `change` dispatched on or inside a container
    ChangeWithin { container: String },
    /// `change` dispatched on an element with this name, anywhere
    ChangeNamed { name: String },
    /// Partial update issued by exactly this element
    AfterRequestOn { element: String },
    /// Partial update issued by an element that is or sits inside a container
    AfterRequestWithin { container: String },
}

impl Subscription {
    /// Subscriptions the controller registers for a cart page
    pub fn for_page(selectors: &PageSelectors) -> Vec<Subscription> {
        vec![
            Subscription::InputWithin {
                container: selectors.shipping_container.clone(),
            },
            Subscription::ChangeWithin {
                container: selectors.shipping_container.clone(),
            },
            Subscription::ChangeWithin {
                container: selectors.payment_container.clone(),
            },
            Subscription::AfterRequestOn {
                element: selectors.shipping_form.clone(),
            },
            Subscription::ChangeNamed {
                name: selectors.item_checkbox_name.clone(),
            },
            Subscription::AfterRequestWithin {
                container: selectors.cart_lines.clone(),
            },
        ]
    }

    pub fn matches(&self, event: &PageEvent) -> bool {
        match (self, event) {
            (Subscription::InputWithin { container }, PageEvent::Input(target)) => {
                target.is_or_within(container)
            }
            (Subscription::ChangeWithin { container }, PageEvent::Change(target)) => {
                target.is_or_within(container)
            }
            (Subscription::ChangeNamed { name }, PageEvent::Change(target)) => target.is_named(name),
            (Subscription::AfterRequestOn { element }, PageEvent::AfterRequest(target)) => {
                target.is(element)
            }
            (Subscription::AfterRequestWithin { container }, PageEvent::AfterRequest(target)) => {
                target.is_or_within(container)
            }
            _ => false,
        }
    }
}
