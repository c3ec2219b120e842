//! Test fixtures for readiness tests

use readiness::page::{Element, ElementKind, Page};
use shared::{FieldState, FormState};

pub struct TestFixtures;

impl TestFixtures {
    pub const STATUS_PATH: &'static str = "/cchoice/shipping/quotation/status";
    pub const PROCEED: &'static str = "btn-proceed";

    /// Shipping form with every required field filled in
    pub fn complete_form() -> FormState {
        FormState::new(vec![
            FieldState::new("address_line1", "12 Rizal Street"),
            FieldState::new("city", "Makati"),
            FieldState::new("postal", "1203"),
        ])
    }

    /// Shipping form with a blank city
    pub fn incomplete_form() -> FormState {
        FormState::new(vec![
            FieldState::new("address_line1", "12 Rizal Street"),
            FieldState::new("city", ""),
            FieldState::new("postal", "1203"),
        ])
    }

    /// Cart page with an empty shipping form, nothing selected and proceed disabled
    pub fn cart_page() -> Page {
        let field = |kind: ElementKind, name: &str| {
            Element::input(kind, name).with_id(name).within("shipping-form")
        };

        Page::with_elements(vec![
            Element::container("cart-shipping"),
            Element::container("shipping-form").within("cart-shipping"),
            field(ElementKind::Text, "address_line1").required(),
            field(ElementKind::Text, "address_line2"),
            field(ElementKind::Text, "barangay").required(),
            field(ElementKind::Text, "city").required(),
            field(ElementKind::Select, "province").required(),
            field(ElementKind::Text, "postal").required().with_pattern("[0-9]{4}"),
            field(ElementKind::Email, "email").required(),
            field(ElementKind::Tel, "mobile_no").required(),
            Element::container("cart-payments"),
            Element::input(ElementKind::Radio, "checked_payment_method")
                .with_id("pm-cod")
                .within("cart-payments"),
            Element::input(ElementKind::Radio, "checked_payment_method")
                .with_id("pm-card")
                .within("cart-payments"),
            Element::container("cart-lines"),
            Element::container("line-1").within("cart-lines"),
            Element::input(ElementKind::Checkbox, "checked_item")
                .with_id("item-1")
                .within("line-1"),
            Element::new(ElementKind::Button).with_id("qty-inc-1").within("line-1"),
            Element::new(ElementKind::Button).with_id(Self::PROCEED).disabled(),
        ])
    }

    /// Values for every required shipping field
    pub fn shipping_values() -> Vec<(&'static str, &'static str)> {
        vec![
            ("address_line1", "12 Rizal Street"),
            ("barangay", "San Antonio"),
            ("city", "Makati"),
            ("province", "Metro Manila"),
            ("postal", "1203"),
            ("email", "buyer@example.ph"),
            ("mobile_no", "09171234567"),
        ]
    }

    /// Cart page as it looks when the buyer has already filled everything in
    pub fn ready_cart_page() -> Page {
        let mut page = Self::cart_page();
        for (id, value) in Self::shipping_values() {
            page.fill(id, value).unwrap();
        }
        page.check("pm-cod").unwrap();
        page.check("item-1").unwrap();
        page
    }
}
