//! Test helpers and builder patterns for readiness tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use readiness::page::SharedPage;
use readiness::services::{HttpQuotationProbe, PageFormProbe, PageItemProbe, PagePaymentProbe, PageProceedControl};
use readiness::traits::{MockFormProbe, MockItemProbe, MockPaymentProbe, MockQuotationProbe};
use readiness::{ControllerConfig, OrderingPolicy, ProceedControl, QuotationEndpoint, ReadinessController, ReadinessError, ReadinessResult};
use shared::FormState;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

use super::fixtures::TestFixtures;

pub type MockController =
    ReadinessController<MockFormProbe, MockPaymentProbe, MockItemProbe, MockQuotationProbe, RecordingControl>;

pub type PageController =
    ReadinessController<PageFormProbe, PagePaymentProbe, PageItemProbe, HttpQuotationProbe, PageProceedControl>;

/// Proceed control that records every disabled value written to it
#[derive(Clone, Default)]
pub struct RecordingControl {
    writes: Arc<Mutex<Vec<bool>>>,
    missing: bool,
}

impl RecordingControl {
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last_disabled(&self) -> Option<bool> {
        self.writes().last().copied()
    }
}

impl ProceedControl for RecordingControl {
    fn set_disabled(&self, disabled: bool) -> ReadinessResult<()> {
        if self.missing {
            return Err(ReadinessError::missing(TestFixtures::PROCEED));
        }
        self.writes.lock().unwrap().push(disabled);
        Ok(())
    }
}

/// Builder for controllers over mock probes with sensible defaults: every
/// local signal true, complete address, quotation probe never expected
pub struct ControllerBuilder {
    required_valid: bool,
    form: Option<FormState>,
    payment_selected: bool,
    items_checked: Arc<AtomicBool>,
    quotation: MockQuotationProbe,
    control: RecordingControl,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        let mut quotation = MockQuotationProbe::new();
        quotation.expect_quotation_exists().times(0);

        Self {
            required_valid: true,
            form: Some(TestFixtures::complete_form()),
            payment_selected: true,
            items_checked: Arc::new(AtomicBool::new(true)),
            quotation,
            control: RecordingControl::default(),
        }
    }

    pub fn with_required_valid(mut self, valid: bool) -> Self {
        self.required_valid = valid;
        self
    }

    pub fn with_form(mut self, form: Option<FormState>) -> Self {
        self.form = form;
        self
    }

    pub fn with_payment_selected(mut self, selected: bool) -> Self {
        self.payment_selected = selected;
        self
    }

    pub fn with_items_checked(self, checked: bool) -> Self {
        self.items_checked.store(checked, Ordering::SeqCst);
        self
    }

    /// Share the item selection flag so a test can flip it between evaluations
    pub fn with_items_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.items_checked = flag;
        self
    }

    /// Expect `times` probes, each answering `exists`
    pub fn with_quotation(mut self, exists: bool, times: usize) -> Self {
        let mut quotation = MockQuotationProbe::new();
        quotation
            .expect_quotation_exists()
            .times(times)
            .returning(move || Ok(exists));
        self.quotation = quotation;
        self
    }

    /// Expect one probe that fails at the transport level
    pub fn with_failing_quotation(mut self) -> Self {
        let mut quotation = MockQuotationProbe::new();
        quotation.expect_quotation_exists().times(1).returning(|| {
            Err(ReadinessError::QuotationProbe {
                message: "connection reset by peer".to_string(),
            })
        });
        self.quotation = quotation;
        self
    }

    pub fn with_control(mut self, control: RecordingControl) -> Self {
        self.control = control;
        self
    }

    pub fn build(self) -> (MockController, RecordingControl) {
        let mut form = MockFormProbe::new();
        let required_valid = self.required_valid;
        form.expect_required_fields_valid().returning(move || required_valid);
        let form_state = self.form;
        form.expect_shipping_form().returning(move || form_state.clone());

        let mut payment = MockPaymentProbe::new();
        let payment_selected = self.payment_selected;
        payment.expect_payment_selected().returning(move || payment_selected);

        let mut items = MockItemProbe::new();
        let flag = self.items_checked;
        items
            .expect_items_checked()
            .returning(move || flag.load(Ordering::SeqCst));

        let control = self.control.clone();
        let controller = ReadinessController::new(
            form,
            payment,
            items,
            self.quotation,
            self.control,
            ControllerConfig::default(),
        );

        (controller, control)
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Mock storefront answering the quotation status check with `status`
    pub async fn status_server(status: u16, expected_calls: impl Into<Times>) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TestFixtures::STATUS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    /// Controller wired to the page and to a storefront at `base_url`
    pub fn page_controller(page: &SharedPage, base_url: &str, ordering: OrderingPolicy) -> PageController {
        let config = ControllerConfig {
            quotation: QuotationEndpoint {
                base_url: base_url.to_string(),
                ..QuotationEndpoint::default()
            },
            ordering,
            ..ControllerConfig::default()
        };
        let selectors = config.selectors.clone();

        ReadinessController::new(
            PageFormProbe::new(page.clone(), selectors.clone()),
            PagePaymentProbe::new(page.clone(), selectors.clone()),
            PageItemProbe::new(page.clone(), selectors.clone()),
            HttpQuotationProbe::new(&config.quotation).unwrap(),
            PageProceedControl::new(page.clone(), selectors),
            config,
        )
    }

    pub fn proceed_disabled(page: &SharedPage) -> Option<bool> {
        page.read().unwrap().is_disabled(TestFixtures::PROCEED)
    }
}
