//! End-to-end tests: in-memory cart page, page-backed probes and a mock
//! storefront answering the quotation status check

mod common;

use std::time::Duration;

use common::{TestFixtures, TestHelpers};
use readiness::page::shared_page;
use readiness::OrderingPolicy;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_empty_page_stays_disabled_without_network() {
    let server = TestHelpers::status_server(200, 0u64).await;
    let page = shared_page(TestFixtures::cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);

    let decision = controller.initialize().await;

    assert!(!decision.is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
    assert_eq!(controller.stats().probes_issued, 0);
}

#[tokio::test]
async fn test_prefilled_page_is_enabled_at_startup() {
    let server = TestHelpers::status_server(200, 1u64).await;
    let page = shared_page(TestFixtures::ready_cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);

    assert!(controller.initialize().await.is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(false));
}

#[tokio::test]
async fn test_missing_quotation_keeps_proceed_disabled() {
    let server = TestHelpers::status_server(404, 1u64).await;
    let page = shared_page(TestFixtures::ready_cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);

    assert!(!controller.initialize().await.is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
}

#[tokio::test]
async fn test_unreachable_storefront_keeps_proceed_disabled() {
    let page = shared_page(TestFixtures::ready_cart_page());
    let controller = TestHelpers::page_controller(&page, "http://127.0.0.1:1", OrderingPolicy::LastResolved);

    assert!(!controller.initialize().await.is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
    assert_eq!(controller.stats().probes_issued, 1);
}

#[tokio::test]
async fn test_checkout_flow_through_event_loop() {
    let server = TestHelpers::status_server(200, 1u64..).await;
    let page = shared_page(TestFixtures::cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);
    controller.initialize().await;

    let (sender, receiver) = mpsc::channel(64);
    let runner = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.run_to_completion(receiver).await })
    };

    let mut events = Vec::new();
    {
        let mut page = page.write().unwrap();
        for (id, value) in TestFixtures::shipping_values() {
            events.extend(page.fill(id, value).unwrap());
        }
        events.extend(page.check("pm-card").unwrap());
        events.extend(page.check("item-1").unwrap());
    }
    for event in events {
        sender.send(event).await.unwrap();
    }
    drop(sender);

    let stats = runner.await.unwrap().unwrap();
    assert!(stats.probes_issued >= 1);
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(false));
}

#[tokio::test]
async fn test_unchecking_only_item_disables_proceed() {
    let server = TestHelpers::status_server(200, 2u64).await;
    let page = shared_page(TestFixtures::ready_cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);
    assert!(controller.initialize().await.is_ready());

    let events = page.write().unwrap().uncheck("item-1").unwrap();
    assert_eq!(events.len(), 1);

    let handle = controller.dispatch(&events[0]).await.expect("item change triggers evaluation");
    assert!(!handle.await.unwrap().is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
}

#[tokio::test]
async fn test_cart_line_update_triggers_evaluation() {
    let server = TestHelpers::status_server(200, 2u64).await;
    let page = shared_page(TestFixtures::ready_cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);
    controller.initialize().await;

    // Removing the only cart line through a partial update
    let event = {
        let mut page = page.write().unwrap();
        let event = page.after_request("qty-inc-1").unwrap();
        page.remove("line-1").unwrap();
        event
    };

    let handle = controller.dispatch(&event).await.expect("cart line update triggers evaluation");
    assert!(!handle.await.unwrap().is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
}

#[tokio::test]
async fn test_invalid_field_blocks_despite_quotation() {
    let server = TestHelpers::status_server(200, 1u64).await;
    let mut ready = TestFixtures::ready_cart_page();
    ready.fill("email", "not-an-email").unwrap();
    let page = shared_page(ready);
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);

    assert!(!controller.initialize().await.is_ready());
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
}

#[tokio::test]
async fn test_missing_proceed_button_does_not_panic() {
    let server = TestHelpers::status_server(200, 1u64).await;
    let mut ready = TestFixtures::ready_cart_page();
    ready.remove(TestFixtures::PROCEED).unwrap();
    let page = shared_page(ready);
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);

    assert!(controller.initialize().await.is_ready());
    assert_eq!(controller.stats().control_missing, 1);
}

#[tokio::test]
async fn test_closing_channel_aborts_pending_probes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TestFixtures::STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let page = shared_page(TestFixtures::cart_page());
    let controller = TestHelpers::page_controller(&page, &server.uri(), OrderingPolicy::LastResolved);
    controller.initialize().await;

    let (sender, receiver) = mpsc::channel(64);
    // Complete the page, then report only the final item check
    let events = {
        let mut page = page.write().unwrap();
        for (id, value) in TestFixtures::shipping_values() {
            page.fill(id, value).unwrap();
        }
        page.check("pm-cod").unwrap();
        page.check("item-1").unwrap()
    };
    for event in events {
        sender.send(event).await.unwrap();
    }
    drop(sender);

    let stats = tokio::time::timeout(Duration::from_secs(2), controller.run(receiver))
        .await
        .expect("run returns once the channel closes")
        .unwrap();

    // Only the initial evaluation was applied
    assert_eq!(stats.applied, 1);
    assert_eq!(TestHelpers::proceed_disabled(&page), Some(true));
}
