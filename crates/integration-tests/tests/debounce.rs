//! Debounced quantity editing driven through the controller with virtual
//! time. No test here sleeps; deadlines are exercised by passing explicit
//! instants to `handle_at` and `tick_at`.

#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use tidewater_core::{CartId, FetchOutcome, Outcome};
use tidewater_engine::{
    CartController, DEBOUNCE_WINDOW, MemoryCartIdStore, QuantityStep, UiEvent,
};
use tidewater_integration_tests::{RecordingRenderer, ScriptedGateway, cart_with_line};

fn keystroke(line_id: &str, value: &str) -> UiEvent {
    UiEvent::QuantityInput {
        line_id: line_id.to_string(),
        value: value.to_string(),
    }
}

async fn restored_controller(
    gateway: ScriptedGateway,
) -> CartController<ScriptedGateway, MemoryCartIdStore, RecordingRenderer> {
    gateway.push_fetch(FetchOutcome::Found(cart_with_line("gid://cart/A", "line-1", 2)));
    let store = MemoryCartIdStore::with_id(CartId::from("gid://cart/A"));
    let mut controller = CartController::new(gateway, store, RecordingRenderer::new());
    controller.bootstrap().await;
    controller
}

#[tokio::test]
async fn test_burst_of_keystrokes_yields_one_update() {
    let gateway = ScriptedGateway::new();
    gateway.push_outcome(Outcome::Success(cart_with_line("gid://cart/A", "line-1", 7)));
    let mut controller = restored_controller(gateway.clone()).await;
    let start = Instant::now();

    for (offset_ms, value) in [(0, "1"), (120, "17"), (240, "7")] {
        controller
            .handle_at(
                keystroke("line-1", value),
                start + Duration::from_millis(offset_ms),
            )
            .await;
    }

    // Ticks inside the still-open window do nothing.
    controller
        .tick_at(start + Duration::from_millis(600))
        .await;
    assert!(gateway.calls().iter().all(|call| call.starts_with("fetch")));

    // One tick past quiescence fires exactly one update with the final value.
    controller
        .tick_at(start + Duration::from_millis(240) + DEBOUNCE_WINDOW)
        .await;
    assert_eq!(
        gateway.calls().last().unwrap(),
        "update gid://cart/A line-1 7"
    );
    assert_eq!(
        gateway
            .calls()
            .iter()
            .filter(|call| call.starts_with("update"))
            .count(),
        1
    );
    assert_eq!(controller.snapshot().unwrap().total_quantity, 7);
}

#[tokio::test]
async fn test_repeated_ticks_after_fire_are_idempotent() {
    let gateway = ScriptedGateway::new();
    gateway.push_outcome(Outcome::Success(cart_with_line("gid://cart/A", "line-1", 4)));
    let mut controller = restored_controller(gateway.clone()).await;
    let start = Instant::now();

    controller.handle_at(keystroke("line-1", "4"), start).await;
    let after = start + DEBOUNCE_WINDOW + Duration::from_millis(1);
    controller.tick_at(after).await;
    controller.tick_at(after + Duration::from_secs(1)).await;
    controller.tick_at(after + Duration::from_secs(2)).await;

    assert_eq!(
        gateway
            .calls()
            .iter()
            .filter(|call| call.starts_with("update"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_zero_keystroke_removes_immediately() {
    let gateway = ScriptedGateway::new();
    gateway.push_outcome(Outcome::Success(cart_with_line("gid://cart/A", "line-1", 1)));
    let mut controller = restored_controller(gateway.clone()).await;
    let start = Instant::now();

    controller.handle_at(keystroke("line-1", "9"), start).await;
    controller
        .handle_at(keystroke("line-1", "0"), start + Duration::from_millis(50))
        .await;

    // The remove went out without waiting for the window, and the held
    // edit for 9 was cancelled.
    assert_eq!(
        gateway.calls().last().unwrap(),
        "remove gid://cart/A line-1"
    );
    controller.tick_at(start + Duration::from_secs(5)).await;
    assert!(!gateway.calls().iter().any(|call| call.starts_with("update")));
}

#[tokio::test]
async fn test_pending_edit_survives_intervening_add_and_fires_once() {
    let gateway = ScriptedGateway::new();
    gateway.push_outcome(Outcome::Success(cart_with_line("gid://cart/A", "line-1", 3)));
    let mut controller = restored_controller(gateway.clone()).await;
    let start = Instant::now();

    controller.handle_at(keystroke("line-1", "5"), start).await;

    // An add lands and completes before the window closes; the held edit
    // is untouched by it and still fires exactly once at quiescence.
    controller
        .handle_at(
            UiEvent::AddToCart {
                variant_id: "variant-2".to_string(),
            },
            start + Duration::from_millis(100),
        )
        .await;

    gateway.push_outcome(Outcome::Success(cart_with_line("gid://cart/A", "line-1", 5)));
    controller
        .tick_at(start + DEBOUNCE_WINDOW + Duration::from_millis(1))
        .await;

    assert_eq!(
        gateway
            .calls()
            .iter()
            .filter(|call| call.starts_with("update"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_stepper_dispatches_without_debounce() {
    let gateway = ScriptedGateway::new();
    gateway.push_outcome(Outcome::Success(cart_with_line("gid://cart/A", "line-1", 3)));
    let mut controller = restored_controller(gateway.clone()).await;

    controller
        .handle(UiEvent::StepQuantity {
            line_id: "line-1".to_string(),
            step: QuantityStep::Increment,
            input_value: None,
        })
        .await;

    // Stepper clicks are not debounced: the update fires on the spot,
    // derived from the authoritative quantity (2 -> 3).
    assert_eq!(
        gateway.calls().last().unwrap(),
        "update gid://cart/A line-1 3"
    );
}
