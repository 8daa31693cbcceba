//! 메인 창 포커스에 따른 모니터링 시작/중지 통합 테스트 (가상 시간).

mod common;

use std::time::Duration;

use beatlens_app::game_monitor::MonitorPhase;
use beatlens_app::main_window::MainWindowEvent;
use beatlens_core::models::window::WindowBounds;
use common::{Harness, HostCall, GAME_TITLE};
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn starting_without_focus_begins_monitoring() {
    let h = Harness::new();
    h.monitor.initialize();

    sleep(Duration::from_millis(1000)).await;
    assert!(h.overlay.is_created());
    assert!(h.monitor.is_monitoring());
    assert_eq!(h.monitor.phase(), MonitorPhase::Tracking);

    h.set_active_window(GAME_TITLE, WindowBounds::new(0, 0, 1920, 1080));
    sleep(Duration::from_millis(300)).await;
    assert_eq!(h.monitor.phase(), MonitorPhase::Overlaying);
    assert!(h.overlay.is_visible());

    h.main_window.handle_event(MainWindowEvent::Focus);
    sleep(Duration::from_millis(50)).await;
    assert!(!h.monitor.is_monitoring());
    assert_eq!(h.monitor.phase(), MonitorPhase::Idle);
    assert!(!h.overlay.is_visible());

    h.monitor.cleanup();
}

#[tokio::test(start_paused = true)]
async fn focus_during_startup_grace_keeps_idle() {
    let h = Harness::new();
    h.main_window.handle_event(MainWindowEvent::Focus);
    h.monitor.initialize();

    sleep(Duration::from_millis(1000)).await;
    assert!(!h.overlay.is_created());
    assert!(!h.monitor.is_monitoring());
    assert_eq!(h.monitor.phase(), MonitorPhase::Idle);

    h.monitor.cleanup();
}

#[tokio::test(start_paused = true)]
async fn quick_refocus_cancels_monitoring() {
    let h = Harness::new();
    h.main_window.handle_event(MainWindowEvent::Focus);
    h.monitor.initialize();
    sleep(Duration::from_millis(600)).await;

    h.main_window.handle_event(MainWindowEvent::Blur);
    sleep(Duration::from_millis(100)).await;
    h.main_window.handle_event(MainWindowEvent::Focus);
    sleep(Duration::from_millis(500)).await;

    // 오버레이는 첫 blur에서 만들어지지만 모니터링은 시작하지 않는다
    assert!(h.overlay.is_created());
    assert!(!h.monitor.is_monitoring());

    h.monitor.cleanup();
}

#[tokio::test(start_paused = true)]
async fn running_loops_verify_a_result_once() {
    let h = Harness::new();
    h.set_active_window(GAME_TITLE, WindowBounds::new(0, 0, 1920, 1080));
    h.recognizer.set_text("JUDGEMENT DETAILS");
    h.monitor.initialize();

    sleep(Duration::from_millis(3500)).await;
    assert!(h.capturer.calls() >= 2);
    assert_eq!(h.verifier.calls(), 1);
    assert_eq!(h.main_host.results.lock().len(), 1);

    h.monitor.cleanup();
}

#[tokio::test(start_paused = true)]
async fn cleanup_stops_loops_and_destroys_overlay() {
    let h = Harness::new();
    h.monitor.initialize();
    sleep(Duration::from_millis(1000)).await;
    assert!(h.monitor.is_monitoring());

    let generation = h.monitor.generation();
    h.monitor.cleanup();

    assert!(!h.monitor.is_monitoring());
    assert!(!h.overlay.is_created());
    assert_eq!(h.overlay_host.count(&HostCall::Destroy), 1);
    assert!(h.monitor.generation() > generation);

    // 정리 후에는 폴링하지 않는다
    let polls = h.windows.calls.load(std::sync::atomic::Ordering::SeqCst);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(
        h.windows.calls.load(std::sync::atomic::Ordering::SeqCst),
        polls
    );
}
