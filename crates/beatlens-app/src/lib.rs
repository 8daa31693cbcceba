//! # beatlens-app
//!
//! 게임 창 모니터와 자동 캡처 파이프라인의 오케스트레이션 계층.
//! 바이너리(`main.rs`)는 여기 있는 서비스에 어댑터를 주입해 실행한다.

pub mod game_monitor;
pub mod ipc;
pub mod lifecycle;
pub mod main_window;
pub mod overlay_window;

pub use game_monitor::{
    CaptureOutcome, CapturePhase, GameMonitorService, MonitorDeps, MonitorOptions, MonitorPhase,
};
pub use main_window::{MainWindowEvent, MainWindowService};
pub use overlay_window::OverlayWindowService;
