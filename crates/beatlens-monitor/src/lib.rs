//! # beatlens-monitor
//!
//! 활성 창 모니터링 어댑터.
//! 포커스된 창과 모니터 배율을 조회하고, 오버레이 위치 갱신 여부를 판단한다.

pub mod active_window;
pub mod window_layout;

#[cfg(target_os = "windows")]
pub mod windows;

pub use active_window::ActiveWindowMonitor;
pub use window_layout::{LayoutDecision, WindowLayoutTracker};
