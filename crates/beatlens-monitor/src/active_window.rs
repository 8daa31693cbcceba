//! 활성 창 조회 어댑터.
//!
//! Windows에서는 Win32 포그라운드 창을, 그 외 플랫폼에서는 xcap 창 목록의
//! `is_focused`를 사용한다. xcap 호출은 블로킹이므로 `spawn_blocking`에서 실행한다.

use async_trait::async_trait;
use beatlens_core::error::CoreError;
use beatlens_core::models::window::{WindowBounds, WindowInfo};
use beatlens_core::ports::monitor::WindowProvider;
use tracing::debug;
use xcap::{Monitor, Window};

/// OS 활성 창 모니터
#[derive(Debug, Default, Clone)]
pub struct ActiveWindowMonitor;

impl ActiveWindowMonitor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WindowProvider for ActiveWindowMonitor {
    async fn active_window(&self) -> Result<Option<WindowInfo>, CoreError> {
        tokio::task::spawn_blocking(focused_window)
            .await
            .map_err(|e| CoreError::Internal(format!("활성 창 조회 태스크 실패: {e}")))?
    }

    async fn scale_factor_at(&self, x: i32, y: i32) -> Result<f64, CoreError> {
        tokio::task::spawn_blocking(move || {
            let monitor = Monitor::from_point(x, y)
                .map_err(|e| CoreError::Window(format!("모니터 조회 실패 ({x}, {y}): {e}")))?;
            let scale = monitor
                .scale_factor()
                .map_err(|e| CoreError::Window(format!("모니터 배율 조회 실패: {e}")))?;
            Ok(f64::from(scale))
        })
        .await
        .map_err(|e| CoreError::Internal(format!("모니터 조회 태스크 실패: {e}")))?
    }
}

#[cfg(target_os = "windows")]
fn focused_window() -> Result<Option<WindowInfo>, CoreError> {
    crate::windows::foreground_window()
}

#[cfg(not(target_os = "windows"))]
fn focused_window() -> Result<Option<WindowInfo>, CoreError> {
    let windows =
        Window::all().map_err(|e| CoreError::Window(format!("창 목록 조회 실패: {e}")))?;

    let focused = windows
        .into_iter()
        .filter(|w| !w.is_minimized().unwrap_or(false))
        .find(|w| w.is_focused().unwrap_or(false));

    let Some(window) = focused else {
        return Ok(None);
    };
    window_info(&window).map(Some)
}

/// xcap 창을 도메인 모델로 변환
pub fn window_info(window: &Window) -> Result<WindowInfo, CoreError> {
    let field_err = |e: xcap::XCapError| CoreError::Window(format!("창 속성 조회 실패: {e}"));

    let info = WindowInfo {
        title: window.title().map_err(field_err)?,
        app_name: window.app_name().ok(),
        bounds: WindowBounds::new(
            window.x().map_err(field_err)?,
            window.y().map_err(field_err)?,
            window.width().map_err(field_err)?,
            window.height().map_err(field_err)?,
        ),
    };
    debug!(
        "활성 창: {} ({}x{} at {},{})",
        info.title, info.bounds.width, info.bounds.height, info.bounds.x, info.bounds.y
    );
    Ok(info)
}
