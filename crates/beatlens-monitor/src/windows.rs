//! Windows 플랫폼 포그라운드 창 조회.
//!
//! Win32 API `GetForegroundWindow` + `GetWindowTextW` + `GetWindowRect` 기반.
//! xcap의 `is_focused`보다 정확하고 창 전체 목록을 돌지 않아 가볍다.

#![cfg(target_os = "windows")]

use beatlens_core::error::CoreError;
use beatlens_core::models::window::{WindowBounds, WindowInfo};
use tracing::debug;
use windows_sys::Win32::Foundation::{HWND, RECT};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowRect, GetWindowTextW, IsIconic,
};

/// 포그라운드 창 정보 조회. 최소화되었거나 크기가 0이면 `None`.
pub fn foreground_window() -> Result<Option<WindowInfo>, CoreError> {
    unsafe {
        let hwnd: HWND = GetForegroundWindow();
        if hwnd.is_null() {
            debug!("활성 창 없음 (GetForegroundWindow → null)");
            return Ok(None);
        }
        if IsIconic(hwnd) != 0 {
            return Ok(None);
        }

        let mut title_buf = [0u16; 512];
        let len = GetWindowTextW(hwnd, title_buf.as_mut_ptr(), title_buf.len() as i32);
        let title = if len > 0 {
            String::from_utf16_lossy(&title_buf[..len as usize])
        } else {
            String::new()
        };

        let Some(bounds) = window_bounds(hwnd) else {
            return Ok(None);
        };

        Ok(Some(WindowInfo {
            title,
            app_name: None,
            bounds,
        }))
    }
}

/// 창 위치/크기 가져오기
fn window_bounds(hwnd: HWND) -> Option<WindowBounds> {
    unsafe {
        let mut rect: RECT = std::mem::zeroed();
        if GetWindowRect(hwnd, &mut rect) == 0 {
            return None;
        }
        let width = (rect.right - rect.left) as u32;
        let height = (rect.bottom - rect.top) as u32;
        (width > 0 && height > 0).then(|| WindowBounds::new(rect.left, rect.top, width, height))
    }
}
