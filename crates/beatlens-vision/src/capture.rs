//! 게임 창 캡처.
//!
//! xcap 창 목록에서 제목으로 게임 창을 찾아 캡처하고 정규화한다.

use async_trait::async_trait;
use beatlens_core::error::CoreError;
use beatlens_core::models::frame::CapturedFrame;
use beatlens_core::ports::vision::GameCapturer;
use tracing::debug;
use xcap::Window;

use crate::normalize::normalize_capture;

/// xcap 기반 창 캡처
#[derive(Debug, Default, Clone)]
pub struct WindowCapture;

impl WindowCapture {
    pub fn new() -> Self {
        Self
    }

    /// 블로킹 캡처. 제목에 `title_substring`이 포함된 첫 번째 창을 사용한다.
    pub fn capture_blocking(title_substring: &str) -> Result<Option<CapturedFrame>, CoreError> {
        let windows = Window::all()
            .map_err(|e| CoreError::Capture(format!("창 목록 조회 실패: {e}")))?;

        let found = windows.into_iter().find(|w| {
            w.title()
                .map(|t| t.contains(title_substring))
                .unwrap_or(false)
        });
        let Some(window) = found else {
            debug!("캡처 대상 창 없음: {title_substring}");
            return Ok(None);
        };

        let raw = window
            .capture_image()
            .map_err(|e| CoreError::Capture(format!("창 캡처 실패: {e}")))?;
        debug!("창 캡처 완료: {}x{}", raw.width(), raw.height());

        normalize_capture(raw).map(Some)
    }
}

#[async_trait]
impl GameCapturer for WindowCapture {
    async fn capture_game_window(
        &self,
        title_substring: &str,
    ) -> Result<Option<CapturedFrame>, CoreError> {
        let title = title_substring.to_string();
        tokio::task::spawn_blocking(move || Self::capture_blocking(&title))
            .await
            .map_err(|e| CoreError::Internal(format!("캡처 태스크 실패: {e}")))?
    }
}
