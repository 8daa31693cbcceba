//! 캡처/텍스트 인식 포트.
//!
//! 구현: `beatlens-vision` crate (xcap, image, fast_image_resize, leptess)

use async_trait::async_trait;
use image::DynamicImage;

use crate::error::CoreError;
use crate::models::frame::CapturedFrame;

/// 게임 창 캡처
#[async_trait]
pub trait GameCapturer: Send + Sync {
    /// 제목에 `title_substring`이 포함된 첫 번째 창을 캡처해 정규화한다.
    ///
    /// 해당 창이 없으면 에러가 아니라 `Ok(None)`.
    async fn capture_game_window(
        &self,
        title_substring: &str,
    ) -> Result<Option<CapturedFrame>, CoreError>;
}

/// 텍스트 인식 (OCR)
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// 잘라낸 영역 이미지에서 텍스트 인식
    async fn recognize(&self, image: &DynamicImage) -> Result<String, CoreError>;
}
