//! 스크린샷 저장 포트.
//!
//! 구현: `beatlens-storage::ScreenshotFileStorage`

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::CoreError;

/// 검증된 결과 화면 이미지 저장
#[async_trait]
pub trait ScreenshotSaver: Send + Sync {
    /// PNG 바이트를 `file_name`으로 저장하고 최종 경로를 반환
    async fn save_image(&self, png: &[u8], file_name: &str) -> Result<PathBuf, CoreError>;
}
