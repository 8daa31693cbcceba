//! 오버레이/메인 창 제어 포트.
//!
//! 창 자체는 UI 셸(Electron, Tauri 등)이 소유하고, 이 포트는 명령과
//! 메시지를 전달만 한다. 구현: `beatlens-app::ipc` (stdio JSON lines).

use crate::error::CoreError;
use crate::models::overlay::{OverlayBounds, OverlayMessage};
use crate::models::verify::VerifyResponse;

/// 오버레이 창 생성 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub always_on_top: bool,
    pub click_through: bool,
    pub frameless: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            always_on_top: true,
            click_through: true,
            frameless: true,
        }
    }
}

/// 오버레이 창 제어
pub trait OverlayHost: Send + Sync {
    fn create(&self, options: OverlayOptions) -> Result<(), CoreError>;
    fn destroy(&self) -> Result<(), CoreError>;
    fn set_bounds(&self, bounds: OverlayBounds) -> Result<(), CoreError>;
    fn show(&self) -> Result<(), CoreError>;
    fn hide(&self) -> Result<(), CoreError>;
    fn send_message(&self, message: &OverlayMessage) -> Result<(), CoreError>;
    fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError>;
}

/// 메인 창으로 보내는 메시지
pub trait MainWindowHost: Send + Sync {
    fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError>;
}
