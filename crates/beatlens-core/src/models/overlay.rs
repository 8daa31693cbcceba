//! 오버레이 창 위치 및 IPC 메시지 모델.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::window::WindowInfo;

/// 오버레이 창 위치/크기 (논리 픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl OverlayBounds {
    /// 네 값 중 하나라도 `threshold` 픽셀보다 크게 달라졌는지
    pub fn differs_by_more_than(&self, other: &OverlayBounds, threshold: u32) -> bool {
        let t = i64::from(threshold);
        let diff = |a: i32, b: i32| (i64::from(a) - i64::from(b)).abs() > t;
        diff(self.x, other.x)
            || diff(self.y, other.y)
            || diff(self.width, other.width)
            || diff(self.height, other.height)
    }
}

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// 오버레이로 보내는 메시지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OverlayMessage {
    /// 현재 활성 창 (매 폴링 틱)
    #[serde(rename_all = "camelCase")]
    ActiveWindows { data: WindowInfo, is_maximized: bool },
    /// 토스트 알림 (i18n 키)
    #[serde(rename_all = "camelCase")]
    Notification {
        notification_type: NotificationKind,
        message: String,
        mode: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Value>,
    },
}

impl OverlayMessage {
    /// i18n 키 기반 알림 메시지 생성
    pub fn notification(kind: NotificationKind, key: &str, props: Option<Value>) -> Self {
        Self::Notification {
            notification_type: kind,
            message: key.to_string(),
            mode: "i18n".to_string(),
            props,
        }
    }
}

/// 자동 캡처 알림에 쓰는 i18n 키
pub mod notification_keys {
    pub const RESULT_DETECTED: &str = "autoCapture.resultDetected";
    pub const RETRYING: &str = "autoCapture.retrying";
    pub const VERIFIED: &str = "autoCapture.verified";
    pub const VERIFY_FAILED: &str = "autoCapture.verifyFailed";
    pub const VERIFY_REJECTED: &str = "autoCapture.verifyRejected";
    pub const IMAGE_SAVED: &str = "autoCapture.imageSaved";
}
