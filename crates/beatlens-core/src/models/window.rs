//! 활성 창 모델.

use serde::{Deserialize, Serialize};

/// OS가 보고한 활성 창 스냅샷. 매 폴링마다 새로 만들어지며 값으로만 비교한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    /// 창 제목 (게임 식별에 사용)
    pub title: String,
    /// 애플리케이션 이름 (알 수 없으면 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// 창 위치/크기 (물리 픽셀)
    pub bounds: WindowBounds,
}

/// 창 위치 및 크기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowBounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
