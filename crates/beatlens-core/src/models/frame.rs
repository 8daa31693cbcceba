//! 캡처 프레임 모델.

use image::RgbaImage;

/// 캡처 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// 창 모드 (테두리/타이틀바 포함 가능)
    Windowed,
    /// 전체 화면 (표준 해상도)
    Fullscreen,
}

/// 정규화된 게임 캡처 (항상 1920px 너비)
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// 정규화된 이미지
    pub image: RgbaImage,
    /// 원본 캡처 분류
    pub mode: CaptureMode,
    /// 원본 캡처 크기
    pub source_size: (u32, u32),
}
