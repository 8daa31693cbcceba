//! # beatlens-vision
//!
//! 게임 화면 처리 크레이트.
//! 게임 창 캡처와 정규화, 고정 영역 추출, OCR, 결과 화면 판정,
//! 저장 이미지 프로필 마스킹을 담당한다.

pub mod capture;
pub mod encoder;
pub mod normalize;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod ocr_manager;
pub mod privacy;
pub mod region;
pub mod resize;

pub use capture::WindowCapture;
pub use ocr_manager::{ExtractedRegions, OcrManager, ProfileScope};
