//! # beatlens-storage
//!
//! 로컬 저장소 어댑터.
//! 로그인 세션 파일을 읽고 검증된 결과 화면 스크린샷을 저장한다.

pub mod screenshot_storage;
pub mod session_store;

pub use screenshot_storage::{screenshot_file_name, ScreenshotFileStorage};
pub use session_store::SessionFileStore;
