//! BeatLens 도메인 모델.
//!
//! 오버레이 UI, 검증 서버와 주고받는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod frame;
pub mod game;
pub mod ocr;
pub mod overlay;
pub mod session;
pub mod verify;
pub mod window;
