//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `beatlens-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! I/O가 있는 trait은 `async_trait` 매크로로 object safety를 보장한다.
//! 설정/세션 조회와 창 제어 명령은 즉시 끝나는 동기 호출이다.

pub mod monitor;
pub mod settings;
pub mod storage;
pub mod verifier;
pub mod vision;
pub mod window_host;
