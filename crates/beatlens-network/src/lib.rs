//! # beatlens-network
//!
//! 점수 검증 서버 HTTP 어댑터.
//! 결과 화면 이미지를 검증 API로 보내고 곡/점수 데이터를 받는다.

pub mod verify_client;

pub use verify_client::HttpOcrVerifier;
