//! 원격 OCR 검증 포트.
//!
//! 구현: `beatlens-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::game::GameCode;
use crate::models::verify::VerifyResponse;

/// 결과 화면 이미지를 검증 서버로 보내 점수 데이터를 받는다
#[async_trait]
pub trait OcrVerifier: Send + Sync {
    /// PNG 이미지와 게임 코드로 검증 요청. 네트워크 실패는 `Err`.
    async fn verify(&self, image_png: &[u8], game: GameCode)
        -> Result<VerifyResponse, CoreError>;
}
