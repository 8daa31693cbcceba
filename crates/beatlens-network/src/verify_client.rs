//! 점수 검증 클라이언트.
//!
//! 결과 화면 PNG를 base64로 실어 검증 서버에 보내고, 서버가 인식한
//! 곡/점수 데이터를 받는다. 인증 토큰은 요청마다 세션 저장소에서 읽는다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, warn};

use beatlens_core::error::CoreError;
use beatlens_core::models::game::GameCode;
use beatlens_core::models::verify::VerifyResponse;
use beatlens_core::ports::settings::SessionProvider;
use beatlens_core::ports::verifier::OcrVerifier;

/// 검증 API 경로
const VERIFY_PATH: &str = "/v1/ocr/verify";

/// 검증 요청 본문
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    game_code: GameCode,
    player_id: &'a str,
    /// base64 PNG
    image: String,
}

/// HTTP 검증 클라이언트
pub struct HttpOcrVerifier {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// 검증 엔드포인트 전체 URL
    endpoint: String,
    /// 세션 (토큰 조회)
    session: Arc<dyn SessionProvider>,
}

impl HttpOcrVerifier {
    /// 새 클라이언트 생성
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionProvider>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), VERIFY_PATH);
        debug!(
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis() as u64,
            "HttpOcrVerifier 초기화"
        );

        Ok(Self {
            http_client,
            endpoint,
            session,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OcrVerifier for HttpOcrVerifier {
    async fn verify(&self, image_png: &[u8], game: GameCode) -> Result<VerifyResponse, CoreError> {
        let session = self.session.load_session();
        if !session.is_authenticated() {
            return Err(CoreError::Auth("로그인 세션 없음".to_string()));
        }

        let body = VerifyRequest {
            game_code: game,
            player_id: &session.player_id,
            image: base64::engine::general_purpose::STANDARD.encode(image_png),
        };

        debug!(
            endpoint = %self.endpoint,
            game = %game,
            image_size = image_png.len(),
            "검증 요청"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&session.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("검증 API 호출 실패: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("검증 API 응답 읽기 실패: {}", e)))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CoreError::Auth("토큰이 거부됨 (401)".to_string()));
        }
        if !status.is_success() {
            warn!(status = %status, "검증 API 오류 응답");
            return Err(CoreError::Network(format!(
                "검증 API 오류 ({}): {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: VerifyResponse = serde_json::from_str(&text)?;
        debug!(verified = parsed.is_verified, "검증 응답 수신");
        Ok(parsed)
    }
}

// ============================================================
// 테스트
// ============================================================
