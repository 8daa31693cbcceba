//! BeatLens 핵심 에러 타입.
//!
//! 어댑터 crate는 자체 에러 타입을 두더라도 포트 경계에서는 항상
//! `CoreError`로 변환해 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 실패 (세션 없음, 토큰 만료 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// 네트워크 에러 (연결 실패, 비정상 응답)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 작업 타임아웃
    #[error("실행 타임아웃: {timeout_ms}ms 초과")]
    ExecutionTimeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 창 조회 실패 (OS 창 목록, 모니터 정보)
    #[error("창 조회 에러: {0}")]
    Window(String),

    /// 화면 캡처 실패
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// 이미지 처리 실패 (리사이즈, 인코딩)
    #[error("이미지 처리 에러: {0}")]
    Image(String),

    /// 정적 영역 테이블이 이미지 범위를 벗어남
    #[error(
        "영역이 이미지 범위를 벗어남: ({left}, {top}, {width}x{height}) / 이미지 {image_width}x{image_height}"
    )]
    RegionOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    /// OCR 처리 실패
    #[error("OCR 에러: {0}")]
    OcrError(String),

    /// 오버레이/메인 창 IPC 실패
    #[error("IPC 에러: {0}")]
    Ipc(String),
}

impl CoreError {
    /// 재시도해도 결과가 바뀌지 않는 에러인지 여부
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::RegionOutOfBounds { .. } | Self::Auth(_)
        )
    }
}
