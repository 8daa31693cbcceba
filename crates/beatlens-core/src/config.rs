//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 창 폴링 주기, 저장 경로, OCR 설정과 사용자 캡처 설정
//! ([`Settings`])을 정의한다. [`crate::config_manager::ConfigManager`]가
//! JSON 파일에서 로드한다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::game::GameCode;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 검증 서버 연결 설정
    pub server: ServerConfig,
    /// 창 모니터링 설정
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 비전(OCR) 설정
    #[serde(default)]
    pub vision: VisionConfig,
    /// 사용자 캡처 설정 (UI에서 편집, camelCase 키)
    #[serde(default)]
    pub settings: Settings,
}

// ============================================================
// 사용자 캡처 설정
// ============================================================

/// 저장 이미지의 프로필 영역 가림 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMode {
    /// 가우시안 블러
    #[default]
    Blur,
    /// 검은색 채우기
    Black,
}

/// 사용자 캡처 설정.
///
/// UI 설정 화면과 같은 키 이름(camelCase)을 사용한다. 자동 캡처 루프가
/// 매 주기마다 새로 읽으므로 변경 사항은 다음 틱부터 반영된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// 선택된 게임
    pub game_code: GameCode,
    /// 자동 캡처 활성화
    pub auto_capture_mode: bool,
    /// 자동 캡처 주기 (밀리초)
    pub auto_capture_interval_time: u64,
    /// 결과 화면 감지 후 재캡처까지 대기 시간 (밀리초, 0이면 재캡처 안 함)
    pub auto_capture_delay_time: u64,
    /// `result` 영역 OCR 활성화
    pub auto_capture_ocr_result_region: bool,
    /// `open3` 영역 OCR 활성화
    pub auto_capture_ocr_open3_region: bool,
    /// `versus` 영역 OCR 활성화
    pub auto_capture_ocr_versus_region: bool,
    /// 검증 성공 시 스크린샷 저장
    pub save_image_when_capture: bool,
    /// 프로필 영역 가림 방식
    pub save_image_blur_mode: BlurMode,
    /// 모든 플레이어 프로필 가림
    pub save_image_without_all_profile_when_capture: bool,
    /// 다른 플레이어 프로필만 가림
    pub save_image_without_other_profile_when_capture: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_code: GameCode::default(),
            auto_capture_mode: false,
            auto_capture_interval_time: default_auto_capture_interval_ms(),
            auto_capture_delay_time: 0,
            auto_capture_ocr_result_region: true,
            auto_capture_ocr_open3_region: false,
            auto_capture_ocr_versus_region: false,
            save_image_when_capture: false,
            save_image_blur_mode: BlurMode::default(),
            save_image_without_all_profile_when_capture: false,
            save_image_without_other_profile_when_capture: false,
        }
    }
}

impl Settings {
    /// 자동 캡처 주기 (최소 100ms로 보정)
    pub fn auto_capture_interval(&self) -> Duration {
        Duration::from_millis(self.auto_capture_interval_time.max(MIN_AUTO_CAPTURE_INTERVAL_MS))
    }

    /// 재캡처 대기 시간. 0이면 `None`.
    pub fn auto_capture_delay(&self) -> Option<Duration> {
        (self.auto_capture_delay_time > 0)
            .then(|| Duration::from_millis(self.auto_capture_delay_time))
    }
}

const MIN_AUTO_CAPTURE_INTERVAL_MS: u64 = 100;

// ============================================================
// 런타임 설정
// ============================================================

/// 검증 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 서버 기본 URL (예: "https://api.example.com")
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// 게임 창 모니터링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 게임 창 제목. 비어 있으면 선택된 게임의 기본 제목 사용
    #[serde(default)]
    pub game_window_title: Option<String>,
    /// 활성 창 폴링 주기 (밀리초)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// 오버레이 위치 갱신 임계값 (픽셀)
    #[serde(default = "default_bounds_threshold_px")]
    pub bounds_threshold_px: u32,
    /// 오버레이 setBounds 최소 간격 (밀리초)
    #[serde(default = "default_set_bounds_throttle_ms")]
    pub set_bounds_throttle_ms: u64,
    /// 메인 창 blur 이후 폴링 시작까지 대기 (밀리초)
    #[serde(default = "default_blur_settle_ms")]
    pub blur_settle_ms: u64,
    /// 시작 시 메인 창 포커스 대기 시간 (밀리초)
    #[serde(default = "default_startup_focus_grace_ms")]
    pub startup_focus_grace_ms: u64,
    /// 캡처+OCR 타임아웃 (밀리초)
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,
    /// 같은 결과 텍스트에 대한 최대 검증 시도 횟수
    #[serde(default = "default_max_verify_retries")]
    pub max_verify_retries: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            game_window_title: None,
            poll_interval_ms: default_poll_interval_ms(),
            bounds_threshold_px: default_bounds_threshold_px(),
            set_bounds_throttle_ms: default_set_bounds_throttle_ms(),
            blur_settle_ms: default_blur_settle_ms(),
            startup_focus_grace_ms: default_startup_focus_grace_ms(),
            capture_timeout_ms: default_capture_timeout_ms(),
            max_verify_retries: default_max_verify_retries(),
        }
    }
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 스크린샷 저장 디렉토리 (None이면 플랫폼 데이터 디렉토리/screenshots)
    #[serde(default)]
    pub screenshot_dir: Option<PathBuf>,
    /// 세션 파일 경로 (None이면 플랫폼 데이터 디렉토리/session.json)
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

/// 비전(OCR) 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Tesseract 언어 코드
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// tessdata 디렉토리 (None이면 시스템 기본값)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            ocr_language: default_ocr_language(),
            tessdata_path: None,
        }
    }
}

// ============================================================
// AppConfig 기본값 / Duration 헬퍼
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8000".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            monitor: MonitorConfig::default(),
            storage: StorageConfig::default(),
            vision: VisionConfig::default(),
            settings: Settings::default(),
        }
    }

    /// 추적할 게임 창 제목 (설정값 우선, 없으면 게임 기본 제목)
    pub fn game_window_title(&self) -> String {
        self.monitor
            .game_window_title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.settings.game_code.window_title().to_string())
    }

    /// 폴링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_poll_interval_ms() -> u64 {
    100
}
fn default_bounds_threshold_px() -> u32 {
    2
}
fn default_set_bounds_throttle_ms() -> u64 {
    150
}
fn default_blur_settle_ms() -> u64 {
    300
}
fn default_startup_focus_grace_ms() -> u64 {
    500
}
fn default_capture_timeout_ms() -> u64 {
    5_000
}
fn default_max_verify_retries() -> u32 {
    3
}
fn default_auto_capture_interval_ms() -> u64 {
    1_000
}
fn default_ocr_language() -> String {
    "eng".to_string()
}
