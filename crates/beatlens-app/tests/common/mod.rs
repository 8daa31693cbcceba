//! 통합 테스트용 목 포트와 하네스.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use beatlens_app::game_monitor::{GameMonitorService, MonitorDeps, MonitorOptions};
use beatlens_app::main_window::MainWindowService;
use beatlens_app::overlay_window::OverlayWindowService;
use beatlens_core::config::Settings;
use beatlens_core::error::CoreError;
use beatlens_core::models::frame::{CaptureMode, CapturedFrame};
use beatlens_core::models::game::GameCode;
use beatlens_core::models::overlay::{OverlayBounds, OverlayMessage};
use beatlens_core::models::session::Session;
use beatlens_core::models::verify::VerifyResponse;
use beatlens_core::models::window::{WindowBounds, WindowInfo};
use beatlens_core::ports::monitor::WindowProvider;
use beatlens_core::ports::settings::{SessionProvider, SettingsProvider};
use beatlens_core::ports::storage::ScreenshotSaver;
use beatlens_core::ports::verifier::OcrVerifier;
use beatlens_core::ports::vision::{GameCapturer, TextRecognizer};
use beatlens_core::ports::window_host::{MainWindowHost, OverlayHost, OverlayOptions};
use beatlens_vision::OcrManager;
use image::{DynamicImage, Rgba, RgbaImage};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub const GAME_TITLE: &str = "DJMAX RESPECT V";

// ============================================================
// 창 / 캡처 / OCR
// ============================================================

#[derive(Default)]
pub struct MockWindows {
    pub active: Mutex<Option<WindowInfo>>,
    pub scale: Mutex<Option<f64>>,
    pub calls: AtomicUsize,
    gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl MockWindows {
    /// 활성 창 조회를 멈춰 세운다. (진입 알림, 해제 신호)
    pub fn install_gate(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock() = Some((entered.clone(), release.clone()));
        (entered, release)
    }
}

#[async_trait]
impl WindowProvider for MockWindows {
    async fn active_window(&self) -> Result<Option<WindowInfo>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().clone();
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }
        Ok(self.active.lock().clone())
    }

    async fn scale_factor_at(&self, _x: i32, _y: i32) -> Result<f64, CoreError> {
        Ok(self.scale.lock().unwrap_or(1.0))
    }
}

/// 지정된 이미지를 돌려주는 캡처기
pub struct MockCapturer {
    pub frame: Mutex<Option<RgbaImage>>,
    pub delay: Mutex<Option<Duration>>,
    pub fail: Mutex<bool>,
    pub calls: AtomicUsize,
}

impl Default for MockCapturer {
    fn default() -> Self {
        Self {
            frame: Mutex::new(Some(RgbaImage::from_pixel(1920, 1080, Rgba([20, 20, 20, 255])))),
            delay: Mutex::new(None),
            fail: Mutex::new(false),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockCapturer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameCapturer for MockCapturer {
    async fn capture_game_window(
        &self,
        _title_substring: &str,
    ) -> Result<Option<CapturedFrame>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail.lock() {
            return Err(CoreError::Capture("capture failed".into()));
        }
        let frame = self.frame.lock().clone();
        Ok(frame.map(|image| {
            let source_size = image.dimensions();
            CapturedFrame {
                image,
                mode: CaptureMode::Fullscreen,
                source_size,
            }
        }))
    }
}

/// 큐에 넣은 텍스트를 차례로, 비면 기본 텍스트를 돌려주는 인식기
#[derive(Default)]
pub struct ScriptedRecognizer {
    pub queue: Mutex<VecDeque<String>>,
    pub fallback: Mutex<String>,
    pub calls: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn set_text(&self, text: &str) {
        *self.fallback.lock() = text.to_string();
    }

    pub fn push(&self, text: &str) {
        self.queue.lock().push_back(text.to_string());
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize(&self, _image: &DynamicImage) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.lock().clone()))
    }
}

// ============================================================
// 검증 서버
// ============================================================

pub fn verified_response(name: &str) -> VerifyResponse {
    VerifyResponse {
        is_verified: true,
        song_data: serde_json::json!({ "name": name }),
        button: 4,
        pattern: "SC".into(),
        score: 99.5,
        game_code: GameCode::DjmaxRespectV.as_str().into(),
        ..VerifyResponse::default()
    }
}

/// 검증 호출을 기록하는 서버. 스크립트가 비면 성공 응답.
#[derive(Default)]
pub struct MockVerifier {
    pub script: Mutex<VecDeque<Result<VerifyResponse, CoreError>>>,
    pub images: Mutex<Vec<Vec<u8>>>,
    pub calls: AtomicUsize,
    /// (진입 알림, 해제 대기)
    pub gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl MockVerifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn push_error(&self) {
        self.script
            .lock()
            .push_back(Err(CoreError::Network("HTTP 503".into())));
    }

    pub fn push_response(&self, response: VerifyResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// 다음 호출부터 `release`가 올 때까지 멈춘다
    pub fn install_gate(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock() = Some((entered.clone(), release.clone()));
        (entered, release)
    }
}

#[async_trait]
impl OcrVerifier for MockVerifier {
    async fn verify(&self, image_png: &[u8], _game: GameCode) -> Result<VerifyResponse, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.images.lock().push(image_png.to_vec());
        let gate = self.gate.lock().clone();
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| Ok(verified_response("Glory Day")))
    }
}

// ============================================================
// 설정 / 세션 / 저장소
// ============================================================

pub struct MockSettings(pub Mutex<Settings>);

impl SettingsProvider for MockSettings {
    fn load_settings(&self) -> Settings {
        self.0.lock().clone()
    }
}

pub struct MockSession(pub Mutex<Session>);

impl SessionProvider for MockSession {
    fn load_session(&self) -> Session {
        self.0.lock().clone()
    }
}

pub fn authenticated_session() -> Session {
    Session {
        player_id: "player-1".into(),
        player_name: "tester".into(),
        api_token: "token".into(),
    }
}

#[derive(Default)]
pub struct RecordingSaver {
    pub saved: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl ScreenshotSaver for RecordingSaver {
    async fn save_image(&self, png: &[u8], file_name: &str) -> Result<PathBuf, CoreError> {
        self.saved.lock().push((file_name.to_string(), png.to_vec()));
        Ok(PathBuf::from("/shots").join(file_name))
    }
}

// ============================================================
// 창 호스트
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create,
    Destroy,
    SetBounds(OverlayBounds),
    Show,
    Hide,
    Message(OverlayMessage),
    OcrResult(VerifyResponse),
}

#[derive(Default)]
pub struct RecordingOverlayHost {
    pub calls: Mutex<Vec<HostCall>>,
    /// true면 위치 변경이 실패한다
    pub fail_bounds: Mutex<bool>,
}

impl RecordingOverlayHost {
    fn record(&self, call: HostCall) -> Result<(), CoreError> {
        self.calls.lock().push(call);
        Ok(())
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// 보낸 알림의 i18n 키 목록
    pub fn notifications(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::Message(OverlayMessage::Notification { message, .. }) => {
                    Some(message.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn bounds_calls(&self) -> Vec<OverlayBounds> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                HostCall::SetBounds(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &HostCall) -> usize {
        self.calls.lock().iter().filter(|c| *c == wanted).count()
    }

    pub fn ocr_results(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, HostCall::OcrResult(_)))
            .count()
    }
}

impl OverlayHost for RecordingOverlayHost {
    fn create(&self, _options: OverlayOptions) -> Result<(), CoreError> {
        self.record(HostCall::Create)
    }
    fn destroy(&self) -> Result<(), CoreError> {
        self.record(HostCall::Destroy)
    }
    fn set_bounds(&self, bounds: OverlayBounds) -> Result<(), CoreError> {
        if *self.fail_bounds.lock() {
            return Err(CoreError::Ipc("overlay window is gone".into()));
        }
        self.record(HostCall::SetBounds(bounds))
    }
    fn show(&self) -> Result<(), CoreError> {
        self.record(HostCall::Show)
    }
    fn hide(&self) -> Result<(), CoreError> {
        self.record(HostCall::Hide)
    }
    fn send_message(&self, message: &OverlayMessage) -> Result<(), CoreError> {
        self.record(HostCall::Message(message.clone()))
    }
    fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError> {
        self.record(HostCall::OcrResult(result.clone()))
    }
}

#[derive(Default)]
pub struct RecordingMainHost {
    pub results: Mutex<Vec<VerifyResponse>>,
}

impl MainWindowHost for RecordingMainHost {
    fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError> {
        self.results.lock().push(result.clone());
        Ok(())
    }
}

// ============================================================
// 하네스
// ============================================================

pub struct Harness {
    pub monitor: Arc<GameMonitorService>,
    pub windows: Arc<MockWindows>,
    pub capturer: Arc<MockCapturer>,
    pub recognizer: Arc<ScriptedRecognizer>,
    pub verifier: Arc<MockVerifier>,
    pub settings: Arc<MockSettings>,
    pub session: Arc<MockSession>,
    pub saver: Arc<RecordingSaver>,
    pub overlay_host: Arc<RecordingOverlayHost>,
    pub main_host: Arc<RecordingMainHost>,
    pub overlay: Arc<OverlayWindowService>,
    pub main_window: Arc<MainWindowService>,
}

/// 자동 캡처가 켜진 기본 설정
pub fn capture_settings() -> Settings {
    Settings {
        auto_capture_mode: true,
        ..Settings::default()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with(capture_settings(), MonitorOptions::default())
    }

    pub fn with(settings: Settings, options: MonitorOptions) -> Self {
        let windows = Arc::new(MockWindows::default());
        let capturer = Arc::new(MockCapturer::default());
        let recognizer = Arc::new(ScriptedRecognizer::default());
        let verifier = Arc::new(MockVerifier::default());
        let settings = Arc::new(MockSettings(Mutex::new(settings)));
        let session = Arc::new(MockSession(Mutex::new(authenticated_session())));
        let saver = Arc::new(RecordingSaver::default());
        let overlay_host = Arc::new(RecordingOverlayHost::default());
        let main_host = Arc::new(RecordingMainHost::default());
        let overlay = Arc::new(OverlayWindowService::new(overlay_host.clone()));
        let main_window = Arc::new(MainWindowService::new(main_host.clone()));

        let deps = MonitorDeps {
            window_provider: windows.clone(),
            capturer: capturer.clone(),
            ocr: Arc::new(OcrManager::new(recognizer.clone())),
            verifier: verifier.clone(),
            settings: settings.clone(),
            session: session.clone(),
            screenshots: Some(saver.clone()),
            overlay: overlay.clone(),
            main_window: main_window.clone(),
        };

        Self {
            monitor: Arc::new(GameMonitorService::new(deps, options)),
            windows,
            capturer,
            recognizer,
            verifier,
            settings,
            session,
            saver,
            overlay_host,
            main_host,
            overlay,
            main_window,
        }
    }

    pub fn set_active_window(&self, title: &str, bounds: WindowBounds) {
        *self.windows.active.lock() = Some(WindowInfo {
            title: title.to_string(),
            app_name: None,
            bounds,
        });
    }

    pub fn update_settings(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings.0.lock());
    }

    /// 추적을 시작하고 게임 창을 활성 창으로 만든 뒤 폴링 한 번
    pub async fn focus_game_window(&self) {
        self.monitor.begin_tracking();
        self.set_active_window(GAME_TITLE, WindowBounds::new(0, 0, 1920, 1080));
        self.monitor.poll_tick().await.unwrap();
    }
}
