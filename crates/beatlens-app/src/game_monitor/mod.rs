//! 게임 창 모니터 서비스.
//!
//! 메인 창이 포커스를 잃으면 두 개의 루프를 시작한다.
//!
//! - 폴링 루프: 활성 창을 조회해 게임 창이면 오버레이 위치를 맞추고 표시한다.
//! - 자동 캡처 루프: 게임 창이 포커스를 가진 동안 결과 화면을 감지해 검증한다.
//!
//! 메인 창이 다시 포커스를 얻으면 두 루프를 멈추고 오버레이를 숨긴다.
//! 진행 중이던 틱은 취소하지 않고, 세대 번호가 바뀌었으면 결과만 버린다.

mod auto_capture;
mod phase;
mod polling;
mod result_tracker;

pub use auto_capture::CaptureOutcome;
pub use phase::{CapturePhase, MonitorPhase, PhaseEvent};
pub use result_tracker::{Assessment, ResultTracker};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use beatlens_core::config::{AppConfig, Settings};
use beatlens_core::models::window::WindowInfo;
use beatlens_core::ports::monitor::WindowProvider;
use beatlens_core::ports::settings::{SessionProvider, SettingsProvider};
use beatlens_core::ports::storage::ScreenshotSaver;
use beatlens_core::ports::verifier::OcrVerifier;
use beatlens_core::ports::vision::GameCapturer;
use beatlens_core::ports::window_host::OverlayOptions;
use beatlens_monitor::WindowLayoutTracker;
use beatlens_vision::OcrManager;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::main_window::MainWindowService;
use crate::overlay_window::OverlayWindowService;

/// 모니터 서비스가 사용하는 포트와 서비스
#[derive(Clone)]
pub struct MonitorDeps {
    pub window_provider: Arc<dyn WindowProvider>,
    pub capturer: Arc<dyn GameCapturer>,
    pub ocr: Arc<OcrManager>,
    pub verifier: Arc<dyn OcrVerifier>,
    pub settings: Arc<dyn SettingsProvider>,
    pub session: Arc<dyn SessionProvider>,
    /// 스크린샷 저장소 (None이면 저장 설정을 무시)
    pub screenshots: Option<Arc<dyn ScreenshotSaver>>,
    pub overlay: Arc<OverlayWindowService>,
    pub main_window: Arc<MainWindowService>,
}

/// 모니터 동작 파라미터
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// 게임 창 제목 (None이면 선택된 게임의 기본 제목)
    pub game_window_title: Option<String>,
    pub poll_interval: Duration,
    pub bounds_threshold_px: u32,
    pub set_bounds_throttle: Duration,
    pub blur_settle: Duration,
    pub startup_focus_grace: Duration,
    /// 캡처와 OCR 각각의 제한 시간
    pub capture_timeout: Duration,
    /// 검증 요청 제한 시간
    pub verify_timeout: Duration,
    pub max_verify_retries: u32,
}

impl MonitorOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        let monitor = &config.monitor;
        Self {
            game_window_title: monitor
                .game_window_title
                .clone()
                .filter(|t| !t.trim().is_empty()),
            poll_interval: config.poll_interval(),
            bounds_threshold_px: monitor.bounds_threshold_px,
            set_bounds_throttle: Duration::from_millis(monitor.set_bounds_throttle_ms),
            blur_settle: Duration::from_millis(monitor.blur_settle_ms),
            startup_focus_grace: Duration::from_millis(monitor.startup_focus_grace_ms),
            capture_timeout: Duration::from_millis(monitor.capture_timeout_ms),
            verify_timeout: config.request_timeout(),
            max_verify_retries: monitor.max_verify_retries,
        }
    }
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default_config())
    }
}

/// 폴링 루프가 공유하는 추적 상태
struct TrackingState {
    phase: MonitorPhase,
    /// 마지막으로 본 게임 창
    game_window: Option<WindowInfo>,
    /// 게임 창이 지금 활성 창인지
    game_window_focused: bool,
    layout: WindowLayoutTracker,
}

struct RunningLoops {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

/// 게임 창 모니터 서비스
pub struct GameMonitorService {
    deps: MonitorDeps,
    options: MonitorOptions,
    tracking: Mutex<TrackingState>,
    capture_phase: Mutex<CapturePhase>,
    /// 캡처 틱 재진입 방지를 겸한다 (`try_lock`)
    results: tokio::sync::Mutex<ResultTracker>,
    /// 모니터링을 멈출 때마다 증가. 늦게 끝난 틱의 결과를 버리는 데 쓴다.
    generation: AtomicU64,
    loops: Mutex<Option<RunningLoops>>,
    focus_watcher: Mutex<Option<JoinHandle<()>>>,
    initialized: AtomicBool,
}

impl GameMonitorService {
    pub fn new(deps: MonitorDeps, options: MonitorOptions) -> Self {
        let layout =
            WindowLayoutTracker::new(options.bounds_threshold_px, options.set_bounds_throttle);
        let results = ResultTracker::new(options.max_verify_retries);
        Self {
            deps,
            options,
            tracking: Mutex::new(TrackingState {
                phase: MonitorPhase::Idle,
                game_window: None,
                game_window_focused: false,
                layout,
            }),
            capture_phase: Mutex::new(CapturePhase::Idle),
            results: tokio::sync::Mutex::new(results),
            generation: AtomicU64::new(0),
            loops: Mutex::new(None),
            focus_watcher: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    // ============================================================
    // 라이프사이클
    // ============================================================

    /// 메인 창 포커스 감시 시작. 두 번째 호출부터는 무시한다.
    pub fn initialize(self: &Arc<Self>) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        let focus_rx = self.deps.main_window.subscribe_focus();
        let handle = tokio::spawn(Arc::clone(self).watch_main_window(focus_rx));
        *self.focus_watcher.lock() = Some(handle);
        info!("게임 모니터 초기화");
    }

    /// 모든 루프를 멈추고 오버레이 창을 제거한다
    pub fn cleanup(&self) {
        if let Some(handle) = self.focus_watcher.lock().take() {
            handle.abort();
        }
        if let Some(loops) = self.stop_loops() {
            for handle in loops.handles {
                handle.abort();
            }
        }
        self.reset_tracking();
        if let Err(e) = self.deps.overlay.destroy_overlay() {
            warn!("오버레이 제거 실패: {e}");
        }
        self.initialized.store(false, Ordering::SeqCst);
        info!("게임 모니터 정리 완료");
    }

    async fn watch_main_window(self: Arc<Self>, mut focus_rx: watch::Receiver<bool>) {
        // 이미 포커스가 없는 상태로 시작한 경우
        sleep(self.options.startup_focus_grace).await;
        if !*focus_rx.borrow_and_update() {
            debug!("시작 후 메인 창 포커스 없음, blur로 처리");
            self.on_main_window_blur().await;
        }

        while focus_rx.changed().await.is_ok() {
            let focused = *focus_rx.borrow_and_update();
            if focused {
                self.on_main_window_focus();
            } else {
                self.on_main_window_blur().await;
            }
        }
    }

    /// 메인 창 blur: 오버레이를 (처음 한 번) 만들고, 잠시 후 모니터링 시작
    pub async fn on_main_window_blur(self: &Arc<Self>) {
        self.ensure_overlay();
        sleep(self.options.blur_settle).await;
        if self.deps.main_window.is_focused() {
            debug!("blur 직후 다시 포커스됨, 모니터링 시작 취소");
            return;
        }
        self.start_monitoring();
    }

    /// 메인 창 focus: 모니터링 중지
    pub fn on_main_window_focus(&self) {
        if self.stop_loops().is_some() {
            info!("메인 창 포커스, 게임 모니터링 중지");
        }
        self.reset_tracking();
    }

    fn ensure_overlay(&self) {
        match self.deps.overlay.create_overlay(OverlayOptions::default()) {
            Ok(true) => debug!("첫 blur, 오버레이 생성"),
            Ok(false) => {}
            Err(e) => error!("오버레이 생성 실패: {e}"),
        }
    }

    /// 추적 단계로 들어간다 (루프 없이). 루프는 [`Self::start_monitoring`]이 시작한다.
    pub fn begin_tracking(&self) {
        self.ensure_overlay();
        let mut state = self.tracking.lock();
        state.phase = state.phase.next(PhaseEvent::MainWindowBlurred);
    }

    /// 폴링/자동 캡처 루프 시작. 이미 돌고 있으면 무시.
    pub fn start_monitoring(self: &Arc<Self>) {
        let mut loops = self.loops.lock();
        if loops.is_some() {
            return;
        }
        self.begin_tracking();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poll = tokio::spawn(Arc::clone(self).run_poll_loop(shutdown_rx.clone()));
        let capture = tokio::spawn(Arc::clone(self).run_capture_loop(shutdown_rx));
        *loops = Some(RunningLoops {
            shutdown_tx,
            handles: vec![poll, capture],
        });
        info!(
            "게임 모니터링 시작: 폴링 {}ms",
            self.options.poll_interval.as_millis()
        );
    }

    /// 루프에 종료 신호를 보내고 세대를 올린다. 진행 중인 틱은 끝까지 돈다.
    fn stop_loops(&self) -> Option<RunningLoops> {
        let loops = self.loops.lock().take();
        if let Some(loops) = &loops {
            loops.shutdown_tx.send_replace(true);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        loops
    }

    /// 추적 상태를 비우고 오버레이를 숨긴다. 진행 중인 폴링 틱이 사이에
    /// 끼어들지 못하도록 숨김까지 잠금 안에서 한다.
    fn reset_tracking(&self) {
        let mut state = self.tracking.lock();
        state.phase = state.phase.next(PhaseEvent::MainWindowFocused);
        state.game_window = None;
        state.game_window_focused = false;
        state.layout.reset();
        if let Err(e) = self.deps.overlay.hide() {
            warn!("오버레이 숨김 실패: {e}");
        }
    }

    async fn run_poll_loop(self: Arc<Self>, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.options.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.poll_tick().await {
                        warn!("활성 창 폴링 실패: {e}");
                    }
                }
                _ = shutdown_rx.changed() => {
                    debug!("폴링 루프 종료");
                    break;
                }
            }
        }
    }

    async fn run_capture_loop(self: Arc<Self>, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            // 주기는 설정에서 매번 다시 읽는다
            let interval = self.deps.settings.load_settings().auto_capture_interval();
            tokio::select! {
                _ = sleep(interval) => {
                    let outcome = self.auto_capture_tick().await;
                    debug!("자동 캡처 틱: {:?}", outcome);
                }
                _ = shutdown_rx.changed() => {
                    debug!("자동 캡처 루프 종료");
                    break;
                }
            }
        }
    }

    // ============================================================
    // 상태 조회
    // ============================================================

    pub fn phase(&self) -> MonitorPhase {
        self.tracking.lock().phase
    }

    pub fn capture_phase(&self) -> CapturePhase {
        *self.capture_phase.lock()
    }

    /// 마지막으로 본 게임 창
    pub fn game_window(&self) -> Option<WindowInfo> {
        self.tracking.lock().game_window.clone()
    }

    pub fn is_game_window_focused(&self) -> bool {
        self.tracking.lock().game_window_focused
    }

    pub fn is_monitoring(&self) -> bool {
        self.loops.lock().is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// 마지막으로 인정된 결과 텍스트 (캡처 진행 중이면 대기)
    pub async fn last_accepted_text(&self) -> Option<String> {
        self.results
            .lock()
            .await
            .last_accepted()
            .map(|info| info.text.clone())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// 추적할 게임 창 제목
    fn game_window_title(&self, settings: &Settings) -> String {
        self.options
            .game_window_title
            .clone()
            .unwrap_or_else(|| settings.game_code.window_title().to_string())
    }
}
