//! BeatLens 바이너리 진입점.
//!
//! 설정을 읽고 어댑터를 만들어 게임 모니터에 주입한 뒤, UI 셸과 stdio로
//! 통신하며 종료 신호를 기다린다. stdout은 IPC 전용이므로 로그는 stderr로 낸다.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use beatlens_app::game_monitor::{GameMonitorService, MonitorDeps, MonitorOptions};
use beatlens_app::ipc::{self, JsonLineWriter, StdioMainWindowHost, StdioOverlayHost};
use beatlens_app::lifecycle::LifecycleManager;
use beatlens_app::main_window::MainWindowService;
use beatlens_app::overlay_window::OverlayWindowService;
use beatlens_core::config::AppConfig;
use beatlens_core::config_manager::ConfigManager;
use beatlens_core::error::CoreError;
use beatlens_core::models::game::GameCode;
use beatlens_core::ports::settings::{SessionProvider, SettingsProvider};
use beatlens_core::ports::storage::ScreenshotSaver;
use beatlens_core::ports::vision::TextRecognizer;
use beatlens_monitor::ActiveWindowMonitor;
use beatlens_network::HttpOcrVerifier;
use beatlens_storage::{ScreenshotFileStorage, SessionFileStore};
use beatlens_vision::{OcrManager, WindowCapture};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 리듬 게임 결과 화면 자동 캡처 도우미
#[derive(Parser, Debug)]
#[command(name = "beatlens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리/config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 대상 게임 (djmax_respect_v, wjmax). 지정하면 설정에 저장된다
    #[arg(long, short = 'g', value_parser = parse_game)]
    game: Option<GameCode>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 검증 서버 URL
    #[arg(long, short = 's')]
    server_url: Option<String>,

    /// 세션 파일 경로
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// 스크린샷 저장 디렉토리
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,
}

fn parse_game(value: &str) -> Result<GameCode, String> {
    GameCode::ALL
        .into_iter()
        .find(|g| g.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            let known: Vec<&str> = GameCode::ALL.iter().map(|g| g.as_str()).collect();
            format!("알 수 없는 게임: {value} (지원: {})", known.join(", "))
        })
}

/// OCR 기능 없이 빌드된 경우의 인식기. 항상 빈 텍스트를 돌려준다.
#[cfg(not(feature = "ocr"))]
mod disabled_ocr {
    use async_trait::async_trait;
    use beatlens_core::error::CoreError;
    use beatlens_core::ports::vision::TextRecognizer;
    use image::DynamicImage;

    pub struct DisabledRecognizer;

    #[async_trait]
    impl TextRecognizer for DisabledRecognizer {
        async fn recognize(&self, _image: &DynamicImage) -> Result<String, CoreError> {
            Ok(String::new())
        }
    }
}

#[cfg(feature = "ocr")]
fn build_recognizer(config: &AppConfig) -> Arc<dyn TextRecognizer> {
    Arc::new(beatlens_vision::ocr::TesseractRecognizer::new(
        config.vision.tessdata_path.clone(),
        config.vision.ocr_language.clone(),
    ))
}

#[cfg(not(feature = "ocr"))]
fn build_recognizer(_config: &AppConfig) -> Arc<dyn TextRecognizer> {
    warn!("OCR 기능 없이 빌드됨 (--features ocr), 결과 화면을 감지하지 않습니다");
    Arc::new(disabled_ocr::DisabledRecognizer)
}

/// 설정값 → 플랫폼 데이터 디렉토리 순으로 경로 결정
fn resolve_data_path(
    configured: Option<PathBuf>,
    file_name: &str,
) -> Result<PathBuf, CoreError> {
    match configured {
        Some(path) => Ok(path),
        None => Ok(ConfigManager::data_dir()?.join(file_name)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "beatlens={0},beatlens_app={0},beatlens_core={0},beatlens_monitor={0},beatlens_vision={0},beatlens_network={0},beatlens_storage={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("BeatLens 시작 (v{})", env!("CARGO_PKG_VERSION"));

    // 설정 로드
    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config_manager = Arc::new(config_manager.context("설정 로드 실패")?);
    if let Some(game) = args.game {
        config_manager
            .update_with(|c| c.settings.game_code = game)
            .context("게임 설정 저장 실패")?;
    }

    // CLI 인자는 이번 실행에만 적용
    let mut config = config_manager.get();
    if let Some(url) = &args.server_url {
        config.server.base_url = url.clone();
    }
    if let Some(path) = &args.session_file {
        config.storage.session_file = Some(path.clone());
    }
    if let Some(dir) = &args.screenshot_dir {
        config.storage.screenshot_dir = Some(dir.clone());
    }
    info!(
        "설정: {} / 게임 {} / 서버 {}",
        config_manager.config_path().display(),
        config.settings.game_code,
        config.server.base_url
    );

    // ── 어댑터 생성 (DI 와이어링) ──

    let session_path = resolve_data_path(config.storage.session_file.clone(), "session.json")?;
    let session: Arc<dyn SessionProvider> = Arc::new(SessionFileStore::new(session_path));
    let settings: Arc<dyn SettingsProvider> = config_manager.clone();

    let verifier = Arc::new(
        HttpOcrVerifier::new(
            &config.server.base_url,
            session.clone(),
            config.request_timeout(),
        )
        .context("검증 클라이언트 생성 실패")?,
    );

    let screenshots: Option<Arc<dyn ScreenshotSaver>> =
        match resolve_data_path(config.storage.screenshot_dir.clone(), "screenshots") {
            Ok(dir) => match ScreenshotFileStorage::new(dir).await {
                Ok(storage) => Some(Arc::new(storage)),
                Err(e) => {
                    warn!("스크린샷 저장소 초기화 실패, 저장 비활성화: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("스크린샷 디렉토리를 정할 수 없음, 저장 비활성화: {e}");
                None
            }
        };

    let writer = Arc::new(JsonLineWriter::stdout());
    let overlay = Arc::new(OverlayWindowService::new(Arc::new(StdioOverlayHost::new(
        writer.clone(),
    ))));
    let main_window = Arc::new(MainWindowService::new(Arc::new(StdioMainWindowHost::new(
        writer,
    ))));

    let deps = MonitorDeps {
        window_provider: Arc::new(ActiveWindowMonitor::new()),
        capturer: Arc::new(WindowCapture::new()),
        ocr: Arc::new(OcrManager::new(build_recognizer(&config))),
        verifier,
        settings,
        session,
        screenshots,
        overlay,
        main_window: main_window.clone(),
    };
    let monitor = Arc::new(GameMonitorService::new(
        deps,
        MonitorOptions::from_config(&config),
    ));

    // ── 실행 ──

    let lifecycle = LifecycleManager::new();
    let stdin_task = tokio::spawn(ipc::pump_events(
        tokio::io::BufReader::new(tokio::io::stdin()),
        main_window.clone(),
        lifecycle.subscribe(),
    ));

    monitor.initialize();
    lifecycle.wait_for_shutdown(&main_window).await;

    monitor.cleanup();
    stdin_task.abort();
    info!("BeatLens 종료");
    Ok(())
}
