//! 라이프사이클 관리.
//!
//! OS 시그널 또는 메인 창 닫힘을 기다렸다가 종료 신호를 보낸다.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::main_window::MainWindowService;

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal,
    MainWindowClosed,
}

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    /// 종료 수신기 복제
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// 종료 신호 발송
    pub fn shutdown(&self) {
        info!("종료 신호 발송");
        self.shutdown_tx.send_replace(true);
    }

    /// 시그널이나 메인 창 닫힘 중 먼저 오는 것을 기다린 뒤 종료 신호를 보낸다
    pub async fn wait_for_shutdown(&self, main_window: &MainWindowService) -> ShutdownReason {
        let reason = tokio::select! {
            _ = wait_for_signal() => ShutdownReason::Signal,
            _ = main_window.wait_closed() => ShutdownReason::MainWindowClosed,
        };
        info!("종료 사유: {:?}", reason);
        self.shutdown();
        reason
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// OS 시그널 대기 (SIGINT, SIGTERM)
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => info!("SIGINT 수신"),
                    _ = sigterm.recv() => info!("SIGTERM 수신"),
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("시그널 핸들러 등록 실패, Ctrl+C만 처리: {e}");
            }
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C 수신"),
        Err(e) => {
            warn!("Ctrl+C 핸들러 등록 실패: {e}");
            std::future::pending::<()>().await;
        }
    }
}
