//! 메인 창 서비스.
//!
//! UI 셸이 보내는 focus/blur/closed 이벤트를 `watch` 채널로 노출하고,
//! 검증 결과를 메인 창으로 전달한다.

use std::sync::Arc;

use beatlens_core::error::CoreError;
use beatlens_core::models::verify::VerifyResponse;
use beatlens_core::ports::window_host::MainWindowHost;
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info};

/// UI 셸에서 들어오는 메인 창 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainWindowEvent {
    Focus,
    Blur,
    Closed,
}

/// 메인 창 서비스
pub struct MainWindowService {
    host: Arc<dyn MainWindowHost>,
    focus_tx: watch::Sender<bool>,
    closed_tx: watch::Sender<bool>,
}

impl MainWindowService {
    /// 시작 시에는 포커스가 없는 것으로 본다 (UI가 준비되면 focus를 보낸다)
    pub fn new(host: Arc<dyn MainWindowHost>) -> Self {
        let (focus_tx, _) = watch::channel(false);
        let (closed_tx, _) = watch::channel(false);
        Self {
            host,
            focus_tx,
            closed_tx,
        }
    }

    pub fn handle_event(&self, event: MainWindowEvent) {
        match event {
            MainWindowEvent::Focus => self.set_focused(true),
            MainWindowEvent::Blur => self.set_focused(false),
            MainWindowEvent::Closed => {
                info!("메인 창 닫힘");
                self.closed_tx.send_replace(true);
            }
        }
    }

    fn set_focused(&self, focused: bool) {
        let changed = self.focus_tx.send_if_modified(|current| {
            if *current == focused {
                false
            } else {
                *current = focused;
                true
            }
        });
        if changed {
            debug!("메인 창 포커스: {focused}");
        }
    }

    pub fn is_focused(&self) -> bool {
        *self.focus_tx.borrow()
    }

    /// 포커스 변경 구독
    pub fn subscribe_focus(&self) -> watch::Receiver<bool> {
        self.focus_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }

    /// 메인 창이 닫힐 때까지 대기
    pub async fn wait_closed(&self) {
        let mut rx = self.closed_tx.subscribe();
        // 송신자는 self가 들고 있으므로 에러는 나지 않는다
        let _ = rx.wait_for(|closed| *closed).await;
    }

    pub fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError> {
        self.host.send_ocr_result(result)
    }
}
