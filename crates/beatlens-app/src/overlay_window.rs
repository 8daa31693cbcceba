//! 오버레이 창 서비스.
//!
//! 항상 위, 클릭 통과, 테두리 없는 오버레이 창 하나를 소유한다. 창 자체는
//! UI 셸이 만들고 이 서비스는 생성 여부와 표시 상태만 추적한다.

use std::sync::Arc;

use beatlens_core::error::CoreError;
use beatlens_core::models::overlay::{OverlayBounds, OverlayMessage};
use beatlens_core::models::verify::VerifyResponse;
use beatlens_core::ports::window_host::{OverlayHost, OverlayOptions};
use parking_lot::Mutex;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct OverlayState {
    created: bool,
    visible: bool,
}

/// 오버레이 창 서비스
pub struct OverlayWindowService {
    host: Arc<dyn OverlayHost>,
    state: Mutex<OverlayState>,
}

impl OverlayWindowService {
    pub fn new(host: Arc<dyn OverlayHost>) -> Self {
        Self {
            host,
            state: Mutex::new(OverlayState::default()),
        }
    }

    /// 오버레이 창 생성. 이미 있으면 아무것도 하지 않고 `false`.
    pub fn create_overlay(&self, options: OverlayOptions) -> Result<bool, CoreError> {
        let mut state = self.state.lock();
        if state.created {
            return Ok(false);
        }
        self.host.create(options)?;
        state.created = true;
        state.visible = false;
        info!("오버레이 창 생성");
        Ok(true)
    }

    /// 오버레이 창 제거
    pub fn destroy_overlay(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if !state.created {
            return Ok(());
        }
        self.host.destroy()?;
        *state = OverlayState::default();
        info!("오버레이 창 제거");
        Ok(())
    }

    pub fn is_created(&self) -> bool {
        self.state.lock().created
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    pub fn set_bounds(&self, bounds: OverlayBounds) -> Result<(), CoreError> {
        self.ensure_created()?;
        self.host.set_bounds(bounds)?;
        debug!(
            "오버레이 위치: ({}, {}) {}x{}",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
        Ok(())
    }

    pub fn show(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if !state.created {
            return Err(not_created());
        }
        if !state.visible {
            self.host.show()?;
            state.visible = true;
        }
        Ok(())
    }

    /// 오버레이 숨김. 생성 전이거나 이미 숨겨져 있으면 무시.
    pub fn hide(&self) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if state.created && state.visible {
            self.host.hide()?;
            state.visible = false;
        }
        Ok(())
    }

    /// 오버레이로 메시지 전송 (생성 전에는 버린다)
    pub fn send_message(&self, message: &OverlayMessage) -> Result<(), CoreError> {
        if !self.is_created() {
            return Ok(());
        }
        self.host.send_message(message)
    }

    pub fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError> {
        self.ensure_created()?;
        self.host.send_ocr_result(result)
    }

    fn ensure_created(&self) -> Result<(), CoreError> {
        if self.is_created() {
            Ok(())
        } else {
            Err(not_created())
        }
    }
}

fn not_created() -> CoreError {
    CoreError::Window("오버레이 창이 아직 생성되지 않음".to_string())
}
