//! 폴링 틱: 활성 창 조회, 오버레이 위치 갱신, 활성 창 정보 전송.

use beatlens_core::error::CoreError;
use beatlens_core::geometry::{compute_overlay_bounds, is_standard_width};
use beatlens_core::models::overlay::OverlayMessage;
use beatlens_core::models::window::WindowInfo;
use beatlens_monitor::LayoutDecision;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{GameMonitorService, MonitorPhase, PhaseEvent, TrackingState};

impl GameMonitorService {
    /// 폴링 한 번.
    ///
    /// 오버레이 위치 처리를 모두 끝낸 뒤에 `active-windows` 메시지를 보낸다.
    /// 오버레이 조작이 실패해도 메시지는 보낸다. 추적 단계가 아니면 아무것도
    /// 하지 않는다.
    pub async fn poll_tick(&self) -> Result<(), CoreError> {
        if !self.phase().is_polling() {
            return Ok(());
        }
        let generation = self.generation();

        let Some(window) = self.deps.window_provider.active_window().await? else {
            self.handle_game_window_lost(generation);
            return Ok(());
        };

        let settings = self.deps.settings.load_settings();
        let is_game = window.title == self.game_window_title(&settings);
        let scale = if is_game {
            match self
                .deps
                .window_provider
                .scale_factor_at(window.bounds.x, window.bounds.y)
                .await
            {
                Ok(scale) => scale,
                Err(e) => {
                    warn!("모니터 배율 조회 실패, 1.0 사용: {e}");
                    1.0
                }
            }
        } else {
            1.0
        };

        let applied = if is_game {
            self.apply_game_window(&window, scale, generation)
        } else {
            self.handle_game_window_lost(generation)
        };
        if !applied {
            debug!("폴링 중 모니터링이 중지됨, 결과 무시");
            return Ok(());
        }

        let is_maximized = is_standard_width(window.bounds.width);
        self.deps.overlay.send_message(&OverlayMessage::ActiveWindows {
            data: window,
            is_maximized,
        })
    }

    /// 추적 상태 잠금 안에서 판정한다. 메인 창 포커스로 추적이 끝났으면
    /// 이 틱의 결과는 버린다.
    fn still_tracking(&self, state: &TrackingState, generation: u64) -> bool {
        state.phase != MonitorPhase::Idle && self.is_current(generation)
    }

    /// 게임 창 위치에 오버레이를 맞춘다. 추적이 끝났으면 false.
    fn apply_game_window(&self, window: &WindowInfo, scale: f64, generation: u64) -> bool {
        let is_fullscreen = is_standard_width(window.bounds.width);
        let bounds = compute_overlay_bounds(&window.bounds, is_fullscreen, scale);
        let now = Instant::now();

        let mut state = self.tracking.lock();
        if !self.still_tracking(&state, generation) {
            return false;
        }
        if state.game_window.is_none() || !state.game_window_focused {
            info!("게임 창 감지: {:?} {:?}", window.title, window.bounds);
        }
        state.game_window = Some(window.clone());
        state.game_window_focused = true;
        state.phase = state.phase.next(PhaseEvent::GameWindowFound);

        match state
            .layout
            .evaluate(&bounds, self.deps.overlay.is_visible(), now)
        {
            LayoutDecision::Apply => {
                let shown = self
                    .deps
                    .overlay
                    .set_bounds(bounds)
                    .and_then(|()| self.deps.overlay.show());
                match shown {
                    Ok(()) => state.layout.commit(bounds, now),
                    Err(e) => warn!("오버레이 위치 적용 실패: {e}"),
                }
            }
            LayoutDecision::Unchanged => {}
            LayoutDecision::Throttled => debug!("오버레이 위치 갱신 대기 (최소 간격)"),
        }
        true
    }

    /// 활성 창이 게임 창이 아님. 오버레이가 보이면 숨기고 위치를 잊는다.
    /// 추적이 끝났으면 false.
    fn handle_game_window_lost(&self, generation: u64) -> bool {
        let mut state = self.tracking.lock();
        if !self.still_tracking(&state, generation) {
            return false;
        }
        if state.game_window_focused {
            debug!("게임 창 포커스 해제");
        }
        state.game_window_focused = false;
        state.phase = state.phase.next(PhaseEvent::GameWindowLost);

        if self.deps.overlay.is_visible() {
            match self.deps.overlay.hide() {
                Ok(()) => state.layout.forget_bounds(),
                Err(e) => warn!("오버레이 숨김 실패: {e}"),
            }
        }
        true
    }
}
