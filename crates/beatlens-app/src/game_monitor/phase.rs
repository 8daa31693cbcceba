//! 모니터링 상태 머신.
//!
//! 창 추적 단계([`MonitorPhase`])와 자동 캡처 단계([`CapturePhase`])는 서로
//! 독립적이다. 전이는 순수 함수로만 계산한다.

use parking_lot::Mutex;

/// 창 추적 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorPhase {
    /// 메인 창 포커스 중, 폴링 없음
    #[default]
    Idle,
    /// 폴링 중, 게임 창 없음 (오버레이 숨김)
    Tracking,
    /// 게임 창 추적 중, 오버레이 표시
    Overlaying,
}

/// 단계 전이를 일으키는 사건
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    MainWindowFocused,
    MainWindowBlurred,
    GameWindowFound,
    GameWindowLost,
}

impl MonitorPhase {
    pub fn next(self, event: PhaseEvent) -> MonitorPhase {
        use MonitorPhase::*;
        use PhaseEvent::*;

        match (self, event) {
            (_, MainWindowFocused) => Idle,
            (Idle, MainWindowBlurred) => Tracking,
            // 폴링이 멈춘 뒤 늦게 도착한 창 정보는 무시
            (Idle, GameWindowFound | GameWindowLost) => Idle,
            (Tracking | Overlaying, GameWindowFound) => Overlaying,
            (Tracking | Overlaying, GameWindowLost) => Tracking,
            (phase, MainWindowBlurred) => phase,
        }
    }

    /// 폴링 루프가 돌아야 하는 단계인지
    pub fn is_polling(self) -> bool {
        self != MonitorPhase::Idle
    }
}

/// 자동 캡처 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapturePhase {
    #[default]
    Idle,
    Capturing,
    AwaitingDelayedRecapture,
    Verifying,
}

/// 캡처 틱 동안 단계를 갱신하고, 어떤 경로로 끝나든 `Idle`로 되돌린다
pub(crate) struct CapturePhaseGuard<'a> {
    phase: &'a Mutex<CapturePhase>,
}

impl<'a> CapturePhaseGuard<'a> {
    pub(crate) fn enter(phase: &'a Mutex<CapturePhase>) -> Self {
        *phase.lock() = CapturePhase::Capturing;
        Self { phase }
    }

    pub(crate) fn set(&self, next: CapturePhase) {
        *self.phase.lock() = next;
    }
}

impl Drop for CapturePhaseGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = CapturePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_then_game_window() {
        let phase = MonitorPhase::Idle
            .next(PhaseEvent::MainWindowBlurred)
            .next(PhaseEvent::GameWindowFound);
        assert_eq!(phase, MonitorPhase::Overlaying);
        assert_eq!(phase.next(PhaseEvent::GameWindowLost), MonitorPhase::Tracking);
    }

    #[test]
    fn focus_always_returns_to_idle() {
        for phase in [
            MonitorPhase::Idle,
            MonitorPhase::Tracking,
            MonitorPhase::Overlaying,
        ] {
            assert_eq!(phase.next(PhaseEvent::MainWindowFocused), MonitorPhase::Idle);
        }
    }

    #[test]
    fn late_window_events_do_not_leave_idle() {
        assert_eq!(
            MonitorPhase::Idle.next(PhaseEvent::GameWindowFound),
            MonitorPhase::Idle
        );
        assert!(!MonitorPhase::Idle.is_polling());
    }

    #[test]
    fn repeated_blur_keeps_phase() {
        assert_eq!(
            MonitorPhase::Overlaying.next(PhaseEvent::MainWindowBlurred),
            MonitorPhase::Overlaying
        );
    }

    #[test]
    fn guard_resets_capture_phase() {
        let phase = Mutex::new(CapturePhase::Idle);
        {
            let guard = CapturePhaseGuard::enter(&phase);
            assert_eq!(*phase.lock(), CapturePhase::Capturing);
            guard.set(CapturePhase::Verifying);
            assert_eq!(*phase.lock(), CapturePhase::Verifying);
        }
        assert_eq!(*phase.lock(), CapturePhase::Idle);
    }
}
