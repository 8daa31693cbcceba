//! 오버레이 레이아웃 추적기.
//!
//! 직전에 적용한 오버레이 위치를 기억하고, 새 위치를 적용할지 결정한다.
//! 작은 흔들림은 임계값으로 무시하고 `setBounds` 호출은 최소 간격으로 제한한다.

use beatlens_core::models::overlay::OverlayBounds;
use std::time::Duration;
use tokio::time::Instant;

/// 새 위치에 대한 판단
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDecision {
    /// 적용하고 오버레이 표시
    Apply,
    /// 변화가 임계값 이하이고 오버레이가 이미 보이는 중
    Unchanged,
    /// 변화는 있지만 최소 간격 이내 (다음 틱에 다시 판단)
    Throttled,
}

/// 오버레이 레이아웃 추적기
#[derive(Debug, Clone)]
pub struct WindowLayoutTracker {
    /// 마지막으로 적용한 위치
    last_bounds: Option<OverlayBounds>,
    /// 마지막 적용 시각
    last_applied_at: Option<Instant>,
    /// 변경 감지 임계값 (픽셀)
    threshold: u32,
    /// setBounds 최소 간격
    throttle: Duration,
}

impl WindowLayoutTracker {
    pub fn new(threshold: u32, throttle: Duration) -> Self {
        Self {
            last_bounds: None,
            last_applied_at: None,
            threshold,
            throttle,
        }
    }

    /// 새 위치를 적용해야 하는지 판단한다. 상태는 바꾸지 않는다.
    pub fn evaluate(
        &self,
        bounds: &OverlayBounds,
        overlay_visible: bool,
        now: Instant,
    ) -> LayoutDecision {
        let changed = match &self.last_bounds {
            Some(prev) => prev.differs_by_more_than(bounds, self.threshold),
            None => true,
        };
        if !changed && overlay_visible {
            return LayoutDecision::Unchanged;
        }
        if let Some(at) = self.last_applied_at {
            if now.saturating_duration_since(at) < self.throttle {
                return LayoutDecision::Throttled;
            }
        }
        LayoutDecision::Apply
    }

    /// 위치를 실제로 적용한 뒤 호출
    pub fn commit(&mut self, bounds: OverlayBounds, now: Instant) {
        self.last_bounds = Some(bounds);
        self.last_applied_at = Some(now);
    }

    /// 게임 창이 사라졌을 때. 다음 등장 시 무조건 다시 계산하도록 위치를 잊는다.
    pub fn forget_bounds(&mut self) {
        self.last_bounds = None;
    }

    /// 모니터링 중지 시 전체 초기화
    pub fn reset(&mut self) {
        self.last_bounds = None;
        self.last_applied_at = None;
    }

    pub fn last_bounds(&self) -> Option<OverlayBounds> {
        self.last_bounds
    }
}
