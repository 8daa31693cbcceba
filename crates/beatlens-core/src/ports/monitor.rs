//! 활성 창 조회 포트.
//!
//! 구현: `beatlens-monitor` crate (xcap, Win32 FFI)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::window::WindowInfo;

/// OS 활성 창 조회
#[async_trait]
pub trait WindowProvider: Send + Sync {
    /// 현재 포커스된 창. 없으면 `None`.
    async fn active_window(&self) -> Result<Option<WindowInfo>, CoreError>;

    /// (x, y) 좌표에 가장 가까운 모니터의 배율
    async fn scale_factor_at(&self, x: i32, y: i32) -> Result<f64, CoreError>;
}
