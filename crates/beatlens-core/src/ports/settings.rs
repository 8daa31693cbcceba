//! 설정/세션 조회 포트.
//!
//! 구현: `ConfigManager` (이 crate), `beatlens-storage::SessionFileStore`

use crate::config::Settings;
use crate::models::session::Session;

/// 사용자 설정 조회 (동기, 매 틱 호출)
pub trait SettingsProvider: Send + Sync {
    fn load_settings(&self) -> Settings;
}

/// 로그인 세션 조회 (동기, 매 틱 호출)
pub trait SessionProvider: Send + Sync {
    fn load_session(&self) -> Session;
}
