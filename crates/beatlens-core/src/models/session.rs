//! 플레이어 세션 모델.

use serde::{Deserialize, Serialize};

/// 로그인한 플레이어 세션. 자동 캡처는 인증된 세션에서만 동작한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// 플레이어 ID
    pub player_id: String,
    /// 표시 이름
    pub player_name: String,
    /// API 토큰
    pub api_token: String,
}

impl Session {
    /// 플레이어 ID와 토큰이 모두 있으면 인증된 것으로 본다
    pub fn is_authenticated(&self) -> bool {
        !self.player_id.trim().is_empty() && !self.api_token.trim().is_empty()
    }
}
