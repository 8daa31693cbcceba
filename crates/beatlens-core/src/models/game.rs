//! 지원 게임 식별자.
//!
//! 게임별 영역/키워드 테이블은 `beatlens-vision::ocr_manager`가
//! 이 enum의 각 variant에 대해 정적으로 보유한다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 지원 게임
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCode {
    #[default]
    DjmaxRespectV,
    Wjmax,
}

impl GameCode {
    /// 모든 지원 게임
    pub const ALL: [GameCode; 2] = [GameCode::DjmaxRespectV, GameCode::Wjmax];

    /// 서버/파일명에 쓰는 코드 문자열
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DjmaxRespectV => "djmax_respect_v",
            Self::Wjmax => "wjmax",
        }
    }

    /// 게임 프로세스의 기본 창 제목
    pub fn window_title(self) -> &'static str {
        match self {
            Self::DjmaxRespectV => "DJMAX RESPECT V",
            Self::Wjmax => "WJMAX",
        }
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
