//! 원격 OCR 검증 응답 모델.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 검증 서버 응답. 알 수 없는 필드도 `extra`에 보존해 UI로 그대로 전달한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// 서버가 결과를 인정했는지 여부
    pub is_verified: bool,
    /// 곡 정보 (서버 형식 그대로)
    #[serde(default)]
    pub song_data: Value,
    /// 버튼 모드 (4, 5, 6, 8)
    #[serde(default)]
    pub button: u8,
    /// 패턴 (NM, HD, MX, SC)
    #[serde(default)]
    pub pattern: String,
    /// 점수
    #[serde(default)]
    pub score: f64,
    /// 게임 코드
    #[serde(default)]
    pub game_code: String,
    /// 나머지 필드
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VerifyResponse {
    /// 곡 이름 (`songData.name`), 없으면 "unknown"
    pub fn song_name(&self) -> &str {
        self.song_data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}
