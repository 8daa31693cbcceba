//! 결과 화면 스크린샷 파일 저장소.
//!
//! 검증된 결과 화면을 PNG로 저장한다. 파일명은 게임/곡/버튼/패턴/점수/시각으로
//! 결정되며, 같은 이름이 이미 있으면 ` (n)`을 붙인다.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use beatlens_core::error::CoreError;
use beatlens_core::models::game::GameCode;
use beatlens_core::models::verify::VerifyResponse;
use beatlens_core::ports::storage::ScreenshotSaver;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info};

/// 파일명에 쓸 수 없는 문자
const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// 같은 이름 파일이 있을 때 붙일 번호 상한
const MAX_DUPLICATE_SUFFIX: u32 = 999;

/// `GAMECODE - name - {button}B - pattern - score - timestamp.png`
pub fn screenshot_file_name(
    game: GameCode,
    response: &VerifyResponse,
    timestamp: DateTime<Utc>,
) -> String {
    let name = format!(
        "{} - {} - {}B - {} - {} - {}.png",
        game.as_str().to_uppercase(),
        response.song_name(),
        response.button,
        response.pattern,
        response.score,
        timestamp.timestamp_millis()
    );
    sanitize_file_name(&name)
}

/// 파일 시스템 특수 문자와 제어 문자를 `_`로 바꾼다
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if FORBIDDEN_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// 스크린샷 파일 저장소
pub struct ScreenshotFileStorage {
    /// 저장 디렉토리
    base_dir: PathBuf,
}

impl ScreenshotFileStorage {
    /// 새 저장소 생성 (디렉토리가 없으면 생성)
    pub async fn new(base_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&base_dir).await.map_err(|e| {
            CoreError::Internal(format!(
                "스크린샷 디렉토리 생성 실패: {}: {e}",
                base_dir.display()
            ))
        })?;
        info!("스크린샷 저장소 초기화: {}", base_dir.display());
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 아직 없는 경로를 고른다
    async fn available_path(&self, file_name: &str) -> Result<PathBuf, CoreError> {
        let candidate = self.base_dir.join(file_name);
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }

        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{ext}")),
            None => (file_name, String::new()),
        };
        for n in 1..=MAX_DUPLICATE_SUFFIX {
            let candidate = self.base_dir.join(format!("{stem} ({n}){ext}"));
            if !fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(CoreError::Internal(format!(
            "같은 이름의 스크린샷이 너무 많음: {file_name}"
        )))
    }
}

#[async_trait]
impl ScreenshotSaver for ScreenshotFileStorage {
    async fn save_image(&self, png: &[u8], file_name: &str) -> Result<PathBuf, CoreError> {
        let path = self.available_path(&sanitize_file_name(file_name)).await?;
        fs::write(&path, png).await?;
        debug!("스크린샷 저장: {} ({} bytes)", path.display(), png.len());
        Ok(path)
    }
}
