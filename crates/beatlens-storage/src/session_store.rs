//! 세션 파일 저장소.
//!
//! UI가 로그인 후 기록한 `session.json`을 읽는다. 파일이 없거나 깨져 있으면
//! 로그인하지 않은 세션으로 취급한다.

use std::fs;
use std::path::{Path, PathBuf};

use beatlens_core::error::CoreError;
use beatlens_core::models::session::Session;
use beatlens_core::ports::settings::SessionProvider;
use tracing::warn;

/// JSON 파일 기반 세션 저장소
#[derive(Debug, Clone)]
pub struct SessionFileStore {
    path: PathBuf,
}

impl SessionFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 세션 저장 (디렉토리가 없으면 생성)
    pub fn save(&self, session: &Session) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    /// 세션 파일 읽기. 없으면 `Ok(None)`.
    pub fn read(&self) -> Result<Option<Session>, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionProvider for SessionFileStore {
    fn load_session(&self) -> Session {
        match self.read() {
            Ok(session) => session.unwrap_or_default(),
            Err(e) => {
                warn!("세션 파일 읽기 실패 ({}): {e}", self.path.display());
                Session::default()
            }
        }
    }
}
