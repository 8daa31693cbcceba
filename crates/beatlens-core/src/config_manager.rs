//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리에 JSON 파일로 설정을 저장/로드한다.
//! 사용자 캡처 설정은 UI가 같은 파일을 수정할 수 있으므로
//! [`SettingsProvider`] 구현에서 파일 변경을 감지해 다시 읽는다.

use crate::config::{AppConfig, Settings};
use crate::error::CoreError;
use crate::ports::settings::SettingsProvider;
use directories::ProjectDirs;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 관리자
///
/// 설정 파일의 로드/저장 및 런타임 설정 변경을 관리한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 현재 설정 (스레드 안전)
    config: Arc<RwLock<AppConfig>>,
    /// 마지막으로 읽은 파일 수정 시각
    loaded_at: Arc<RwLock<Option<SystemTime>>>,
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로로 설정 관리자 생성
    ///
    /// 설정 파일이 없으면 기본 설정을 생성하고 저장한다.
    pub fn new() -> Result<Self, CoreError> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        Self::with_path(config_path)
    }

    /// 지정된 경로로 설정 관리자 생성
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = AppConfig::default_config();
            Self::save_to_file(&config_path, &default_config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            default_config
        };

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            loaded_at: Arc::new(RwLock::new(modified_at(&config_path))),
            config_path,
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// 설정 업데이트 및 파일 저장
    pub fn update(&self, new_config: AppConfig) -> Result<(), CoreError> {
        Self::save_to_file(&self.config_path, &new_config)?;
        *self.config.write() = new_config;
        *self.loaded_at.write() = modified_at(&self.config_path);
        debug!("설정 저장 완료: {}", self.config_path.display());
        Ok(())
    }

    /// 특정 필드만 업데이트
    pub fn update_with<F>(&self, updater: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        updater(&mut config);
        self.update(config.clone())?;
        Ok(config)
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 설정 다시 로드
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = Self::load_from_file(&self.config_path)?;
        *self.config.write() = config;
        *self.loaded_at.write() = modified_at(&self.config_path);
        info!("설정 다시 로드 완료");
        Ok(())
    }

    /// 파일이 외부에서 수정되었으면 다시 로드한다. 실패 시 기존 설정 유지.
    fn reload_if_changed(&self) {
        let current = modified_at(&self.config_path);
        if current.is_none() || current == *self.loaded_at.read() {
            return;
        }
        if let Err(e) = self.reload() {
            warn!("설정 파일 재로드 실패, 기존 설정 유지: {e}");
            *self.loaded_at.write() = current;
        }
    }

    /// 플랫폼별 설정 디렉토리 경로
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        Ok(project_dirs()?.config_dir().to_path_buf())
    }

    /// 데이터 디렉토리 경로 (세션 파일, 스크린샷 등)
    pub fn data_dir() -> Result<PathBuf, CoreError> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// 파일에서 설정 로드
    fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })?;

        debug!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 파일에 설정 저장
    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

impl SettingsProvider for ConfigManager {
    fn load_settings(&self) -> Settings {
        self.reload_if_changed();
        self.config.read().settings.clone()
    }
}

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from("io", "BeatLens", "beatlens")
        .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());

        let config = manager.get();
        assert_eq!(config.monitor.poll_interval_ms, 100);
    }

    #[test]
    fn update_and_persist_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        manager
            .update_with(|c| {
                c.settings.auto_capture_mode = true;
                c.server.base_url = "https://score.example.com".to_string();
            })
            .unwrap();

        let reopened = ConfigManager::with_path(config_path).unwrap();
        let config = reopened.get();
        assert!(config.settings.auto_capture_mode);
        assert_eq!(config.server.base_url, "https://score.example.com");
    }

    #[test]
    fn settings_provider_reads_external_edits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(!manager.load_settings().auto_capture_mode);

        // UI 프로세스가 파일을 직접 수정한 상황
        let mut config = manager.get();
        config.settings.auto_capture_mode = true;
        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();
        // 파일 시스템의 mtime 해상도가 낮으면 명시적 reload가 필요하다
        manager.reload().unwrap();

        assert!(manager.load_settings().auto_capture_mode);
    }

    #[test]
    fn broken_file_keeps_previous_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        manager.update_with(|c| c.settings.auto_capture_mode = true).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&config_path, "{ not json").unwrap();

        assert!(manager.reload().is_err());
        assert!(manager.load_settings().auto_capture_mode, "기존 설정이 유지되어야 함");
    }
}
