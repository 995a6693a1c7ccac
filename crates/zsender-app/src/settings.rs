//! 설정 로드.
//!
//! 우선순위: 기본값 < 설정 파일(TOML 등) < 환경변수(`ZSENDER__SERVER__HOST` 형식) < CLI 인자.
//! CLI 인자 오버라이드는 `main`에서 적용한다.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;
use zsender_core::config::SenderConfig;
use zsender_core::error::CoreError;

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.toml";

/// 환경변수 접두사
const ENV_PREFIX: &str = "ZSENDER";

/// 플랫폼별 기본 설정 파일 경로
///
/// - macOS: `~/Library/Application Support/com.zsender.zsender/config.toml`
/// - Windows: `%APPDATA%\zsender\zsender\config\config.toml`
/// - Linux: `~/.config/zsender/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "zsender", "zsender").map(|p| p.config_dir().join(CONFIG_FILE_NAME))
}

/// 설정 로드
///
/// `path`가 주어지면 해당 파일은 반드시 존재해야 하고, 없으면 기본 경로의
/// 파일을 있는 경우에만 읽는다.
pub fn load(path: Option<&Path>) -> Result<SenderConfig, CoreError> {
    let mut builder = config::Config::builder();

    match path {
        Some(path) => {
            debug!("설정 파일: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(default) = default_config_path() {
                debug!("기본 설정 파일 (선택): {}", default.display());
                builder = builder.add_source(config::File::from(default).required(false));
            }
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config: SenderConfig = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| CoreError::Config(format!("설정 로드 실패: {e}")))?;

    config.validate()?;
    Ok(config)
}
