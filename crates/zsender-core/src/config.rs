//! 송신기 설정 구조체.
//!
//! 서버 주소, 단계별 타임아웃, 타임스탬프 정책을 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드 (`zsender-app`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 기본 서버 포트 (trapper)
pub const DEFAULT_PORT: u16 = 10051;

/// 최상위 송신기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 타임아웃 설정
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// 타임스탬프 정책
    #[serde(default)]
    pub clock_policy: ClockPolicy,
}

/// 서버 연결 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 서버 호스트 (이름 또는 IP)
    #[serde(default = "default_host")]
    pub host: String,
    /// 서버 포트
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식 주소
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 단계별 타임아웃 설정
///
/// 읽기 타임아웃이 긴 것은 디스커버리 규칙이 많은 페이로드를 처리하는
/// 부하 높은 서버가 응답에 수 초씩 걸리기 때문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// 연결 타임아웃 (밀리초)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_ms: u64,
    /// 송신 타임아웃 (밀리초)
    #[serde(default = "default_write_timeout_ms")]
    pub write_ms: u64,
    /// 수신 타임아웃 (밀리초)
    #[serde(default = "default_read_timeout_ms")]
    pub read_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout_ms(),
            write_ms: default_write_timeout_ms(),
            read_ms: default_read_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    /// 연결 타임아웃
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    /// 송신 타임아웃
    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }

    /// 수신 타임아웃
    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }
}

/// 타임스탬프가 없는 측정값/패킷 처리 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPolicy {
    /// clock 필드 생략 — 서버 수신 시각 적용
    #[default]
    Omit,
    /// 전송 직전 현재 시각으로 채움
    StampNow,
}

impl SenderConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            timeouts: TimeoutConfig::default(),
            clock_policy: ClockPolicy::default(),
        }
    }

    /// 서버 주소 지정
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server.host = host.into();
        self.server.port = port;
        self
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.server.host.trim().is_empty() {
            return Err(CoreError::Config("서버 호스트가 비어 있음".to_string()));
        }
        if self.server.port == 0 {
            return Err(CoreError::Config("서버 포트는 0일 수 없음".to_string()));
        }
        let timeouts = [
            ("connect_ms", self.timeouts.connect_ms),
            ("write_ms", self.timeouts.write_ms),
            ("read_ms", self.timeouts.read_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, ms)| *ms == 0) {
            return Err(CoreError::Config(format!("타임아웃 {name}은 0보다 커야 함")));
        }
        Ok(())
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_connect_timeout_ms() -> u64 {
    5_000
}
fn default_write_timeout_ms() -> u64 {
    5_000
}
fn default_read_timeout_ms() -> u64 {
    15_000
}
