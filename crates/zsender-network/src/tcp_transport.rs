//! TCP 전송 어댑터.
//!
//! `Transport` 포트 구현. 요청마다 새 연결을 열고
//! 연결 → 송신 → 수신(EOF까지) 각 단계에 독립된 타임아웃을 적용한다.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;
use zsender_core::config::{ServerConfig, TimeoutConfig};
use zsender_core::error::CoreError;
use zsender_core::ports::transport::Transport;

/// 응답 수신 버퍼 초기 용량 (응답 JSON은 보통 100바이트 남짓)
const READ_BUF_CAPACITY: usize = 256;

fn as_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// TCP 전송 — `Transport` 포트 구현
///
/// 연결 파라미터는 생성 후 변경되지 않는다. 풀링/재사용/재시도 없음.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
    connect_timeout: Duration,
    write_timeout: Duration,
    read_timeout: Duration,
}

impl TcpTransport {
    /// 새 TCP 전송 생성
    pub fn new(
        addr: impl Into<String>,
        connect_timeout: Duration,
        write_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            write_timeout,
            read_timeout,
        }
    }

    /// 설정 구조체로부터 생성
    pub fn from_config(server: &ServerConfig, timeouts: &TimeoutConfig) -> Self {
        Self::new(
            server.address(),
            timeouts.connect(),
            timeouts.write(),
            timeouts.read(),
        )
    }

    /// 대상 주소 (host:port)
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// 연결 타임아웃
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// 송신 타임아웃
    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// 수신 타임아웃
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// 이름 조회 + TCP 연결
    ///
    /// 타이머가 먼저 끝나면 진행 중인 연결 future를 drop하여 시도를 중단하고
    /// `ConnectTimeout`을 반환한다.
    pub async fn connect(&self) -> Result<TcpStream, CoreError> {
        debug!("연결 시도: {} (timeout {:?})", self.addr, self.connect_timeout);

        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(CoreError::Connect {
                addr: self.addr.clone(),
                source,
            }),
            Err(_elapsed) => Err(CoreError::ConnectTimeout {
                addr: self.addr.clone(),
                timeout_ms: as_millis(self.connect_timeout),
            }),
        }
    }

    /// 버퍼 전체 송신
    pub async fn write(&self, stream: &mut TcpStream, bytes: &[u8]) -> Result<(), CoreError> {
        let io = async {
            stream.write_all(bytes).await?;
            stream.flush().await
        };

        match tokio::time::timeout(self.write_timeout, io).await {
            Ok(result) => result.map_err(CoreError::Write),
            Err(_elapsed) => Err(CoreError::WriteTimeout {
                timeout_ms: as_millis(self.write_timeout),
            }),
        }
    }

    /// 서버가 연결을 닫을 때까지 수신
    ///
    /// 응답 자체에 길이 필드가 있지만 사용하지 않는다. 서버는 응답 후
    /// 연결을 닫으므로 EOF가 완료 조건이다.
    pub async fn read_all(&self, stream: &mut TcpStream) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::with_capacity(READ_BUF_CAPACITY);

        match tokio::time::timeout(self.read_timeout, stream.read_to_end(&mut buf)).await {
            Ok(Ok(n)) => {
                debug!("응답 수신 완료: {n} bytes");
                Ok(buf)
            }
            Ok(Err(e)) => Err(CoreError::Read(e)),
            Err(_elapsed) => Err(CoreError::ReadTimeout {
                timeout_ms: as_millis(self.read_timeout),
            }),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn round_trip(&self, frame: &[u8]) -> Result<Vec<u8>, CoreError> {
        // stream은 이 함수가 소유하므로 어느 경로로 나가든 drop 시 연결이 닫힌다
        let mut stream = self.connect().await?;
        self.write(&mut stream, frame).await?;
        let response = self.read_all(&mut stream).await?;

        if let Err(e) = stream.shutdown().await {
            debug!("연결 종료 중 에러 (무시): {e}");
        }
        Ok(response)
    }

    fn endpoint(&self) -> String {
        self.addr.clone()
    }
}
