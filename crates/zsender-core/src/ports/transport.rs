//! 전송 포트.
//!
//! 구현: `zsender-network` crate (`TcpTransport`, tokio)

use async_trait::async_trait;

use crate::error::CoreError;

/// 프레임 하나를 보내고 응답 전체를 받아오는 전송 계층
///
/// 호출마다 새 연결을 사용하며 내부 재시도는 하지 않는다.
#[async_trait]
pub trait Transport: Send + Sync {
    /// 연결 → 프레임 송신 → 연결 종료까지 수신
    ///
    /// 반환값은 헤더를 포함한 응답 원문이다.
    async fn round_trip(&self, frame: &[u8]) -> Result<Vec<u8>, CoreError>;

    /// 로그용 대상 주소 (host:port)
    fn endpoint(&self) -> String;
}
