//! Zabbix sender 클라이언트.
//!
//! 측정값 분류, 패킷 인코딩, 전송, 응답 디코딩을 오케스트레이션한다.
//! 프로토콜 정책(분류 규칙, 자동 등록 재시도)은 이 모듈에만 있다.

use std::sync::Arc;
use tracing::{debug, info, warn};
use zsender_core::config::{ClockPolicy, SenderConfig};
use zsender_core::error::CoreError;
use zsender_core::models::metric::Metric;
use zsender_core::models::packet::Packet;
use zsender_core::models::response::{Response, ResponseStatus};
use zsender_core::ports::transport::Transport;
use zsender_core::protocol;

use crate::tcp_transport::TcpTransport;

/// `send_metrics` 결과
///
/// 비어 있는 분류는 전송하지 않으며 `None`이다 (빈 배치 전송 성공과 다름).
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Active 배치 (`"agent data"`) 결과
    pub active: Option<Result<Response, CoreError>>,
    /// Trapper 배치 (`"sender data"`) 결과
    pub trapper: Option<Result<Response, CoreError>>,
}

impl BatchOutcome {
    /// 전송한 배치가 모두 success 응답을 받았는지 여부
    pub fn all_succeeded(&self) -> bool {
        [&self.active, &self.trapper]
            .into_iter()
            .flatten()
            .all(|r| matches!(r, Ok(resp) if resp.is_success()))
    }
}

/// 응답 원문 디코딩
///
/// 헤더를 검증하고 13바이트 위치부터를 JSON 본문으로 읽는다.
pub fn decode_response(raw: &[u8]) -> Result<Response, CoreError> {
    let body = protocol::response_body(raw)?;
    serde_json::from_slice(body).map_err(|e| CoreError::ResponseDecode(e.to_string()))
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Zabbix sender 클라이언트
pub struct ZabbixSender {
    transport: Arc<dyn Transport>,
    clock_policy: ClockPolicy,
}

impl ZabbixSender {
    /// 설정으로 TCP 클라이언트 생성
    pub fn new(config: &SenderConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let transport = TcpTransport::from_config(&config.server, &config.timeouts);
        Ok(Self::with_transport(Arc::new(transport), config.clock_policy))
    }

    /// 임의의 전송 계층으로 생성
    pub fn with_transport(transport: Arc<dyn Transport>, clock_policy: ClockPolicy) -> Self {
        Self {
            transport,
            clock_policy,
        }
    }

    /// 타임스탬프 정책
    pub fn clock_policy(&self) -> ClockPolicy {
        self.clock_policy
    }

    /// 대상 서버 주소
    pub fn endpoint(&self) -> String {
        self.transport.endpoint()
    }

    /// 패킷 전송 후 응답 원문 반환
    ///
    /// 연결은 매 호출 새로 열리고 성공/실패와 무관하게 닫힌다.
    pub async fn send(&self, packet: &Packet) -> Result<Vec<u8>, CoreError> {
        let frame = self.stamp(packet).encode()?;
        debug!(
            "패킷 전송: request={}, items={}, frame={} bytes, endpoint={}",
            packet.request,
            packet.len(),
            frame.len(),
            self.transport.endpoint()
        );
        self.transport.round_trip(&frame).await
    }

    /// 패킷 전송 후 응답 디코딩
    pub async fn send_packet(&self, packet: &Packet) -> Result<Response, CoreError> {
        let raw = self.send(packet).await?;
        decode_response(&raw)
    }

    /// 측정값을 Active/Trapper로 나눠 각각 독립된 연결로 전송
    ///
    /// 각 분류 안의 입력 순서는 유지된다. 두 배치는 동시에 전송되며
    /// 한쪽의 실패가 다른 쪽 결과에 영향을 주지 않는다.
    pub async fn send_metrics(&self, metrics: Vec<Metric>) -> BatchOutcome {
        let (active, trapper): (Vec<Metric>, Vec<Metric>) =
            metrics.into_iter().partition(Metric::is_active);

        let (active, trapper) = tokio::join!(self.send_batch(active), self.send_batch(trapper));
        BatchOutcome { active, trapper }
    }

    async fn send_batch(&self, metrics: Vec<Metric>) -> Option<Result<Response, CoreError>> {
        if metrics.is_empty() {
            return None;
        }

        let count = metrics.len();
        let packet = Packet::new(metrics);
        let result = self.send_packet(&packet).await;

        match &result {
            Ok(resp) => info!(
                "배치 전송 완료: request={}, items={count}, response={}, info={}",
                packet.request, resp.response, resp.info
            ),
            Err(e) => warn!(
                "배치 전송 실패: request={}, items={count}: {e}",
                packet.request
            ),
        }
        Some(result)
    }

    /// 호스트 자동 등록
    ///
    /// 서버는 처음 보는 호스트의 첫 등록 요청에 대해 호스트를 받아들이면서도
    /// 실패를 응답하므로, success가 아니면 같은 요청을 정확히 한 번 더 보낸다.
    /// 재시도 응답이 `"failed"`일 때만 최종 실패.
    pub async fn register_host(
        &self,
        host: &str,
        host_metadata: Option<&str>,
    ) -> Result<(), CoreError> {
        let packet = Packet::active_checks(host, host_metadata.map(str::to_string));

        let first = self.send_packet(&packet).await?;
        if first.is_success() {
            info!("호스트 자동 등록 성공: {host}");
            return Ok(());
        }

        warn!(
            "호스트 자동 등록 첫 응답 실패 ({}: {}), 1회 재시도: {host}",
            first.response, first.info
        );

        let retry = self.send_packet(&packet).await?;
        if retry.status() == ResponseStatus::Failed {
            return Err(CoreError::AutoregistrationFailed {
                host: host.to_string(),
                info: retry.info,
            });
        }

        info!("호스트 자동 등록 성공 (재시도): {host}");
        Ok(())
    }

    /// 타임스탬프 정책 적용
    ///
    /// `StampNow`일 때 비어 있는 clock만 채운다. 명시된 clock은 덮어쓰지 않는다.
    fn stamp<'a>(&self, packet: &'a Packet) -> std::borrow::Cow<'a, Packet> {
        use std::borrow::Cow;

        if self.clock_policy == ClockPolicy::Omit || packet.data.is_none() {
            return Cow::Borrowed(packet);
        }

        let now = unix_now();
        let mut stamped = packet.clone();
        stamped.clock.get_or_insert(now);
        if let Some(data) = stamped.data.as_mut() {
            for metric in data.iter_mut() {
                metric.clock.get_or_insert(now);
            }
        }
        Cow::Owned(stamped)
    }
}
