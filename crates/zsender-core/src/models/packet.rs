//! 요청 패킷(배치) 모델.
//!
//! 같은 분류의 측정값 묶음과 요청 메타데이터. 직접 와이어 프레임으로 인코딩한다.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::metric::{Metric, MetricKind};
use crate::protocol;

/// 요청 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Trapper 아이템 전송
    #[serde(rename = "sender data")]
    SenderData,
    /// Active 아이템 전송
    #[serde(rename = "agent data")]
    AgentData,
    /// 호스트 자동 등록
    #[serde(rename = "active checks")]
    ActiveChecks,
}

impl RequestKind {
    /// 와이어상의 요청 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::SenderData => "sender data",
            RequestKind::AgentData => "agent data",
            RequestKind::ActiveChecks => "active checks",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 요청 패킷
///
/// 설정되지 않은 선택 필드는 JSON 키 자체가 생략된다 (null/0 아님).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// 요청 종류
    pub request: RequestKind,
    /// 측정값 목록 (입력 순서 유지)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Metric>>,
    /// 배치 단위 타임스탬프
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<i64>,
    /// 자동 등록 대상 호스트 (`"active checks"` 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// 자동 등록 호스트 메타데이터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_metadata: Option<String>,
}

impl Packet {
    /// 측정값 묶음으로 패킷 생성
    ///
    /// 비어 있지 않고 모두 Active이면 `"agent data"`, 그 외는 `"sender data"`.
    pub fn new(metrics: Vec<Metric>) -> Self {
        let all_active =
            !metrics.is_empty() && metrics.iter().all(|m| m.kind() == MetricKind::Active);
        let request = if all_active {
            RequestKind::AgentData
        } else {
            RequestKind::SenderData
        };

        Self {
            request,
            data: Some(metrics),
            clock: None,
            host: None,
            host_metadata: None,
        }
    }

    /// 호스트 자동 등록 요청 생성 (data 없음)
    pub fn active_checks(host: impl Into<String>, host_metadata: Option<String>) -> Self {
        Self {
            request: RequestKind::ActiveChecks,
            data: None,
            clock: None,
            host: Some(host.into()),
            host_metadata,
        }
    }

    /// 배치 타임스탬프 지정
    pub fn with_clock(mut self, clock: i64) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 포함된 측정값 수
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// 측정값이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON 본문
    pub fn body(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// 현재 본문 길이에 대한 8바이트 길이 필드
    pub fn data_len(&self) -> Result<[u8; protocol::LENGTH_FIELD_LEN], CoreError> {
        protocol::length_field(self.body()?.len())
    }

    /// `HEADER || LENGTH || BODY` 프레임으로 인코딩
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        protocol::encode_frame(&self.body()?)
    }
}
