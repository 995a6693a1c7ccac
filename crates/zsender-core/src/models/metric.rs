//! 측정값(Metric) 모델.
//!
//! 하나의 호스트/아이템 키에 대한 값 하나. 값은 숫자든 문자열이든 텍스트로 전달한다.

use serde::{Deserialize, Serialize};

/// 측정값 분류 — 어느 요청 종류로 전송될지 결정한다
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Trapper 아이템 (`"sender data"`)
    #[default]
    Trapper,
    /// Active 체크 아이템 (`"agent data"`)
    Active,
}

/// 측정값
///
/// `kind`는 생성 시점에 고정되며 직렬화되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// 모니터링 대상 호스트 이름
    pub host: String,
    /// 아이템 키
    pub key: String,
    /// 값 (텍스트)
    pub value: String,
    /// Unix 타임스탬프 (초). `None`이면 JSON에서 생략되어 서버 수신 시각이 적용됨
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<i64>,
    #[serde(skip)]
    kind: MetricKind,
}

impl Metric {
    /// Trapper 측정값 생성
    pub fn new(host: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_kind(host, key, value, MetricKind::Trapper)
    }

    /// Active 측정값 생성
    pub fn active(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::with_kind(host, key, value, MetricKind::Active)
    }

    /// 분류를 지정하여 생성
    pub fn with_kind(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        kind: MetricKind,
    ) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock: None,
            kind,
        }
    }

    /// 타임스탬프 지정
    pub fn with_clock(mut self, clock: i64) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 분류
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Active 아이템 여부
    pub fn is_active(&self) -> bool {
        self.kind == MetricKind::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_omitted_when_unset() {
        let metric = Metric::new("h1", "k1", "10");
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json, serde_json::json!({"host": "h1", "key": "k1", "value": "10"}));
    }

    #[test]
    fn kind_is_never_serialized() {
        let metric = Metric::active("h1", "agent.ping", "1").with_clock(1_700_000_000);
        let json = serde_json::to_string(&metric).unwrap();
        assert!(!json.contains("kind"));
        assert!(json.contains(r#""clock":1700000000"#));
        assert!(metric.is_active());
        assert_eq!(metric.kind(), MetricKind::Active);
    }

    #[test]
    fn default_kind_is_trapper() {
        let metric = Metric::new("h", "k", "v");
        assert_eq!(metric.kind(), MetricKind::Trapper);
        assert!(!metric.is_active());
    }
}
