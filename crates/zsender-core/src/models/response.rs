//! 서버 응답(Acknowledgement) 모델.
//!
//! `{"response": "success", "info": "processed: 3; failed: 1; total: 4; seconds spent: 0.001234"}`

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AckParseError, CoreError};

/// info 항목 수
const INFO_SEGMENTS: usize = 4;

/// 응답 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    /// 처리 성공
    Success,
    /// 처리 실패
    Failed,
    /// 알 수 없는 상태 문자열
    Other(String),
}

impl ResponseStatus {
    fn parse(raw: &str) -> Self {
        match raw {
            "success" => ResponseStatus::Success,
            "failed" => ResponseStatus::Failed,
            other => ResponseStatus::Other(other.to_string()),
        }
    }
}

/// 서버 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// 상태 원문 (`"success"` | `"failed"`)
    pub response: String,
    /// 처리 결과 원문. 자동 등록 성공 응답처럼 없는 경우 빈 문자열
    #[serde(default)]
    pub info: String,
}

impl Response {
    /// 응답 상태
    pub fn status(&self) -> ResponseStatus {
        ResponseStatus::parse(&self.response)
    }

    /// 성공 여부
    pub fn is_success(&self) -> bool {
        self.status() == ResponseStatus::Success
    }

    /// info 문자열을 `Summary`로 해석
    ///
    /// 상태가 success가 아니면 info를 보지 않고 바로 실패한다.
    pub fn summary(&self) -> Result<Summary, CoreError> {
        if !self.is_success() {
            return Err(AckParseError::Status(self.response.clone()).into());
        }
        Ok(Summary::parse(&self.info)?)
    }
}

/// 처리 결과 요약
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// 처리된 아이템 수
    pub processed: u64,
    /// 실패한 아이템 수
    pub failed: u64,
    /// 전체 아이템 수
    pub total: u64,
    /// 서버 처리 소요 시간
    pub elapsed: Duration,
}

impl Summary {
    /// `"processed: P; failed: F; total: T; seconds spent: S"` 해석
    ///
    /// 모르는 키는 무시한다.
    pub fn parse(info: &str) -> Result<Self, AckParseError> {
        let segments: Vec<&str> = info.split(';').collect();
        if segments.len() != INFO_SEGMENTS {
            return Err(AckParseError::SegmentCount(segments.len()));
        }

        let mut summary = Summary::default();
        for segment in segments {
            let (key, value) = segment
                .split_once(':')
                .ok_or_else(|| AckParseError::MalformedSegment(segment.to_string()))?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "processed" => summary.processed = parse_count(key, value)?,
                "failed" => summary.failed = parse_count(key, value)?,
                "total" => summary.total = parse_count(key, value)?,
                "seconds spent" => summary.elapsed = parse_seconds(key, value)?,
                _ => {}
            }
        }

        Ok(summary)
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed: {}; failed: {}; total: {}; seconds spent: {:.6}",
            self.processed,
            self.failed,
            self.total,
            self.elapsed.as_secs_f64()
        )
    }
}

fn invalid_number(key: &str, value: &str) -> AckParseError {
    AckParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_count(key: &str, value: &str) -> Result<u64, AckParseError> {
    value.parse().map_err(|_| invalid_number(key, value))
}

fn parse_seconds(key: &str, value: &str) -> Result<Duration, AckParseError> {
    let secs: f64 = value.parse().map_err(|_| invalid_number(key, value))?;
    Duration::try_from_secs_f64(secs).map_err(|_| invalid_number(key, value))
}
