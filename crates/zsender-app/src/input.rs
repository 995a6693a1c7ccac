//! 입력 파일 파싱.
//!
//! 한 줄에 측정값 하나: `<host> <key> <value> [clock]`.
//! 공백이 들어간 값은 큰따옴표로 감싼다 (`\"`, `\\` 이스케이프 지원).
//! 빈 줄과 `#` 주석 줄은 건너뛴다.

use std::io::BufRead;
use thiserror::Error;
use zsender_core::models::metric::{Metric, MetricKind};

/// 입력 파싱 에러
#[derive(Debug, Error)]
pub enum InputError {
    /// 항목 수 오류
    #[error("{line}행: 3~4개 항목 예상, {found}개 수신")]
    FieldCount { line: usize, found: usize },

    /// 닫히지 않은 따옴표
    #[error("{line}행: 닫히지 않은 따옴표")]
    UnterminatedQuote { line: usize },

    /// clock이 정수가 아님
    #[error("{line}행: 잘못된 타임스탬프 {value:?}")]
    InvalidClock { line: usize, value: String },

    /// 읽기 실패
    #[error("입력 읽기 실패: {0}")]
    Io(#[from] std::io::Error),
}

/// 입력 전체를 측정값 목록으로 변환
pub fn parse_metrics<R: BufRead>(reader: R, kind: MetricKind) -> Result<Vec<Metric>, InputError> {
    let mut metrics = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_fields(trimmed).ok_or(InputError::UnterminatedQuote { line: line_no })?;
        let metric = match fields.as_slice() {
            [host, key, value] => Metric::with_kind(host, key, value, kind),
            [host, key, value, clock] => {
                let clock = clock.parse().map_err(|_| InputError::InvalidClock {
                    line: line_no,
                    value: clock.clone(),
                })?;
                Metric::with_kind(host, key, value, kind).with_clock(clock)
            }
            _ => {
                return Err(InputError::FieldCount {
                    line: line_no,
                    found: fields.len(),
                })
            }
        };
        metrics.push(metric);
    }

    Ok(metrics)
}

/// 공백 구분 + 큰따옴표 인용 토큰 분리. 따옴표가 닫히지 않으면 `None`
fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut field = String::new();
        if first == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => field.push(escaped),
                        Some(other) => {
                            field.push('\\');
                            field.push(other);
                        }
                        None => return None,
                    },
                    _ => field.push(c),
                }
            }
            if !closed {
                return None;
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                field.push(c);
            }
        }
        fields.push(field);
    }

    Some(fields)
}
