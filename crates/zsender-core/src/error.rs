//! ZSENDER 핵심 에러 타입.
//!
//! 연결/송신/수신 단계별 타임아웃과 I/O 실패, 프로토콜 위반, 응답 해석 실패를
//! 구분한다. 코어는 어떤 경우에도 프로세스를 종료하지 않고 에러를 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 연결 타임아웃 (DNS 조회 + TCP 연결이 제한 시간 내 끝나지 않음)
    #[error("연결 타임아웃: {addr} ({timeout_ms}ms 초과)")]
    ConnectTimeout {
        /// 연결 대상 주소 (host:port)
        addr: String,
        /// 적용된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 연결 실패 (DNS 실패, 연결 거부, 도달 불가 등)
    #[error("연결 실패: {addr}: {source}")]
    Connect {
        /// 연결 대상 주소 (host:port)
        addr: String,
        /// 원인 I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 송신 타임아웃
    #[error("송신 타임아웃: {timeout_ms}ms 초과")]
    WriteTimeout {
        /// 적용된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 송신 실패
    #[error("송신 실패: {0}")]
    Write(#[source] std::io::Error),

    /// 수신 타임아웃 (서버가 제한 시간 내 연결을 닫지 않음)
    #[error("수신 타임아웃: {timeout_ms}ms 초과")]
    ReadTimeout {
        /// 적용된 타임아웃 (밀리초)
        timeout_ms: u64,
    },

    /// 수신 실패
    #[error("수신 실패: {0}")]
    Read(#[source] std::io::Error),

    /// 응답 헤더 불일치 (ZBXD\x01 로 시작하지 않음)
    #[error("응답 헤더 불일치: {received:?}")]
    HeaderMismatch {
        /// 실제 수신한 앞부분 바이트 (최대 헤더 길이)
        received: Vec<u8>,
    },

    /// 응답 본문 디코딩 실패 (JSON 형식 오류, 필수 필드 누락)
    #[error("응답 디코딩 실패: {0}")]
    ResponseDecode(String),

    /// 응답 info 해석 실패
    #[error("응답 해석 실패: {0}")]
    AckParse(#[from] AckParseError),

    /// 재시도 후에도 호스트 자동 등록 실패
    #[error("호스트 자동 등록 실패: {host} ({info})")]
    AutoregistrationFailed {
        /// 등록 대상 호스트
        host: String,
        /// 서버가 돌려준 info
        info: String,
    },

    /// 본문이 32비트 길이 필드로 표현할 수 없을 만큼 큼
    #[error("프레임 크기 초과: {0} bytes")]
    FrameTooLarge(usize),

    /// JSON 직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),
}

impl CoreError {
    /// 타임아웃 계열 에러인지 여부
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            CoreError::ConnectTimeout { .. }
                | CoreError::WriteTimeout { .. }
                | CoreError::ReadTimeout { .. }
        )
    }

    /// 호출자가 같은 요청을 다시 보내볼 만한 에러인지 판별
    ///
    /// 네트워크 단계의 실패만 해당한다. 프로토콜/해석 에러는 재전송해도
    /// 결과가 같다.
    pub fn is_retryable(&self) -> bool {
        self.is_timeout()
            || matches!(
                self,
                CoreError::Connect { .. } | CoreError::Write(_) | CoreError::Read(_)
            )
    }
}

/// 응답 info 문자열 해석 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AckParseError {
    /// 응답 상태가 success가 아님
    #[error("응답 상태가 success가 아님: {0}")]
    Status(String),

    /// `;` 구분 항목 수가 4개가 아님
    #[error("info 항목 수 오류: 4개 예상, {0}개 수신")]
    SegmentCount(usize),

    /// `key: value` 형식이 아닌 항목
    #[error("잘못된 info 항목: {0:?}")]
    MalformedSegment(String),

    /// 숫자가 아닌 값
    #[error("숫자가 아닌 값 — {key}: {value:?}")]
    InvalidNumber {
        /// 항목 이름
        key: String,
        /// 원본 값
        value: String,
    },
}
