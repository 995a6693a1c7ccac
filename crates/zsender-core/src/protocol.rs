//! 와이어 프레이밍.
//!
//! 요청과 응답은 같은 봉투를 사용한다:
//!
//! ```text
//! bytes 0-4:   "ZBXD" 0x01          (고정 헤더)
//! bytes 5-12:  u32-LE 본문 길이 + 0 4바이트 (8바이트 필드)
//! bytes 13+:   JSON 본문 (UTF-8)
//! ```

use crate::error::CoreError;

/// 프로토콜 헤더 (매직 + 버전 바이트)
pub const HEADER: &[u8; 5] = b"ZBXD\x01";

/// 헤더 길이
pub const HEADER_LEN: usize = HEADER.len();

/// 길이 필드 크기 (하위 4바이트만 의미 있음)
pub const LENGTH_FIELD_LEN: usize = 8;

/// 응답 본문 시작 오프셋 (헤더 5 + 길이 필드 8)
pub const BODY_OFFSET: usize = HEADER_LEN + LENGTH_FIELD_LEN;

/// 본문 길이를 8바이트 길이 필드로 변환
///
/// 하위 4바이트는 little-endian u32, 상위 4바이트는 0.
pub fn length_field(body_len: usize) -> Result<[u8; LENGTH_FIELD_LEN], CoreError> {
    let len = u32::try_from(body_len).map_err(|_| CoreError::FrameTooLarge(body_len))?;
    let mut field = [0u8; LENGTH_FIELD_LEN];
    field[..4].copy_from_slice(&len.to_le_bytes());
    Ok(field)
}

/// 본문을 `HEADER || LENGTH || BODY` 프레임으로 감싼다
pub fn encode_frame(body: &[u8]) -> Result<Vec<u8>, CoreError> {
    let len = length_field(body.len())?;
    let mut frame = Vec::with_capacity(BODY_OFFSET + body.len());
    frame.extend_from_slice(HEADER);
    frame.extend_from_slice(&len);
    frame.extend_from_slice(body);
    Ok(frame)
}

/// 수신한 응답에서 JSON 본문 부분을 잘라낸다
///
/// 헤더를 검증한 뒤 길이 필드 값과 무관하게 13바이트 위치부터 끝까지를
/// 본문으로 취급한다. 연결이 닫힐 때까지 읽은 전체가 응답이라는 전제이므로,
/// 응답 후 연결을 유지하는 서버와는 맞지 않는다.
pub fn response_body(raw: &[u8]) -> Result<&[u8], CoreError> {
    if !raw.starts_with(HEADER) {
        return Err(CoreError::HeaderMismatch {
            received: raw[..raw.len().min(HEADER_LEN)].to_vec(),
        });
    }

    raw.get(BODY_OFFSET..).ok_or_else(|| {
        CoreError::ResponseDecode(format!(
            "응답이 너무 짧음: {} bytes (최소 {BODY_OFFSET})",
            raw.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn frame_layout() {
        let frame = encode_frame(b"{}").unwrap();
        assert_eq!(&frame[..5], b"ZBXD\x01");
        assert_eq!(&frame[5..13], &[2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&frame[13..], b"{}");
    }

    #[test]
    fn length_field_matches_body_len() {
        for len in [0usize, 1, 255, 256, 4096, 65535, 65536, 70_000] {
            let body = vec![b'x'; len];
            let frame = encode_frame(&body).unwrap();
            let decoded = u32::from_le_bytes(frame[5..9].try_into().unwrap());
            assert_eq!(decoded as usize, len);
            assert_eq!(&frame[9..13], &[0, 0, 0, 0]);
            assert_eq!(frame.len(), BODY_OFFSET + len);
        }
    }

    #[test]
    fn oversized_length_rejected() {
        if usize::BITS > 32 {
            let too_big = (u64::from(u32::MAX) + 1) as usize;
            assert_matches!(length_field(too_big), Err(CoreError::FrameTooLarge(n)) if n == too_big);
        }
    }

    #[test]
    fn response_body_slices_at_fixed_offset() {
        // 길이 필드가 틀려도 13바이트 이후 전체가 본문
        let mut raw = HEADER.to_vec();
        raw.extend_from_slice(&[99, 0, 0, 0, 0, 0, 0, 0]);
        raw.extend_from_slice(br#"{"response":"success"}"#);
        assert_eq!(response_body(&raw).unwrap(), br#"{"response":"success"}"#);
    }

    #[test]
    fn response_header_mismatch() {
        assert_matches!(
            response_body(b"HTTP/1.1 400"),
            Err(CoreError::HeaderMismatch { received }) if received == b"HTTP/"
        );
        assert_matches!(response_body(b""), Err(CoreError::HeaderMismatch { .. }));
        assert_matches!(response_body(b"ZBX"), Err(CoreError::HeaderMismatch { .. }));
    }

    #[test]
    fn truncated_response_is_decode_error() {
        assert_matches!(
            response_body(b"ZBXD\x01\x02\x00"),
            Err(CoreError::ResponseDecode(_))
        );
    }
}
