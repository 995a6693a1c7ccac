//! ZSENDER 도메인 모델.
//!
//! 측정값, 요청 패킷, 서버 응답. 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod metric;
pub mod packet;
pub mod response;
