//! # zsender-core
//!
//! Zabbix sender 프로토콜 도메인 모델, 프레이밍, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 측정값/패킷/응답 구조체 (serde Serialize/Deserialize)
//! - [`protocol`] — `ZBXD\x01` 헤더 + 8바이트 길이 필드 프레이밍
//! - [`ports`] — 전송 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 송신기 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
pub mod protocol;
