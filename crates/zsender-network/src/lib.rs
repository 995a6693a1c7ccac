//! # zsender-network
//!
//! Zabbix sender 프로토콜 네트워크 어댑터.
//! TCP 전송(`Transport` 포트 구현)과 측정값 분류/전송/응답 해석을 담당하는
//! 클라이언트를 제공한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use zsender_core::config::SenderConfig;
//! use zsender_core::models::metric::Metric;
//! use zsender_network::sender::ZabbixSender;
//!
//! let sender = ZabbixSender::new(&SenderConfig::default_config().with_server("zabbix", 10051))?;
//! let outcome = sender.send_metrics(vec![Metric::new("web-01", "app.latency", "12")]).await;
//! ```

pub mod sender;
pub mod tcp_transport;
