//! 포트 인터페이스 (trait).
//!
//! 어댑터 crate(`zsender-network`)가 구현하며 클라이언트는 `Arc<dyn T>`로 사용한다.
//! 모든 async trait은 `async_trait` 매크로를 사용하여 object safety를 보장한다.

pub mod transport;
