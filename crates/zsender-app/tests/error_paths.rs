//! 에러 경로 테스트.
//!
//! 연결/송신/수신 타임아웃, 연결 거부, 프로토콜 위반이 호출자에게 타입별 에러로
//! 전달되는지 검증한다. 어떤 경우에도 패닉이나 종료 없이 반환되어야 한다.


use assert_matches::assert_matches;
use mock_server::{unresponsive_listener, MockServer, Reply};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use zsender_core::config::ClockPolicy;
use zsender_core::error::{AckParseError, CoreError};
use zsender_core::models::metric::Metric;
use zsender_core::models::packet::Packet;
use zsender_core::ports::transport::Transport;
use zsender_network::sender::ZabbixSender;
use zsender_network::tcp_transport::TcpTransport;

fn sender_with_timeouts(addr: String, connect: Duration, read: Duration) -> ZabbixSender {
    let transport = TcpTransport::new(addr, connect, Duration::from_secs(1), read);
    ZabbixSender::with_transport(Arc::new(transport), ClockPolicy::Omit)
}

fn one_metric() -> Packet {
    Packet::new(vec![Metric::new("h1", "k1", "10")])
}

#[tokio::test]
async fn connect_timeout_returns_promptly() {
    let (addr, _listener, _fillers) = unresponsive_listener().await;
    let sender = sender_with_timeouts(addr, Duration::from_millis(50), Duration::from_secs(1));

    let started = Instant::now();
    let err = sender.send(&one_metric()).await.unwrap_err();
    let elapsed = started.elapsed();

    assert_matches!(err, CoreError::ConnectTimeout { timeout_ms: 50, .. });
    assert!(elapsed <= Duration::from_millis(200), "took {elapsed:?}");
}

#[tokio::test]
async fn refused_connection_is_connect_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let sender = sender_with_timeouts(addr, Duration::from_secs(1), Duration::from_secs(1));
    let err = sender.send(&one_metric()).await.unwrap_err();
    assert_matches!(err, CoreError::Connect { .. });
    assert!(err.is_retryable());
}

/// 이름 조회는 연결 단계에 포함되므로 DNS 응답 여부와 무관하게 connect 타임아웃 안에 끝난다
#[tokio::test]
async fn unresolvable_host_fails_within_connect_timeout() {
    let sender = sender_with_timeouts(
        "no-such-host.invalid:10051".to_string(),
        Duration::from_millis(500),
        Duration::from_secs(1),
    );

    let started = Instant::now();
    let err = sender.send(&one_metric()).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(
        matches!(
            err,
            CoreError::Connect { .. } | CoreError::ConnectTimeout { timeout_ms: 500, .. }
        ),
        "got {err:?}"
    );
    assert!(elapsed <= Duration::from_millis(800), "took {elapsed:?}");
}

#[tokio::test]
async fn stalled_reader_is_write_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    // 연결은 수락하지만 읽지 않아 소켓 버퍼가 가득 참
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let transport = TcpTransport::new(
        addr,
        Duration::from_secs(1),
        Duration::from_millis(100),
        Duration::from_secs(1),
    );
    let frame = vec![0u8; 64 * 1024 * 1024];

    let started = Instant::now();
    let err = transport.round_trip(&frame).await.unwrap_err();
    let elapsed = started.elapsed();

    assert_matches!(err, CoreError::WriteTimeout { timeout_ms: 100 });
    assert!(err.is_timeout());
    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
    server.abort();
}

#[tokio::test]
async fn silent_server_is_read_timeout() {
    let server = MockServer::with_replies(vec![Reply::Silent(Duration::from_secs(2))]).await;
    let sender = sender_with_timeouts(
        server.addr.clone(),
        Duration::from_secs(1),
        Duration::from_millis(100),
    );

    let err = sender.send(&one_metric()).await.unwrap_err();
    assert_matches!(err, CoreError::ReadTimeout { timeout_ms: 100 });
}

#[tokio::test]
async fn wrong_header_is_protocol_error() {
    let server =
        MockServer::with_replies(vec![Reply::Raw(b"HTTP/1.1 400 Bad Request\r\n\r\n".to_vec())])
            .await;
    let sender = sender_with_timeouts(
        server.addr.clone(),
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let err = sender.send_packet(&one_metric()).await.unwrap_err();
    assert_matches!(err, CoreError::HeaderMismatch { ref received } if received == b"HTTP/");
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let raw = zsender_core::protocol::encode_frame(b"{\"response\":").unwrap();
    let server = MockServer::with_replies(vec![Reply::Raw(raw)]).await;
    let sender = sender_with_timeouts(
        server.addr.clone(),
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let err = sender.send_packet(&one_metric()).await.unwrap_err();
    assert_matches!(err, CoreError::ResponseDecode(_));
}

#[tokio::test]
async fn failed_response_summary_is_status_error() {
    let server = MockServer::with_replies(vec![Reply::Json(json!({
        "response": "failed",
        "info": "processed: 0; failed: 1; total: 1; seconds spent: 0.000010"
    }))])
    .await;
    let sender = sender_with_timeouts(
        server.addr.clone(),
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let outcome = sender.send_metrics(vec![Metric::new("h1", "k1", "10")]).await;
    let resp = outcome.trapper.unwrap().unwrap();
    assert_matches!(
        resp.summary(),
        Err(CoreError::AckParse(AckParseError::Status(ref s))) if s == "failed"
    );
}

#[tokio::test]
async fn one_batch_failure_does_not_cancel_other() {
    // 먼저 도착한 연결은 응답하지 않고, 다음 연결은 정상 응답
    let server = MockServer::with_replies(vec![Reply::Silent(Duration::from_secs(2))]).await;
    let sender = sender_with_timeouts(
        server.addr.clone(),
        Duration::from_secs(1),
        Duration::from_millis(300),
    );

    let outcome = sender
        .send_metrics(vec![Metric::active("h", "a", "1"), Metric::new("h", "t", "1")])
        .await;

    let results = [outcome.active.unwrap(), outcome.trapper.unwrap()];
    let timeouts = results
        .iter()
        .filter(|r| matches!(r, Err(CoreError::ReadTimeout { .. })))
        .count();
    let successes = results
        .iter()
        .filter(|r| matches!(r, Ok(resp) if resp.is_success()))
        .count();
    assert_eq!((timeouts, successes), (1, 1));
}
