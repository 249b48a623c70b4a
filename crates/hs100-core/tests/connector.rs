//! Exchange tests for the connector against an in-process TCP server.

use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};

use hs100_core::{
    crypto::encrypt_with_header,
    error::Error,
    send_command,
};

const A_REQUEST: &str = r#"{"expected":"command"}"#;
const A_RESPONSE: &str = r#"{"response":"expected"}"#;

const TEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Starts a one-shot server that reads a full request frame, reports the
/// raw bytes it saw, and writes back the given response bytes.
async fn start_server(response: Vec<u8>) -> (u16, oneshot::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut conn, _) = listener.accept().await.unwrap();

        let mut header = [0u8; 4];
        conn.read_exact(&mut header).await.unwrap();
        let len = u32::from_be_bytes(header) as usize;
        let mut payload = vec![0u8; len];
        conn.read_exact(&mut payload).await.unwrap();

        let mut request = header.to_vec();
        request.extend_from_slice(&payload);
        let _ = tx.send(request);

        conn.write_all(&response).await.unwrap();
    });

    (port, rx)
}

#[tokio::test]
async fn sends_framed_request_and_returns_response() {
    let (port, request_rx) = start_server(encrypt_with_header(A_RESPONSE.as_bytes())).await;

    let response = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST)
        .await
        .unwrap();

    assert_eq!(response, A_RESPONSE);

    let request = request_rx.await.unwrap();
    assert_eq!(request, encrypt_with_header(A_REQUEST.as_bytes()));
}

#[tokio::test]
async fn handles_empty_response_payload() {
    let (port, _rx) = start_server(encrypt_with_header(&[])).await;

    let response = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST)
        .await
        .unwrap();

    assert_eq!(response, "");
}

#[tokio::test]
async fn fails_if_cannot_connect() {
    // Bind and immediately drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let started = std::time::Instant::now();
    let result = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST).await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, Error::ConnectionFailed(_) | Error::Timeout(_)),
        "got {:?}",
        err
    );
    assert!(started.elapsed() < TEST_TIMEOUT + Duration::from_secs(1));
}

#[tokio::test]
async fn fails_on_short_header() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut conn, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = conn.read(&mut buf).await;
        // Two bytes are not a header.
        conn.write_all(&[0x00, 0x01]).await.unwrap();
    });

    let err = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {:?}", err);
}

#[tokio::test]
async fn fails_on_truncated_payload() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut conn, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = conn.read(&mut buf).await;
        // Header promises 100 bytes, only 3 arrive before close.
        conn.write_all(&100u32.to_be_bytes()).await.unwrap();
        conn.write_all(&[0xAA, 0xBB, 0xCC]).await.unwrap();
    });

    let err = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {:?}", err);
}

#[tokio::test]
async fn fails_on_oversize_header() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut conn, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = conn.read(&mut buf).await;
        conn.write_all(&u32::MAX.to_be_bytes()).await.unwrap();
    });

    let err = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Protocol(_)), "got {:?}", err);
}

#[tokio::test]
async fn times_out_on_unresponsive_device() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // Accept and then hold the connection open without ever answering.
    let (done_tx, done_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let (_conn, _) = listener.accept().await.unwrap();
        let _ = done_rx.await;
    });

    let err = send_command("127.0.0.1", port, Duration::from_millis(200), A_REQUEST)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "got {:?}", err);
    drop(done_tx);
}

#[tokio::test]
async fn releases_connection_across_repeated_failures() {
    // A single-connection-at-a-time server: if a previous call leaked its
    // connection the next accept would never happen within the timeout.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let (mut conn, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = conn.read(&mut buf).await;
            // Always truncate: header says 50, one byte follows.
            let _ = conn.write_all(&50u32.to_be_bytes()).await;
            let _ = conn.write_all(&[0x00]).await;
            // conn drops here, closing the socket.
        }
    });

    for _ in 0..20 {
        let err = send_command("127.0.0.1", port, TEST_TIMEOUT, A_REQUEST)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got {:?}", err);
    }
}
