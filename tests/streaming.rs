// Entertainment streaming against an in-process DTLS PSK server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use webrtc_dtls::cipher_suite::CipherSuiteId;
use webrtc_dtls::config::Config;
use webrtc_dtls::conn::DTLSConn;

use hue_bridge_rs::{Bridge, ClientConfig, Error, LightUpdate, encode_frame};

const KEY: &str = "00112233445566778899AABBCCDDEEFF";
const KEY_BYTES: [u8; 16] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
];

// ── Helpers ─────────────────────────────────────────────────────────

fn bridge_on(port: u16, handshake_timeout: Duration) -> Bridge {
    let config = ClientConfig::new()
        .with_stream_port(port)
        .with_handshake_timeout(handshake_timeout);
    Bridge::with_config("127.0.0.1", config).with_credentials("abc", Some(KEY))
}

/// Completes the PSK handshake with the first client that writes to
/// `socket`, returning the connection and the identity the client presented.
async fn accept_psk_client(socket: UdpSocket) -> (DTLSConn, Vec<u8>) {
    let mut first = [0u8; 2048];
    let (_, client) = socket.peek_from(&mut first).await.unwrap();
    socket.connect(client).await.unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_callback = Arc::clone(&seen);
    let config = Config {
        psk: Some(Arc::new(
            move |identity: &[u8]| -> Result<Vec<u8>, webrtc_dtls::Error> {
                *seen_by_callback.lock().unwrap() = identity.to_vec();
                Ok(KEY_BYTES.to_vec())
            },
        )),
        cipher_suites: vec![CipherSuiteId::Tls_Psk_With_Aes_128_Gcm_Sha256],
        ..Default::default()
    };

    let conn = DTLSConn::new(Arc::new(socket), config, false, None)
        .await
        .unwrap();
    let identity = seen.lock().unwrap().clone();
    (conn, identity)
}

/// Accepts one client and returns the PSK identity it presented and the
/// first application datagram it sent.
async fn spawn_psk_server() -> (u16, JoinHandle<(Vec<u8>, Vec<u8>)>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (conn, identity) = accept_psk_client(socket).await;
        let mut buf = vec![0u8; 2048];
        let n = conn.read(&mut buf, None).await.unwrap();
        buf.truncate(n);
        (identity, buf)
    });

    (port, handle)
}

/// Accepts one client and waits for it to go away. Resolves to true once a
/// read fails, which is what a close_notify from the client produces.
async fn spawn_psk_server_until_closed() -> (u16, JoinHandle<bool>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (conn, _) = accept_psk_client(socket).await;
        let mut buf = vec![0u8; 2048];
        loop {
            if conn.read(&mut buf, None).await.is_err() {
                return true;
            }
        }
    });

    (port, handle)
}

// ── Input validation ────────────────────────────────────────────────

#[tokio::test]
async fn test_open_rejects_short_client_key() {
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ClientConfig::new().with_stream_port(port);
    let mut bridge = Bridge::with_config("127.0.0.1", config).with_credentials("abc", Some("0011"));

    let err = bridge.open_stream().await.unwrap_err();
    assert!(
        matches!(err, Error::InvalidClientKey { .. }),
        "expected InvalidClientKey, got: {err:?}"
    );
    assert!(err.is_input_error());
    assert!(!bridge.is_streaming());

    // Nothing may have reached the bridge's streaming port.
    let mut buf = [0u8; 2048];
    let received = tokio::time::timeout(Duration::from_millis(200), listener.recv(&mut buf)).await;
    assert!(received.is_err(), "unexpected datagram: {received:?}");
}

#[tokio::test]
async fn test_open_requires_credentials() {
    let mut bridge = Bridge::new("192.0.2.1");
    let err = bridge.open_stream().await.unwrap_err();
    assert!(matches!(err, Error::MissingCredentials("username")));

    let mut bridge = Bridge::new("192.0.2.1").with_credentials("abc", None);
    let err = bridge.open_stream().await.unwrap_err();
    assert!(matches!(err, Error::MissingCredentials("client key")));
}

#[tokio::test]
async fn test_send_and_close_without_stream() {
    let mut bridge = Bridge::new("192.0.2.1").with_credentials("abc", Some(KEY));

    let err = bridge
        .stream_colors(&[LightUpdate::new(1, 0, 0, 0)])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StreamNotOpen));
    assert!(err.is_transport_error());

    assert!(matches!(
        bridge.close_stream().await,
        Err(Error::StreamNotOpen)
    ));
}

// ── Handshake ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_open_times_out_when_bridge_is_silent() {
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = silent.local_addr().unwrap().port();
    let mut bridge = bridge_on(port, Duration::from_millis(300));

    let result = tokio::time::timeout(Duration::from_secs(5), bridge.open_stream())
        .await
        .expect("open must not hang");

    assert!(
        matches!(result, Err(Error::HandshakeTimeout { .. })),
        "expected HandshakeTimeout, got: {result:?}"
    );
    assert!(!bridge.is_streaming());
    drop(silent);
}

#[tokio::test]
async fn test_stream_frame_end_to_end() {
    let (port, server) = spawn_psk_server().await;
    let mut bridge = bridge_on(port, Duration::from_secs(5));

    bridge.open_stream().await.unwrap();
    assert!(bridge.is_streaming());
    assert_eq!(bridge.stream().unwrap().peer_addr().port(), port);

    let updates = [
        LightUpdate::new(1, 65535, 0, 32768),
        LightUpdate::from_rgb8(2, 0, 255, 0),
    ];
    bridge.stream_colors(&updates).await.unwrap();
    assert_eq!(bridge.stream().unwrap().frames_sent(), 1);

    let (identity, frame) = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server finished")
        .unwrap();
    assert_eq!(identity, b"abc");
    assert_eq!(frame, encode_frame(&updates).to_vec());

    // Close is best-effort; the handle is released either way.
    let _ = bridge.close_stream().await;
    assert!(!bridge.is_streaming());

    let err = bridge.stream_colors(&updates).await.unwrap_err();
    assert!(matches!(err, Error::StreamNotOpen));
}

#[tokio::test]
async fn test_reopen_closes_previous_stream() {
    let (first_port, first) = spawn_psk_server_until_closed().await;
    let (second_port, second) = spawn_psk_server().await;
    let mut bridge = bridge_on(first_port, Duration::from_secs(5));

    bridge.open_stream().await.unwrap();
    assert_eq!(bridge.stream().unwrap().peer_addr().port(), first_port);

    let config = bridge.config().clone().with_stream_port(second_port);
    bridge.set_config(config);
    bridge.open_stream().await.unwrap();
    assert!(bridge.is_streaming());
    assert_eq!(bridge.stream().unwrap().peer_addr().port(), second_port);
    assert_eq!(bridge.stream().unwrap().frames_sent(), 0);

    let closed = tokio::time::timeout(Duration::from_secs(5), first)
        .await
        .expect("first server saw the stream end")
        .unwrap();
    assert!(closed);

    let updates = [LightUpdate::new(7, 1, 2, 3)];
    bridge.stream_colors(&updates).await.unwrap();
    let (identity, frame) = tokio::time::timeout(Duration::from_secs(5), second)
        .await
        .expect("second server finished")
        .unwrap();
    assert_eq!(identity, b"abc");
    assert_eq!(frame, encode_frame(&updates).to_vec());

    let _ = bridge.close_stream().await;
    assert!(!bridge.is_streaming());
}
