//! Entertainment streaming transport.
//!
//! Frames travel over DTLS 1.2 to port 2100 of the bridge, authenticated
//! only by a pre-shared key: the identity is the bridge username, the key is
//! the 16 bytes of the client key. The only cipher suite offered is
//! `TLS_PSK_WITH_AES_128_GCM_SHA256`, and every open performs a full
//! handshake.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::net::UdpSocket;
use webrtc_dtls::cipher_suite::CipherSuiteId;
use webrtc_dtls::config::Config;
use webrtc_dtls::conn::DTLSConn;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// PSK identity and key for the streaming handshake.
#[derive(Clone, PartialEq, Eq)]
pub struct PskIdentity {
    identity: Vec<u8>,
    key: [u8; PskIdentity::KEY_LEN],
}

impl fmt::Debug for PskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PskIdentity")
            .field("identity", &String::from_utf8_lossy(&self.identity))
            .field("key", &"<redacted>")
            .finish()
    }
}

impl PskIdentity {
    pub const KEY_LEN: usize = 16;

    /// Validates credentials as issued by pairing.
    ///
    /// ```
    /// use hue_bridge_rs::PskIdentity;
    ///
    /// assert!(PskIdentity::new("abc", "00112233445566778899AABBCCDDEEFF").is_ok());
    /// assert!(PskIdentity::new("abc", "0011").unwrap_err().is_input_error());
    /// assert!(PskIdentity::new("", "00112233445566778899AABBCCDDEEFF").is_err());
    /// ```
    pub fn new(username: &str, client_key: &str) -> Result<Self> {
        if username.is_empty() {
            return Err(Error::MissingCredentials("username"));
        }
        if client_key.len() != 2 * Self::KEY_LEN {
            return Err(Error::invalid_client_key(format!(
                "expected {} hex characters, got {}",
                2 * Self::KEY_LEN,
                client_key.len()
            )));
        }

        let mut key = [0u8; Self::KEY_LEN];
        hex::decode_to_slice(client_key, &mut key)
            .map_err(|e| Error::invalid_client_key(e.to_string()))?;

        Ok(PskIdentity {
            identity: username.as_bytes().to_vec(),
            key,
        })
    }

    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    fn dtls_config(&self) -> Config {
        let key = self.key;
        Config {
            psk: Some(Arc::new(
                move |_hint: &[u8]| -> std::result::Result<Vec<u8>, webrtc_dtls::Error> {
                    Ok(key.to_vec())
                },
            )),
            psk_identity_hint: Some(self.identity.clone()),
            cipher_suites: vec![CipherSuiteId::Tls_Psk_With_Aes_128_Gcm_Sha256],
            insecure_skip_verify: true,
            ..Default::default()
        }
    }
}

/// An open entertainment stream.
///
/// Sending takes `&mut self`, so frames from one handle go out in call
/// order. [`close`](EntertainmentStream::close) consumes the handle.
pub struct EntertainmentStream {
    conn: DTLSConn,
    peer: SocketAddr,
    frames_sent: u64,
}

impl fmt::Debug for EntertainmentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntertainmentStream")
            .field("peer", &self.peer)
            .field("frames_sent", &self.frames_sent)
            .finish()
    }
}

impl EntertainmentStream {
    /// Resolves `host` and completes a PSK handshake with it.
    ///
    /// A bridge whose entertainment group is not active does not reject the
    /// handshake, it ignores it; that case surfaces as
    /// [`Error::HandshakeTimeout`] once `handshake_timeout` elapses.
    pub async fn open(
        host: &str,
        port: u16,
        psk: &PskIdentity,
        handshake_timeout: Duration,
    ) -> Result<Self> {
        let peer = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| Error::resolve(host, e))?
            .next()
            .ok_or_else(|| {
                Error::resolve(
                    host,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
                )
            })?;

        let local = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| Error::socket("bind", e))?;
        socket
            .connect(peer)
            .await
            .map_err(|e| Error::socket("connect", e))?;

        debug!("starting DTLS handshake with {peer}");
        let conn = tokio::time::timeout(
            handshake_timeout,
            DTLSConn::new(Arc::new(socket), psk.dtls_config(), true, None),
        )
        .await
        .map_err(|_| Error::HandshakeTimeout {
            addr: peer,
            timeout: handshake_timeout,
        })?
        .map_err(|e| Error::dtls("handshake", e))?;

        info!("entertainment stream open to {peer}");
        Ok(EntertainmentStream {
            conn,
            peer,
            frames_sent: 0,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Sends one frame as a single datagram. No retry.
    pub async fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.conn
            .write(frame, None)
            .await
            .map_err(|e| Error::dtls("send", e))?;
        self.frames_sent += 1;
        debug!("sent {} byte frame to {}", frame.len(), self.peer);
        Ok(())
    }

    /// Sends close_notify and releases the socket. The handle is gone even
    /// when this returns an error.
    pub async fn close(self) -> Result<()> {
        info!(
            "closing entertainment stream to {} after {} frames",
            self.peer, self.frames_sent
        );
        self.conn
            .close()
            .await
            .map_err(|e| Error::dtls("close", e))
    }
}
