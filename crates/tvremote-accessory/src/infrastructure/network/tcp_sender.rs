//! TCP key transport.
//!
//! Every key event is delivered on its own connection:
//!
//! 1. Connect to `hostname:port`.
//! 2. Write the `KEYEVENT\r\n<code>\r\n` frame.
//! 3. Shut down the write half.
//! 4. Read until the device closes its side.
//!
//! The call returns only after step 4, so the next key of a sequence never
//! overlaps a connection that is still closing.  Anything the device sends
//! back is discarded.

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tracing::debug;
use tvremote_core::{encode_key_event, DeviceEndpoint, KeyCode};

use crate::application::send_keys::{KeyTransport, TransportError};

/// Sends key events over plain TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpKeyTransport;

impl TcpKeyTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyTransport for TcpKeyTransport {
    async fn send_key(&self, endpoint: &DeviceEndpoint, key: KeyCode) -> Result<(), TransportError> {
        let mut stream = TcpStream::connect((endpoint.hostname(), endpoint.port()))
            .await
            .map_err(|source| TransportError::Connect {
                endpoint: endpoint.to_string(),
                source,
            })?;
        debug!("connected to {endpoint}");

        let frame = encode_key_event(key);
        stream
            .write_all(&frame)
            .await
            .map_err(|source| TransportError::Write {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let close_error = |source: std::io::Error| TransportError::Close {
            endpoint: endpoint.to_string(),
            source,
        };
        stream.shutdown().await.map_err(close_error)?;

        let mut discard = Vec::new();
        let trailing = stream.read_to_end(&mut discard).await.map_err(close_error)?;
        debug!("connection to {endpoint} closed ({trailing} trailing bytes discarded)");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::net::TcpListener;
    use tokio_test::{assert_err, assert_ok};
    use tvremote_core::decode_key_event;

    use super::*;
    use crate::application::send_keys::KeySender;

    /// Accepts connections forever, recording one decoded key per connection.
    async fn spawn_fake_device() -> (DeviceEndpoint, Arc<Mutex<Vec<u32>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = Vec::new();
                socket.read_to_end(&mut buf).await.unwrap();
                let (key, consumed) = decode_key_event(&buf).unwrap();
                assert_eq!(consumed, buf.len(), "exactly one frame per connection");
                sink.lock().unwrap().push(key.value());
            }
        });

        (DeviceEndpoint::new("127.0.0.1", port).unwrap(), received)
    }

    #[tokio::test]
    async fn test_send_key_delivers_one_frame() {
        // Arrange
        let (endpoint, received) = spawn_fake_device().await;

        // Act
        let result = TcpKeyTransport::new().send_key(&endpoint, KeyCode(66)).await;

        // Assert
        assert_ok!(result);
        assert_eq!(*received.lock().unwrap(), vec![66]);
    }

    #[tokio::test]
    async fn test_send_key_to_closed_port_is_connect_error() {
        // Arrange: grab a free port, then release it.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let endpoint = DeviceEndpoint::new("127.0.0.1", port).unwrap();

        // Act
        let err = assert_err!(TcpKeyTransport::new().send_key(&endpoint, KeyCode(3)).await);

        // Assert
        assert!(matches!(err, TransportError::Connect { .. }));
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }

    #[tokio::test]
    async fn test_sequence_uses_one_connection_per_key() {
        let (endpoint, received) = spawn_fake_device().await;
        let sender = KeySender::new(endpoint, Arc::new(TcpKeyTransport::new()))
            .with_inter_key_delay(Duration::from_millis(5));

        assert_ok!(sender.send([KeyCode(178), KeyCode(21), KeyCode(66)]).await);

        assert_eq!(*received.lock().unwrap(), vec![178, 21, 66]);
    }

    #[tokio::test]
    async fn test_device_reply_is_discarded() {
        // Arrange: a device that answers before closing.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            socket.read_to_end(&mut buf).await.unwrap();
            socket.write_all(b"OK\r\n").await.unwrap();
        });
        let endpoint = DeviceEndpoint::new("127.0.0.1", port).unwrap();

        // Act / Assert
        assert_ok!(TcpKeyTransport::new().send_key(&endpoint, KeyCode(4)).await);
    }
}
