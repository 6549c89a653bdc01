//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a tokio-tungstenite client so
//! the framing and the split sink/stream locking are exercised over
//! an actual socket rather than in isolation.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    use quadra_transport::{Connection, Transport, WebSocketTransport};

    /// Helper: connects a tokio-tungstenite client to the given address.
    async fn connect_client(
        addr: std::net::SocketAddr,
    ) -> tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    > {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    /// Helper: binds on an OS-assigned port and returns the transport
    /// plus the address a client can reach it at.
    async fn bind_ephemeral() -> (WebSocketTransport, std::net::SocketAddr) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have a local addr");
        (transport, addr)
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(addr).await;
        let server_conn = server_handle.await.expect("task should complete");

        assert!(server_conn.id().into_inner() > 0);

        // --- Server sends, client receives ---
        server_conn
            .send(b"hello from server")
            .await
            .expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"hello from server");

        // --- Client sends, server receives ---
        client_ws
            .send(Message::Binary(b"hello from client".to_vec().into()))
            .await
            .unwrap();

        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"hello from client");

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_text_frames_arrive_as_bytes() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws
            .send(Message::Text("{\"seq\":1}".into()))
            .await
            .unwrap();

        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"{\"seq\":1}");
    }

    #[tokio::test]
    async fn test_websocket_recv_skips_ping_frames() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(addr).await;
        let server_conn = server_handle.await.unwrap();

        // A ping must not surface as data; recv should keep waiting
        // for the binary frame behind it.
        client_ws.send(Message::Ping(vec![1].into())).await.unwrap();
        client_ws
            .send(Message::Binary(b"after ping".to_vec().into()))
            .await
            .unwrap();

        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"after ping");
    }

    #[tokio::test]
    async fn test_websocket_send_while_another_clone_is_receiving() {
        let (mut transport, addr) = bind_ephemeral().await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(addr).await;
        let server_conn = server_handle.await.unwrap();

        // Park one clone in recv() with nothing inbound. The writer
        // half has its own lock, so a send through another clone must
        // complete even while the reader is blocked.
        let reader = server_conn.clone();
        let reader_handle = tokio::spawn(async move { reader.recv().await });

        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(
            Duration::from_secs(1),
            server_conn.send(b"sent past a parked reader"),
        )
        .await
        .expect("send should not block on the parked recv")
        .expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"sent past a parked reader");

        // Unblock the reader and let it observe the data.
        client_ws
            .send(Message::Binary(b"reply".to_vec().into()))
            .await
            .unwrap();
        let received = reader_handle
            .await
            .expect("reader task should complete")
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"reply");
    }
}
