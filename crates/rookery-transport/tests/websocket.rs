//! Integration tests for the WebSocket transport.
//!
//! A real listener on an OS-assigned port and a real tokio-tungstenite
//! client, so the frames actually cross a socket.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use rookery_transport::{Connection, Transport, WebSocketConnection, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientStream = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on a random port, connects one client and returns both ends.
    async fn connected_pair() -> (WebSocketConnection, ClientStream) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address");

        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });

        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let conn = server.await.expect("accept task should complete");
        (conn, client)
    }

    #[tokio::test]
    async fn test_websocket_send_and_receive_both_directions() {
        let (conn, mut client) = connected_pair().await;
        assert!(conn.id().into_inner() > 0);

        conn.send(br#"{"serverMessageType":"NOTIFICATION","message":"hi"}"#)
            .await
            .expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "utf-8 frames go out as text");
        assert_eq!(
            msg.into_text().unwrap().as_str(),
            r#"{"serverMessageType":"NOTIFICATION","message":"hi"}"#
        );

        client
            .send(Message::Text(r#"{"commandType":"LEAVE"}"#.into()))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"commandType":"LEAVE"}"#);

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (conn, mut client) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_send_while_recv_pending() {
        let (conn, mut client) = connected_pair().await;
        let conn = std::sync::Arc::new(conn);

        // Park a reader on the connection first.
        let reader = {
            let conn = conn.clone();
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // A send must not wait for the pending recv.
        tokio::time::timeout(Duration::from_secs(1), conn.send(b"broadcast"))
            .await
            .expect("send should not block behind recv")
            .expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"broadcast");

        client.send(Message::Text("reply".into())).await.unwrap();
        let got = reader.await.unwrap().unwrap().unwrap();
        assert_eq!(got, b"reply");
    }

    #[tokio::test]
    async fn test_websocket_connection_ids_are_unique() {
        let (a, _ca) = connected_pair().await;
        let (b, _cb) = connected_pair().await;
        assert_ne!(a.id(), b.id());
    }
}
