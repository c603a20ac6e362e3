//! Event loop against a local WebSocket server

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use supplytrack_core::{NotificationStatus, NotifyConfig};
use supplytrack_effects::{EventLoop, TerminalSurface};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio_tungstenite::{accept_async, tungstenite::Message};

const RESTOCK: &str = r#"{"type":"restock_notification","notification":{"id":"n1","message":"Widget low","timestamp":"2024-01-01T00:00:00Z"}}"#;

fn config_for(port: u16) -> NotifyConfig {
    let mut config = NotifyConfig {
        origin: format!("http://127.0.0.1:{port}"),
        ..NotifyConfig::default()
    };
    config.keepalive.interval_ms = 50;
    config.reconnect.connect_timeout_ms = 2_000;
    config
}

#[tokio::test]
async fn delivers_frames_and_pings_over_websocket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let got_ping = Arc::new(AtomicBool::new(false));

    let server_ping = Arc::clone(&got_ping);
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(RESTOCK.to_string())).await.unwrap();

        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                if text == r#"{"type":"ping"}"# {
                    server_ping.store(true, Ordering::SeqCst);
                    ws.send(Message::Text(r#"{"type":"pong"}"#.to_string()))
                        .await
                        .unwrap();
                    break;
                }
            }
        }
        // Give the pong time to be read before the test shuts down
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut event_loop =
        EventLoop::new(&config_for(port), TerminalSurface::new(Vec::new()), Handle::current()).unwrap();
    tokio::time::timeout(
        Duration::from_secs(5),
        event_loop.run_until(async {
            let _ = server.await;
        }),
    )
    .await
    .unwrap();

    assert!(got_ping.load(Ordering::SeqCst));
    let client = event_loop.client();
    let record = client.store().get(&"n1".into()).unwrap();
    assert_eq!(record.status, NotificationStatus::New);
    assert_eq!(client.stats().pongs, 1);
    assert_eq!(client.surface().writer().as_slice(), "⚠ Widget low\n".as_bytes());
}

#[tokio::test]
async fn unreachable_server_schedules_reconnect() {
    // Bind then drop to get a port with nothing listening
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut event_loop =
        EventLoop::new(&config_for(port), TerminalSurface::new(Vec::new()), Handle::current()).unwrap();
    event_loop
        .run_until(tokio::time::sleep(Duration::from_millis(300)))
        .await;

    let client = event_loop.client();
    assert!(client.supervisor().attempt() >= 1);
    assert!(client.store().is_empty());
}
