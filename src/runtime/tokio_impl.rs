//! Tokio runtime implementation.

use futures::{SinkExt, StreamExt};
use log::debug;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::{BoxFuture, Connector, MessageSocket};
use crate::errors::Error;

/// Plain `ws://` connector for the controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect<'a>(
        &'a self,
        host: &'a str,
        port: u16,
    ) -> BoxFuture<'a, Result<Box<dyn MessageSocket>, Error>> {
        Box::pin(async move {
            let url = format!("ws://{host}:{port}");
            let (stream, _response) = connect_async(url.as_str())
                .await
                .map_err(|e| Error::socket("connect", e))?;
            debug!("websocket connected to {url}");
            Ok(Box::new(WebSocket(stream)) as Box<dyn MessageSocket>)
        })
    }
}

/// Tokio-based WebSocket connection.
pub struct WebSocket(WebSocketStream<MaybeTlsStream<TcpStream>>);

impl MessageSocket for WebSocket {
    fn send_text(&mut self, text: String) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async move {
            self.0
                .send(Message::Text(text.into()))
                .await
                .map_err(|e| Error::socket("send", e))
        })
    }

    fn recv_text(&mut self) -> BoxFuture<'_, Result<String, Error>> {
        Box::pin(async move {
            loop {
                match self.0.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                    Some(Ok(Message::Binary(data))) => {
                        return String::from_utf8(data.to_vec())
                            .map_err(|e| Error::UnexpectedResponse(e.to_string()));
                    }
                    Some(Ok(Message::Ping(data))) => {
                        // tungstenite queues the pong; flushing on the next send is enough
                        debug!("websocket ping ({} bytes)", data.len());
                    }
                    Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => {}
                    Some(Ok(Message::Close(_))) | None => return Err(Error::Closed),
                    Some(Err(e)) => return Err(Error::socket("receive", e)),
                }
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async move {
            self.0
                .close(None)
                .await
                .map_err(|e| Error::socket("close", e))
        })
    }
}
