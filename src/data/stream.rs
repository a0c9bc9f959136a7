use std::time::Duration;

use {
    futures::{SinkExt, StreamExt},
    thiserror::Error,
    tokio::{runtime::Handle, sync::mpsc::UnboundedReceiver},
    tokio_tungstenite::{connect_async, tungstenite, tungstenite::Message},
};

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::{
    config::BACKEND,
    engine::{EventSink, LinkCommand, LinkHandle, LinkId, StreamEvent, Transport},
};

#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    WebSocket(#[from] tungstenite::Error),

    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
}

/// WebSocket transport. Each link is one task on the shared runtime; the
/// engine talks to it through the `LinkHandle` and hears back via the sink.
pub struct WsTransport {
    runtime: Handle,
    connect_timeout: Duration,
}

impl WsTransport {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            connect_timeout: BACKEND.stream.connect_timeout,
        }
    }
}

impl Transport for WsTransport {
    fn open(&self, link: LinkId, url: &str, events: EventSink) -> LinkHandle {
        let (handle, control) = LinkHandle::channel(link);
        let url = url.to_string();
        let connect_timeout = self.connect_timeout;

        self.runtime.spawn(async move {
            #[cfg(debug_assertions)]
            if DF.log_stream_frames {
                log::info!("[link {}] connecting to {}", link.0, url);
            }

            let reason = match run_link(link, &url, connect_timeout, &events, control).await {
                Ok(reason) => reason,
                Err(e) => {
                    log::warn!("[link {}] {}", link.0, e);
                    e.to_string()
                }
            };
            // Exactly one Closed per link, whatever happened.
            events.stream(link, StreamEvent::Closed { reason });
        });

        handle
    }
}

/// Resolves once the engine asks for a close or drops the handle.
async fn closed(control: &mut UnboundedReceiver<LinkCommand>) {
    while let Some(cmd) = control.recv().await {
        if cmd == LinkCommand::Close {
            return;
        }
    }
}

async fn run_link(
    link: LinkId,
    url: &str,
    connect_timeout: Duration,
    events: &EventSink,
    mut control: UnboundedReceiver<LinkCommand>,
) -> Result<String, LinkError> {
    let connecting = tokio::time::timeout(connect_timeout, connect_async(url));
    let (ws_stream, _) = tokio::select! {
        res = connecting => res.map_err(|_| LinkError::Timeout(connect_timeout))??,
        _ = closed(&mut control) => return Ok("cancelled before open".to_string()),
    };

    if !events.stream(link, StreamEvent::Opened) {
        return Ok("engine gone".to_string());
    }

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = control.recv() => match cmd {
                Some(LinkCommand::Send(text)) => {
                    write.send(Message::Text(text.into())).await?;
                }
                Some(LinkCommand::Close) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok("closed by client".to_string());
                }
            },
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if !events.stream(link, StreamEvent::Frame(text.to_string())) {
                        return Ok("engine gone".to_string());
                    }
                }
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => {
                        if !events.stream(link, StreamEvent::Frame(text)) {
                            return Ok("engine gone".to_string());
                        }
                    }
                    Err(_) => log::warn!("[link {}] dropping non-UTF-8 binary frame", link.0),
                },
                // tungstenite answers pings on its own
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| format!("closed by server: {} {}", f.code, f.reason.as_str()))
                        .unwrap_or_else(|| "closed by server".to_string());
                    return Ok(reason);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok("stream ended".to_string()),
            },
        }
    }
}
