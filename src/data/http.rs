use reqwest::{Client, RequestBuilder, Response};
use tokio::runtime::Handle;

use crate::{
    config::BACKEND,
    engine::{
        CommandBackend, CommandError, CommandOutcome, CommandReply, CommandRequest, CommandTicket,
        EngineEvent, EventSink, StatsSync,
    },
};

use super::{
    endpoints::Endpoints,
    wire::{AckBody, AnalysisWire, ErrorBody, ModeForm, StatsResponse},
};

/// REST control client. Every request runs as its own task on the shared
/// runtime and reports back through the engine's sink.
pub struct HttpBackend {
    runtime: Handle,
    http: Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(runtime: Handle, endpoints: Endpoints) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(BACKEND.http.request_timeout)
            .user_agent(BACKEND.http.user_agent)
            .build()?;
        Ok(Self {
            runtime,
            http,
            endpoints,
        })
    }
}

impl CommandBackend for HttpBackend {
    fn dispatch(&self, ticket: CommandTicket, request: CommandRequest, events: EventSink) {
        let http = self.http.clone();
        let endpoints = self.endpoints.clone();
        self.runtime.spawn(async move {
            let result = execute(&http, &endpoints, &request).await;
            events.send(EngineEvent::Command(CommandOutcome {
                ticket,
                request,
                result,
            }));
        });
    }
}

pub async fn execute(
    http: &Client,
    endpoints: &Endpoints,
    request: &CommandRequest,
) -> Result<CommandReply, CommandError> {
    match request {
        CommandRequest::StartBot => {
            ack(http.post(endpoints.http_url(BACKEND.http.bot_start_path))).await
        }
        CommandRequest::StopBot => {
            ack(http.post(endpoints.http_url(BACKEND.http.bot_stop_path))).await
        }
        CommandRequest::ChangeMode(mode) => {
            let form = ModeForm { mode: *mode };
            ack(http.post(endpoints.http_url(BACKEND.http.mode_path)).form(&form)).await
        }
        CommandRequest::AnalyzeSymbol(symbol) => {
            let body = fetch(http.get(endpoints.analysis_url(symbol))).await?;
            let wire: AnalysisWire = serde_json::from_slice(&body)?;
            Ok(CommandReply::Analysis(wire.into_report()))
        }
        CommandRequest::RefreshStats => {
            let body = fetch(http.get(endpoints.http_url(BACKEND.http.stats_path))).await?;
            let resp: StatsResponse = serde_json::from_slice(&body)?;
            Ok(CommandReply::Stats(StatsSync {
                stats: resp.stats.into_stats(),
                is_running: resp.is_running,
                mode: resp.current_mode,
            }))
        }
    }
}

async fn ack(builder: RequestBuilder) -> Result<CommandReply, CommandError> {
    let body = fetch(builder).await?;
    // A 2xx with an odd body still counts as success.
    let message = serde_json::from_slice::<AckBody>(&body)
        .ok()
        .and_then(|b| b.message);
    Ok(CommandReply::Ack { message })
}

async fn fetch(builder: RequestBuilder) -> Result<Vec<u8>, CommandError> {
    let response = check_status(builder.send().await?).await?;
    Ok(response.bytes().await?.to_vec())
}

async fn check_status(response: Response) -> Result<Response, CommandError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    Err(CommandError::Rejected {
        status: status.as_u16(),
        detail,
    })
}
