mod endpoints;
mod http;
mod stream;

pub mod wire;

pub use {
    endpoints::{EndpointError, Endpoints},
    http::{HttpBackend, execute},
    stream::{LinkError, WsTransport},
};
