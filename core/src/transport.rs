//! Executes finalized requests.
//!
//! # Design
//! `Transport` is the only place the client touches the network. The
//! default `UreqTransport` performs a blocking call with bounded connect and
//! total timeouts, follows redirects and returns every status code as data.
//! Failures that produce no response become `Error::Transport` with a
//! libcurl-style code.

use std::fmt;
use std::io::ErrorKind;
use std::time::{Duration, Instant};

use ureq::ResponseExt;

use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const CODE_OTHER: u32 = 2;
const CODE_MALFORMED_URL: u32 = 3;
const CODE_RESOLVE: u32 = 6;
const CODE_CONNECT: u32 = 7;
const CODE_TIMEOUT: u32 = 28;
const CODE_TOO_MANY_REDIRECTS: u32 = 47;
const CODE_RECEIVE: u32 = 56;

pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

const MAX_REDIRECTS: u32 = 10;

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(connect_timeout))
            .timeout_global(Some(timeout))
            .max_redirects(MAX_REDIRECTS)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let started = Instant::now();
        let url = request.url.as_str();
        let headers = &request.headers;

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
        };
        let mut response = result.map_err(transport_error)?;

        let status = response.status().as_u16();
        let effective_url = response.get_uri().to_string();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            url: effective_url,
            headers: response_headers,
            body,
            elapsed: started.elapsed(),
        })
    }
}

fn with_headers<B>(
    builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    headers
        .iter()
        .fold(builder, |builder, (name, value)| {
            builder.header(name.as_str(), value.as_str())
        })
}

fn transport_error(err: ureq::Error) -> Error {
    let code = match &err {
        ureq::Error::HostNotFound => CODE_RESOLVE,
        ureq::Error::ConnectionFailed => CODE_CONNECT,
        ureq::Error::Timeout(_) => CODE_TIMEOUT,
        ureq::Error::TooManyRedirects => CODE_TOO_MANY_REDIRECTS,
        ureq::Error::BadUri(_) => CODE_MALFORMED_URL,
        ureq::Error::Io(io) => match io.kind() {
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::AddrNotAvailable => CODE_CONNECT,
            ErrorKind::TimedOut => CODE_TIMEOUT,
            _ => CODE_RECEIVE,
        },
        _ => CODE_OTHER,
    };
    Error::Transport {
        code,
        message: err.to_string(),
    }
}
