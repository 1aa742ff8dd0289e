//! Synchronous client for the SlimSurveys REST API.
//!
//! # Overview
//! `Client` authenticates every call with the account's API key and, once
//! known, the user's auth token. Resource methods (`survey`, `create_question`,
//! `upload_image`, ...) template a path and dispatch one blocking HTTP call;
//! `Client::request` exposes the same builder for paths without a helper.
//!
//! # Design
//! - Each call builds a fresh `RequestBuilder` that finalizes into an
//!   immutable `HttpRequest`, so nothing leaks between calls.
//! - Transport failures are `Error::Transport`. HTTP status codes, including
//!   4xx/5xx, are data on the returned `Outcome`.
//! - Resources addressable by numeric id or by string uid take anything
//!   that converts into a `Lookup`; negative ids are `Error::InvalidLookup`.
//!
//! ```no_run
//! use slimsurveys_core::{Client, ClientConfig};
//!
//! let client = Client::new(ClientConfig::new("my-api-key"))?;
//! let outcome = client.survey(42)?;
//! if outcome.is_code(200) {
//!     println!("{}", outcome.data()?["title"]);
//! }
//! # Ok::<(), slimsurveys_core::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod outcome;
pub mod request;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, BASE_URL};
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::{InfoValue, Outcome, TransferInfo};
pub use request::RequestBuilder;
pub use transport::{Transport, UreqTransport};
pub use types::{AuthToken, IntoLookup, Login, Lookup, Scalar, Signup};
