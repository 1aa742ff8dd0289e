//! The result of one dispatched call.
//!
//! # Design
//! An `Outcome` only exists once a response has been received, so there is
//! no "not sent yet" state to check. The JSON body is decoded on first use
//! and the result, success or failure, is cached for later calls.

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::http::HttpResponse;

/// Transfer metadata of a completed call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferInfo {
    pub http_code: u16,
    /// Seconds from dispatch until the body was read.
    pub total_time: f64,
    /// Effective URL after redirects.
    pub url: String,
    pub content_type: Option<String>,
}

/// One entry of `TransferInfo`, looked up by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Code(u16),
    Seconds(f64),
    Text(String),
}

impl TransferInfo {
    /// Look up an entry by its name. Unknown names and an absent content
    /// type return `None`.
    pub fn get(&self, key: &str) -> Option<InfoValue> {
        match key {
            "http_code" => Some(InfoValue::Code(self.http_code)),
            "total_time" => Some(InfoValue::Seconds(self.total_time)),
            "url" => Some(InfoValue::Text(self.url.clone())),
            "content_type" => self.content_type.clone().map(InfoValue::Text),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Outcome {
    body: String,
    headers: Vec<(String, String)>,
    info: TransferInfo,
    data: OnceLock<Result<Value, String>>,
}

impl Outcome {
    pub fn new(response: HttpResponse) -> Self {
        let content_type = response.header("content-type").map(str::to_string);
        Self {
            info: TransferInfo {
                http_code: response.status,
                total_time: response.elapsed.as_secs_f64(),
                url: response.url,
                content_type,
            },
            headers: response.headers,
            body: response.body,
            data: OnceLock::new(),
        }
    }

    /// Raw response text.
    pub fn response(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn info(&self) -> &TransferInfo {
        &self.info
    }

    pub fn info_entry(&self, key: &str) -> Option<InfoValue> {
        self.info.get(key)
    }

    pub fn code(&self) -> u16 {
        self.info.http_code
    }

    pub fn is_code(&self, code: u16) -> bool {
        self.info.http_code == code
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.info.http_code)
    }

    /// Response body decoded as JSON. An empty body decodes to `null`.
    ///
    /// Decoding runs at most once per outcome.
    pub fn data(&self) -> Result<&Value, Error> {
        self.data
            .get_or_init(|| decode(&self.body))
            .as_ref()
            .map_err(|message| Error::Decode(message.clone()))
    }

    /// Response body decoded into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(self.data()?).map_err(|e| Error::Decode(e.to_string()))
    }

    pub fn is_decoded(&self) -> bool {
        self.data.get().is_some()
    }
}

fn decode(body: &str) -> Result<Value, String> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "response body is not JSON");
        e.to_string()
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;

    use super::*;

    fn outcome(status: u16, body: &str) -> Outcome {
        Outcome::new(HttpResponse {
            status,
            url: "https://slimsurveys.com/api/surveys/survey/42".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
            elapsed: Duration::from_millis(250),
        })
    }

    #[test]
    fn data_is_decoded_once_and_cached() {
        let outcome = outcome(200, r#"{"id":42,"title":"Lunch"}"#);
        assert!(!outcome.is_decoded());

        let first = outcome.data().unwrap();
        assert!(outcome.is_decoded());
        let second = outcome.data().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(first["title"], "Lunch");
    }

    #[test]
    fn malformed_body_is_a_decode_error_every_time() {
        let outcome = outcome(200, "<html>oops</html>");
        assert!(outcome.data().unwrap_err().is_decode());
        assert!(outcome.data().unwrap_err().is_decode());
        assert_eq!(outcome.response(), "<html>oops</html>");
    }

    #[test]
    fn empty_body_decodes_to_null() {
        let outcome = outcome(204, "");
        assert_eq!(outcome.data().unwrap(), &Value::Null);
    }

    #[test]
    fn data_as_deserializes_typed() {
        #[derive(Debug, Deserialize)]
        struct Survey {
            id: u64,
            title: String,
        }
        let survey: Survey = outcome(200, r#"{"id":42,"title":"Lunch"}"#)
            .data_as()
            .unwrap();
        assert_eq!(survey.id, 42);
        assert_eq!(survey.title, "Lunch");

        let err = outcome(200, r#"{"id":"x"}"#).data_as::<Survey>().unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn status_codes_are_data() {
        let outcome = outcome(404, r#"{"error":"not found"}"#);
        assert_eq!(outcome.code(), 404);
        assert!(outcome.is_code(404));
        assert!(!outcome.is_success());
        assert_eq!(outcome.data().unwrap()["error"], "not found");
    }

    #[test]
    fn info_entries_by_name() {
        let outcome = outcome(200, "{}");
        assert_eq!(outcome.info_entry("http_code"), Some(InfoValue::Code(200)));
        assert_eq!(outcome.info_entry("total_time"), Some(InfoValue::Seconds(0.25)));
        assert_eq!(
            outcome.info_entry("url"),
            Some(InfoValue::Text(
                "https://slimsurveys.com/api/surveys/survey/42".to_string()
            ))
        );
        assert_eq!(
            outcome.info_entry("content_type"),
            Some(InfoValue::Text("application/json".to_string()))
        );
        assert_eq!(outcome.info_entry("redirect_count"), None);
    }

    #[test]
    fn full_info_serializes_as_map() {
        let info = serde_json::to_value(outcome(201, "{}").info()).unwrap();
        assert_eq!(info["http_code"], 201);
        assert_eq!(info["content_type"], "application/json");
    }
}
