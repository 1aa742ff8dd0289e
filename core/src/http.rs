//! HTTP transport types.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! request builder produces an `HttpRequest` and never touches the network;
//! a `Transport` turns it into an `HttpResponse`. Keeping the boundary as
//! data lets tests inspect exactly what would go on the wire.

use std::fmt;
use std::time::Duration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether body fields are attached for this method.
    pub fn carries_body(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalized, immutable HTTP request.
///
/// Built by `RequestBuilder::build`. `url` is absolute and already carries
/// the encoded query string. When `body` is present the matching
/// `Content-Type` is in `headers`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Body as UTF-8 text. Multipart bodies with binary parts return `None`.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// An HTTP response described as plain data.
///
/// `url` is the effective URL after redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_get_drops_the_body() {
        assert!(!HttpMethod::Get.carries_body());
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(HttpMethod::Delete.carries_body());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: "https://slimsurveys.com/api/users/signup".to_string(),
            headers: vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(b"email=a%40b.com".to_vec()),
        };
        assert_eq!(req.content_type(), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.header("X-API-KEY"), None);
        assert_eq!(req.body_text(), Some("email=a%40b.com"));
    }

    #[test]
    fn method_displays_as_verb() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
