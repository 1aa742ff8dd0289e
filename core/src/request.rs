//! Per-call request builder.
//!
//! # Design
//! A `RequestBuilder` is created fresh by `Client::request` for every call
//! and consumed by `build` or one of the verb methods, so nothing set for
//! one call can leak into the next. Setters never fail; a problem found
//! while adding a payload is stored and reported by `build`.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;
use uuid::Uuid;

use crate::client::Client;
use crate::config::DEFAULT_FORMAT;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest};
use crate::outcome::Outcome;
use crate::types::Scalar;

pub const API_KEY_HEADER: &str = "X-API-KEY";
pub const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Accumulates the path, query, body fields and headers of one API call.
#[must_use = "a request does nothing until it is built or sent"]
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    client: &'a Client,
    path: String,
    query: IndexMap<String, Scalar>,
    fields: IndexMap<String, Scalar>,
    headers: IndexMap<String, String>,
    error: Option<Error>,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a Client, path: String) -> Self {
        Self {
            client,
            path,
            query: IndexMap::new(),
            fields: IndexMap::new(),
            headers: IndexMap::new(),
            error: None,
        }
    }

    /// Set a query parameter. A repeated key keeps its position and takes
    /// the new value.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn queries<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set a body field. Ignored for GET.
    ///
    /// Text starting with `@` names a local file to upload, as does
    /// `Scalar::file`.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.fields.insert(key.into(), value.into().resolve_marker());
        self
    }

    pub fn fields<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.fields.extend(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into().resolve_marker())),
        );
        self
    }

    /// Set a body field with its text sent as-is, `@` included.
    pub(crate) fn field_verbatim(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub(crate) fn fields_verbatim<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add every member of a serializable struct as a body field.
    ///
    /// The payload must serialize to a flat JSON object of scalars.
    pub fn form<T: Serialize + ?Sized>(mut self, payload: &T) -> Self {
        if self.error.is_some() {
            return self;
        }
        match serde_json::to_value(payload) {
            Ok(Value::Object(members)) => {
                for (key, value) in members {
                    match scalar_from_json(value) {
                        Some(scalar) => {
                            self.fields.insert(key, scalar);
                        }
                        None => {
                            self.error = Some(Error::Serialization(format!(
                                "field {key:?} is not a scalar"
                            )));
                            break;
                        }
                    }
                }
            }
            Ok(_) => {
                self.error = Some(Error::Serialization(
                    "payload must serialize to an object".to_string(),
                ));
            }
            Err(e) => self.error = Some(Error::Serialization(e.to_string())),
        }
        self
    }

    /// Set an extra request header. The API key, auth token and user agent
    /// headers are always set by the client and win over these.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Finalize into an immutable request without sending it.
    pub fn build(self, method: HttpMethod) -> Result<HttpRequest, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let config = self.client.config();

        let mut query = self.query;
        if config.format != DEFAULT_FORMAT {
            query.insert("format".to_string(), Scalar::Text(config.format.clone()));
        }

        let mut url = format!("{}{}", config.base_url, self.path.trim_matches('/'));
        if !query.is_empty() {
            url.push('?');
            url.push_str(&encode_query(&query));
        }

        let mut headers = self.headers;
        set_header(&mut headers, "User-Agent".to_string(), config.user_agent.clone());
        set_header(&mut headers, API_KEY_HEADER.to_string(), config.key.clone());
        if let Some(token) = self.client.token() {
            set_header(&mut headers, AUTH_TOKEN_HEADER.to_string(), token.to_string());
        }

        let body = if method.carries_body() {
            encode_body(&self.fields)?
        } else {
            None
        };
        if let Some((content_type, _)) = &body {
            set_header(&mut headers, "Content-Type".to_string(), content_type.clone());
        }

        Ok(HttpRequest {
            method,
            url,
            headers: headers.into_iter().collect(),
            body: body.map(|(_, bytes)| bytes),
        })
    }

    pub fn get(self) -> Result<Outcome, Error> {
        self.send(HttpMethod::Get)
    }

    pub fn post(self) -> Result<Outcome, Error> {
        self.send(HttpMethod::Post)
    }

    pub fn put(self) -> Result<Outcome, Error> {
        self.send(HttpMethod::Put)
    }

    pub fn delete(self) -> Result<Outcome, Error> {
        self.send(HttpMethod::Delete)
    }

    pub fn send(self, method: HttpMethod) -> Result<Outcome, Error> {
        let client = self.client;
        let request = self.build(method)?;
        client.execute(&request)
    }
}

fn set_header(headers: &mut IndexMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

fn scalar_from_json(value: Value) -> Option<Scalar> {
    match value {
        Value::Null => Some(Scalar::Null),
        Value::Bool(b) => Some(Scalar::Bool(b)),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Scalar::Int(i),
            (None, Some(u), _) => Scalar::from(u),
            (None, None, Some(f)) => Scalar::Float(f),
            (None, None, None) => Scalar::Text(n.to_string()),
        }),
        Value::String(s) => Some(Scalar::Text(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Query string without the leading `?`. `Null` values are sent as `key=`.
fn encode_query(query: &IndexMap<String, Scalar>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, &value.to_param().unwrap_or_default());
    }
    serializer.finish()
}

/// Content type and bytes of the body, or `None` when no field has a value.
fn encode_body(fields: &IndexMap<String, Scalar>) -> Result<Option<(String, Vec<u8>)>, Error> {
    let present: Vec<(&String, &Scalar)> = fields.iter().filter(|(_, v)| !v.is_null()).collect();
    if present.is_empty() {
        return Ok(None);
    }
    if present.iter().any(|(_, v)| v.upload_path().is_some()) {
        return encode_multipart(&present).map(Some);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &present {
        serializer.append_pair(key, &value.to_string());
    }
    Ok(Some((FORM_CONTENT_TYPE.to_string(), serializer.finish().into_bytes())))
}

fn encode_multipart(fields: &[(&String, &Scalar)]) -> Result<(String, Vec<u8>), Error> {
    let boundary = format!("slimsurveys-{}", Uuid::new_v4().simple());
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let name = escape_quotes(name);
        match value.upload_path() {
            Some(path) => {
                let contents = std::fs::read(path).map_err(|source| Error::Upload {
                    path: path.to_path_buf(),
                    source,
                })?;
                let filename = path
                    .file_name()
                    .map(|n| escape_quotes(&n.to_string_lossy()))
                    .unwrap_or_default();
                let mime = mime_guess::from_path(path).first_or_octet_stream();
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {mime}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&contents);
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok((format!("multipart/form-data; boundary={boundary}"), body))
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "%22")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::ClientConfig;

    fn client() -> Client {
        Client::new(ClientConfig::new("k1")).unwrap()
    }

    #[test]
    fn path_is_trimmed_and_joined_to_base() {
        let req = client().request("/surveys/mine/").build(HttpMethod::Get).unwrap();
        assert_eq!(req.url, "https://slimsurveys.com/api/surveys/mine");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    #[test]
    fn distinct_query_keys_each_appear_once_encoded() {
        let req = client()
            .request("surveys/survey")
            .query("survey_uid", "a b&c")
            .query("page", 2)
            .build(HttpMethod::Get)
            .unwrap();
        assert_eq!(
            req.url,
            "https://slimsurveys.com/api/surveys/survey?survey_uid=a+b%26c&page=2"
        );
    }

    #[test]
    fn repeated_query_key_keeps_last_value() {
        let req = client()
            .request("surveys/survey")
            .query("survey_uid", "first")
            .queries([("survey_uid", "second")])
            .build(HttpMethod::Get)
            .unwrap();
        assert_eq!(req.url, "https://slimsurveys.com/api/surveys/survey?survey_uid=second");
    }

    #[test]
    fn null_query_value_is_sent_empty() {
        let req = client()
            .request("surveys/survey")
            .query("survey_uid", None::<&str>)
            .build(HttpMethod::Get)
            .unwrap();
        assert_eq!(req.url, "https://slimsurveys.com/api/surveys/survey?survey_uid=");
    }

    #[test]
    fn fields_become_form_body() {
        let req = client()
            .request("users/signup")
            .field("email", "a@b.com")
            .field("password", "x")
            .field("notifications", true)
            .build(HttpMethod::Post)
            .unwrap();
        assert_eq!(req.content_type(), Some("application/x-www-form-urlencoded"));
        assert_eq!(
            req.body_text(),
            Some("email=a%40b.com&password=x&notifications=true")
        );
    }

    #[test]
    fn repeated_field_keeps_last_value_and_null_is_omitted() {
        let req = client()
            .request("options/option/3")
            .field("title", "old")
            .fields([("title", Scalar::from("new")), ("color", Scalar::Null)])
            .build(HttpMethod::Post)
            .unwrap();
        assert_eq!(req.body_text(), Some("title=new"));
    }

    #[test]
    fn all_null_fields_send_no_body() {
        let req = client()
            .request("users/thanks")
            .field("message", Scalar::Null)
            .build(HttpMethod::Delete)
            .unwrap();
        assert!(req.body.is_none());
        assert!(req.content_type().is_none());
    }

    #[test]
    fn get_ignores_fields() {
        let req = client()
            .request("users/me")
            .field("ignored", "yes")
            .build(HttpMethod::Get)
            .unwrap();
        assert!(req.body.is_none());
    }

    #[test]
    fn api_key_is_injected_without_token() {
        let req = client().request("users/me").build(HttpMethod::Get).unwrap();
        assert_eq!(req.header("X-API-KEY"), Some("k1"));
        assert_eq!(req.header("X-AUTH-TOKEN"), None);
        assert_eq!(req.header("User-Agent"), Some("SlimSurveys-API-Client"));
    }

    #[test]
    fn token_header_is_injected_when_set() {
        let client = Client::new(ClientConfig::new("k1").with_token("t1")).unwrap();
        let req = client.request("users/me").build(HttpMethod::Delete).unwrap();
        assert_eq!(req.header("X-API-KEY"), Some("k1"));
        assert_eq!(req.header("X-AUTH-TOKEN"), Some("t1"));
    }

    #[test]
    fn caller_cannot_override_api_key() {
        let req = client()
            .request("users/me")
            .header("x-api-key", "forged")
            .header("Accept-Language", "fr")
            .build(HttpMethod::Get)
            .unwrap();
        let keys: Vec<_> = req
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("x-api-key"))
            .collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(req.header("X-API-KEY"), Some("k1"));
        assert_eq!(req.header("accept-language"), Some("fr"));
    }

    #[test]
    fn non_json_format_adds_format_query() {
        let client = Client::new(ClientConfig::new("k1").with_format("xml")).unwrap();
        let req = client
            .request("surveys/survey/42")
            .query("format", "csv")
            .build(HttpMethod::Get)
            .unwrap();
        assert_eq!(req.url, "https://slimsurveys.com/api/surveys/survey/42?format=xml");
    }

    #[test]
    fn consecutive_requests_share_nothing() {
        let client = client();
        let first = client
            .request("questions/question/1")
            .query("survey_uid", "abc")
            .field("title", "Q1")
            .header("X-Trace", "1")
            .build(HttpMethod::Post)
            .unwrap();
        assert!(first.body.is_some());

        let second = client.request("questions/question/2").build(HttpMethod::Post).unwrap();
        assert_eq!(second.url, "https://slimsurveys.com/api/questions/question/2");
        assert!(second.body.is_none());
        assert_eq!(second.header("X-Trace"), None);
    }

    #[test]
    fn form_flattens_struct_in_declaration_order() {
        #[derive(Serialize)]
        struct Payload {
            email: &'static str,
            password: &'static str,
            notifications: bool,
        }
        let req = client()
            .request("users/signup")
            .form(&Payload {
                email: "a@b.com",
                password: "x",
                notifications: true,
            })
            .build(HttpMethod::Post)
            .unwrap();
        assert_eq!(
            req.body_text(),
            Some("email=a%40b.com&password=x&notifications=true")
        );
    }

    #[test]
    fn form_rejects_nested_values() {
        let err = client()
            .request("users/tab")
            .form(&serde_json::json!({"tab": {"nested": 1}}))
            .build(HttpMethod::Post)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        let err = client()
            .request("users/tab")
            .form(&[1, 2, 3])
            .build(HttpMethod::Post)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn upload_marker_switches_to_multipart() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"PNGDATA").unwrap();

        let req = client()
            .request("images/create/7")
            .field("image", Scalar::file(file.path()))
            .field("caption", "cat")
            .build(HttpMethod::Post)
            .unwrap();

        let content_type = req.content_type().unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        let body = String::from_utf8(req.body.clone().unwrap()).unwrap();
        let filename = file.path().file_name().unwrap().to_string_lossy();

        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains(&format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n"
        )));
        assert!(body.contains("Content-Disposition: form-data; name=\"caption\"\r\n\r\ncat\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn raw_marker_in_field_uploads_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"notes").unwrap();

        let req = client()
            .request("images/create/7")
            .fields([("image", format!("@{}", file.path().display()))])
            .build(HttpMethod::Post)
            .unwrap();
        assert!(req
            .content_type()
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        assert!(req.body_text().unwrap().contains("\r\n\r\nnotes\r\n"));
    }

    #[test]
    fn verbatim_fields_keep_leading_at() {
        let req = client()
            .request("users/vanity")
            .field_verbatim("vanity", "@jane")
            .fields_verbatim([("note", "@/etc/hosts")])
            .build(HttpMethod::Post)
            .unwrap();
        assert_eq!(req.content_type(), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.body_text(), Some("vanity=%40jane&note=%40%2Fetc%2Fhosts"));
    }

    #[test]
    fn missing_upload_file_is_reported() {
        let err = client()
            .request("images/create/7")
            .field("image", Scalar::file("/definitely/not/here.png"))
            .build(HttpMethod::Post)
            .unwrap_err();
        assert!(matches!(err, Error::Upload { .. }));
    }
}
