//! Parameter values, resource lookups and request payloads.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Prefix marking a raw body field value as a local file to upload.
///
/// Only `RequestBuilder::field` and `RequestBuilder::fields` read it; typed
/// resource methods send text verbatim.
pub const UPLOAD_MARKER: char = '@';

/// A single query-parameter or body-field value.
///
/// `Null` is kept distinct from an empty string: as a query parameter it is
/// sent as `key=`, as a body field it is left out entirely. `File` is a local
/// file sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    #[serde(skip_deserializing)]
    File(PathBuf),
}

impl Scalar {
    /// A body field value that uploads the file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Scalar::File(path.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// The local path when this value is a file upload.
    pub fn upload_path(&self) -> Option<&Path> {
        match self {
            Scalar::File(path) => Some(path),
            _ => None,
        }
    }

    /// Turn `Text("@path")` into `File(path)`; anything else is unchanged.
    pub(crate) fn resolve_marker(self) -> Self {
        match self {
            Scalar::Text(text) => match text.strip_prefix(UPLOAD_MARKER) {
                Some(path) if !path.is_empty() => Scalar::File(PathBuf::from(path)),
                _ => Scalar::Text(text),
            },
            other => other,
        }
    }

    /// Wire text of the value, `None` for `Null`.
    pub fn to_param(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(value) => f.write_str(value),
            Scalar::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Text(value.clone())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Scalar::Text(value.to_string()), Scalar::Int)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

/// How a resource is addressed: numeric id in the path, or a string uid
/// passed as a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(u64),
    Uid(String),
}

impl From<u64> for Lookup {
    fn from(id: u64) -> Self {
        Lookup::Id(id)
    }
}

impl From<u32> for Lookup {
    fn from(id: u32) -> Self {
        Lookup::Id(u64::from(id))
    }
}

/// Negative ids address nothing and are rejected.
impl TryFrom<i32> for Lookup {
    type Error = Error;

    fn try_from(id: i32) -> Result<Self, Error> {
        Lookup::try_from(i64::from(id))
    }
}

impl TryFrom<i64> for Lookup {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self, Error> {
        u64::try_from(id)
            .map(Lookup::Id)
            .map_err(|_| Error::InvalidLookup(id))
    }
}

impl From<&str> for Lookup {
    fn from(uid: &str) -> Self {
        Lookup::Uid(uid.to_string())
    }
}

impl From<String> for Lookup {
    fn from(uid: String) -> Self {
        Lookup::Uid(uid)
    }
}

/// Anything a resource method accepts as a `Lookup`: ids (`42`, `42_u64`),
/// uids (`"abc"`) or a `Lookup` itself.
pub trait IntoLookup {
    fn into_lookup(self) -> Result<Lookup, Error>;
}

impl<T> IntoLookup for T
where
    T: TryInto<Lookup>,
    Error: From<T::Error>,
{
    fn into_lookup(self) -> Result<Lookup, Error> {
        Ok(self.try_into()?)
    }
}

/// Account creation payload for `users/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signup {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub notifications: bool,
}

/// Email/password pair exchanged for an auth token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Body of a successful `auth/token` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
}
