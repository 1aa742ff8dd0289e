//! Resource endpoints of the SlimSurveys API.
//!
//! Each submodule adds methods to `Client` for one resource group. The
//! methods only template a path, set fields and pick a verb.

mod answers;
mod auth;
mod identities;
mod images;
mod options;
mod questions;
mod results;
mod surveys;
mod users;

use crate::client::Client;
use crate::request::RequestBuilder;
use crate::error::Error;
use crate::types::{IntoLookup, Lookup};

pub const SURVEY_UID_PARAM: &str = "survey_uid";
pub const USER_UID_PARAM: &str = "user_uid";
pub const UVID_FIELD: &str = "uvid";

impl Client {
    /// `{base}/{id}` for a numeric lookup, `{base}?{uid_param}={uid}` otherwise.
    fn lookup(
        &self,
        base: &str,
        lookup: impl IntoLookup,
        uid_param: &str,
    ) -> Result<RequestBuilder<'_>, Error> {
        Ok(match lookup.into_lookup()? {
            Lookup::Id(id) => self.request(format!("{base}/{id}")),
            Lookup::Uid(uid) => self.request(base).query(uid_param, uid),
        })
    }
}
