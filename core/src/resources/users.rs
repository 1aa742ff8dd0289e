use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::types::{Scalar, Signup};

/// Everything but RFC 3986 unreserved characters is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl Client {
    /// Account of the authenticated user. Needs a token.
    pub fn me(&self) -> Result<Outcome, Error> {
        self.request("users/me").get()
    }

    pub fn signup(&self, signup: &Signup) -> Result<Outcome, Error> {
        self.request("users/signup").form(signup).post()
    }

    /// Ask for a password reset email.
    pub fn forgot_password(&self, email: &str) -> Result<Outcome, Error> {
        self.request("users/forgot").field_verbatim("email", email).post()
    }

    /// Set a new password using the token from the reset email.
    pub fn reset_password(&self, reset_token: &str, password: &str) -> Result<Outcome, Error> {
        let segment = utf8_percent_encode(reset_token, PATH_SEGMENT);
        self.request(format!("users/reset/{segment}"))
            .field_verbatim("password", password)
            .post()
    }

    pub fn update_tab<K, V>(&self, settings: impl IntoIterator<Item = (K, V)>) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request("users/tab").fields_verbatim(settings).post()
    }

    pub fn update_vanity(&self, vanity: &str) -> Result<Outcome, Error> {
        self.request("users/vanity").field_verbatim("vanity", vanity).post()
    }

    pub fn delete_vanity(&self) -> Result<Outcome, Error> {
        self.request("users/vanity").delete()
    }

    pub fn update_privacy<K, V>(&self, settings: impl IntoIterator<Item = (K, V)>) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request("users/privacy").fields_verbatim(settings).post()
    }

    pub fn update_email(&self, email: &str) -> Result<Outcome, Error> {
        self.request("users/email").field_verbatim("email", email).post()
    }

    /// Set the thank-you page shown after a survey is completed.
    pub fn update_thanks<K, V>(&self, settings: impl IntoIterator<Item = (K, V)>) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request("users/thanks").fields_verbatim(settings).post()
    }

    pub fn delete_thanks(&self) -> Result<Outcome, Error> {
        self.request("users/thanks").delete()
    }

    pub fn update_password(&self, current: &str, new: &str) -> Result<Outcome, Error> {
        self.request("users/password")
            .field_verbatim("current_password", current)
            .field_verbatim("password", new)
            .post()
    }
}
