use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::types::{AuthToken, Login};

impl Client {
    /// Exchange account credentials for an auth token.
    pub fn auth_token(&self, email: &str, password: &str) -> Result<Outcome, Error> {
        self.request("auth/token")
            .form(&Login {
                email: email.to_string(),
                password: password.to_string(),
            })
            .post()
    }

    /// Like `auth_token`, then keep the returned token for later calls.
    ///
    /// A non-2xx answer leaves the client unchanged and is returned as the
    /// outcome, so the caller can read the API's error body.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<Outcome, Error> {
        let outcome = self.auth_token(email, password)?;
        if outcome.is_success() {
            let AuthToken { token } = outcome.data_as()?;
            self.set_token(token);
        }
        Ok(outcome)
    }
}
