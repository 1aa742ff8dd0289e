use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::resources::{SURVEY_UID_PARAM, USER_UID_PARAM};
use crate::types::IntoLookup;

impl Client {
    pub fn survey(&self, survey: impl IntoLookup) -> Result<Outcome, Error> {
        self.lookup("surveys/survey", survey, SURVEY_UID_PARAM)?
            .get()
    }

    /// Embeddable markup of a survey. The API answers with HTML unless a
    /// non-JSON format is configured, so read it with `Outcome::response`.
    pub fn embed_survey(&self, survey: impl IntoLookup) -> Result<Outcome, Error> {
        self.lookup("surveys/embed", survey, SURVEY_UID_PARAM)?
            .get()
    }

    /// Public surveys of another user.
    pub fn user_surveys(&self, user: impl IntoLookup) -> Result<Outcome, Error> {
        self.lookup("surveys/user", user, USER_UID_PARAM)?
            .get()
    }

    /// Surveys owned by the authenticated user.
    pub fn my_surveys(&self) -> Result<Outcome, Error> {
        self.request("surveys/mine").get()
    }
}
