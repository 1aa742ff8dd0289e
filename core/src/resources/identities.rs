use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::resources::{SURVEY_UID_PARAM, UVID_FIELD};
use crate::types::{IntoLookup, Scalar};

impl Client {
    /// Attach identity details (name, email, ...) to the respondent session
    /// `uvid` of a survey.
    pub fn create_identity<K, V>(
        &self,
        survey: impl IntoLookup,
        uvid: &str,
        details: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.lookup("identities/create", survey, SURVEY_UID_PARAM)?
            .field_verbatim(UVID_FIELD, uvid)
            .fields_verbatim(details)
            .post()
    }
}
