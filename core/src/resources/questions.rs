use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::resources::SURVEY_UID_PARAM;
use crate::types::{IntoLookup, Scalar};

impl Client {
    pub fn question(&self, question_id: u64) -> Result<Outcome, Error> {
        self.request(format!("questions/question/{question_id}")).get()
    }

    pub fn update_question<K, V>(
        &self,
        question_id: u64,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request(format!("questions/question/{question_id}"))
            .fields_verbatim(fields)
            .post()
    }

    pub fn delete_question(&self, question_id: u64) -> Result<Outcome, Error> {
        self.request(format!("questions/question/{question_id}")).delete()
    }

    /// Add a question to a survey.
    pub fn create_question<K, V>(
        &self,
        survey: impl IntoLookup,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.lookup("questions/create", survey, SURVEY_UID_PARAM)?
            .fields_verbatim(fields)
            .post()
    }
}
