use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::types::Scalar;

impl Client {
    pub fn option(&self, option_id: u64) -> Result<Outcome, Error> {
        self.request(format!("options/option/{option_id}")).get()
    }

    pub fn update_option<K, V>(
        &self,
        option_id: u64,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request(format!("options/option/{option_id}"))
            .fields_verbatim(fields)
            .post()
    }

    pub fn delete_option(&self, option_id: u64) -> Result<Outcome, Error> {
        self.request(format!("options/option/{option_id}")).delete()
    }

    /// Add an answer option to a question.
    pub fn create_option<K, V>(
        &self,
        question_id: u64,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request(format!("options/create/{question_id}"))
            .fields_verbatim(fields)
            .post()
    }
}
