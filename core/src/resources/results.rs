use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::resources::SURVEY_UID_PARAM;
use crate::types::IntoLookup;

impl Client {
    /// Aggregated results of every question in a survey.
    pub fn survey_results(&self, survey: impl IntoLookup) -> Result<Outcome, Error> {
        self.lookup("results/survey", survey, SURVEY_UID_PARAM)?
            .get()
    }

    pub fn question_results(&self, question_id: u64) -> Result<Outcome, Error> {
        self.request(format!("results/question/{question_id}")).get()
    }
}
