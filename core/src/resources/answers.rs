use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::resources::{SURVEY_UID_PARAM, UVID_FIELD};
use crate::types::{IntoLookup, Scalar};

impl Client {
    pub fn survey_answers(&self, survey: impl IntoLookup) -> Result<Outcome, Error> {
        self.lookup("answers/survey", survey, SURVEY_UID_PARAM)?
            .get()
    }

    /// Submit a respondent's answers to a whole survey. `uvid` ties them to
    /// one survey-taking session.
    pub fn submit_survey_answers<K, V>(
        &self,
        survey: impl IntoLookup,
        uvid: &str,
        answers: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.lookup("answers/survey", survey, SURVEY_UID_PARAM)?
            .field_verbatim(UVID_FIELD, uvid)
            .fields_verbatim(answers)
            .post()
    }

    pub fn question_answers(&self, question_id: u64) -> Result<Outcome, Error> {
        self.request(format!("answers/question/{question_id}")).get()
    }

    pub fn submit_question_answer<K, V>(
        &self,
        question_id: u64,
        uvid: &str,
        answer: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Outcome, Error>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.request(format!("answers/question/{question_id}"))
            .field_verbatim(UVID_FIELD, uvid)
            .fields_verbatim(answer)
            .post()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::http::HttpMethod;
    use crate::resources::test_support::recording_client;

    #[test]
    fn survey_answers_by_id_and_uid() {
        let (client, transport) = recording_client("[]");

        client.survey_answers(42).unwrap();
        assert_eq!(transport.last().url, "https://slimsurveys.com/api/answers/survey/42");

        client.survey_answers("abc").unwrap();
        assert_eq!(
            transport.last().url,
            "https://slimsurveys.com/api/answers/survey?survey_uid=abc"
        );
    }

    #[test]
    fn submit_survey_answers_sends_uvid_first() {
        let (client, transport) = recording_client("{}");
        client
            .submit_survey_answers("abc", "v-1", [("q1", "yes"), ("q2", "blue")])
            .unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://slimsurveys.com/api/answers/survey?survey_uid=abc");
        assert_eq!(req.body_text(), Some("uvid=v-1&q1=yes&q2=blue"));
    }

    #[test]
    fn answer_text_naming_a_local_file_is_sent_as_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"private").unwrap();
        let answer = format!("@{}", file.path().display());

        let (client, transport) = recording_client("{}");
        client
            .submit_survey_answers(42, "v1", [("q1", answer.as_str())])
            .unwrap();

        let req = transport.last();
        assert_eq!(req.content_type(), Some("application/x-www-form-urlencoded"));
        let body = req.body_text().unwrap();
        assert!(body.starts_with("uvid=v1&q1=%40"));
        assert!(!body.contains("private"));
    }

    #[test]
    fn question_answers_round_trip() {
        let (client, transport) = recording_client("{}");

        client.question_answers(9).unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://slimsurveys.com/api/answers/question/9");

        client.submit_question_answer(9, "v-1", [("option_id", 3)]).unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body_text(), Some("uvid=v-1&option_id=3"));
    }
}
