use std::path::Path;

use crate::client::Client;
use crate::error::Error;
use crate::outcome::Outcome;
use crate::types::Scalar;

const IMAGE_FIELD: &str = "image";

impl Client {
    pub fn image(&self, image_id: u64) -> Result<Outcome, Error> {
        self.request(format!("images/image/{image_id}")).get()
    }

    pub fn delete_image(&self, image_id: u64) -> Result<Outcome, Error> {
        self.request(format!("images/image/{image_id}")).delete()
    }

    /// Upload a local image file for a question as `multipart/form-data`.
    /// The file is read into memory before sending.
    pub fn upload_image(&self, question_id: u64, path: impl AsRef<Path>) -> Result<Outcome, Error> {
        self.request(format!("images/create/{question_id}"))
            .field(IMAGE_FIELD, Scalar::file(path.as_ref()))
            .post()
    }
}
