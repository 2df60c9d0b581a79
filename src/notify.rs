use color_eyre::Result;
use log::debug;

use crate::scraper::CLIENT;

const TYPETALK_API_BASE: &str = "https://typetalk.com/api/v1";

pub trait Notifier {
    /// Delivers synchronously; returns once the backend accepted or refused
    /// the message.
    fn notify(&self, message: &str) -> Result<()>;
}

pub struct Typetalk {
    topic_id: u64,
    token: String,
}

impl Typetalk {
    pub fn new(topic_id: u64, token: String) -> Self {
        Self { topic_id, token }
    }
}

impl Notifier for Typetalk {
    fn notify(&self, message: &str) -> Result<()> {
        CLIENT
            .post(format!("{TYPETALK_API_BASE}/topics/{}", self.topic_id))
            .header("X-TYPETALK-TOKEN", &self.token)
            .form(&[("message", message)])
            .send()?
            .error_for_status()?;
        debug!("Delivered notification to topic {}", self.topic_id);
        Ok(())
    }
}
