use anyhow::Context;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug)]
pub struct Config {
    base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = match std::env::var("AUTHORS_API_BASE_URL") {
            Ok(val) => val,
            Err(std::env::VarError::NotPresent) => DEFAULT_BASE_URL.to_string(),
            Err(err) => {
                return Err(err)
                    .context("Failed to load environment variable AUTHORS_API_BASE_URL");
            }
        };
        Ok(Self { base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
