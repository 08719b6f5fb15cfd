use serde::Deserialize;
use snafu::{ResultExt, Whatever};
use std::path::Path;
use std::{env, fs};
use tracing::info;

const CONFIG_PATH: &str = "./config.yml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ip: String,
    pub port: u16,
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            port: 3000,
            github_token: None,
            github_api_url: None,
        }
    }
}

impl Config {
    /// Defaults, then `config.yml` if present, then the environment.
    pub fn load() -> Result<Self, Whatever> {
        Self::load_file(Path::new(CONFIG_PATH))?.with_overrides(|key| env::var(key).ok())
    }

    fn load_file(path: &Path) -> Result<Self, Whatever> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_contents =
            fs::read_to_string(path).whatever_context("Failed to read config.yml")?;
        let config = Self::parse(&config_contents)?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self, Whatever> {
        serde_norway::from_str::<Self>(contents)
            .whatever_context("Failed to deserialize config.yml")
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Whatever> {
        if let Some(ip) = lookup("APP_IP") {
            self.ip = ip;
        }

        if let Some(port) = lookup("APP_PORT") {
            self.port = port
                .parse()
                .with_whatever_context(|_| format!("APP_PORT {port:?} is not a valid port"))?;
        }

        if let Some(token) = lookup("GITHUB_TOKEN") {
            self.github_token = Some(token);
        }

        if let Some(url) = lookup("GITHUB_API_URL") {
            self.github_api_url = Some(url);
        }

        // An empty token means unauthenticated access, same as no token.
        self.github_token = self.github_token.filter(|t| !t.trim().is_empty());
        self.github_api_url = self.github_api_url.filter(|u| !u.trim().is_empty());

        Ok(self)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
