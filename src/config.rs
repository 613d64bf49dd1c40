use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub web_host: String,
    pub web_port: u16,
    pub data_file: PathBuf,
    pub page_size: usize,
    pub max_page_size: usize,
    pub default_author_email: String,
    pub static_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_source(config::Environment::default())
    }

    /// Layers `env` over the built-in defaults.
    pub fn from_source(env: config::Environment) -> crate::Result<Self> {
        let config = config::Config::builder()
            .set_default("web_host", "0.0.0.0")?
            .set_default("web_port", 5000)?
            .set_default("data_file", "./data/blogs.json")?
            .set_default("page_size", 6)?
            .set_default("max_page_size", 100)?
            .set_default("default_author_email", "defaultuser@example.com")?
            .set_default("log_format", "pretty")?
            .add_source(env.try_parsing(true))
            .build()?;

        let config: Config = config.try_deserialize()?;
        if config.page_size == 0 || config.max_page_size < config.page_size {
            return Err(crate::Error::Config(config::ConfigError::Message(format!(
                "PAGE_SIZE must be between 1 and MAX_PAGE_SIZE ({})",
                config.max_page_size
            ))));
        }

        Ok(config)
    }

    pub fn web_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_source(env(&[])).unwrap();

        assert_eq!(config.web_addr(), "0.0.0.0:5000");
        assert_eq!(config.data_file, PathBuf::from("./data/blogs.json"));
        assert_eq!(config.page_size, 6);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.default_author_email, "defaultuser@example.com");
        assert_eq!(config.static_dir, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_source(env(&[
            ("WEB_PORT", "8080"),
            ("DATA_FILE", "/tmp/posts.json"),
            ("PAGE_SIZE", "10"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.web_port, 8080);
        assert_eq!(config.data_file, PathBuf::from("/tmp/posts.json"));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_source(env(&[("WEB_PORT", "not-a-port")]));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_page_size_above_max() {
        let result = Config::from_source(env(&[("PAGE_SIZE", "200")]));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
