use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Course catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Mined association rules CSV
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Result count used when a request omits `top_n`
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Largest `top_n` a request may ask for
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("Online_Courses.csv")
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("association_rules.csv")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    5
}

fn default_max_top_n() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.default_top_n == 0 || config.default_top_n > config.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N must be between 1 and MAX_TOP_N ({}), got {}",
                config.max_top_n,
                config.default_top_n
            );
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("Online_Courses.csv"));
        assert_eq!(config.rules_path, PathBuf::from("association_rules.csv"));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.max_top_n, 10);
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("CATALOG_PATH".to_string(), "/data/courses.csv".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("MAX_TOP_N".to_string(), "20".to_string()),
        ];
        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/data/courses.csv"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_top_n, 20);
    }

    #[test]
    fn test_default_top_n_above_max_is_rejected() {
        let vars = vec![("DEFAULT_TOP_N".to_string(), "11".to_string())];
        assert!(Config::from_vars(vars).is_err());
    }
}
