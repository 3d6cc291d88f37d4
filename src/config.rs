use std::env;
use std::time::Duration;

const DEFAULT_ZENROWS_API_URL: &str = "https://api.zenrows.com/v1/";
const DEFAULT_GMGN_API_URL: &str = "https://gmgn.ai/api/v1";
const DEFAULT_WALLET_CHAIN: &str = "sol";
const DEFAULT_TOKENS_PER_PAGE: usize = 5;
const DEFAULT_LOOKUP_MAX_PAGES: usize = 20;
const DEFAULT_RESTART_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub zenrows_api_key: String,
    pub database_url: String,
    pub zenrows_api_url: String,
    pub gmgn_api_url: String,
    pub wallet_chain: String,
    pub tokens_per_page: usize,
    pub lookup_max_pages: usize,
    pub restart_delay: Duration,
    pub proxy_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
        where F: Fn(&str) -> Option<String>
    {
        let required = |key: &str| -> Result<String, Box<dyn std::error::Error>> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(format!("{} not set", key).into()),
            }
        };

        let telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let zenrows_api_key = required("ZENROWS_API_KEY")?;
        let database_url = required("DATABASE_URL")?;

        let zenrows_api_url = lookup("ZENROWS_API_URL").unwrap_or_else(||
            DEFAULT_ZENROWS_API_URL.to_string()
        );
        let gmgn_api_url = lookup("GMGN_API_URL")
            .unwrap_or_else(|| DEFAULT_GMGN_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let wallet_chain = lookup("WALLET_CHAIN").unwrap_or_else(||
            DEFAULT_WALLET_CHAIN.to_string()
        );

        let tokens_per_page = match lookup("TOKENS_PER_PAGE") {
            Some(v) => v.parse::<usize>()?,
            None => DEFAULT_TOKENS_PER_PAGE,
        };
        if tokens_per_page == 0 {
            return Err("TOKENS_PER_PAGE must be greater than zero".into());
        }

        let lookup_max_pages = match lookup("HOLDINGS_LOOKUP_MAX_PAGES") {
            Some(v) => v.parse::<usize>()?,
            None => DEFAULT_LOOKUP_MAX_PAGES,
        };
        if lookup_max_pages == 0 {
            return Err("HOLDINGS_LOOKUP_MAX_PAGES must be greater than zero".into());
        }

        let restart_delay = Duration::from_secs(match lookup("RESTART_DELAY_SECS") {
            Some(v) => v.parse::<u64>()?,
            None => DEFAULT_RESTART_DELAY_SECS,
        });

        let proxy_timeout = match lookup("PROXY_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(v.parse::<u64>()?)),
            None => None,
        };

        Ok(Config {
            telegram_bot_token,
            zenrows_api_key,
            database_url,
            zenrows_api_url,
            gmgn_api_url,
            wallet_chain,
            tokens_per_page,
            lookup_max_pages,
            restart_delay,
            proxy_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required_vars() -> HashMap<String, String> {
        vars(
            &[
                ("TELEGRAM_BOT_TOKEN", "123:abc"),
                ("ZENROWS_API_KEY", "zr-key"),
                ("DATABASE_URL", "postgres://localhost/pnl"),
            ]
        )
    }

    #[test]
    fn test_defaults() {
        let env = required_vars();
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.telegram_bot_token, "123:abc");
        assert_eq!(config.gmgn_api_url, "https://gmgn.ai/api/v1");
        assert_eq!(config.wallet_chain, "sol");
        assert_eq!(config.tokens_per_page, 5);
        assert_eq!(config.lookup_max_pages, 20);
        assert_eq!(config.restart_delay, Duration::from_secs(5));
        assert!(config.proxy_timeout.is_none());
    }

    #[test]
    fn test_missing_secret_is_named() {
        let mut env = required_vars();
        env.remove("ZENROWS_API_KEY");

        let err = Config::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(err.to_string(), "ZENROWS_API_KEY not set");
    }

    #[test]
    fn test_blank_secret_is_missing() {
        let mut env = required_vars();
        env.insert("DATABASE_URL".to_string(), "  ".to_string());

        assert!(Config::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut env = required_vars();
        env.extend(
            vars(
                &[
                    ("GMGN_API_URL", "http://localhost:9000/api/"),
                    ("TOKENS_PER_PAGE", "8"),
                    ("RESTART_DELAY_SECS", "1"),
                    ("PROXY_TIMEOUT_SECS", "30"),
                ]
            )
        );

        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.gmgn_api_url, "http://localhost:9000/api");
        assert_eq!(config.tokens_per_page, 8);
        assert_eq!(config.restart_delay, Duration::from_secs(1));
        assert_eq!(config.proxy_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut env = required_vars();
        env.insert("TOKENS_PER_PAGE".to_string(), "0".to_string());

        assert!(Config::from_lookup(|k| env.get(k).cloned()).is_err());
    }
}
