use std::env;
use tracing::warn;

const DEFAULT_SYMBOL: &str = "NIFTY";
const DEFAULT_POLL_SECS: u64 = 180;
const DEFAULT_STRIKE_STEP: i64 = 50;
const DEFAULT_OTM_COUNT: usize = 3;

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub poll_secs: u64,
    pub strike_step: i64,
    pub otm_count: usize,
    pub send_every_run: bool,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            symbol: lookup("SYMBOL").unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            poll_secs: parse_or(&lookup, "POLL_SECS", DEFAULT_POLL_SECS),
            strike_step: parse_or(&lookup, "STRIKE_STEP", DEFAULT_STRIKE_STEP),
            otm_count: parse_or(&lookup, "OTM_COUNT", DEFAULT_OTM_COUNT),
            send_every_run: parse_or(&lookup, "SEND_EVERY_RUN", true),
            bot_token: lookup("BOT_TOKEN").filter(|t| !t.is_empty()),
            chat_id: lookup("CHAT_ID").filter(|c| !c.is_empty()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Ignoring unparseable {key}={raw:?}");
            default
        }
    }
}
