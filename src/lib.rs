pub mod chain;
pub mod config;
pub mod nse;
pub mod report;
pub mod scan;
pub mod strikes;
pub mod telegram;
pub mod tracker;
pub mod watch;

const NSE_BASE: &str = "https://www.nseindia.com";
const NSE_CHAIN_PAGE: &str = "https://www.nseindia.com/option-chain";
const TELEGRAM_API: &str = "https://api.telegram.org";
