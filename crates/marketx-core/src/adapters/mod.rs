mod finnhub;

pub use finnhub::{FinnhubClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
