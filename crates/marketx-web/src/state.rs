use std::sync::Arc;

use marketx_core::MarketData;

use crate::config::Config;
use crate::error::WebError;
use crate::render::Templates;

/// Shared by every request: the cached provider handle and the compiled
/// templates.
#[derive(Debug, Clone)]
pub struct AppState {
    pub market: MarketData,
    pub templates: Templates,
}

impl AppState {
    pub fn new(market: MarketData) -> Result<Self, WebError> {
        Ok(Self {
            market,
            templates: Templates::new()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Arc<Self>, WebError> {
        Ok(Arc::new(Self::new(config.market_data())?))
    }
}
