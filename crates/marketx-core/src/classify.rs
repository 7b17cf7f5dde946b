use tracing::debug;

use crate::domain::{Symbol, SymbolKind};
use crate::fetch::MarketData;

/// Decides whether `symbol` is an index, an ETF or a stock.
///
/// Caret-prefixed symbols are indices and cost no provider call. Everything
/// else goes through an ETF-profile lookup: a profile with a non-empty name
/// means ETF. A failed lookup is treated as "not an ETF".
pub async fn classify(market: &MarketData, symbol: &Symbol) -> SymbolKind {
    if symbol.is_index() {
        return SymbolKind::Index;
    }

    match market.etf_profile(symbol).await {
        Ok(profile) if profile.name().is_some() => SymbolKind::Etf,
        Ok(_) => SymbolKind::Stock,
        Err(error) => {
            debug!(symbol = %symbol, error = %error, "etf profile lookup failed, classifying as stock");
            SymbolKind::Stock
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::FinnhubClient;
    use crate::cache::ResponseCache;
    use crate::http_client::StubHttpClient;

    fn market(stub: Arc<StubHttpClient>) -> MarketData {
        MarketData::new(
            FinnhubClient::with_http_client(stub, "test-key"),
            ResponseCache::with_defaults(),
        )
    }

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    #[tokio::test]
    async fn caret_prefix_is_index_without_provider_call() {
        let stub = Arc::new(StubHttpClient::new().with_json(
            "etf/profile",
            r#"{"profile":{"name":"Looks Like A Fund"}}"#,
        ));
        let market = market(stub.clone());

        assert_eq!(classify(&market, &symbol("^gspc")).await, SymbolKind::Index);
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn named_profile_is_etf() {
        let stub = Arc::new(StubHttpClient::new().with_json(
            "etf/profile",
            r#"{"symbol":"SPY","profile":{"name":"SPDR S&P 500 ETF Trust"}}"#,
        ));

        assert_eq!(classify(&market(stub), &symbol("spy")).await, SymbolKind::Etf);
    }

    #[tokio::test]
    async fn profile_list_uses_first_entry() {
        let stub = Arc::new(StubHttpClient::new().with_json(
            "etf/profile",
            r#"{"profile":[{"name":"iShares Core S&P 500 ETF"},{"name":"ignored"}]}"#,
        ));

        assert_eq!(classify(&market(stub), &symbol("IVV")).await, SymbolKind::Etf);
    }

    #[tokio::test]
    async fn empty_or_missing_name_is_stock() {
        for body in [r#"{"profile":{}}"#, r#"{"profile":{"name":""}}"#, "{}", "null"] {
            let stub = Arc::new(StubHttpClient::new().with_json("etf/profile", body));
            assert_eq!(
                classify(&market(stub), &symbol("AAPL")).await,
                SymbolKind::Stock,
                "body {body}"
            );
        }
    }

    #[tokio::test]
    async fn whitespace_name_still_counts_as_etf() {
        let stub = Arc::new(
            StubHttpClient::new().with_json("etf/profile", r#"{"profile":{"name":"  "}}"#),
        );
        assert_eq!(
            classify(&market(stub), &symbol("ODD")).await,
            SymbolKind::Etf
        );
    }

    #[tokio::test]
    async fn lookup_errors_fall_through_to_stock() {
        let forbidden = Arc::new(StubHttpClient::new().with_status("etf/profile", 403, "{}"));
        let broken = Arc::new(StubHttpClient::new().with_failure("etf/profile", "timed out"));
        let garbage = Arc::new(StubHttpClient::new().with_json("etf/profile", "not json"));

        for stub in [forbidden, broken, garbage] {
            assert_eq!(
                classify(&market(stub), &symbol("AAPL")).await,
                SymbolKind::Stock
            );
        }
    }
}
