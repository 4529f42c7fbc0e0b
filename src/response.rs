//! Upstream payload validation and mapping

use crate::{
    error::ProviderError,
    types::{PricePoint, TokenInfo},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

/// `/coins/{id}/market_chart/range` payload; other series are ignored
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

/// `/coins/{id}` payload, reduced to the fields we map
#[derive(Debug, Deserialize)]
struct CoinDetailResponse {
    id: String,
    symbol: String,
    name: String,
    image: CoinImage,
}

#[derive(Debug, Deserialize)]
struct CoinImage {
    small: String,
}

/// Extracts `body[token_id].usd`
///
/// A missing, non-numeric or zero price is rejected.
pub fn parse_simple_price(body: &Value, token_id: &str) -> Result<f64, ProviderError> {
    body.get(token_id)
        .and_then(|entry| entry.get("usd"))
        .and_then(Value::as_f64)
        .filter(|price| *price != 0.0)
        .ok_or_else(|| {
            ProviderError::invalid_response(format!(
                "No USD price for {} in response: {}",
                token_id, body
            ))
        })
}

/// Maps `prices: [[timestamp_ms, price], ...]` to price points, keeping order
pub fn parse_market_chart(body: Value) -> Result<Vec<PricePoint>, ProviderError> {
    let chart: MarketChartResponse = serde_json::from_value(body).map_err(|e| {
        ProviderError::invalid_response(format!("Malformed market chart: {}", e))
    })?;

    chart
        .prices
        .into_iter()
        .map(|(timestamp_ms, price)| {
            Ok(PricePoint {
                x: format_timestamp_ms(timestamp_ms)?,
                y: price,
            })
        })
        .collect()
}

/// Maps coin detail to token info with an uppercased symbol
pub fn parse_token_info(body: Value) -> Result<TokenInfo, ProviderError> {
    let detail: CoinDetailResponse = serde_json::from_value(body).map_err(|e| {
        ProviderError::invalid_response(format!("Malformed coin detail: {}", e))
    })?;

    Ok(TokenInfo {
        id: detail.id,
        symbol: detail.symbol.to_uppercase(),
        name: detail.name,
        image: detail.image.small,
    })
}

/// Formats epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`
fn format_timestamp_ms(timestamp_ms: f64) -> Result<String, ProviderError> {
    if !timestamp_ms.is_finite() {
        return Err(ProviderError::invalid_response(format!(
            "Invalid timestamp: {}",
            timestamp_ms
        )));
    }

    DateTime::<Utc>::from_timestamp_millis(timestamp_ms.trunc() as i64)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| {
            ProviderError::invalid_response(format!("Timestamp out of range: {}", timestamp_ms))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_price() {
        let body = json!({ "bitcoin": { "usd": 67000.5 } });
        assert_eq!(parse_simple_price(&body, "bitcoin").unwrap(), 67000.5);
    }

    #[test]
    fn test_simple_price_rejects_missing_or_bad_values() {
        for body in [
            json!({}),
            json!({ "bitcoin": {} }),
            json!({ "bitcoin": { "usd": "67000" } }),
            json!({ "bitcoin": { "usd": 0 } }),
            json!({ "ethereum": { "usd": 3500.0 } }),
            json!([]),
        ] {
            let err = parse_simple_price(&body, "bitcoin").unwrap_err();
            assert!(matches!(err, ProviderError::InvalidResponse(_)), "{}", body);
        }
    }

    #[test]
    fn test_market_chart_preserves_order() {
        let body = json!({
            "prices": [[1700000000000u64, 100], [1700003600000u64, 105]],
            "market_caps": [],
            "total_volumes": []
        });

        let points = parse_market_chart(body).unwrap();
        assert_eq!(
            points,
            vec![
                PricePoint {
                    x: "2023-11-14T22:13:20.000Z".to_string(),
                    y: 100.0
                },
                PricePoint {
                    x: "2023-11-14T23:13:20.000Z".to_string(),
                    y: 105.0
                },
            ]
        );
    }

    #[test]
    fn test_market_chart_keeps_milliseconds() {
        let body = json!({ "prices": [[1700000000123.0, 1.5]] });
        let points = parse_market_chart(body).unwrap();
        assert_eq!(points[0].x, "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_market_chart_empty_series() {
        let points = parse_market_chart(json!({ "prices": [] })).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_market_chart_rejects_malformed() {
        for body in [
            json!({}),
            json!({ "prices": null }),
            json!({ "prices": "oops" }),
            json!({ "prices": [[1700000000000u64]] }),
            json!({ "prices": [["yesterday", 100]] }),
        ] {
            assert!(parse_market_chart(body).is_err());
        }
    }

    #[test]
    fn test_token_info() {
        let body = json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": { "thumb": "thumb-url", "small": "url", "large": "large-url" },
            "market_cap_rank": 1
        });

        assert_eq!(
            parse_token_info(body).unwrap(),
            TokenInfo {
                id: "bitcoin".to_string(),
                symbol: "BTC".to_string(),
                name: "Bitcoin".to_string(),
                image: "url".to_string(),
            }
        );
    }

    #[test]
    fn test_token_info_missing_image() {
        let body = json!({ "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" });
        assert!(parse_token_info(body).is_err());
    }
}
