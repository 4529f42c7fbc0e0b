use coingecko_price_client::{CoinGeckoClient, TokenDescriptor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=coingecko_price_client=debug shows request and retry detail
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let token_id = std::env::args().nth(1).unwrap_or_else(|| "bitcoin".to_string());
    let client = CoinGeckoClient::global().await?;

    if TokenDescriptor::find(&token_id).is_none() {
        println!("Note: {} is not in the built-in catalog", token_id);
    }

    match client.get_token_info(&token_id).await {
        Ok(info) => println!("{} ({})  {}", info.name, info.symbol, info.image),
        Err(e) => eprintln!("Token info: {}", e),
    }

    match client.get_current_price(&token_id).await {
        Ok(price) => println!("Current price: ${:.2}", price),
        Err(e) => eprintln!("Current price: {}", e),
    }

    match client.get_historical_data(&token_id).await {
        Ok(points) => {
            println!("7-day history: {} points", points.len());
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                println!("  {}  ${:.2}", first.x, first.y);
                println!("  {}  ${:.2}", last.x, last.y);
            }
        }
        Err(e) => eprintln!("History: {}", e),
    }

    let metrics = client.metrics().await;
    println!("Requests made: {}", metrics.total_requests());

    Ok(())
}
