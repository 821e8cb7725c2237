//! Fetch one dataset over HTTP and print its first rows.
//!
//! Requires `TAVOLA_API_KEY` in the environment. Set `RUST_LOG=tavola=debug`
//! to watch the fetch loop.

use std::sync::Arc;

use tavola::{DatasetRequest, SessionBuilder, TypedSession};
use tavola_http::HttpTransport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let session: TypedSession = SessionBuilder::new()
        .transport(Arc::new(HttpTransport::new()?))
        .api_key(std::env::var("TAVOLA_API_KEY")?)
        .build()?;

    let request = DatasetRequest::new("WIKI/AAPL".parse()?).limit(5);
    let table = session.dataset(&request)?;

    println!("{}", table.header().names().join(" | "));
    for row in table.rows() {
        let cells: Vec<&str> = row
            .cells()
            .iter()
            .map(|c| c.as_deref().unwrap_or("-"))
            .collect();
        println!("{}", cells.join(" | "));
    }
    Ok(())
}
