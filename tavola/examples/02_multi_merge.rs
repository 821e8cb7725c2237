//! Merge two series on their shared date key, using the scripted transport
//! so the example runs offline.

use std::sync::Arc;

use tavola::{DatasetRequest, SessionBuilder, TypedSession};
use tavola_core::SortOrder;
use tavola_mock::ScriptedTransport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(ScriptedTransport::new());
    transport.enqueue(ScriptedTransport::json_ok(
        r#"{"dataset_data": {"column_names": ["Date", "Close"],
            "data": [["2020-01-01", 10.0], ["2020-01-02", 11.0]]}}"#,
    ));
    transport.enqueue(ScriptedTransport::json_ok(
        r#"{"dataset_data": {"column_names": ["Date", "Open"],
            "data": [["2020-01-01", 5.0]]}}"#,
    ));

    let session: TypedSession = SessionBuilder::new().transport(transport).build()?;
    let merged = session.dataset_multi(
        &[
            DatasetRequest::new("WIKI/AAPL".parse()?),
            DatasetRequest::new("WIKI/MSFT".parse()?),
        ],
        SortOrder::Ascending,
    )?;

    println!("{}", merged.header().names().join(" | "));
    for row in merged.rows() {
        let cells: Vec<&str> = row
            .cells()
            .iter()
            .map(|c| c.as_deref().unwrap_or("null"))
            .collect();
        println!("{}", cells.join(" | "));
    }
    Ok(())
}
