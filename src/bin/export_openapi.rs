//! Dumps the gateway's OpenAPI document to stdout, for CI docs publishing.

use fulfilment_core::gateway::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let doc = ApiDoc::openapi().to_pretty_json()?;
    println!("{doc}");
    Ok(())
}
