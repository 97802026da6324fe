//! Print the OpenAPI document as JSON.

use std::io;

use utoipa::OpenApi;
use wiki_history::doc::ApiDoc;

fn main() -> io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}
