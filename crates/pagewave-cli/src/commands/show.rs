use anyhow::Result;
use pagewave_core::config::PagewaveConfig;
use pagewave_core::document::DocumentId;

use crate::commands::describe;
use crate::wiring;

pub async fn run(config: &PagewaveConfig, id: u64) -> Result<()> {
    let service = wiring::session_service(config)?;
    let doc = service.get(DocumentId(id)).await?;

    println!("{}", describe(&doc));
    if let Some(filename) = &doc.filename {
        println!("  stored as {filename}");
    }
    Ok(())
}
