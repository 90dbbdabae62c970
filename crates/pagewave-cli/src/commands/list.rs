use anyhow::Result;
use colored::Colorize;
use pagewave_core::config::PagewaveConfig;

use crate::commands::describe;
use crate::wiring;

pub async fn run(config: &PagewaveConfig, query: Option<&str>) -> Result<()> {
    let service = wiring::session_service(config)?;
    let docs = service.list(query).await?;

    if docs.is_empty() {
        println!("{}", "No documents found".bright_black());
        return Ok(());
    }
    for doc in &docs {
        println!("{}", describe(doc));
    }
    Ok(())
}
