pub mod list;
pub mod read;
pub mod show;

use colored::Colorize;
use pagewave_core::document::DocumentSession;

/// One-line summary: `#7 paper.pdf [Física] 3/10 (open)`.
pub fn describe(doc: &DocumentSession) -> String {
    let topic = doc
        .topic
        .as_deref()
        .map(|t| format!(" [{t}]"))
        .unwrap_or_default();
    let state = if doc.is_open { " (open)" } else { "" };
    format!(
        "#{} {}{} {}/{}{}",
        doc.id,
        doc.display_name(),
        topic.bright_cyan(),
        doc.current_page,
        doc.num_pages,
        state.green()
    )
}
