//! Interactive reader: the viewer and library UI in one prompt.
//!
//! Page changes typed at the prompt and gesture-driven ones go through the
//! same synchronizer, so they share its single in-flight guard.

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use pagewave_application::{
    FrameSampler, GestureNavigator, NavigatorSettings, Notice, NoticeLevel, NoticeSender,
    SessionSynchronizer,
};
use pagewave_core::PagewaveError;
use pagewave_core::config::PagewaveConfig;
use pagewave_core::document::{DocumentId, DocumentSession, PageRequest};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::commands::describe;
use crate::wiring;

pub struct ReadOptions {
    pub id: u64,
    pub page: Option<u32>,
    pub frames: Option<PathBuf>,
    pub gestures: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Prev,
    Goto(u32),
    Topic(String),
    Gestures,
    Close,
    Open(u64),
    Delete(u64),
    Refresh,
    List(Option<String>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let id = |what: &str| {
            rest.parse::<u64>()
                .map_err(|_| format!("'{what}' needs a document id"))
        };

        match head {
            "n" | "next" => Ok(Command::Next),
            "p" | "prev" => Ok(Command::Prev),
            "t" | "topic" if !rest.is_empty() => Ok(Command::Topic(rest.to_string())),
            "t" | "topic" => Err("'topic' needs a label".to_string()),
            "g" | "gestures" => Ok(Command::Gestures),
            "c" | "close" => Ok(Command::Close),
            "o" | "open" => id("open").map(Command::Open),
            "d" | "delete" => id("delete").map(Command::Delete),
            "r" | "refresh" => Ok(Command::Refresh),
            "l" | "list" => Ok(Command::List((!rest.is_empty()).then(|| rest.to_string()))),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => other
                .parse::<u32>()
                .map(Command::Goto)
                .map_err(|_| format!("Unknown command '{other}' (h for help)")),
        }
    }
}

pub async fn run(config: &PagewaveConfig, options: ReadOptions) -> Result<()> {
    let (notices, mut notice_rx) = NoticeSender::channel();
    let sync = Arc::new(
        SessionSynchronizer::new(wiring::session_service(config)?).with_notices(notices.clone()),
    );
    let sampler = Arc::new(FrameSampler::new(
        wiring::camera(config, options.frames),
        config.gestures.sample_period(),
    ));
    let navigator = GestureNavigator::new(
        sampler,
        wiring::classifier(&config.gestures)?,
        Arc::clone(&sync),
        NavigatorSettings::from_config(&config.gestures),
    )
    .with_notices(notices);

    let mut selection = sync.subscribe();
    sync.open(DocumentId(options.id), options.page).await?;
    if options.gestures {
        // A refused camera is reported through the notice channel.
        let _ = navigator.enable().await;
    }

    print_help();
    let mut lines = spawn_prompt();

    loop {
        tokio::select! {
            Some(notice) = notice_rx.recv() => print_notice(&notice),
            changed = selection.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = selection.borrow_and_update().clone();
                print_selection(current.as_ref(), navigator.is_enabled());
            }
            line = lines.recv() => {
                let Some(line) = line else { break };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(command, &sync, &navigator).await,
                    Err(message) => println!("{}", message.bright_black()),
                }
            }
        }
    }

    navigator.disable().await;
    if sync.current().is_some()
        && let Err(e) = sync.close().await
    {
        tracing::warn!(error = %e, "failed to close document on exit");
    }
    while let Ok(notice) = notice_rx.try_recv() {
        print_notice(&notice);
    }
    Ok(())
}

async fn execute(command: Command, sync: &SessionSynchronizer, navigator: &GestureNavigator) {
    // Session failures reach the user as notices; only gated outcomes are
    // printed here.
    let result = match command {
        Command::Next => sync.change_page(PageRequest::Next).await.map(|_| ()),
        Command::Prev => sync.change_page(PageRequest::Prev).await.map(|_| ()),
        Command::Goto(page) => sync.change_page(PageRequest::Set(page)).await.map(|_| ()),
        Command::Topic(topic) => sync.classify(&topic).await.map(|_| ()),
        Command::Gestures => match navigator.toggle().await {
            Ok(true) => {
                println!("{}", format!("Gestures on ({})", navigator.classifier_name()).green());
                Ok(())
            }
            Ok(false) => {
                println!("{}", "Gestures off".yellow());
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Close => match sync.close().await {
            Ok(_) => {
                navigator.disable().await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Open(id) => sync.open(DocumentId(id), None).await.map(|_| ()),
        Command::Delete(id) => {
            let result = sync.delete(DocumentId(id)).await;
            if sync.current().is_none() {
                navigator.disable().await;
            }
            result
        }
        Command::Refresh => sync.refresh().await.map(|doc| println!("{}", describe(&doc))),
        Command::List(query) => sync.list(query.as_deref()).await.map(|docs| {
            for doc in &docs {
                println!("{}", describe(doc));
            }
        }),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    match result {
        Err(PagewaveError::NoSelection) => println!("{}", "No document open (o <id>)".bright_black()),
        Err(PagewaveError::RequestInFlight) => {
            println!("{}", "Page change still in progress".bright_black())
        }
        Err(e) if e.is_gated() => tracing::debug!(error = %e, "request skipped"),
        Err(e) => tracing::debug!(error = %e, "request failed"),
        Ok(()) => {}
    }
}

/// Reads prompt lines on a dedicated thread; the channel closes on EOF or Ctrl-C.
fn spawn_prompt() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                eprintln!("{}", format!("Failed to start prompt: {e}").red());
                return;
            }
        };

        loop {
            match editor.readline("pagewave> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(trimmed);
                    if tx.send(trimmed.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("{}", format!("Prompt error: {e}").red());
                    break;
                }
            }
        }
    });

    rx
}

fn print_selection(selection: Option<&DocumentSession>, gestures: bool) {
    match selection {
        Some(doc) => {
            let mode = if gestures { " [gestures]" } else { "" };
            println!(
                "{} {}{}",
                format!("Page {}/{}", doc.current_page, doc.num_pages).bold(),
                doc.display_name(),
                mode.bright_magenta()
            );
        }
        None => println!("{}", "No document open".bright_black()),
    }
}

fn print_notice(notice: &Notice) {
    let time = notice.at.with_timezone(&Local).format("%H:%M:%S");
    let message = match notice.level {
        NoticeLevel::Success => notice.message.green(),
        NoticeLevel::Warning => notice.message.yellow(),
        NoticeLevel::Error => notice.message.red(),
    };
    println!("{} {}", format!("[{time}]").bright_black(), message);
}

fn print_help() {
    println!("{}", "=== Pagewave reader ===".bright_magenta().bold());
    println!(
        "{}",
        "n/p next/prev · <number> go to page · t <topic> classify · g toggle gestures".bright_black()
    );
    println!(
        "{}",
        "c close · o <id> open · d <id> delete · l [query] list · r refresh · q quit".bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!("n".parse::<Command>(), Ok(Command::Next));
        assert_eq!(" prev ".parse::<Command>(), Ok(Command::Prev));
        assert_eq!("12".parse::<Command>(), Ok(Command::Goto(12)));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            "t Ciencias sociales".parse::<Command>(),
            Ok(Command::Topic("Ciencias sociales".to_string()))
        );
        assert_eq!("o 7".parse::<Command>(), Ok(Command::Open(7)));
        assert_eq!("d 3".parse::<Command>(), Ok(Command::Delete(3)));
        assert_eq!("l".parse::<Command>(), Ok(Command::List(None)));
        assert_eq!("l fis".parse::<Command>(), Ok(Command::List(Some("fis".to_string()))));
    }

    #[test]
    fn test_parse_errors() {
        assert!("t".parse::<Command>().is_err());
        assert!("o seven".parse::<Command>().is_err());
        assert!("-1".parse::<Command>().is_err());
        assert!("jump".parse::<Command>().unwrap_err().contains("jump"));
    }
}
