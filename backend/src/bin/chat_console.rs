//! Terminal front end for a chat session
//!
//! Usage: `chat_console [faq|support] [help|support|issue]`
//!
//! Lines typed are sent to the session. `/open [mode]`, `/close` and `/quit`
//! drive the widget lifecycle by hand.

use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use waste_assistant_backend::assistant::{EngineKind, SupportMode};
use waste_assistant_backend::chat::{Sender, SessionHandle, TranscriptEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let kind: EngineKind = match args.next() {
        Some(arg) => arg.parse()?,
        None => EngineKind::Faq,
    };
    let mode: Option<SupportMode> = args.next().map(|arg| arg.parse()).transpose()?;

    let handle = SessionHandle::spawn("console".to_string(), kind, kind.default_surface());
    let mut events = handle.subscribe();

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                TranscriptEvent::Reset { title, messages, .. } => {
                    println!("=== {} ===", title);
                    for message in messages {
                        print_message(message.sender, &message.content);
                    }
                }
                TranscriptEvent::MessageAppended { message, .. } => {
                    // The user already sees what they typed
                    if message.sender == Sender::Bot {
                        print_message(message.sender, &message.content);
                    }
                }
                TranscriptEvent::Closed { .. } => println!("(chat closed)"),
                TranscriptEvent::Ended { .. } => break,
            }
        }
    });

    handle.open(mode).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == "/quit" {
            break;
        } else if trimmed == "/close" {
            handle.close().await?;
        } else if let Some(rest) = trimmed.strip_prefix("/open") {
            let rest = rest.trim();
            let mode = if rest.is_empty() {
                None
            } else {
                Some(rest.parse()?)
            };
            handle.open(mode).await?;
        } else {
            handle.send(line).await?;
        }
    }

    handle.shutdown().await;
    let _ = printer.await;
    Ok(())
}

fn print_message(sender: Sender, content: &str) {
    let label = match sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    println!("[{}] {}", label, content);
}
