//! Intellio terminal app.
//!
//! Thin presentation layer over the chat host: reads a line, sends it,
//! prints the reply. Slash commands cover session management, document
//! mode, export, and theming.

use anyhow::Result;
use chat_host::{ChatHost, HostError};
use services::store::{ChatSnapshot, ChatStore, SnapshotStore};
use shared::chat::MessageKind;
use shared::error::ApiError;
use std::io::{self, BufRead, Write};
use std::path::Path;

mod config;
mod export;
mod render;

/// Starter prompts offered while the log is empty.
const SUGGESTIONS: [&str; 4] = [
    "Explain quantum computing",
    "Write a Python function",
    "Generate image of a sunset",
    "Generate image of a futuristic city",
];

const HELP: &str = "\
/new            save the current chat and start fresh
/history        list saved chats
/load <n>       load saved chat n
/delete <n>     delete saved chat n
/export [file]  write the chat as text (default intellio-chat.txt)
/image <file>   save the latest generated image as PNG
/doc <file>     upload a PDF and enter document mode
/doc off        leave document mode
/theme          toggle dark mode
/voice          voice input (unavailable in the terminal)
/quit           save and exit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut settings = config::load_settings();
    let uid = settings
        .identity
        .user_id
        .clone()
        .unwrap_or_else(|| "local".to_string());
    let mut host = ChatHost::new(&settings.backend.base_url, &uid);
    let store = ChatStore::from_settings(
        &settings.store,
        settings.identity.access_token.as_deref(),
    );
    if store.is_none() {
        tracing::info!("history store not configured; chats will not be saved");
    }

    let mut history: Vec<ChatSnapshot> = match &store {
        Some(s) => match s.load_all(&uid).await {
            Ok(h) => h,
            Err(e) => {
                render::toast(&e.to_string());
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    println!("💬 Intellio · Chat · Image Generation · Search · Documents");
    if let Some(email) = &settings.identity.email {
        println!("👤 {}", email);
    }
    println!("Type /help for commands, or try:");
    for s in SUGGESTIONS {
        println!("  · {}", s);
    }

    let stdin = io::stdin();
    loop {
        print!(
            "\n{}",
            render::prompt_glyph(settings.user_profile.dark_mode)
        );
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            save_current(&store, &uid, &mut history, &host).await;
            break;
        }
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let cmd = parts.next().unwrap_or("");
            let arg = parts.next().unwrap_or("").trim();
            match cmd {
                "quit" | "exit" => {
                    // sign-out-adjacent clear: snapshot before leaving
                    save_current(&store, &uid, &mut history, &host).await;
                    break;
                }
                "new" => {
                    let saved = save_current(&store, &uid, &mut history, &host).await;
                    host.session_mut().reset();
                    render::toast(if saved {
                        "Chat cleared & saved!"
                    } else {
                        "Chat cleared!"
                    });
                }
                "history" => render::print_history(&history),
                "load" => match pick(&history, arg) {
                    Some(entry) => {
                        let title = entry.title.clone();
                        host.session_mut().restore(entry.messages.clone());
                        for msg in host.session().messages() {
                            render::print_message(msg);
                        }
                        render::toast(&format!("Loaded \"{}\"", title));
                    }
                    None => render::toast("No such saved chat"),
                },
                "delete" => match pick(&history, arg) {
                    Some(entry) => {
                        let id = entry.id;
                        match &store {
                            Some(s) => match s.delete(id).await {
                                Ok(()) => {
                                    history.retain(|c| c.id != id);
                                    render::toast("Deleted!");
                                }
                                Err(e) => render::toast(&e.to_string()),
                            },
                            None => render::toast("History store not configured"),
                        }
                    }
                    None => render::toast("No such saved chat"),
                },
                "export" => {
                    let path = if arg.is_empty() { "intellio-chat.txt" } else { arg };
                    match export::write_transcript(Path::new(path), host.session().messages())
                    {
                        Ok(()) => render::toast("Chat exported!"),
                        Err(e) => render::toast(&e.to_string()),
                    }
                }
                "image" => {
                    let path = if arg.is_empty() { "intellio-image.png" } else { arg };
                    let last_image = host
                        .session()
                        .messages()
                        .iter()
                        .rev()
                        .find(|m| m.kind == MessageKind::Image)
                        .and_then(|m| m.image.clone());
                    match last_image {
                        Some(uri) => match export::save_image(Path::new(path), &uri) {
                            Ok(()) => render::toast(&format!("Image saved to {}", path)),
                            Err(e) => render::toast(&e.to_string()),
                        },
                        None => render::toast("No generated image in this chat yet"),
                    }
                }
                "doc" if arg == "off" => {
                    host.session_mut().exit_document_mode();
                    render::toast("Document mode off");
                }
                "doc" => {
                    if arg.is_empty() {
                        render::toast("Usage: /doc <file.pdf> or /doc off");
                        continue;
                    }
                    upload_document(&mut host, arg).await;
                }
                "theme" => {
                    settings.user_profile.dark_mode = !settings.user_profile.dark_mode;
                    config::save_settings(&settings);
                    render::toast(if settings.user_profile.dark_mode {
                        "Dark mode on"
                    } else {
                        "Dark mode off"
                    });
                }
                "voice" => {
                    render::toast(&ApiError::UnsupportedCapability("voice input").to_string())
                }
                "help" => println!("{}", HELP),
                other => render::toast(&format!("Unknown command: /{}", other)),
            }
            continue;
        }

        match host.send(&line).await {
            Ok(reply) => render::print_message(&reply),
            Err(HostError::Busy) => render::toast("Hold on, still working on the last message"),
        }
    }
    Ok(())
}

/// Resolve a 1-based `/history` index.
fn pick<'a>(history: &'a [ChatSnapshot], arg: &str) -> Option<&'a ChatSnapshot> {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| history.get(i))
}

/// Snapshot the current log if it is non-empty and a store is configured.
/// Persistence failures degrade to a toast; the session is never lost.
async fn save_current(
    store: &Option<ChatStore>,
    uid: &str,
    history: &mut Vec<ChatSnapshot>,
    host: &ChatHost,
) -> bool {
    if host.session().is_empty() {
        return false;
    }
    let Some(store) = store else {
        return false;
    };
    match store.save(uid, host.session().messages()).await {
        Ok(snap) => {
            history.insert(0, snap);
            true
        }
        Err(e) => {
            render::toast(&e.to_string());
            false
        }
    }
}

async fn upload_document(host: &mut ChatHost, path_arg: &str) {
    let path = Path::new(path_arg);
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path_arg)
        .to_string();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            render::toast(&format!("Could not read {}: {}", path.display(), e));
            return;
        }
    };
    render::toast(&format!("Uploading {}...", file_name));
    match host.upload_document(bytes, &file_name).await {
        Ok(Ok(chunks)) => {
            render::toast(&format!("Uploaded {} ({} sections indexed)", file_name, chunks));
            // session now shows the document-mode confirmation
            if let Some(msg) = host.session().messages().last() {
                render::print_message(msg);
            }
        }
        Ok(Err(notice)) => render::toast(&notice),
        Err(HostError::Busy) => render::toast("Hold on, still working on the last message"),
    }
}
