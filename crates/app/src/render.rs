//! Terminal rendering for messages and transient notices.

use services::store::ChatSnapshot;
use shared::chat::{Message, MessageKind, Role};

pub fn print_message(msg: &Message) {
    let avatar = match msg.role {
        Role::User => "👤",
        Role::Assistant => "🤖",
    };
    println!("\n{} [{}] {}", avatar, msg.time, msg.text);
    if msg.kind == MessageKind::Image && msg.image.is_some() {
        println!("   (image attached; `/image <file.png>` saves it to disk)");
    }
    for (i, src) in msg.sources.iter().enumerate() {
        println!("   [{}] {} <{}>", i + 1, src.title, src.url);
    }
}

/// Toast-style notice: transient in the original UI, a single line here.
pub fn toast(text: &str) {
    println!("✦ {}", text);
}

pub fn print_history(history: &[ChatSnapshot]) {
    if history.is_empty() {
        toast("No saved chats yet");
        return;
    }
    for (i, entry) in history.iter().enumerate() {
        println!("{:>3}. {}  ({})", i + 1, entry.title, entry.date);
    }
}

pub fn prompt_glyph(dark_mode: bool) -> &'static str {
    if dark_mode {
        "🌙 ❯ "
    } else {
        "☀️ ❯ "
    }
}
