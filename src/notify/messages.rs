//! Message templates (Telegram legacy Markdown).

use std::fmt::Display;

use crate::models::{Item, Snapshot};

const UNTITLED: &str = "Untitled Quest";

/// Escape characters that legacy Markdown would interpret.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Make a URL safe inside a Markdown link target.
fn link_target(url: &str) -> String {
    url.replace(')', "%29")
}

/// Announcement of one new quest.
///
/// `fallback_url` is used when the item carries no link of its own.
pub fn new_item(source: &str, item: &Item, fallback_url: &str) -> String {
    let title = if item.title.trim().is_empty() {
        UNTITLED
    } else {
        item.title.as_str()
    };
    let link = if item.url.trim().is_empty() {
        fallback_url
    } else {
        item.url.as_str()
    };

    format!(
        "🚀 *New Quest Dropped!*\n\n*Community:* {}\n*Title:* {}\n[View Quest 🔗]({})",
        escape_markdown(source),
        escape_markdown(title),
        link_target(link)
    )
}

/// Daily aggregate of quest counts per source.
pub fn summary(snapshot: &Snapshot, checked_at: impl Display) -> String {
    let lines: Vec<String> = snapshot
        .iter()
        .map(|(source, items)| format!("- {} → {} quests", escape_markdown(source), items.len()))
        .collect();

    format!(
        "🗓 *Daily Quest Summary*\nTotal Quests: {}\n{}\n⏰ Checked at {}",
        snapshot.total_items(),
        lines.join("\n"),
        checked_at
    )
}

/// Error report.
pub fn error(message: &str) -> String {
    format!("⚠️ *Bot Error:* {}", escape_markdown(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_message() {
        let item = Item::new("2", "Quest B", "https://zealy.io/cw/alpha/questboard");
        let message = new_item("alpha", &item, "unused");

        assert_eq!(
            message,
            "🚀 *New Quest Dropped!*\n\n*Community:* alpha\n*Title:* Quest B\n\
             [View Quest 🔗](https://zealy.io/cw/alpha/questboard)"
        );
    }

    #[test]
    fn test_new_item_fallbacks() {
        let item = Item {
            id: None,
            title: "  ".to_string(),
            url: String::new(),
        };
        let message = new_item("alpha", &item, "https://zealy.io/cw/alpha/questboard");

        assert!(message.contains("*Title:* Untitled Quest"));
        assert!(message.contains("(https://zealy.io/cw/alpha/questboard)"));
    }

    #[test]
    fn test_new_item_escapes_markup() {
        let item = Item::new("1", "Earn *2x* on my_pool", "u");
        let message = new_item("alpha", &item, "u");

        assert!(message.contains(r"*Title:* Earn \*2x\* on my\_pool"));
    }

    #[test]
    fn test_new_item_link_keeps_markup_closed() {
        let item = Item::new("1", "Quest", "https://zealy.io/q/drop_(1)");
        let message = new_item("alpha", &item, "u");

        assert!(message.ends_with("[View Quest 🔗](https://zealy.io/q/drop_(1%29)"));
    }

    #[test]
    fn test_summary_message() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "alpha",
            vec![Item::new("1", "x", "u"), Item::new("2", "y", "u")],
        );
        snapshot.insert("beta", Vec::new());

        let message = summary(&snapshot, "07:00");

        assert!(message.starts_with("🗓 *Daily Quest Summary*\n"));
        assert!(message.contains("Total Quests: 2\n"));
        assert!(message.contains("alpha → 2 quests"));
        assert!(message.contains("beta → 0 quests"));
        assert!(message.ends_with("⏰ Checked at 07:00"));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error("disk_full"),
            r"⚠️ *Bot Error:* disk\_full"
        );
    }
}
