use std::fmt::Write;

use crate::sync::SyncStore;

/// Plain-text view of the store: the open section is expanded with its
/// items, every other section shows only its header.
pub fn render_store(store: &SyncStore) -> String {
    let mut out = String::from("Study Tracker\n");

    if store.is_loading() {
        out.push_str("Waking up server...\n");
    } else if store.sections().is_empty() {
        out.push_str("No sections yet.\n");
    }

    for section in store.sections() {
        let open = store.is_open(&section.id);
        let (done, total) = section.completion_ratio();
        let marker = if open { "▲" } else { "▼" };
        let _ = writeln!(
            out,
            "{} {} [{}/{}]  ({})",
            marker, section.title, done, total, section.id
        );
        if !open {
            continue;
        }

        for item in &section.items {
            let check = if item.completed { "x" } else { " " };
            let _ = writeln!(out, "    [{}] {}  ({})", check, item.text, item.id);
        }
        let draft = store.draft(&section.id);
        if !draft.trim().is_empty() {
            let _ = writeln!(out, "    draft: {} line(s) pending", draft.lines().count());
        }
    }

    if let Some(at) = store.last_synced() {
        let _ = writeln!(out, "Last synced {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    out
}
