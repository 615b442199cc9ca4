//! Human-readable session digest.

use crate::record::SessionRecord;

const ITEM_MARKER: &str = "- ";

/// Digest blocks in fixed order; every header is present even when its body is empty.
pub fn render(record: &SessionRecord) -> String {
    let technical = &record.technical_content;
    let technical_items: Vec<String> = technical
        .modified_files
        .iter()
        .map(|file| format!("modified {file}"))
        .chain(technical.commands_run.iter().map(|cmd| format!("ran `{cmd}`")))
        .chain(technical.build_results.iter().map(|res| format!("build: {res}")))
        .chain(technical.error_logs.iter().map(|err| format!("error: {err}")))
        .collect();

    let next_steps: Vec<&String> = record
        .progress_tracking
        .next_actions
        .iter()
        .chain(&record.future_planning.next_steps)
        .collect();

    let blocks = [
        format!("🎯 Overview: {}", record.overview),
        block("🛠️ Technical Changes:", &technical_items),
        block("📝 Key Decisions:", &record.decision_log),
        block("✅ Completed:", &record.progress_tracking.completed),
        block("🔜 Next Steps:", &next_steps),
        block("❓ Open Questions:", &record.future_planning.open_questions),
    ];
    blocks.join("\n\n")
}

/// Digest prefixed with the continuation banner shown when resuming
pub fn render_continuation(session_name: &str, session_date: &str, record: &SessionRecord) -> String {
    format!(
        "🔄 Continuing from previous session...\n\n📅 Last Session: {session_name} ({session_date})\n\n{}",
        render(record)
    )
}

fn block<T: AsRef<str>>(header: &str, items: &[T]) -> String {
    let mut lines = vec![header.to_string()];
    lines.extend(
        items
            .iter()
            .map(|item| format!("{ITEM_MARKER}{}", item.as_ref())),
    );
    lines.join("\n")
}
