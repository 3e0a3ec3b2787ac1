// Plain text export of every saved draft.
//
// Format
// - A title line and a blank line, then per branch a "=== Branch: <name> ===" header
//   followed by its versions newest first, each as "Version <n> (<timestamp>):", the text,
//   and a blank line.

use crate::modules::drafts::use_cases::manage_drafts::view::BranchDrafts;
use crate::shared::core::primitives::EpochMillis;
use chrono::TimeZone;
use std::fmt::Display;

pub const EXPORT_FILE_NAME: &str = "bitbucket_pr_drafts.txt";
pub const EXPORT_TITLE: &str = "Bitbucket PR Drafts Export";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

pub fn format_timestamp<Tz>(timestamp: EpochMillis, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(timestamp).single() {
        Some(at) => at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => timestamp.to_string(),
    }
}

pub fn build_export<Tz>(branches: &[BranchDrafts], tz: &Tz) -> ExportFile
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut content = format!("{EXPORT_TITLE}\n\n");
    for b in branches {
        content.push_str(&format!("=== Branch: {} ===\n", b.branch));
        let count = b.history.len();
        for (position, (_, version)) in b.history.newest_first().enumerate() {
            content.push_str(&format!(
                "Version {} ({}):\n{}\n\n",
                count - position,
                format_timestamp(version.timestamp, tz),
                version.text
            ));
        }
    }
    ExportFile {
        file_name: EXPORT_FILE_NAME.to_string(),
        content,
    }
}
