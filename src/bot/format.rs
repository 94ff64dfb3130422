//! Reply and export text formatting.
//!
//! Chat-facing strings are HTML-escaped here; the export document is plain
//! text and goes out verbatim.

use crate::infrastructure::entities::Dream;
use crate::locales::{self, Lang};
use chrono::NaiveDate;
use teloxide::utils::html;

const EXPORT_RULE_HEAVY: &str = "========================================";
const EXPORT_RULE_LIGHT: &str = "----------------------------------------";

/// One list/search result line: `#id date | title [tags]`.
pub fn dream_line(dream: &Dream) -> String {
    let tags = if dream.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", html::escape(&dream.tags))
    };
    format!(
        "<b>#{}</b> {} | {}{}",
        dream.id,
        dream.dream_date,
        html::escape(&dream.title),
        tags
    )
}

/// Full record for the `<pre>` detail view.
pub fn dream_full(dream: &Dream, lang: Lang) -> String {
    let t = |key: &str| locales::text(lang, key);
    let lines = [
        format!("{}: {}", t("view.field_id"), dream.id),
        format!("{}: {}", t("view.field_date"), dream.dream_date),
        format!("{}: {}", t("export.field_title"), html::escape(&dream.title)),
        String::new(),
        format!("{}:", t("export.field_description")),
        if dream.description.is_empty() {
            t("view.empty")
        } else {
            html::escape(&dream.description)
        },
        String::new(),
        format!(
            "{}: {}",
            t("export.field_tags"),
            if dream.tags.is_empty() {
                t("view.none")
            } else {
                html::escape(&dream.tags)
            }
        ),
        String::new(),
        format!("{}:", t("export.field_notes")),
        if dream.notes.is_empty() {
            t("view.empty")
        } else {
            html::escape(&dream.notes)
        },
    ];
    lines.join("\n")
}

/// The whole diary as one plain-text document.
pub fn export_document(dreams: &[Dream], lang: Lang, today: NaiveDate) -> String {
    let mut lines = vec![
        locales::text_with(
            lang,
            "export.header",
            &[
                ("date", today.to_string()),
                ("count", dreams.len().to_string()),
            ],
        ),
        String::new(),
    ];
    for (index, dream) in dreams.iter().enumerate() {
        lines.push(export_block(dream, index + 1, lang));
    }
    lines.join("\n")
}

fn export_block(dream: &Dream, index: usize, lang: Lang) -> String {
    let t = |key: &str| locales::text(lang, key);
    let mut lines = vec![
        EXPORT_RULE_HEAVY.to_owned(),
        locales::text_with(
            lang,
            "export.dream_header",
            &[
                ("index", index.to_string()),
                ("date", dream.dream_date.to_string()),
            ],
        ),
        EXPORT_RULE_LIGHT.to_owned(),
        format!("{}: {}", t("export.field_title"), dream.title),
    ];

    if !dream.description.is_empty() {
        lines.push(format!(
            "\n{}:\n{}",
            t("export.field_description"),
            dream.description
        ));
    }
    if !dream.tags.is_empty() {
        lines.push(format!("\n{}: {}", t("export.field_tags"), dream.tags));
    }
    if !dream.notes.is_empty() {
        lines.push(format!("\n{}:\n{}", t("export.field_notes"), dream.notes));
    }

    lines.push(String::new());
    lines.join("\n")
}
