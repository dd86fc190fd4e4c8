//! Renders a single article page from its [`Record`] and converted body.

use crate::category::Labels;
use crate::metadata::Record;
use crate::template::{Template, Values};

/// Renders tags as `<span class="tag">…</span>` badges separated by single
/// spaces. No tags yields an empty string.
pub fn tags_html(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Substitutes the record's fields and the converted `content` into
/// `template`.
pub fn render(
    template: &Template,
    labels: &Labels,
    record: &Record,
    content: &str,
) -> String {
    let tags_html = tags_html(&record.tags);
    template.render(&Values {
        title: &record.title,
        date: &record.date,
        category_label: labels.label(&record.category),
        tags_html: &tags_html,
        content,
    })
}
