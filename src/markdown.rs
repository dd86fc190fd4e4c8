//! Converts article sources to HTML: strips any front matter, then renders
//! the Markdown body with [`crate::htmlrenderer`].
//!
//! A paragraph consisting of nothing but `[TOC]` is replaced with a table of
//! contents linking to every heading in the document. Headings only get `id`
//! anchors when such a marker is present.

use crate::htmlrenderer::push_html;
use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};
use std::collections::HashSet;
use std::ops::Range;

const FENCE: &str = "---";
const TOC_MARKER: &str = "[TOC]";

/// Converts a raw article source into its HTML body.
pub fn convert(raw: &str) -> String {
    to_html(strip_front_matter(raw))
}

/// Returns the body of `input` with a leading front matter block removed.
///
/// The block must start at the very beginning of the input with `---` and
/// ends at the next `---`; everything through that closing fence is dropped
/// and the remainder is trimmed. If there is no closing fence, or the input
/// doesn't start with a fence, `input` is returned unchanged.
pub fn strip_front_matter(input: &str) -> &str {
    if !input.starts_with(FENCE) {
        return input;
    }
    match input[FENCE.len()..].find(FENCE) {
        None => input,
        Some(offset) => input[FENCE.len() + offset + FENCE.len()..].trim(),
    }
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Converts a Markdown body to HTML. This never fails: any input renders to
/// something.
pub fn to_html(markdown: &str) -> String {
    let mut events: Vec<Event> =
        Parser::new_ext(markdown, options()).collect();

    let markers = toc_markers(&events);
    let heading_ids = match markers.is_empty() {
        true => Vec::new(),
        false => {
            let headings = headings(&events);
            let toc = toc_html(&headings);
            // Splice back to front so earlier ranges stay valid.
            for range in markers.into_iter().rev() {
                let toc = Event::Html(CowStr::from(toc.clone()));
                drop(events.splice(range, Some(toc)));
            }
            headings.into_iter().map(|heading| heading.id).collect()
        }
    };

    let mut html = String::new();
    // Writing into a `String` can't fail.
    let _ = push_html(&mut html, events.into_iter(), &heading_ids);
    html
}

/// Finds the event ranges of paragraphs whose only content is the TOC marker.
fn toc_markers(events: &[Event]) -> Vec<Range<usize>> {
    let mut markers = Vec::new();
    let mut start = None;
    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Paragraph) => start = Some(i),
            Event::End(Tag::Paragraph) => {
                if let Some(start) = start.take() {
                    let text = paragraph_text(&events[start + 1..i]);
                    if text.as_deref() == Some(TOC_MARKER) {
                        markers.push(start..i + 1);
                    }
                }
            }
            _ => {}
        }
    }
    markers
}

/// Returns the trimmed text of a paragraph made only of text events, or
/// `None` if the paragraph contains anything else.
fn paragraph_text(events: &[Event]) -> Option<String> {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(s) => text.push_str(s),
            _ => return None,
        }
    }
    Some(text.trim().to_owned())
}

#[derive(Debug, PartialEq)]
struct Heading {
    level: u32,
    text: String,
    id: String,
}

/// Collects the document's headings and assigns each a unique anchor.
fn headings(events: &[Event]) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current: Option<(u32, String)> = None;
    for event in events {
        match event {
            Event::Start(Tag::Heading(level)) => {
                current = Some((*level, String::new()))
            }
            Event::Text(s) | Event::Code(s) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(s);
                }
            }
            Event::End(Tag::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let id = unique_id(&text, &mut seen);
                    headings.push(Heading { level, text, id });
                }
            }
            _ => {}
        }
    }
    headings
}

/// Slugifies `text`, suffixing `_1`, `_2`, ... until the id hasn't been used.
fn unique_id(text: &str, seen: &mut HashSet<String>) -> String {
    let base = match slug::slugify(text) {
        slug if slug.is_empty() => String::from("section"),
        slug => slug,
    };
    let mut id = base.clone();
    let mut n = 0;
    while seen.contains(&id) {
        n += 1;
        id = format!("{}_{}", base, n);
    }
    seen.insert(id.clone());
    id
}

/// Renders headings as nested lists. A heading deeper than its predecessor
/// opens a sub-list. A shallower one closes every sub-list whose parent is at
/// its level or deeper, then takes the place of the list it lands in, so a
/// document that starts with a deep heading still nests later ones.
fn toc_html(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::from("<div class=\"toc\"></div>\n");
    }

    let mut out = String::from("<div class=\"toc\">\n<ul>\n");
    // The level of each open list, outermost first. Never empty.
    let mut levels = vec![headings[0].level];
    for (i, heading) in headings.iter().enumerate() {
        if i > 0 {
            let open = levels.last().copied().unwrap_or(heading.level);
            if heading.level > open {
                out.push_str("\n<ul>\n");
                levels.push(heading.level);
            } else {
                out.push_str("</li>\n");
                while levels.len() > 1
                    && heading.level <= levels[levels.len() - 2]
                {
                    levels.pop();
                    out.push_str("</ul>\n</li>\n");
                }
                if let Some(level) = levels.last_mut() {
                    *level = heading.level;
                }
            }
        }
        out.push_str("<li><a href=\"#");
        let _ = escape_html(&mut out, &heading.id);
        out.push_str("\">");
        let _ = escape_html(&mut out, &heading.text);
        out.push_str("</a>");
    }
    out.push_str("</li>\n");
    for _ in 1..levels.len() {
        out.push_str("</ul>\n</li>\n");
    }
    out.push_str("</ul>\n</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_front_matter() {
        struct TestCase {
            name: &'static str,
            input: &'static str,
            wanted: &'static str,
        }

        for tc in &[
            TestCase {
                name: "yaml-block",
                input: "---\ntitle: Intro\n---\n\n# Hello\n",
                wanted: "# Hello",
            },
            TestCase {
                name: "no-front-matter",
                input: "# Hello\n---\nWorld\n",
                wanted: "# Hello\n---\nWorld\n",
            },
            TestCase {
                name: "unterminated",
                input: "---\ntitle: Intro\n# Hello\n",
                wanted: "---\ntitle: Intro\n# Hello\n",
            },
            TestCase {
                name: "empty-block",
                input: "------\nbody",
                wanted: "body",
            },
            TestCase {
                name: "later-rules-kept",
                input: "---\na: 1\n---\nintro\n\n---\n\noutro",
                wanted: "intro\n\n---\n\noutro",
            },
        ] {
            assert_eq!(
                tc.wanted,
                strip_front_matter(tc.input),
                "case `{}`",
                tc.name
            );
        }
    }

    #[test]
    fn test_strip_front_matter_is_idempotent_on_bodies() {
        let body = "# Hello\n\nWorld";
        assert_eq!(body, strip_front_matter(strip_front_matter(body)));
    }

    #[test]
    fn test_convert() {
        assert_eq!(
            "<h1>Hello</h1>\n<p>World</p>\n",
            convert("---\ntitle: x\n---\n# Hello\nWorld")
        );
    }

    #[test]
    fn test_unusual_input_renders() {
        for input in &[
            "",
            "[",
            "```",
            "| a |\n|",
            "<div>",
            "***\n___",
            "[^missing]",
            "\u{0}",
        ] {
            let _ = convert(input);
        }
    }

    #[test]
    fn test_toc() {
        struct TestCase {
            name: &'static str,
            markdown: &'static str,
            wanted: &'static str,
        }

        for tc in &[
            TestCase {
                name: "nested-with-duplicates",
                markdown: "[TOC]\n\n# Intro\n\n## Setup\n\n## Setup\n\n\
                           # Wrap `up`\n",
                wanted: concat!(
                    "<div class=\"toc\">\n<ul>\n",
                    "<li><a href=\"#intro\">Intro</a>\n<ul>\n",
                    "<li><a href=\"#setup\">Setup</a></li>\n",
                    "<li><a href=\"#setup_1\">Setup</a></li>\n",
                    "</ul>\n</li>\n",
                    "<li><a href=\"#wrap-up\">Wrap up</a></li>\n",
                    "</ul>\n</div>\n",
                    "<h1 id=\"intro\">Intro</h1>\n",
                    "<h2 id=\"setup\">Setup</h2>\n",
                    "<h2 id=\"setup_1\">Setup</h2>\n",
                    "<h1 id=\"wrap-up\">Wrap <code>up</code></h1>\n",
                ),
            },
            TestCase {
                name: "deep-first-heading",
                markdown: "[TOC]\n\n### a\n# b\n## c\n",
                wanted: concat!(
                    "<div class=\"toc\">\n<ul>\n",
                    "<li><a href=\"#a\">a</a></li>\n",
                    "<li><a href=\"#b\">b</a>\n<ul>\n",
                    "<li><a href=\"#c\">c</a></li>\n",
                    "</ul>\n</li>\n",
                    "</ul>\n</div>\n",
                    "<h3 id=\"a\">a</h3>\n",
                    "<h1 id=\"b\">b</h1>\n",
                    "<h2 id=\"c\">c</h2>\n",
                ),
            },
            TestCase {
                name: "shallower-heading-stays-under-parent",
                markdown: "[TOC]\n\n# a\n### b\n## c\n",
                wanted: concat!(
                    "<div class=\"toc\">\n<ul>\n",
                    "<li><a href=\"#a\">a</a>\n<ul>\n",
                    "<li><a href=\"#b\">b</a></li>\n",
                    "<li><a href=\"#c\">c</a></li>\n",
                    "</ul>\n</li>\n",
                    "</ul>\n</div>\n",
                    "<h1 id=\"a\">a</h1>\n",
                    "<h3 id=\"b\">b</h3>\n",
                    "<h2 id=\"c\">c</h2>\n",
                ),
            },
        ] {
            assert_eq!(tc.wanted, to_html(tc.markdown), "case `{}`", tc.name);
        }
    }

    #[test]
    fn test_toc_marker_must_stand_alone() {
        let html = to_html("See [TOC] here.\n\n# Intro\n");
        assert!(!html.contains("class=\"toc\""), "{}", html);
        assert!(html.contains("<h1>Intro</h1>"), "{}", html);
    }

    #[test]
    fn test_toc_without_headings() {
        assert_eq!(
            "<div class=\"toc\"></div>\n<p>text</p>\n",
            to_html("[TOC]\n\ntext")
        );
    }
}
