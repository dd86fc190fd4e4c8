//! Implements a custom [`push_html`] for article bodies. It differs from
//! [`pulldown_cmark::html::push_html`] in a few ways that the article pages
//! rely on:
//!
//! * soft line breaks inside paragraphs become `<br />` tags,
//! * headings can carry `id` anchors for the table of contents,
//! * fenced code blocks are tagged `language-*` for the client-side
//!   highlighter.

use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use pulldown_cmark::{Alignment, CodeBlockKind, CowStr, Event, LinkType, Tag};
use std::fmt::{self, Display};
use std::io;

struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

struct EscapeHref<'a>(&'a str);

impl Display for EscapeHref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

struct EscapeHtml<'a>(&'a str);

impl Display for EscapeHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

enum TableState {
    Head,
    Body,
}

/// Renders markdown [`Event`]s into HTML. This is largely modeled after
/// [`pulldown_cmark`]'s private `HtmlWriter` struct.
struct HtmlRenderer<'h> {
    table_alignments: Vec<Alignment>,
    table_state: TableState,
    table_cell_index: usize,

    /// Anchors for the document's headings, in document order. Empty when
    /// headings should render without ids.
    heading_ids: &'h [String],
    heading_index: usize,

    /// Nesting depth inside an image. Everything inside an image is its alt
    /// text, so only text is written while this is non-zero.
    image_depth: usize,
}

impl<'a> HtmlRenderer<'_> {
    fn on_event<W: StrWrite>(
        &mut self,
        w: &mut W,
        event: Event<'a>,
    ) -> io::Result<()> {
        if self.image_depth > 0 {
            return self.on_alt_text_event(w, event);
        }
        match event {
            Event::Start(tag) => self.on_start(w, tag),
            Event::End(tag) => self.on_end(w, tag),
            Event::Code(code) => self.on_code(w, code),
            Event::FootnoteReference(name) => write!(
                w,
                r##"<sup class="footnote-reference"><a href="#fn-{}">{}</a></sup>"##,
                EscapeHref(&name),
                EscapeHtml(&name),
            ),
            Event::HardBreak => self.on_hard_break(w),
            Event::Html(html) => self.on_html(w, html),
            Event::Rule => self.on_rule(w),
            Event::SoftBreak => self.on_soft_break(w),
            Event::TaskListMarker(checked) => {
                self.on_task_list_marker(w, checked)
            }
            Event::Text(text) => self.on_text(w, text),
        }
    }

    fn on_alt_text_event<W: StrWrite>(
        &mut self,
        w: &mut W,
        event: Event<'a>,
    ) -> io::Result<()> {
        match event {
            Event::Start(_) => {
                self.image_depth += 1;
                Ok(())
            }
            Event::End(tag) => {
                self.image_depth -= 1;
                match (self.image_depth, tag) {
                    (0, Tag::Image(_, _, title)) if !title.is_empty() => {
                        write!(w, r#"" title="{}" />"#, EscapeHtml(&title))
                    }
                    (0, _) => w.write_str(r#"" />"#),
                    _ => Ok(()),
                }
            }
            Event::Text(text) | Event::Code(text) | Event::Html(text) => {
                escape_html(w, &text)
            }
            Event::SoftBreak | Event::HardBreak => w.write_str(" "),
            _ => Ok(()),
        }
    }
}

impl<'a, 'h> HtmlRenderer<'h> {
    fn new(heading_ids: &'h [String]) -> Self {
        HtmlRenderer {
            table_alignments: Vec::default(),
            table_state: TableState::Head,
            table_cell_index: usize::default(),
            heading_ids,
            heading_index: usize::default(),
            image_depth: usize::default(),
        }
    }

    fn on_start<W: StrWrite>(
        &mut self,
        w: &mut W,
        tag: Tag<'a>,
    ) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("<blockquote>\n"),
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                match info.split_whitespace().next() {
                    Some(lang) => write!(
                        w,
                        r#"<pre><code class="language-{}">"#,
                        EscapeHtml(lang)
                    ),
                    None => w.write_str("<pre><code>"),
                }
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => {
                w.write_str("<pre><code>")
            }
            Tag::Emphasis => w.write_str("<em>"),
            Tag::FootnoteDefinition(name) => write!(
                w,
                r#"<div class="footnote-definition" id="fn-{}"><sup class="footnote-definition-label">{}</sup>"#,
                EscapeHtml(&name),
                EscapeHtml(&name),
            ),
            Tag::Heading(level) => {
                let id = self.heading_ids.get(self.heading_index);
                self.heading_index += 1;
                match id {
                    Some(id) => {
                        write!(w, r#"<h{} id="{}">"#, level, EscapeHtml(id))
                    }
                    None => write!(w, "<h{}>", level),
                }
            }
            Tag::Image(_link_type, dest, _title) => {
                self.image_depth = 1;
                write!(w, r#"<img src="{}" alt=""#, EscapeHref(&dest))
            }
            Tag::Item => w.write_str("<li>"),
            Tag::Link(link_type, dest, title) => {
                let scheme = match link_type {
                    LinkType::Email => "mailto:",
                    _ => "",
                };
                match title.is_empty() {
                    true => write!(
                        w,
                        r#"<a href="{}{}">"#,
                        scheme,
                        EscapeHref(&dest)
                    ),
                    false => write!(
                        w,
                        r#"<a href="{}{}" title="{}">"#,
                        scheme,
                        EscapeHref(&dest),
                        EscapeHtml(&title),
                    ),
                }
            }
            Tag::List(None) => w.write_str("<ul>\n"),
            Tag::List(Some(1)) => w.write_str("<ol>\n"),
            Tag::List(Some(start)) => write!(w, "<ol start=\"{}\">\n", start),
            Tag::Paragraph => w.write_str("<p>"),
            Tag::Strikethrough => w.write_str("<del>"),
            Tag::Strong => w.write_str("<strong>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                w.write_str("<table>")
            }
            Tag::TableHead => {
                self.table_state = TableState::Head;
                self.table_cell_index = 0;
                w.write_str("<thead><tr>")
            }
            Tag::TableRow => {
                self.table_cell_index = 0;
                w.write_str("<tr>")
            }
            Tag::TableCell => write!(
                w,
                "<{}{}>",
                match self.table_state {
                    TableState::Head => "th",
                    TableState::Body => "td",
                },
                match self.table_alignments.get(self.table_cell_index) {
                    Some(Alignment::Left) => r#" align="left""#,
                    Some(Alignment::Right) => r#" align="right""#,
                    Some(Alignment::Center) => r#" align="center""#,
                    _ => "",
                }
            ),
        }
    }

    fn on_end<W: StrWrite>(&mut self, w: &mut W, tag: Tag) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("</blockquote>\n"),
            Tag::CodeBlock(_) => w.write_str("</code></pre>\n"),
            Tag::Emphasis => w.write_str("</em>"),
            Tag::FootnoteDefinition(_) => w.write_str("</div>\n"),
            Tag::Heading(level) => write!(w, "</h{}>\n", level),
            Tag::Image(_, _, _) => Ok(()), // closed by `on_alt_text_event`
            Tag::Item => w.write_str("</li>\n"),
            Tag::Link(_, _, _) => w.write_str("</a>"),
            Tag::List(Some(_)) => w.write_str("</ol>\n"),
            Tag::List(None) => w.write_str("</ul>\n"),
            Tag::Paragraph => w.write_str("</p>\n"),
            Tag::Strikethrough => w.write_str("</del>"),
            Tag::Strong => w.write_str("</strong>"),
            Tag::Table(_) => w.write_str("</tbody></table>\n"),
            Tag::TableHead => {
                self.table_state = TableState::Body;
                w.write_str("</tr></thead><tbody>\n")
            }
            Tag::TableRow => w.write_str("</tr>\n"),
            Tag::TableCell => {
                self.table_cell_index += 1;
                w.write_str(match self.table_state {
                    TableState::Head => "</th>",
                    TableState::Body => "</td>",
                })
            }
        }
    }

    fn on_text<W: StrWrite>(&mut self, w: &mut W, s: CowStr) -> io::Result<()> {
        escape_html(w, &s)
    }

    fn on_code<W: StrWrite>(&mut self, w: &mut W, s: CowStr) -> io::Result<()> {
        write!(w, "<code>{}</code>", EscapeHtml(&s))
    }

    fn on_html<W: StrWrite>(&mut self, w: &mut W, s: CowStr) -> io::Result<()> {
        w.write_str(&s)
    }

    fn on_soft_break<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<br />\n")
    }

    fn on_hard_break<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<br />\n")
    }

    fn on_rule<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<hr />\n")
    }

    fn on_task_list_marker<W: StrWrite>(
        &mut self,
        w: &mut W,
        checked: bool,
    ) -> io::Result<()> {
        write!(
            w,
            r#"<input disabled="" type="checkbox" {}/>"#,
            match checked {
                true => r#"checked="" "#,
                false => "",
            }
        )
    }
}

/// Converts [`Event`]s into HTML, appending to `out`. Headings are given the
/// ids in `heading_ids`, in order; pass an empty slice for bare headings.
pub fn push_html<'a, W, I>(
    out: &mut W,
    events: I,
    heading_ids: &[String],
) -> io::Result<()>
where
    W: StrWrite,
    I: Iterator<Item = Event<'a>>,
{
    let mut renderer = HtmlRenderer::new(heading_ids);
    for event in events {
        renderer.on_event(out, event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{Options, Parser};

    fn render(markdown: &str, heading_ids: &[String]) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        let mut out = String::new();
        let parser = Parser::new_ext(markdown, options);
        push_html(&mut out, parser, heading_ids).unwrap();
        out
    }

    #[test]
    fn test_render() {
        struct TestCase {
            name: &'static str,
            markdown: &'static str,
            wanted: &'static str,
        }

        for tc in &[
            TestCase {
                name: "heading",
                markdown: "# Hello\nWorld",
                wanted: "<h1>Hello</h1>\n<p>World</p>\n",
            },
            TestCase {
                name: "soft-break",
                markdown: "one\ntwo",
                wanted: "<p>one<br />\ntwo</p>\n",
            },
            TestCase {
                name: "fenced-code",
                markdown: "```rust\nlet x = 1 < 2;\n```",
                wanted: "<pre><code class=\"language-rust\">\
                         let x = 1 &lt; 2;\n</code></pre>\n",
            },
            TestCase {
                name: "fenced-code-no-lang",
                markdown: "```\nplain\n```",
                wanted: "<pre><code>plain\n</code></pre>\n",
            },
            TestCase {
                name: "image-alt",
                markdown: "![a *cat*](cat.png \"Cat\")",
                wanted: "<p><img src=\"cat.png\" alt=\"a cat\" \
                         title=\"Cat\" /></p>\n",
            },
            TestCase {
                name: "link-title",
                markdown: "[docs](https://example.org \"Docs\")",
                wanted: "<p><a href=\"https://example.org\" \
                         title=\"Docs\">docs</a></p>\n",
            },
            TestCase {
                name: "table",
                markdown: "| a | b |\n|:--|--:|\n| 1 | 2 |",
                wanted: "<table><thead><tr>\
                         <th align=\"left\">a</th>\
                         <th align=\"right\">b</th>\
                         </tr></thead><tbody>\n\
                         <tr><td align=\"left\">1</td>\
                         <td align=\"right\">2</td></tr>\n\
                         </tbody></table>\n",
            },
            TestCase {
                name: "strikethrough",
                markdown: "~~gone~~",
                wanted: "<p><del>gone</del></p>\n",
            },
        ] {
            assert_eq!(
                tc.wanted,
                render(tc.markdown, &[]),
                "case `{}`",
                tc.name
            );
        }
    }

    #[test]
    fn test_heading_ids() {
        let ids = vec!["intro".to_owned(), "usage".to_owned()];
        assert_eq!(
            "<h1 id=\"intro\">Intro</h1>\n<h2 id=\"usage\">Usage</h2>\n",
            render("# Intro\n## Usage", &ids),
        );
    }

    #[test]
    fn test_footnotes() {
        let html = render("Claim[^1].\n\n[^1]: Source.", &[]);
        assert!(html.contains(r##"<a href="#fn-1">1</a>"##), "{}", html);
        assert!(
            html.contains(r#"<div class="footnote-definition" id="fn-1">"#),
            "{}",
            html
        );
    }
}
