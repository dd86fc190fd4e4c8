//! Defines the page [`Template`]: an HTML document with `{title}`, `{date}`,
//! `{category_label}`, `{tags_html}`, and `{content}` placeholders.
//!
//! A template is split into literal text and placeholders once, when it is
//! parsed, so substituted values are never rescanned. Content that happens to
//! contain `{title}` is written out as-is. `{{` and `}}` render as single
//! literal braces, so `{{title}}` renders as `{title}`. Any other
//! brace-delimited text (CSS rules, inline scripts) is treated as a literal.

use crate::util::read_optional;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// The template used when no template file exists.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - DarcyInCode</title>
    <link rel="stylesheet" href="../style.css">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.7.0/styles/github-dark.min.css">
</head>
<body>
    <nav class="navbar">
        <div class="container">
            <div class="nav-content">
                <a href="../index.html" class="nav-brand">DarcyInCode</a>
                <div class="nav-links">
                    <a href="../index.html" class="nav-link">首页</a>
                    <a href="../docs.html" class="nav-link active">技术文档</a>
                </div>
            </div>
        </div>
    </nav>

    <div class="container article-container">
        <article class="article-content">
            <header class="article-header">
                <h1>{title}</h1>
                <div class="article-meta">
                    <span class="article-date">{date}</span>
                    <span class="tag tag-primary">{category_label}</span>
                </div>
                <div class="article-tags">
                    {tags_html}
                </div>
            </header>

            <div class="article-body">
                {content}
            </div>

            <footer class="article-footer">
                <a href="../docs.html" class="btn btn-outline">← 返回文档列表</a>
            </footer>
        </article>
    </div>

    <script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.7.0/highlight.min.js"></script>
    <script>hljs.highlightAll();</script>
</body>
</html>"#;

/// Matches escaped braces and `{name}` placeholders.
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([a-z_]+)\}")
            .expect("placeholder pattern is valid")
    })
}

/// The values that can be substituted into a [`Template`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Title,
    Date,
    CategoryLabel,
    TagsHtml,
    Content,
}

impl Field {
    fn from_name(name: &str) -> Option<Field> {
        match name {
            "title" => Some(Field::Title),
            "date" => Some(Field::Date),
            "category_label" => Some(Field::CategoryLabel),
            "tags_html" => Some(Field::TagsHtml),
            "content" => Some(Field::Content),
            _ => None,
        }
    }
}

/// The substitution values for a single page.
pub struct Values<'a> {
    pub title: &'a str,
    pub date: &'a str,
    pub category_label: &'a str,
    pub tags_html: &'a str,
    pub content: &'a str,
}

impl Values<'_> {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => self.title,
            Field::Date => self.date,
            Field::CategoryLabel => self.category_label,
            Field::TagsHtml => self.tags_html,
            Field::Content => self.content,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Field),
}

/// A parsed page template.
#[derive(Debug)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Splits `text` into literal segments and recognized placeholders.
    /// Placeholders the template omits are simply never rendered.
    pub fn parse(text: &str) -> Template {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;
        for captures in placeholder_pattern().captures_iter(text) {
            let whole = match captures.get(0) {
                Some(whole) => whole,
                None => continue,
            };
            literal.push_str(&text[last..whole.start()]);
            last = whole.end();
            match whole.as_str() {
                "{{" => literal.push('{'),
                "}}" => literal.push('}'),
                _ => match captures
                    .get(1)
                    .and_then(|name| Field::from_name(name.as_str()))
                {
                    Some(field) => {
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(
                                std::mem::take(&mut literal),
                            ));
                        }
                        segments.push(Segment::Placeholder(field));
                    }
                    None => literal.push_str(whole.as_str()),
                },
            }
        }
        literal.push_str(&text[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Template { segments }
    }

    /// Loads the template at `path`, or the [`DEFAULT_TEMPLATE`] if there is
    /// no file there.
    pub fn load(path: &Path) -> Result<Template> {
        match read_optional(path) {
            Ok(Some(text)) => {
                debug!("Using template file {}", path.display());
                Ok(Template::parse(&text))
            }
            Ok(None) => {
                debug!(
                    "No template file at {}; using the built-in template",
                    path.display()
                );
                Ok(Template::parse(DEFAULT_TEMPLATE))
            }
            Err(err) => Err(Error::Io {
                path: path.to_owned(),
                err,
            }),
        }
    }

    /// Substitutes `values` into the template.
    pub fn render(&self, values: &Values) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(field) => {
                    out.push_str(values.get(*field))
                }
            }
        }
        out
    }

    #[cfg(test)]
    fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|segment| *segment == Segment::Placeholder(field))
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a template.
#[derive(Debug)]
pub enum Error {
    /// Returned when the template file exists but can't be read.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => write!(
                f,
                "Reading template file '{}': {}",
                path.display(),
                err
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
        }
    }
}
