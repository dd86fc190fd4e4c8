//! Builds the index fragment: one card per [`Record`], in catalog order, for
//! pasting into the hand-maintained document index page. Cards are rendered
//! with a [`gtmpl`] template.

use crate::category::Labels;
use crate::metadata::Record;
use crate::page::tags_html;
use gtmpl::{Context, Template};
use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;

const CARD_TEMPLATE: &str = r#"
                <article class="article-card" data-category="{{.category}}">
                    <div class="article-meta">
                        <span class="article-date">{{.date}}</span>
                        <span class="tag tag-primary">{{.category_label}}</span>
                    </div>
                    <h3 class="article-title">
                        <a href="{{.link}}" class="article-link">{{.title}}</a>
                    </h3>
                    <p class="article-excerpt">
                        {{.excerpt}}
                    </p>
                    <div class="article-tags">
                        {{.tags_html}}
                    </div>
                </article>"#;

/// Renders index cards.
pub struct IndexBuilder<'a> {
    template: Template,
    labels: &'a Labels,
}

impl<'a> IndexBuilder<'a> {
    /// Parses the card template.
    pub fn new(labels: &'a Labels) -> Result<IndexBuilder<'a>> {
        let mut template = Template::default();
        template.parse(CARD_TEMPLATE).map_err(Error::ParseTemplate)?;
        Ok(IndexBuilder { template, labels })
    }

    /// Renders a single card.
    pub fn card(&self, record: &Record) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        self.template
            .execute(&mut out, &Context::from(self.card_value(record))?)?;
        Ok(String::from_utf8(out)?)
    }

    /// Renders every record's card, separated by newlines.
    pub fn build(&self, records: &[Record]) -> Result<String> {
        let cards = records
            .iter()
            .map(|record| self.card(record))
            .collect::<Result<Vec<String>>>()?;
        Ok(cards.join("\n"))
    }

    fn card_value(&self, record: &Record) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("category".to_owned(), Value::String(record.category.clone()));
        m.insert(
            "category_label".to_owned(),
            Value::String(self.labels.label(&record.category).to_owned()),
        );
        m.insert("date".to_owned(), Value::String(record.date.clone()));
        m.insert("title".to_owned(), Value::String(record.title.clone()));
        m.insert("link".to_owned(), Value::String(record.link()));
        m.insert("excerpt".to_owned(), Value::String(record.excerpt.clone()));
        m.insert(
            "tags_html".to_owned(),
            Value::String(tags_html(&record.tags)),
        );
        Value::Object(m)
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering the index fragment.
#[derive(Debug)]
pub enum Error {
    /// Returned if the card template fails to parse.
    ParseTemplate(String),

    /// Returned for errors while executing the card template.
    Template(String),

    /// Returned if a rendered card isn't valid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    /// Converts [`std::string::FromUtf8Error`]s into [`Error`].
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate(err) => {
                write!(f, "Parsing card template: {}", err)
            }
            Error::Template(err) => write!(f, "Rendering index card: {}", err),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}
