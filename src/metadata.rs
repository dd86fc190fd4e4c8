//! Defines [`Record`], one entry of the JSON metadata catalog, and [`load`],
//! which reads the whole catalog into memory.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Describes a single source document. All fields except `order` are
/// required; unknown keys are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Record {
    /// The path to the Markdown source, relative to the project root.
    pub file: PathBuf,

    /// The output file stem and link target (`<slug>.html`).
    pub slug: String,

    pub title: String,

    /// Displayed verbatim; no date format is imposed.
    pub date: String,

    /// The category identifier. See [`crate::category::Labels`].
    pub category: String,

    pub tags: Vec<String>,

    /// A short summary shown on the index card.
    pub excerpt: String,

    /// The sort key within a category for the knowledge-base export. Records
    /// without one sort last.
    #[serde(default)]
    pub order: Option<u32>,
}

impl Record {
    /// The site-relative link to the record's rendered page.
    pub fn link(&self) -> String {
        format!("articles/{}.html", self.slug)
    }
}

/// Loads the ordered list of [`Record`]s from the catalog at `path`. The
/// catalog is parsed as a whole, so any malformed record fails the load.
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let contents = std::fs::read_to_string(path).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })?;
    parse(&contents).map_err(|err| Error::Parse {
        path: path.to_owned(),
        err,
    })
}

fn parse(
    contents: &str,
) -> std::result::Result<Vec<Record>, serde_json::Error> {
    serde_json::from_str(contents)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the metadata catalog. Either error is fatal
/// to the build.
#[derive(Debug)]
pub enum Error {
    /// Returned when the catalog is missing or unreadable.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when the catalog isn't a JSON array of well-formed records.
    Parse {
        path: PathBuf,
        err: serde_json::Error,
    },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Reading metadata file '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Parsing metadata file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
        }
    }
}
