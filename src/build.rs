//! Exports the [`build_site`] function which stitches together the steps of a
//! build: loading the metadata catalog ([`crate::metadata`]), converting and
//! rendering each article ([`crate::markdown`], [`crate::page`]), and writing
//! the index fragment ([`crate::index`]) and optional knowledge-base export
//! ([`crate::kb`]).

use crate::config::Config;
use crate::index::{Error as IndexError, IndexBuilder};
use crate::kb::{Error as KbError, KnowledgeBase};
use crate::markdown;
use crate::metadata::{self, Error as MetadataError};
use crate::page;
use crate::template::{Error as TemplateError, Template};
use crate::util::write_file;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a build did.
#[derive(Debug, Default)]
pub struct Summary {
    /// The number of records in the catalog.
    pub documents: usize,

    /// The pages that were written, in catalog order.
    pub written: Vec<PathBuf>,

    /// The source files that didn't exist.
    pub skipped: Vec<PathBuf>,

    /// Where the index fragment was written.
    pub index_fragment: PathBuf,

    /// Where the knowledge-base export was written, if it was enabled.
    pub kb: Option<PathBuf>,
}

/// Builds every article page and the index fragment from a [`Config`].
///
/// A missing metadata catalog is fatal, and nothing is written. A record whose
/// source file doesn't exist is skipped with a warning, but still appears in
/// the index fragment. Existing output files are overwritten.
pub fn build_site(config: &Config) -> Result<Summary> {
    info!("Converting Markdown documents...");

    create_dir(&config.output_directory)?;

    let records = metadata::load(&config.metadata_file)?;
    info!("Found {} documents", records.len());

    let template = Template::load(&config.template_file)?;

    let mut summary = Summary {
        documents: records.len(),
        index_fragment: config.index_fragment_file.clone(),
        ..Summary::default()
    };

    for record in &records {
        let source = config.project_root.join(&record.file);
        if !source.exists() {
            warn!("Source file does not exist, skipping: {}", source.display());
            summary.skipped.push(source);
            continue;
        }

        info!("Converting: {}", record.title);
        let raw = fs::read_to_string(&source).map_err(|err| Error::ReadSource {
            path: source.clone(),
            err,
        })?;
        let content = markdown::convert(&raw);
        let html = page::render(&template, &config.labels, record, &content);

        let output = config
            .output_directory
            .join(format!("{}.html", record.slug));
        write(&output, &html)?;
        info!("Wrote: {}", output.display());
        summary.written.push(output);
    }

    info!("Building the index fragment...");
    let fragment = IndexBuilder::new(&config.labels)?.build(&records)?;
    write(&config.index_fragment_file, &fragment)?;
    info!(
        "Wrote index fragment: {}",
        config.index_fragment_file.display()
    );
    info!("Copy its contents into the article list of the index page by hand");

    if let Some(kb_file) = &config.kb_file {
        let json = KnowledgeBase::new(&records, &config.labels).to_json()?;
        write(kb_file, &json)?;
        info!("Wrote knowledge base: {}", kb_file.display());
        summary.kb = Some(kb_file.clone());
    }

    info!(
        "Done: processed {} documents ({} written, {} skipped)",
        summary.documents,
        summary.written.len(),
        summary.skipped.len()
    );
    info!(
        "Output directory: {}",
        absolute(&config.output_directory).display()
    );
    Ok(summary)
}

fn create_dir(dir: &Path) -> Result<()> {
    debug!("Ensuring output directory {}", dir.display());
    fs::create_dir_all(dir).map_err(|err| Error::CreateOutputDirectory {
        path: dir.to_owned(),
        err,
    })
}

fn write(path: &Path, contents: &str) -> Result<()> {
    write_file(path, contents).map_err(|err| Error::Write {
        path: path.to_owned(),
        err,
    })
}

fn absolute(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(path) => path,
        Err(_) => path.to_owned(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for a build. Every variant aborts the build.
#[derive(Debug)]
pub enum Error {
    /// Returned when the metadata catalog can't be loaded.
    Metadata(MetadataError),

    /// Returned when an existing template file can't be loaded.
    Template(TemplateError),

    /// Returned when the index fragment can't be rendered.
    Index(IndexError),

    /// Returned when the knowledge-base export can't be serialized.
    Kb(KbError),

    /// Returned when the output directory can't be created.
    CreateOutputDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when an existing source file can't be read.
    ReadSource { path: PathBuf, err: std::io::Error },

    /// Returned when an output file can't be written.
    Write { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Metadata(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Index(err) => err.fmt(f),
            Error::Kb(err) => err.fmt(f),
            Error::CreateOutputDirectory { path, err } => write!(
                f,
                "Creating output directory '{}': {}",
                path.display(),
                err
            ),
            Error::ReadSource { path, err } => {
                write!(f, "Reading source file '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Metadata(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::Kb(err) => Some(err),
            Error::CreateOutputDirectory { path: _, err } => Some(err),
            Error::ReadSource { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}

impl From<MetadataError> for Error {
    /// Converts [`MetadataError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: MetadataError) -> Error {
        Error::Metadata(err)
    }
}

impl From<TemplateError> for Error {
    /// Converts [`TemplateError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}

impl From<KbError> for Error {
    /// Converts [`KbError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: KbError) -> Error {
        Error::Kb(err)
    }
}
