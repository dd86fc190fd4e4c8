//! Defines [`Config`], the set of paths and settings for a single build, and
//! the optional `articlegen.yaml` project file from which it can be loaded.

use crate::category::Labels;
use crate::util::read_optional;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The name of the optional project file at the project root.
pub const PROJECT_FILE: &str = "articlegen.yaml";

const METADATA_FILE: &str = "docs/metadata.json";
const TEMPLATE_FILE: &str = "article-template.html";
const OUTPUT_DIRECTORY: &str = "articles";
const INDEX_FRAGMENT_FILE: &str = "articles-list.html";

/// The on-disk shape of `articlegen.yaml`. Every key is optional; relative
/// paths are resolved against the project root.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    metadata_file: Option<PathBuf>,
    template_file: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    index_fragment_file: Option<PathBuf>,
    kb_file: Option<PathBuf>,

    #[serde(default)]
    categories: BTreeMap<String, String>,
}

/// Everything a build needs to know about where its inputs and outputs live.
#[derive(Clone, Debug)]
pub struct Config {
    /// The directory against which source document paths are resolved.
    pub project_root: PathBuf,

    /// The JSON metadata catalog.
    pub metadata_file: PathBuf,

    /// The optional page template. If it doesn't exist, the built-in template
    /// is used.
    pub template_file: PathBuf,

    /// The directory into which `<slug>.html` pages are written.
    pub output_directory: PathBuf,

    /// The file into which the index fragment is written.
    pub index_fragment_file: PathBuf,

    /// If set, the knowledge-base JSON export is written here.
    pub kb_file: Option<PathBuf>,

    /// The category label table.
    pub labels: Labels,
}

impl Config {
    /// Builds the default configuration for the project rooted at `root`
    /// without reading anything from disk.
    pub fn for_project(root: &Path) -> Config {
        let output_directory = root.join(OUTPUT_DIRECTORY);
        Config {
            project_root: root.to_owned(),
            metadata_file: root.join(METADATA_FILE),
            template_file: root.join(TEMPLATE_FILE),
            index_fragment_file: output_directory.join(INDEX_FRAGMENT_FILE),
            output_directory,
            kb_file: None,
            labels: Labels::default(),
        }
    }

    /// Builds the configuration for the project rooted at `root`, applying
    /// `articlegen.yaml` on top of the defaults if it exists.
    pub fn from_directory(root: &Path) -> Result<Config> {
        let path = root.join(PROJECT_FILE);
        match read_optional(&path) {
            Err(err) => Err(Error::Io { path, err }),
            Ok(None) => Ok(Config::for_project(root)),
            Ok(Some(contents)) => {
                match serde_yaml::from_str::<Project>(&contents) {
                    Ok(project) => {
                        Ok(Config::for_project(root).with_project(project))
                    }
                    Err(err) => Err(Error::Parse { path, err }),
                }
            }
        }
    }

    /// Points the build at a different output directory. The index fragment
    /// follows the output directory when it was left at its default location.
    pub fn with_output_directory(
        mut self,
        output_directory: PathBuf,
    ) -> Config {
        let default_fragment = self.output_directory.join(INDEX_FRAGMENT_FILE);
        if self.index_fragment_file == default_fragment {
            self.index_fragment_file =
                output_directory.join(INDEX_FRAGMENT_FILE);
        }
        self.output_directory = output_directory;
        self
    }

    fn with_project(self, project: Project) -> Config {
        let root = self.project_root.clone();
        let mut config = match project.output_directory {
            Some(dir) => self.with_output_directory(root.join(dir)),
            None => self,
        };
        if let Some(path) = project.metadata_file {
            config.metadata_file = root.join(path);
        }
        if let Some(path) = project.template_file {
            config.template_file = root.join(path);
        }
        if let Some(path) = project.index_fragment_file {
            config.index_fragment_file = root.join(path);
        }
        config.kb_file = project.kb_file.map(|path| root.join(path));
        config.labels = Labels::with_overrides(project.categories);
        config
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the project file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file exists but can't be read.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or has unexpected
    /// keys.
    Parse {
        path: PathBuf,
        err: serde_yaml::Error,
    },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Reading project file '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Parsing project file '{}': {}", path.display(), err)
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
