//! The library code for the `articlegen` article builder. A build reads a JSON
//! metadata catalog describing a set of Markdown documents and produces:
//!
//! 1. One HTML page per document whose source file exists, written as
//!    `<slug>.html` into the output directory ([`crate::page`])
//! 2. An index fragment listing every document as a card, meant to be pasted
//!    into the site's hand-maintained index page ([`crate::index`])
//! 3. Optionally, a JSON knowledge base grouping documents by category
//!    ([`crate::kb`])
//!
//! Each page is the document's Markdown body ([`crate::markdown`]) substituted
//! into the page template ([`crate::template`]) along with the fields of its
//! catalog record ([`crate::metadata`]). [`crate::build::build_site`] drives
//! the whole thing from a [`crate::config::Config`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod category;
pub mod config;
mod htmlrenderer;
pub mod index;
pub mod kb;
pub mod markdown;
pub mod metadata;
pub mod page;
pub mod template;
mod util;
