//! The knowledge-base export: a JSON document grouping every record by
//! category, for client-side navigation widgets. Posts within a category are
//! ordered by their `order` field; records without one, or with an order of
//! zero, sort last.

use crate::category::Labels;
use crate::metadata::Record;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The sort position of posts with no usable `order`.
const DEFAULT_ORDER: u32 = 999;
const UNCATEGORIZED: &str = "uncategorized";

/// Every record in the catalog, grouped by category.
#[derive(Debug, Serialize)]
pub struct KnowledgeBase<'a> {
    /// The categories keyed by id, in sorted order so output is stable.
    /// Records with an empty category are filed under `uncategorized`.
    pub categories: BTreeMap<&'a str, Category<'a>>,
}

/// A single category and its posts.
#[derive(Debug, Serialize)]
pub struct Category<'a> {
    /// The category's display label.
    pub label: &'a str,

    /// The category's posts, ascending by `order`.
    pub posts: Vec<Post<'a>>,
}

/// The knowledge-base entry for a single record.
#[derive(Debug, Serialize)]
pub struct Post<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub date: &'a str,

    /// The site-relative link to the article page.
    pub path: String,
    pub excerpt: &'a str,

    /// The record's `order`, or 999 if it has none or it is zero.
    pub order: u32,
}

impl<'a> KnowledgeBase<'a> {
    /// Groups `records` by category, labelling each with `labels`. Posts in a
    /// category keep catalog order among equal `order` values.
    pub fn new(
        records: &'a [Record],
        labels: &'a Labels,
    ) -> KnowledgeBase<'a> {
        let mut categories: BTreeMap<&'a str, Category<'a>> = BTreeMap::new();
        for record in records {
            let id = match record.category.is_empty() {
                true => UNCATEGORIZED,
                false => record.category.as_str(),
            };
            categories
                .entry(id)
                .or_insert_with(|| Category {
                    label: labels.label(id),
                    posts: Vec::new(),
                })
                .posts
                .push(Post {
                    title: &record.title,
                    slug: &record.slug,
                    date: &record.date,
                    path: record.link(),
                    excerpt: &record.excerpt,
                    order: record
                        .order
                        .filter(|&order| order != 0)
                        .unwrap_or(DEFAULT_ORDER),
                });
        }
        for category in categories.values_mut() {
            // stable, so catalog order breaks ties
            category.posts.sort_by_key(|post| post.order);
        }
        KnowledgeBase { categories }
    }

    /// Serializes the knowledge base as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Represents an error serializing the knowledge base.
#[derive(Debug)]
pub struct Error(serde_json::Error);

impl From<serde_json::Error> for Error {
    /// Converts [`serde_json::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: serde_json::Error) -> Error {
        Error(err)
    }
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Serializing knowledge base: {}", self.0)
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(slug: &str, category: &str, order: Option<u32>) -> Record {
        Record {
            file: PathBuf::from(format!("docs/{}.md", slug)),
            slug: slug.to_owned(),
            title: slug.to_uppercase(),
            date: "2024-01-01".to_owned(),
            category: category.to_owned(),
            tags: Vec::new(),
            excerpt: String::new(),
            order,
        }
    }

    #[test]
    fn test_groups_and_orders() {
        let records = vec![
            record("c", "tools", None),
            record("a", "tools", Some(2)),
            record("d", "", None),
            record("b", "tools", Some(1)),
            record("e", "tools", None),
        ];
        let labels = Labels::default();
        let kb = KnowledgeBase::new(&records, &labels);

        let keys: Vec<&str> = kb.categories.keys().copied().collect();
        assert_eq!(vec!["tools", "uncategorized"], keys);

        let tools = &kb.categories["tools"];
        assert_eq!("工具使用", tools.label);
        let slugs: Vec<&str> = tools.posts.iter().map(|p| p.slug).collect();
        assert_eq!(vec!["b", "a", "c", "e"], slugs);
        assert_eq!(999, tools.posts[2].order);
        assert_eq!("articles/b.html", tools.posts[0].path);

        assert_eq!("d", kb.categories["uncategorized"].posts[0].slug);
    }

    #[test]
    fn test_zero_order_sorts_last() {
        let records = vec![
            record("zero", "tools", Some(0)),
            record("none", "tools", None),
            record("first", "tools", Some(1)),
        ];
        let labels = Labels::default();
        let kb = KnowledgeBase::new(&records, &labels);

        let tools = &kb.categories["tools"];
        let slugs: Vec<&str> = tools.posts.iter().map(|p| p.slug).collect();
        assert_eq!(vec!["first", "zero", "none"], slugs);
        assert_eq!(999, tools.posts[1].order);
    }

    #[test]
    fn test_to_json() -> Result<(), Box<dyn std::error::Error>> {
        let records = vec![record("a", "research", Some(3))];
        let labels = Labels::default();
        let text = KnowledgeBase::new(&records, &labels).to_json()?;
        let json: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(
            serde_json::json!({
                "categories": {
                    "research": {
                        "label": "研究心得",
                        "posts": [{
                            "title": "A",
                            "slug": "a",
                            "date": "2024-01-01",
                            "path": "articles/a.html",
                            "excerpt": "",
                            "order": 3
                        }]
                    }
                }
            }),
            json
        );
        Ok(())
    }
}
