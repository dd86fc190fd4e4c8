//! Defines [`Labels`], the lookup from category identifiers (as they appear in
//! the metadata catalog) to the human-readable labels shown on article pages
//! and index cards.

use std::collections::BTreeMap;

/// The built-in label table. Project files may extend or override it (see
/// [`crate::config`]).
const BUILTIN_LABELS: &[(&str, &str)] = &[
    ("formal-verification", "形式化验证"),
    ("ai-agents", "智能体系统"),
    ("tools", "工具使用"),
    ("research", "研究心得"),
];

/// Maps category identifiers to display labels. Unknown identifiers are
/// passed through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct Labels {
    labels: BTreeMap<String, String>,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            labels: BUILTIN_LABELS
                .iter()
                .map(|(id, label)| (id.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl Labels {
    /// Builds the built-in table and then applies `overrides` on top of it.
    pub fn with_overrides<I>(overrides: I) -> Labels
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut labels = Labels::default();
        labels.labels.extend(overrides);
        labels
    }

    /// Returns the display label for `category`, or `category` itself when
    /// no label is known.
    pub fn label<'a>(&'a self, category: &'a str) -> &'a str {
        match self.labels.get(category) {
            Some(label) => label,
            None => category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        struct TestCase {
            category: &'static str,
            wanted: &'static str,
        }

        let labels = Labels::default();
        for tc in &[
            TestCase {
                category: "tools",
                wanted: "工具使用",
            },
            TestCase {
                category: "formal-verification",
                wanted: "形式化验证",
            },
            TestCase {
                category: "cooking",
                wanted: "cooking",
            },
            TestCase {
                category: "",
                wanted: "",
            },
        ] {
            assert_eq!(
                tc.wanted,
                labels.label(tc.category),
                "category `{}`",
                tc.category
            );
        }
    }

    #[test]
    fn test_overrides() {
        let labels = Labels::with_overrides(vec![
            ("tools".to_owned(), "Tooling".to_owned()),
            ("rust".to_owned(), "Rust".to_owned()),
        ]);
        assert_eq!("Tooling", labels.label("tools"));
        assert_eq!("Rust", labels.label("rust"));
        assert_eq!("研究心得", labels.label("research"));
    }
}
