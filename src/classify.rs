//! Keyword classification of dish names
//!
//! A dish name is upper-cased and tested against an ordered list of
//! keyword tiers. The first tier with a keyword contained in the name
//! decides the category; names matching nothing get the default category.

use crate::config::ClassifierConfig;

#[derive(Debug, Clone)]
struct Tier {
    keywords: Vec<String>,
    category_id: i32,
}

/// Ordered substring classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    tiers: Vec<Tier>,
    default_category_id: i32,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let tiers = config
            .rules
            .iter()
            .map(|rule| Tier {
                keywords: rule.keywords.iter().map(|k| k.to_uppercase()).collect(),
                category_id: rule.category_id,
            })
            .collect();

        Self {
            tiers,
            default_category_id: config.default_category_id,
        }
    }

    /// Category id for `name`. Total: every name gets exactly one id.
    pub fn classify(&self, name: &str) -> i32 {
        let upper = name.to_uppercase();
        self.tiers
            .iter()
            .find(|tier| tier.keywords.iter().any(|k| upper.contains(k.as_str())))
            .map(|tier| tier.category_id)
            .unwrap_or(self.default_category_id)
    }

    pub fn default_category_id(&self) -> i32 {
        self.default_category_id
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
