use serde::{Deserialize, Serialize};

use super::Document;

/// Named, ordered set of permitted value items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledVocabulary {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<VocabularyItem>,
    #[serde(default)]
    pub deprecated: bool,
}

/// Item owned by its parent vocabulary; it has no identity of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Document for ControlledVocabulary {
    const COLLECTION: &'static str = "controlled_vocabularies";

    fn name(&self) -> &str {
        &self.name
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    fn set_deprecated(&mut self, deprecated: bool) {
        self.deprecated = deprecated;
    }
}
