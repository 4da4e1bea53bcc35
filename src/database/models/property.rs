use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Document;

/// Data type that carries a controlled vocabulary reference
pub const CV_DATA_TYPE: &str = "cv";

/// Metadata field definition attachable to dataset records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub label: String,
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub vocabulary_type: Option<VocabularyType>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyType {
    pub data_type: String,
    /// Id of the referenced controlled vocabulary, only meaningful for `cv`
    #[serde(default)]
    pub controlled_vocabulary: Option<Uuid>,
}

impl VocabularyType {
    pub fn is_controlled(&self) -> bool {
        self.data_type == CV_DATA_TYPE
    }
}

impl Document for Property {
    const COLLECTION: &'static str = "properties";

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
