use serde::Deserialize;
use uuid::Uuid;

use crate::api::validate::FieldErrors;
use crate::database::models::{ControlledVocabulary, VocabularyItem};
use crate::error::ApiError;
use crate::rules::normalize_name;

/// Body of `POST /ctrl_voc/` and `PUT /ctrl_voc/id/{id}`. An `id` is only
/// accepted on update and must equal the path id.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CtrlVocPayload {
    pub id: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole item list when given
    pub items: Option<Vec<VocabularyItemPayload>>,
    pub deprecated: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyItemPayload {
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub synonyms: Option<Vec<String>>,
}

impl CtrlVocPayload {
    pub fn into_vocabulary(self) -> Result<ControlledVocabulary, ApiError> {
        let mut errors = FieldErrors::new();
        errors.echoed_id(self.id.as_deref(), None);

        let label = errors.required("label", self.label);
        let name = errors.required("name", self.name);
        let items = convert_items(self.items.unwrap_or_default(), &mut errors);

        errors.into_result(ControlledVocabulary {
            label,
            name: normalize_name(&name),
            description: self.description.unwrap_or_default(),
            items,
            deprecated: self.deprecated.unwrap_or(false),
        })
    }

    pub fn apply_to(self, id: Uuid, vocabulary: &mut ControlledVocabulary) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.echoed_id(self.id.as_deref(), Some(id));

        if let Some(label) = self.label {
            errors.not_blank("label", &label);
            vocabulary.label = label;
        }
        if let Some(name) = self.name {
            errors.not_blank("name", &name);
            vocabulary.name = normalize_name(&name);
        }
        if let Some(description) = self.description {
            vocabulary.description = description;
        }
        if let Some(items) = self.items {
            vocabulary.items = convert_items(items, &mut errors);
        }
        if let Some(deprecated) = self.deprecated {
            vocabulary.deprecated = deprecated;
        }

        errors.into_result(())
    }
}

fn convert_items(items: Vec<VocabularyItemPayload>, errors: &mut FieldErrors) -> Vec<VocabularyItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let label = errors.required(&format!("items[{}].label", index), item.label);
            let name = errors.required(&format!("items[{}].name", index), item.name);
            VocabularyItem {
                label,
                name: normalize_name(&name),
                description: item.description.unwrap_or_default(),
                synonyms: item.synonyms.unwrap_or_default(),
            }
        })
        .collect()
}
