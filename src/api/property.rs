use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::api::validate::FieldErrors;
use crate::database::models::{Property, VocabularyType, CV_DATA_TYPE};
use crate::error::ApiError;
use crate::rules::normalize_name;

/// Body of `POST /properties/` and `PUT /properties/id/{id}`.
///
/// The id is generated by the store. It is rejected on create and on update
/// must equal the path id, so a fetched entry can be sent back as is. On
/// create the label, name and level are required; on update only the given
/// fields are written.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyPayload {
    pub id: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub level: Option<String>,
    /// `null` clears the vocabulary type on update
    #[serde(default, deserialize_with = "explicit_null")]
    pub vocabulary_type: Option<Option<VocabularyTypePayload>>,
    pub synonyms: Option<Vec<String>>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabularyTypePayload {
    pub data_type: String,
    #[serde(default)]
    pub controlled_vocabulary: Option<VocabularyReference>,
}

/// A vocabulary is referenced either by its id or by an object carrying it,
/// e.g. the nested record returned from `GET /properties/id/{id}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VocabularyReference {
    Id(String),
    Entry { id: String },
}

impl VocabularyReference {
    fn raw(&self) -> &str {
        match self {
            VocabularyReference::Id(id) | VocabularyReference::Entry { id } => id,
        }
    }
}

impl PropertyPayload {
    pub fn into_property(self) -> Result<Property, ApiError> {
        let mut errors = FieldErrors::new();
        errors.echoed_id(self.id.as_deref(), None);

        let label = errors.required("label", self.label);
        let name = errors.required("name", self.name);
        let level = errors.required("level", self.level);
        let vocabulary_type = self
            .vocabulary_type
            .flatten()
            .and_then(|payload| payload.into_vocabulary_type(&mut errors));

        errors.into_result(Property {
            label,
            name: normalize_name(&name),
            level,
            vocabulary_type,
            synonyms: self.synonyms.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            deprecated: self.deprecated.unwrap_or(false),
        })
    }

    pub fn apply_to(self, id: Uuid, property: &mut Property) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.echoed_id(self.id.as_deref(), Some(id));

        if let Some(label) = self.label {
            errors.not_blank("label", &label);
            property.label = label;
        }
        if let Some(name) = self.name {
            errors.not_blank("name", &name);
            property.name = normalize_name(&name);
        }
        if let Some(level) = self.level {
            errors.not_blank("level", &level);
            property.level = level;
        }
        if let Some(vocabulary_type) = self.vocabulary_type {
            property.vocabulary_type =
                vocabulary_type.and_then(|payload| payload.into_vocabulary_type(&mut errors));
        }
        if let Some(synonyms) = self.synonyms {
            property.synonyms = synonyms;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(deprecated) = self.deprecated {
            property.deprecated = deprecated;
        }

        errors.into_result(())
    }
}

impl VocabularyTypePayload {
    fn into_vocabulary_type(self, errors: &mut FieldErrors) -> Option<VocabularyType> {
        if self.data_type.trim().is_empty() {
            errors.add("vocabulary_type.data_type", "This field must not be blank");
            return None;
        }

        // A malformed reference only matters when it would be kept
        let controlled_vocabulary = self.controlled_vocabulary.and_then(|reference| {
            match Uuid::parse_str(reference.raw()) {
                Ok(id) => Some(id),
                Err(_) => {
                    if self.data_type == CV_DATA_TYPE {
                        errors.add(
                            "vocabulary_type.controlled_vocabulary",
                            format!("'{}' is not a valid entry id", reference.raw()),
                        );
                    }
                    None
                }
            }
        });

        Some(VocabularyType {
            data_type: self.data_type,
            controlled_vocabulary,
        })
    }
}

/// Keeps an explicit `null` apart from an absent field
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
