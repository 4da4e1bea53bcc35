use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{ControlledVocabulary, Property};
use crate::database::{DatabaseError, Record, Repository};

/// `{message}` body of PUT and DELETE
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{message, id}` body of POST
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: Uuid,
}

/// Wire format of a property: the vocabulary reference is expanded into the
/// referenced vocabulary record, or `null` when it no longer resolves.
#[derive(Debug, Serialize)]
pub struct PropertyView {
    pub id: Uuid,
    pub label: String,
    pub name: String,
    pub level: String,
    pub vocabulary_type: Option<VocabularyTypeView>,
    pub synonyms: Vec<String>,
    pub description: String,
    pub deprecated: bool,
}

#[derive(Debug, Serialize)]
pub struct VocabularyTypeView {
    pub data_type: String,
    pub controlled_vocabulary: Option<Record<ControlledVocabulary>>,
}

/// Looks up referenced vocabularies once per response
pub struct VocabularyResolver<'a> {
    vocabularies: &'a dyn Repository<ControlledVocabulary>,
    cache: HashMap<Uuid, Option<Record<ControlledVocabulary>>>,
}

impl<'a> VocabularyResolver<'a> {
    pub fn new(vocabularies: &'a dyn Repository<ControlledVocabulary>) -> Self {
        Self {
            vocabularies,
            cache: HashMap::new(),
        }
    }

    pub async fn resolve(
        &mut self,
        id: Uuid,
    ) -> Result<Option<Record<ControlledVocabulary>>, DatabaseError> {
        if let Some(hit) = self.cache.get(&id) {
            return Ok(hit.clone());
        }

        let resolved = match self.vocabularies.get_by_id(id).await {
            Ok(record) => Some(record),
            Err(DatabaseError::NotFound(_)) => {
                tracing::warn!("Dangling controlled vocabulary reference {}", id);
                None
            }
            Err(e) => return Err(e),
        };

        self.cache.insert(id, resolved.clone());
        Ok(resolved)
    }

    pub async fn property_view(
        &mut self,
        record: Record<Property>,
    ) -> Result<PropertyView, DatabaseError> {
        let Record { id, document } = record;

        let vocabulary_type = match document.vocabulary_type {
            Some(vocabulary_type) => {
                let controlled_vocabulary = match vocabulary_type.controlled_vocabulary {
                    Some(reference) => self.resolve(reference).await?,
                    None => None,
                };
                Some(VocabularyTypeView {
                    data_type: vocabulary_type.data_type,
                    controlled_vocabulary,
                })
            }
            None => None,
        };

        Ok(PropertyView {
            id,
            label: document.label,
            name: document.name,
            level: document.level,
            vocabulary_type,
            synonyms: document.synonyms,
            description: document.description,
            deprecated: document.deprecated,
        })
    }

    pub async fn property_views(
        &mut self,
        records: Vec<Record<Property>>,
    ) -> Result<Vec<PropertyView>, DatabaseError> {
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            views.push(self.property_view(record).await?);
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryRepository;
    use crate::database::models::VocabularyType;
    use crate::testing::{sample_property, sample_vocabulary};

    #[tokio::test]
    async fn test_reference_expands_to_vocabulary_record() {
        let vocabularies = MemoryRepository::<ControlledVocabulary>::new();
        let cv = vocabularies.insert(sample_vocabulary("organisms")).await.unwrap();

        let mut property = sample_property("organism");
        property.vocabulary_type = Some(VocabularyType {
            data_type: "cv".into(),
            controlled_vocabulary: Some(cv.id),
        });

        let mut resolver = VocabularyResolver::new(&vocabularies);
        let view = resolver
            .property_view(Record::new(Uuid::new_v4(), property))
            .await
            .unwrap();
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(
            value["vocabulary_type"]["controlled_vocabulary"]["id"],
            cv.id.to_string()
        );
        assert_eq!(
            value["vocabulary_type"]["controlled_vocabulary"]["name"],
            "organisms"
        );
    }

    #[tokio::test]
    async fn test_dangling_reference_renders_null() {
        let vocabularies = MemoryRepository::<ControlledVocabulary>::new();
        let mut property = sample_property("organism");
        property.vocabulary_type = Some(VocabularyType {
            data_type: "cv".into(),
            controlled_vocabulary: Some(Uuid::new_v4()),
        });

        let mut resolver = VocabularyResolver::new(&vocabularies);
        let view = resolver
            .property_view(Record::new(Uuid::new_v4(), property))
            .await
            .unwrap();

        let vocabulary_type = view.vocabulary_type.unwrap();
        assert_eq!(vocabulary_type.data_type, "cv");
        assert!(vocabulary_type.controlled_vocabulary.is_none());
    }
}
