use crate::database::models::Property;

/// Drops a controlled vocabulary reference that the declared data type cannot
/// use. Only `cv` properties keep one; whether it resolves is not checked here.
pub fn validate_controlled_vocabulary(entry: &mut Property) {
    if let Some(vocabulary_type) = entry.vocabulary_type.as_mut() {
        if !vocabulary_type.is_controlled() && vocabulary_type.controlled_vocabulary.take().is_some()
        {
            tracing::debug!(
                "Cleared controlled vocabulary reference on '{}' (data_type '{}')",
                entry.name,
                vocabulary_type.data_type
            );
        }
    }
}
