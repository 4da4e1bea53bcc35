// Resource controllers. GET handlers are public; POST, PUT and DELETE run
// behind the auth gate and receive the resolved `Principal`.
pub mod ctrl_voc;
pub mod properties;
pub mod root;

use uuid::Uuid;

use crate::api::{DeleteQuery, MessageResponse};
use crate::database::models::Document;
use crate::database::Repository;
use crate::error::ApiError;

/// Ids that are not UUIDs cannot resolve to an entry
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("No entry with id '{}'", raw)))
}

/// DELETE semantics shared by both collections: deprecate by default,
/// remove permanently when `complete` is set
pub(crate) async fn retire<T: Document>(
    repository: &dyn Repository<T>,
    id: Uuid,
    query: &DeleteQuery,
    user: &str,
) -> Result<MessageResponse, ApiError> {
    let mut record = repository.get_by_id(id).await?;
    let name = record.document.name().to_string();

    if query.complete {
        repository.remove(id).await?;
        tracing::info!("{} removed {} entry '{}' ({})", user, T::COLLECTION, name, id);
        Ok(MessageResponse::new(format!("Delete entry '{}'", name)))
    } else {
        record.document.set_deprecated(true);
        repository.save(&record).await?;
        tracing::info!("{} deprecated {} entry '{}' ({})", user, T::COLLECTION, name, id);
        Ok(MessageResponse::new(format!("Deprecate entry '{}'", name)))
    }
}
