use axum::{
    extract::{Path, State},
    Extension,
};

use crate::api::{
    CreatedResponse, DeleteQuery, ListQuery, MessageResponse, PropertyPayload, PropertyView,
    VocabularyResolver,
};
use crate::auth::Principal;
use crate::database::EntryFilter;
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult};
use crate::rules::validate_controlled_vocabulary;
use crate::state::AppState;

use super::{parse_id, retire};

/// GET /properties/ - list entries, deprecated ones only with `deprecated=true`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<PropertyView>> {
    let filter = if query.deprecated {
        EntryFilter::all()
    } else {
        EntryFilter::active()
    };

    let records = state.properties.list(filter).await?;
    let views = VocabularyResolver::new(state.vocabularies.as_ref())
        .property_views(records)
        .await?;

    Ok(ApiResponse::success(views))
}

/// POST /properties/ - add a new entry
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<PropertyPayload>,
) -> ApiResult<CreatedResponse> {
    let mut entry = payload.into_property()?;
    validate_controlled_vocabulary(&mut entry);

    let record = state.properties.insert(entry).await?;
    tracing::info!(
        "{} added property '{}' ({})",
        principal.user,
        record.document.name,
        record.id
    );

    Ok(ApiResponse::created(CreatedResponse {
        message: format!("Add entry '{}'", record.document.name),
        id: record.id,
    }))
}

/// GET /properties/id/:id - fetch an entry, deprecated or not
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PropertyView> {
    let record = state.properties.get_by_id(parse_id(&id)?).await?;
    let view = VocabularyResolver::new(state.vocabularies.as_ref())
        .property_view(record)
        .await?;

    Ok(ApiResponse::success(view))
}

/// PUT /properties/id/:id - overwrite the provided fields
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<PropertyPayload>,
) -> ApiResult<MessageResponse> {
    let mut record = state.properties.get_by_id(parse_id(&id)?).await?;

    payload.apply_to(record.id, &mut record.document)?;
    validate_controlled_vocabulary(&mut record.document);

    state.properties.save(&record).await?;
    tracing::info!(
        "{} updated property '{}' ({})",
        principal.user,
        record.document.name,
        record.id
    );

    Ok(ApiResponse::success(MessageResponse::new(format!(
        "Update entry '{}'",
        record.document.name
    ))))
}

/// DELETE /properties/id/:id - deprecate, or remove with `complete=true`
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<DeleteQuery>,
) -> ApiResult<MessageResponse> {
    let message = retire(
        state.properties.as_ref(),
        parse_id(&id)?,
        &query,
        &principal.user,
    )
    .await?;

    Ok(ApiResponse::success(message))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::testing::TestApp;

    fn organism(data_type: &str, reference: Option<String>) -> serde_json::Value {
        json!({
            "label": "Organism",
            "name": "Organism",
            "level": "Sample",
            "vocabulary_type": { "data_type": data_type, "controlled_vocabulary": reference },
            "synonyms": ["species", "taxon"]
        })
    }

    #[tokio::test]
    async fn test_create_then_fetch_by_id() {
        let app = TestApp::new();
        let (status, body) = app
            .send_authed(Method::POST, "/properties/", Some(organism("text", None)))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Add entry 'organism'");
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app.get(&format!("/properties/id/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);
        assert_eq!(body["name"], "organism");
        assert_eq!(body["synonyms"], json!(["species", "taxon"]));
        assert_eq!(body["deprecated"], false);
        assert_eq!(body["description"], "");
    }

    #[tokio::test]
    async fn test_non_cv_reference_is_cleared_on_create() {
        let app = TestApp::new();
        let cv_id = app.insert_vocabulary("Organisms", false).await;

        let (status, body) = app
            .send_authed(Method::POST, "/properties/", Some(organism("text", Some(cv_id))))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let stored = app.stored_property(body["id"].as_str().unwrap()).await;
        let vocabulary_type = stored.vocabulary_type.unwrap();
        assert_eq!(vocabulary_type.data_type, "text");
        assert!(vocabulary_type.controlled_vocabulary.is_none());
    }

    #[tokio::test]
    async fn test_cv_reference_is_kept_and_expanded() {
        let app = TestApp::new();
        let cv_id = app.insert_vocabulary("Organisms", false).await;

        let (_, body) = app
            .send_authed(
                Method::POST,
                "/properties",
                Some(organism("cv", Some(cv_id.clone()))),
            )
            .await;
        let (status, body) = app
            .get(&format!("/properties/id/{}", body["id"].as_str().unwrap()))
            .await;

        assert_eq!(status, StatusCode::OK);
        let nested = &body["vocabulary_type"]["controlled_vocabulary"];
        assert_eq!(nested["id"], cv_id);
        assert_eq!(nested["name"], "organisms");
        assert_eq!(nested["items"][0]["name"], "test_item_1");
    }

    #[tokio::test]
    async fn test_list_respects_deprecated_flag() {
        let app = TestApp::new();
        app.insert_property("Active", false).await;
        app.insert_property("Retired", true).await;

        let (status, body) = app.get("/properties/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "active");

        let (_, body) = app.get("/properties/?deprecated=false").await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = app.get("/properties?deprecated=True").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_flag_is_a_validation_error() {
        let app = TestApp::new();
        let (status, body) = app.get("/properties/?deprecated=sometimes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_id_is_not_found() {
        let app = TestApp::new();
        let (status, _) = app
            .get("/properties/id/2b1c3f1e-0000-4000-8000-000000000000")
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.get("/properties/id/not-a-uuid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_overwrites_given_fields_and_reapplies_rules() {
        let app = TestApp::new();
        let cv_id = app.insert_vocabulary("Organisms", false).await;
        let (_, body) = app
            .send_authed(
                Method::POST,
                "/properties/",
                Some(organism("cv", Some(cv_id.clone()))),
            )
            .await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send_authed(
                Method::PUT,
                &format!("/properties/id/{}", id),
                Some(json!({
                    "name": "Organism Name",
                    "vocabulary_type": { "data_type": "text", "controlled_vocabulary": cv_id }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Update entry 'organism_name'");

        let stored = app.stored_property(&id).await;
        assert_eq!(stored.name, "organism_name");
        assert_eq!(stored.label, "Organism");
        assert_eq!(stored.synonyms, vec!["species", "taxon"]);
        assert!(stored.vocabulary_type.unwrap().controlled_vocabulary.is_none());
    }

    #[tokio::test]
    async fn test_fetched_entry_can_be_sent_back_unchanged() {
        let app = TestApp::new();
        let cv_id = app.insert_vocabulary("Organisms", false).await;
        let (_, created) = app
            .send_authed(Method::POST, "/properties/", Some(organism("cv", Some(cv_id.clone()))))
            .await;
        let uri = format!("/properties/id/{}", created["id"].as_str().unwrap());

        let (_, mut fetched) = app.get(&uri).await;
        fetched["description"] = json!("Scientific name");
        let (status, body) = app.send_authed(Method::PUT, &uri, Some(fetched)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        let (_, refetched) = app.get(&uri).await;
        assert_eq!(refetched["description"], "Scientific name");
        assert_eq!(refetched["vocabulary_type"]["controlled_vocabulary"]["id"], cv_id);

        let mut foreign = refetched.clone();
        foreign["id"] = json!(uuid::Uuid::new_v4().to_string());
        let (status, body) = app.send_authed(Method::PUT, &uri, Some(foreign)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["field_errors"]["id"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_conflict() {
        let app = TestApp::new();
        let (status, _) = app
            .send_authed(Method::POST, "/properties/", Some(organism("text", None)))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = app
            .send_authed(Method::POST, "/properties/", Some(organism("text", None)))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_rejected() {
        let app = TestApp::new();

        let (status, body) = app
            .send_authed(Method::POST, "/properties/", Some(json!({ "label": "x" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["name"].is_string());

        let (status, body) = app
            .send_authed(
                Method::POST,
                "/properties/",
                Some(json!({ "id": "abc", "label": "x", "name": "x", "level": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = app.send_raw_authed(Method::POST, "/properties/", "{ nope").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
        assert_eq!(app.property_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_deprecates_by_default() {
        let app = TestApp::new();
        let id = app.insert_property("Depth", false).await;

        let (status, body) = app
            .send_authed(Method::DELETE, &format!("/properties/id/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Deprecate entry 'depth'");

        let (status, body) = app.get(&format!("/properties/id/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deprecated"], true);

        let (_, body) = app.get("/properties/").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_complete_removes_entry() {
        let app = TestApp::new();
        let id = app.insert_property("Depth", false).await;

        let (status, body) = app
            .send_authed(
                Method::DELETE,
                &format!("/properties/id/{}?complete=true", id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Delete entry 'depth'");

        let (status, _) = app.get(&format!("/properties/id/{}", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send_authed(Method::DELETE, &format!("/properties/id/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mutations_require_a_valid_credential() {
        let app = TestApp::new();
        let id = app.insert_property("Depth", false).await;
        let path = format!("/properties/id/{}", id);

        let attempts = [
            (Method::POST, "/properties/".to_string(), Some(organism("text", None))),
            (Method::PUT, path.clone(), Some(json!({ "label": "Changed" }))),
            (Method::DELETE, format!("{}?complete=true", path), None),
        ];

        for (method, uri, body) in attempts {
            let (status, response) = app.send(method.clone(), &uri, body.clone(), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(response["code"], "UNAUTHORIZED");

            let (status, _) = app
                .send(method.clone(), &uri, body, Some("Bearer forged.token.value"))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }

        assert_eq!(app.property_count().await, 1);
        let stored = app.stored_property(&id).await;
        assert_eq!(stored.label, "Depth");
        assert!(!stored.deprecated);
    }
}
