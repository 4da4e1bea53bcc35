use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims, JwtVerifier};
use crate::database::models::{ControlledVocabulary, Property, VocabularyItem};
use crate::database::{DatabaseManager, EntryFilter};
use crate::routes;
use crate::rules::normalize_name;
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-for-handler-tests";

pub fn sample_property(name: &str) -> Property {
    Property {
        label: name.to_string(),
        name: name.to_string(),
        level: "Sample".to_string(),
        vocabulary_type: None,
        synonyms: vec![],
        description: String::new(),
        deprecated: false,
    }
}

pub fn sample_vocabulary(name: &str) -> ControlledVocabulary {
    ControlledVocabulary {
        label: name.to_string(),
        name: name.to_string(),
        description: String::new(),
        items: vec![VocabularyItem {
            label: "Test item 1".to_string(),
            name: "test_item_1".to_string(),
            description: String::new(),
            synonyms: vec![],
        }],
        deprecated: false,
    }
}

/// The full router over in-memory stores, driven without a socket
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(
            DatabaseManager::in_memory(),
            Arc::new(JwtVerifier::from_secret(TEST_JWT_SECRET)),
        );
        let router = routes::app(state.clone());
        Self { state, router }
    }

    pub fn token() -> String {
        generate_jwt(&Claims::new("curator", 1).expect("claims"), TEST_JWT_SECRET).expect("test token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let body = body.map(|b| b.to_string());
        self.dispatch(method, uri, body, authorization).await
    }

    pub async fn send_authed(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let bearer = format!("Bearer {}", Self::token());
        self.send(method, uri, body, Some(&bearer)).await
    }

    pub async fn send_raw_authed(&self, method: Method, uri: &str, raw: &str) -> (StatusCode, Value) {
        let bearer = format!("Bearer {}", Self::token());
        self.dispatch(method, uri, Some(raw.to_string()), Some(&bearer))
            .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    async fn dispatch(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn insert_property(&self, label: &str, deprecated: bool) -> String {
        let mut property = sample_property(&normalize_name(label));
        property.label = label.to_string();
        property.deprecated = deprecated;
        let record = self.state.properties.insert(property).await.expect("insert");
        record.id.to_string()
    }

    pub async fn insert_vocabulary(&self, label: &str, deprecated: bool) -> String {
        let mut vocabulary = sample_vocabulary(&normalize_name(label));
        vocabulary.label = label.to_string();
        vocabulary.deprecated = deprecated;
        let record = self.state.vocabularies.insert(vocabulary).await.expect("insert");
        record.id.to_string()
    }

    pub async fn stored_property(&self, id: &str) -> Property {
        let id = Uuid::parse_str(id).expect("uuid");
        self.state
            .properties
            .get_by_id(id)
            .await
            .expect("stored property")
            .document
    }

    pub async fn property_count(&self) -> usize {
        self.state
            .properties
            .list(EntryFilter::all())
            .await
            .expect("list")
            .len()
    }
}
