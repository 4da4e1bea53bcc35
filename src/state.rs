use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::database::models::{ControlledVocabulary, Property};
use crate::database::{Repository, Stores};

/// Shared handler state: the two collections and the credential verifier
#[derive(Clone)]
pub struct AppState {
    pub properties: Arc<dyn Repository<Property>>,
    pub vocabularies: Arc<dyn Repository<ControlledVocabulary>>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(stores: Stores, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            properties: stores.properties,
            vocabularies: stores.vocabularies,
            verifier,
        }
    }
}
