pub mod ctrl_voc;
pub mod property;

pub use ctrl_voc::{ControlledVocabulary, VocabularyItem};
pub use property::{Property, VocabularyType, CV_DATA_TYPE};

use serde::{de::DeserializeOwned, Serialize};

/// A persisted entity stored as one document per record
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection (table) the documents live in
    const COLLECTION: &'static str;

    fn name(&self) -> &str;

    fn is_deprecated(&self) -> bool;

    fn set_deprecated(&mut self, deprecated: bool);
}
