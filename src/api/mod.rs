// Request payload schemas and response shaping
pub mod ctrl_voc;
pub mod format;
pub mod property;
pub mod query;
pub mod validate;

pub use ctrl_voc::CtrlVocPayload;
pub use format::{CreatedResponse, MessageResponse, PropertyView, VocabularyResolver};
pub use property::PropertyPayload;
pub use query::{DeleteQuery, ListQuery};
