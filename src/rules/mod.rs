// Business rules applied to entries before they reach the store
pub mod normalize;
pub mod vocabulary;

pub use normalize::normalize_name;
pub use vocabulary::validate_controlled_vocabulary;
