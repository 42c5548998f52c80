pub mod core;
pub mod level;
pub mod search;

// Re-export the main types for convenience
pub use self::core::{Vocabulary, VocabularyEntry};
pub use self::level::HskLevel;
pub use self::search::{matches_query, normalize_pinyin};
