mod assistant;
pub mod prompt;

pub use assistant::{
    Assistant, DEFAULT_TONE, LanguageModel, MAX_CONTENT_CHARS, NO_CONTENT_MESSAGE, truncate,
};
