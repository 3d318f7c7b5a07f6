pub mod error;
pub mod models;
pub mod quotes;
pub mod types;

pub use error::{Error, Result};
pub use models::{ChatMessage, FragmentStream, Role, TextGenerator};
pub use quotes::QuoteSource;
pub use types::{Article, PeriodLabel, Prompt, Quote, QuoteSnapshot, NOT_AVAILABLE};
