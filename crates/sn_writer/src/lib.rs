pub mod newsroom;
pub mod period;
pub mod prompt;
pub mod substitute;

pub use newsroom::{Newsroom, Report};
pub use period::{classify, classify_instant};
pub use prompt::{PromptBuilder, PLACEHOLDER};
pub use substitute::{finalize, TextSubstitutor};

pub mod prelude {
    pub use super::{Newsroom, PromptBuilder, Report, TextSubstitutor};
    pub use sn_core::{Article, Error, PeriodLabel, Quote, QuoteSnapshot, Result};
}
