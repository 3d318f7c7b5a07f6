use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Surface forms the model uses for the placeholder, most specific first.
/// Matching is case-insensitive, so `xyz` and `stock xyz` are covered too.
pub const SURFACE_FORMS: [&str; 5] = [
    "The stock of company, XYZ",
    "The company, XYZ",
    "XYZ stock",
    "stock XYZ",
    "XYZ",
];

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Regex = {
        let alternatives: Vec<String> = SURFACE_FORMS.iter().map(|form| regex::escape(form)).collect();
        RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .expect("placeholder surface forms are valid literals")
    };
}

/// Swaps every placeholder in generated text for the real identity.
#[derive(Debug, Clone)]
pub struct TextSubstitutor {
    identity: String,
}

impl TextSubstitutor {
    pub fn new(company: &str, exchange: &str, symbol: &str) -> Self {
        Self {
            identity: format!(
                " {}({}:{}) ",
                company,
                exchange.to_uppercase(),
                symbol.to_uppercase()
            ),
        }
    }

    /// The replacement text, including its surrounding spaces.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn finalize(&self, text: &str) -> String {
        PLACEHOLDER_PATTERN
            .replace_all(text, self.identity.as_str())
            .into_owned()
    }
}

pub fn finalize(text: &str, company: &str, exchange: &str, symbol: &str) -> String {
    TextSubstitutor::new(company, exchange, symbol).finalize(text)
}
