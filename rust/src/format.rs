//! Format-by-example string formatting.
//!
//! A template mixes placeholders (ASCII letters and digits, conventionally
//! `0`) with literal separators. Formatting walks the template once,
//! copying separators and filling placeholders from the input in order:
//!
//! ```text
//! "10225088359" + "000-0000000-0" -> "102-2508835-9"
//! ```

use once_cell::sync::Lazy;
use thiserror::Error;

/// Template for Dominican tax IDs (RNC).
pub const TAX_ID_TEMPLATE: &str = "000-00000-0";
/// Template for cédulas.
pub const IDENTITY_TEMPLATE: &str = "000-0000000-0";
/// Template for ten-digit phone numbers.
pub const PHONE_TEMPLATE: &str = "(000) 000-0000";

/// Errors that can occur while formatting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Input length mismatch: template expects {expected} characters, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A parsed format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    placeholders: usize,
}

fn is_placeholder(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

impl Template {
    /// Parse a template, counting its placeholders.
    pub fn parse(template: &str) -> Self {
        Self {
            raw: template.to_string(),
            placeholders: template.chars().filter(|&c| is_placeholder(c)).count(),
        }
    }

    /// Number of input characters this template consumes.
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// The template text as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Fill the template with `input`.
    pub fn apply(&self, input: &str) -> Result<String, FormatError> {
        let actual = input.chars().count();
        if actual != self.placeholders {
            log::debug!(
                "template {:?} rejected input of {} characters",
                self.raw,
                actual
            );
            return Err(FormatError::LengthMismatch {
                expected: self.placeholders,
                actual,
            });
        }

        let mut chars = input.chars();
        let mut out = String::with_capacity(self.raw.len() + input.len());
        for t in self.raw.chars() {
            if is_placeholder(t) {
                // Counts were checked above.
                if let Some(c) = chars.next() {
                    out.push(c);
                }
            } else {
                out.push(t);
            }
        }
        Ok(out)
    }
}

static TAX_ID: Lazy<Template> = Lazy::new(|| Template::parse(TAX_ID_TEMPLATE));
static IDENTITY: Lazy<Template> = Lazy::new(|| Template::parse(IDENTITY_TEMPLATE));
static PHONE: Lazy<Template> = Lazy::new(|| Template::parse(PHONE_TEMPLATE));

/// Format `input` with an arbitrary template.
pub fn custom(input: &str, template: &str) -> Result<String, FormatError> {
    Template::parse(template).apply(input)
}

/// `130800035` -> `130-80003-5`
pub fn tax_id(input: &str) -> Result<String, FormatError> {
    TAX_ID.apply(input)
}

/// `10225088359` -> `102-2508835-9`
pub fn identity_number(input: &str) -> Result<String, FormatError> {
    IDENTITY.apply(input)
}

/// `8093458812` -> `(809) 345-8812`
pub fn phone_number(input: &str) -> Result<String, FormatError> {
    PHONE.apply(input)
}
