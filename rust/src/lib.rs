//! cedula: Dominican cédula validation and format-by-example helpers.
//!
//! # Checksum
//!
//! A cédula is 11 digits; the last one is a check digit derived from a
//! weighted sum of the first ten (odd positions doubled, two-digit
//! products folded to their digit sum).
//!
//! # Example
//!
//! ```
//! use cedula::{cash, identity_number, is_valid, phone_number};
//!
//! assert!(is_valid("10225088359"));
//! assert!(!is_valid("10225088358"));
//!
//! assert_eq!(identity_number("10225088359").unwrap(), "102-2508835-9");
//! assert_eq!(phone_number("8093458812").unwrap(), "(809) 345-8812");
//! assert_eq!(cash(4623.0), "4,623");
//! ```

mod cedula;
mod currency;
mod format;

pub use cedula::{
    CEDULA_LEN, Cedula, CedulaError, CedulaGen, check_digit, is_valid, normalize, parse_cedula,
};
pub use currency::{FractionDigits, cash, currency};
pub use format::{
    FormatError, IDENTITY_TEMPLATE, PHONE_TEMPLATE, TAX_ID_TEMPLATE, Template, custom,
    identity_number, phone_number, tax_id,
};
