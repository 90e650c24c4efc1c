//! Diagnostics reported while reading diagram text.
//!
//! Parsing never fails as a whole. Lines the grammar does not understand,
//! relationships whose endpoints cannot be resolved and elements the store
//! refuses are skipped, and each skip is recorded as a warning
//! [`Diagnostic`] in the parse output.
//!
//! # Example
//!
//! ```
//! # use umlbridge_parser::{Span, error::{Diagnostic, ErrorCode}};
//! let diag = Diagnostic::warning("unresolved endpoint `Dog`")
//!     .with_code(ErrorCode::W101)
//!     .with_label(Span::new(10..24), "relationship dropped")
//!     .with_help("declare `Dog` before using it in a relationship");
//!
//! assert_eq!(diag.to_string(), "warning[W101]: unresolved endpoint `Dog`");
//! ```

mod diagnostic;
mod error_code;
mod label;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
