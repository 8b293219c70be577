//! A round-tripping `.ini` configuration library.
//!
//! Parses human-authored INI text into a [`Configuration`] tree, lets
//! callers query and mutate that tree, and re-serializes it back to text
//! through a [`Renderer`], preserving comments, per-value presentation
//! style, and section order to the extent practical. It targets tooling
//! that reads, modifies, and saves back user-maintained configuration
//! files, as opposed to one-shot readers that discard layout.
//!
//! The library does not interpret values: no typed coercion, no variable
//! interpolation, no cross-section references. It does not guarantee
//! byte-for-byte fidelity of the original file, only logical fidelity plus
//! best-effort preservation of comments, escape style, and value style.
//!
//! ```
//! use inirt::{Flavour, RenderPolicy, Renderer, parse};
//!
//! let flavour = Flavour::default();
//! let config = parse("app_name = My App\n[database]\nprovider = mysql\n", &flavour).unwrap();
//! assert_eq!(config.get_value("provider", Some("database")), Some("mysql"));
//!
//! let rendered = Renderer::new(&flavour, RenderPolicy::PreferSource).render(&config).unwrap();
//! assert!(rendered.contains("[database]"));
//! ```

mod error;
mod facade;
mod flavour;
mod lexer;
mod model;
mod parser;
mod position;
mod render;

#[cfg(test)]
mod tests;

pub use error::{Encountered, LookupError, ParseError, ParseErrorKind, PositionContext, RenderError};
pub use facade::{load, save, Encoding, FacadeError};
pub use flavour::Flavour;
pub use model::{Configuration, Property, Section, ValueStyle, UNNAMED_SECTION_NAME};
pub use parser::parse;
pub use position::Position;
pub use render::{RenderPolicy, Renderer};
