//! # xcdeps plist
//!
//! Reader for the textual property lists Xcode stores project descriptions in.
//!
//! Two encodings are accepted and both produce the same `serde_json::Value`
//! tree (strings, arrays and objects, with dictionary key order preserved):
//!
//! - **OpenStep** - the native `project.pbxproj` encoding
//!   (`{ key = value; }`, `( a, b, )`, comments, quoted/unquoted strings)
//! - **JSON** - the same tree after conversion to JSON
//!
//! ## Example
//!
//! ```rust
//! use xcdeps_plist::{from_str, Format};
//!
//! let value = from_str("{ rootObject = ABC; objects = {}; }", Format::Auto).unwrap();
//! assert_eq!(value["rootObject"], "ABC");
//! ```

mod error;
mod parser;

use serde_json::Value;
use std::path::Path;

pub use error::{PlistError, Result};

/// Header line written at the top of every OpenStep project file
pub const UTF8_HEADER: &str = "// !$*UTF8*$!";

/// Encoding of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// OpenStep (ASCII) property list
    OpenStep,
    /// JSON document
    Json,
    /// Detect from the content
    #[default]
    Auto,
}

/// Parse an OpenStep property list
pub fn parse(text: &str) -> Result<Value> {
    parser::Parser::new(text).parse_document()
}

/// Parse text in the given format
pub fn from_str(text: &str, format: Format) -> Result<Value> {
    match format {
        Format::OpenStep => parse(text),
        Format::Json => Ok(serde_json::from_str(text)?),
        Format::Auto => {
            if text.trim_start_matches('\u{feff}').starts_with(UTF8_HEADER) {
                return parse(text);
            }
            match serde_json::from_str(text) {
                Ok(value) => Ok(value),
                Err(json_err) => {
                    log::debug!("input is not JSON ({json_err}), reading as OpenStep");
                    parse(text)
                }
            }
        }
    }
}

/// Read and parse a property list file
pub fn from_path(path: impl AsRef<Path>, format: Format) -> Result<Value> {
    let text = std::fs::read_to_string(path.as_ref())?;
    from_str(&text, format)
}
