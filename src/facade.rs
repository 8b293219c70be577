use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ParseError, RenderError};
use crate::flavour::Flavour;
use crate::model::Configuration;
use crate::parser;
use crate::render::{RenderPolicy, Renderer};

/// Text encoding for a loaded/saved file. UTF-8 is the one encoding
/// callers need to rely on in practice, with a lossy fallback for files
/// that aren't strictly valid UTF-8, rather than pulling in a dedicated
/// codec crate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encoding {
    Utf8,
    Utf8Lossy,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Utf8
    }
}

/// An error from the façade's `load`/`save` helpers: either I/O failed, or
/// the bytes that were read couldn't be decoded (`Encoding::Utf8` only).
#[derive(Debug)]
pub enum FacadeError {
    Io(io::Error),
    Parse(ParseError),
    Render(RenderError),
    InvalidEncoding,
}

impl std::fmt::Display for FacadeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FacadeError::Io(e) => write!(f, "{}", e),
            FacadeError::Parse(e) => write!(f, "{}", e),
            FacadeError::Render(e) => write!(f, "{}", e),
            FacadeError::InvalidEncoding => write!(f, "input is not valid UTF-8"),
        }
    }
}

impl std::error::Error for FacadeError {}

impl From<io::Error> for FacadeError {
    fn from(e: io::Error) -> Self {
        FacadeError::Io(e)
    }
}

/// Reads `path`, decodes it per `encoding`, and parses it under `flavour`.
/// The file handle is scoped to this call and released on every exit path
/// via `std::fs::read`'s own `Drop`.
pub fn load(path: impl AsRef<Path>, encoding: Encoding, flavour: &Flavour) -> Result<Configuration, FacadeError> {
    let path = path.as_ref();
    log::debug!("loading ini configuration from {}", path.display());
    let bytes = fs::read(path)?;
    let text = match encoding {
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| FacadeError::InvalidEncoding)?,
        Encoding::Utf8Lossy => String::from_utf8_lossy(&bytes).into_owned(),
    };
    log::trace!("read {} bytes from {}", text.len(), path.display());
    parser::parse(&text, flavour).map_err(FacadeError::Parse)
}

/// Renders `config` under `flavour`/`policy` and writes it to `path`,
/// replacing the file's previous contents.
pub fn save(
    config: &Configuration,
    path: impl AsRef<Path>,
    flavour: &Flavour,
    policy: RenderPolicy,
) -> Result<(), FacadeError> {
    let path = path.as_ref();
    log::debug!("saving ini configuration to {}", path.display());
    let rendered = Renderer::new(flavour, policy).render(config).map_err(FacadeError::Render)?;
    fs::write(path, rendered)?;
    log::trace!("wrote configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips_through_a_real_file() {
        let _ = env_logger::try_init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let flavour = Flavour::default();

        let mut config = Configuration::new();
        config.set_value("app_name", "My App", None);
        config.ensure_section("database").set_value("provider", "mysql");

        save(&config, &path, &flavour, RenderPolicy::AlwaysQuoted).unwrap();
        let loaded = load(&path, Encoding::Utf8, &flavour).unwrap();

        assert_eq!(config.as_mapping(), loaded.as_mapping());
    }

    #[test]
    fn load_missing_file_surfaces_io_error() {
        let _ = env_logger::try_init();
        let flavour = Flavour::default();
        let err = load("/nonexistent/path/does-not-exist.ini", Encoding::Utf8, &flavour).unwrap_err();
        assert!(matches!(err, FacadeError::Io(_)));
    }

    #[test]
    fn load_invalid_utf8_is_reported_as_invalid_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.ini");
        fs::write(&path, [0xFFu8, 0xFE, 0x00]).unwrap();

        let flavour = Flavour::default();
        let err = load(&path, Encoding::Utf8, &flavour).unwrap_err();
        assert!(matches!(err, FacadeError::InvalidEncoding));

        // Lossy decoding never fails on the encoding itself; whatever
        // downstream parse error the replacement characters provoke is a
        // distinct failure mode from `InvalidEncoding`.
        let lossy_result = load(&path, Encoding::Utf8Lossy, &flavour);
        assert!(!matches!(lossy_result, Err(FacadeError::InvalidEncoding)));
    }
}
