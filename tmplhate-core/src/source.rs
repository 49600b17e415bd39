//! Location resolution: stdin, local paths and `http(s)://` URLs.
//!
//! # API pattern
//!
//! Classification ([`LocationKind::parse`]) and path expansion
//! ([`LocationKind::path_at`]) are pure. [`open_at`] takes an explicit home
//! and working directory; [`open`] derives both from the process and
//! delegates. Tests use `_at` with a `TempDir`.
//!
//! Every reader returned here owns its underlying handle (file descriptor or
//! HTTP body). Dropping the reader releases it, so callers read to
//! completion with [`read_all`] and let the reader fall out of scope.

use std::fs::File;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Classified location string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKind {
    /// Empty location: read standard input.
    Stdin,
    /// `http://` or `https://` URL, kept verbatim.
    Http(String),
    /// `~/rest`; holds `rest`.
    HomeRelative(PathBuf),
    /// `../rest`; holds the full relative path including the leading `..`.
    CwdRelative(PathBuf),
    /// Any other string, used as a path as-is.
    File(PathBuf),
}

impl LocationKind {
    /// Classify a location string without touching the filesystem.
    pub fn parse(location: &str) -> Self {
        if location.is_empty() {
            LocationKind::Stdin
        } else if location.starts_with("http://") || location.starts_with("https://") {
            LocationKind::Http(location.to_string())
        } else if let Some(rest) = location.strip_prefix("~/") {
            LocationKind::HomeRelative(PathBuf::from(rest))
        } else if location.starts_with("../") {
            LocationKind::CwdRelative(PathBuf::from(location))
        } else {
            LocationKind::File(PathBuf::from(location))
        }
    }

    /// Filesystem path this location refers to, or `None` for stdin and URLs.
    ///
    /// `home` is only consulted for [`LocationKind::HomeRelative`]; a missing
    /// home directory there is an error.
    pub fn path_at(&self, home: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>, SourceError> {
        match self {
            LocationKind::Stdin | LocationKind::Http(_) => Ok(None),
            LocationKind::HomeRelative(rest) => match home {
                Some(home) => Ok(Some(home.join(rest))),
                None => Err(SourceError::HomeNotFound {
                    location: format!("~/{}", rest.display()),
                }),
            },
            LocationKind::CwdRelative(rel) => Ok(Some(cwd.join(rel))),
            LocationKind::File(path) => Ok(Some(path.clone())),
        }
    }
}

/// Open `location` relative to an explicit `home` and `cwd`.
pub fn open_at(
    location: &str,
    home: Option<&Path>,
    cwd: &Path,
) -> Result<Box<dyn Read>, SourceError> {
    let kind = LocationKind::parse(location);
    match &kind {
        LocationKind::Stdin => open_stdin(),
        LocationKind::Http(url) => open_http(url),
        _ => {
            let path = kind
                .path_at(home, cwd)?
                .unwrap_or_else(|| PathBuf::from(location));
            tracing::debug!(path = %path.display(), "opening file");
            let file = File::open(&path).map_err(|source| SourceError::File { path, source })?;
            Ok(Box::new(file))
        }
    }
}

/// [`open_at`] using the process home directory and working directory.
pub fn open(location: &str) -> Result<Box<dyn Read>, SourceError> {
    let cwd = std::env::current_dir().map_err(|source| SourceError::File {
        path: PathBuf::from("."),
        source,
    })?;
    open_at(location, dirs::home_dir().as_deref(), &cwd)
}

/// Read `reader` to completion and release it.
///
/// `location` only labels the error.
pub fn read_all(mut reader: Box<dyn Read>, location: &str) -> Result<Vec<u8>, SourceError> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|source| SourceError::Read {
            location: display_location(location).to_string(),
            source,
        })?;
    Ok(buf)
}

/// Human label for a location; the empty string reads as `stdin`.
pub fn display_location(location: &str) -> &str {
    if location.is_empty() {
        "stdin"
    } else {
        location
    }
}

fn open_stdin() -> Result<Box<dyn Read>, SourceError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(SourceError::StdinIsTerminal);
    }
    tracing::debug!("reading stdin");
    Ok(Box::new(stdin))
}

fn open_http(url: &str) -> Result<Box<dyn Read>, SourceError> {
    tracing::debug!(url, "opening http location");
    let response = ureq::get(url).call().map_err(|e| SourceError::Http {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    Ok(Box::new(response.into_reader()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
