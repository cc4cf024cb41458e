use anyhow::{Result, bail};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where to read a script from: a local file or an `http(s)` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// Parse a source argument
    ///
    /// Anything starting with `http://` or `https://` is a URL, everything
    /// else a path.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            bail!("Source cannot be empty");
        }

        for scheme in ["http://", "https://"] {
            if let Some(rest) = input.strip_prefix(scheme) {
                if rest.is_empty() || rest.starts_with('/') {
                    bail!("URL is missing a host: {input}");
                }
                return Ok(Source::Url(input.to_string()));
            }
        }

        Ok(Source::Path(PathBuf::from(input)))
    }
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}
