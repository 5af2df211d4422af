//! Vocabulary source: a local JSON file or a JSON document served over HTTP.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use super::{VocabItem, Vocabulary};
use crate::error::VocabError;

/// Where the word list is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabSource {
    File(PathBuf),
    Url(Url),
}

impl VocabSource {
    /// Interpret a configured source string. `http://` and `https://`
    /// prefixes select [`VocabSource::Url`], anything else is a file path.
    pub fn parse(raw: &str) -> Result<Self, VocabError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(VocabError::InvalidSource(raw.to_string()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|_| VocabError::InvalidSource(raw.to_string()))?;
            Ok(Self::Url(url))
        } else {
            Ok(Self::File(PathBuf::from(raw)))
        }
    }

    /// Resolve a relative file path against `base`. URLs are returned unchanged.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            Self::File(path) if path.is_relative() => Self::File(base.join(path)),
            other => other,
        }
    }

    /// Load the vocabulary.
    ///
    /// # Errors
    /// Any failure is fatal for the session: missing file, unreachable host,
    /// non-success HTTP status, or a payload that is not a JSON array of items.
    pub async fn load(&self) -> Result<Vocabulary, VocabError> {
        let items = match self {
            Self::File(path) => read_file(path)?,
            Self::Url(url) => fetch(url).await?,
        };
        tracing::info!(source = %self, count = items.len(), "loaded vocabulary");
        Ok(Vocabulary::new(items))
    }

    /// Blocking variant of [`load`](Self::load) for synchronous callers.
    ///
    /// Spins up a current-thread runtime only when an HTTP fetch is needed.
    pub fn load_blocking(&self) -> Result<Vocabulary, VocabError> {
        match self {
            Self::File(path) => {
                let items = read_file(path)?;
                tracing::info!(source = %self, count = items.len(), "loaded vocabulary");
                Ok(Vocabulary::new(items))
            }
            Self::Url(url) => {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(VocabError::Runtime)?;
                runtime.block_on(self.load())
            }
        }
    }
}

impl fmt::Display for VocabSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<VocabItem>, VocabError> {
    let content = std::fs::read_to_string(path).map_err(|source| VocabError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

async fn fetch(url: &Url) -> Result<Vec<VocabItem>, VocabError> {
    let unreachable = |source| VocabError::Unreachable {
        url: url.to_string(),
        source,
    };
    let response = reqwest::get(url.clone()).await.map_err(unreachable)?;
    let status = response.status();
    if !status.is_success() {
        return Err(VocabError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().await.map_err(unreachable)?;
    Ok(serde_json::from_str(&body)?)
}
