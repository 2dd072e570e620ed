use crate::kerberos::ccache::ParseError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("KRB5CCNEW is not set in the environment and no --target-cache was given")]
    MissingTarget,

    #[error("invalid cache name '{0}'")]
    InvalidName(String),

    #[error("{cache_type}: ccache type not supported ({name})")]
    UnsupportedType { name: String, cache_type: String },

    #[error("cannot resolve cache {name}: {reason}")]
    Resolve { name: String, reason: String },

    #[error("no principal found in source cache {0}")]
    NoPrincipal(String),

    #[error("cache {cache} is of type {cache_type} and contains principal {principal}, refusing to overwrite it")]
    WouldOverwrite {
        cache: String,
        cache_type: String,
        principal: String,
    },

    #[error("source cache {0} is also the write-target, refusing to copy it onto itself")]
    SameCache(String),

    #[error("write-target for {0} already created")]
    WriteTargetExists(String),

    #[error("cache {0} has not been initialized")]
    NotInitialized(String),

    #[error("cannot read credentials from {cache}: {source}")]
    StartSeq {
        cache: String,
        source: Box<Error>,
    },

    #[error("reading {cache} failed after {copied} credential(s): {source}")]
    Read {
        cache: String,
        copied: usize,
        source: Box<Error>,
    },

    #[error("cannot initialize {cache} for {principal}: {source}")]
    Initialize {
        cache: String,
        principal: String,
        source: Box<Error>,
    },

    #[error("cannot store credential {client} -> {server} in {cache}: {source}")]
    Store {
        cache: String,
        client: String,
        server: String,
        source: Box<Error>,
    },

    #[error("session already torn down")]
    SessionClosed,

    #[error("{path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("{path}: {source}")]
    Parse { path: String, source: ParseError },
}

impl Error {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub(crate) fn parse(path: impl AsRef<std::path::Path>, source: ParseError) -> Self {
        Self::Parse {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
