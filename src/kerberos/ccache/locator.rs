use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Type tag of a credential cache, e.g. `FILE` or `DIR`.
///
/// Tags are owned strings compared by content, so two tags parsed from
/// different names are equal whenever their text is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheType(String);

impl CacheType {
    pub const FILE: &'static str = "FILE";
    pub const DIR: &'static str = "DIR";

    pub fn new(tag: &str) -> Self {
        Self(tag.to_string())
    }

    pub fn file() -> Self {
        Self::new(Self::FILE)
    }

    pub fn dir() -> Self {
        Self::new(Self::DIR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A single-slot cache holds exactly one principal's tickets.
    pub fn is_single_slot(&self) -> bool {
        self.0 == Self::FILE
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for CacheType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CacheType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A parsed `TYPE:residual` cache name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRef {
    pub cache_type: CacheType,
    pub residual: String,
}

impl fmt::Display for CacheRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.cache_type, self.residual)
    }
}

pub fn parse_cache_name(name: &str) -> Result<CacheRef> {
    if name.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }

    let (cache_type, residual) = match name.split_once(':') {
        // A one-letter prefix is a drive letter, not a type.
        Some((prefix, rest)) if prefix.len() > 1 && !prefix.contains('/') => {
            (CacheType::new(prefix), rest)
        }
        _ => (CacheType::file(), name),
    };

    if residual.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }

    Ok(CacheRef {
        cache_type,
        residual: residual.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum CcacheLocation {
    File(PathBuf),
    /// `DIR:/path`: the collection root, resolved through its primary cache.
    Collection(PathBuf),
    /// `DIR::/path/tktXXXXXX`: one named cache inside a collection.
    Subsidiary(PathBuf),
}

pub fn locate(reference: &CacheRef) -> Result<CcacheLocation> {
    match reference.cache_type.as_str() {
        CacheType::FILE => Ok(CcacheLocation::File(PathBuf::from(&reference.residual))),
        CacheType::DIR => match reference.residual.strip_prefix(':') {
            Some(path) if !path.is_empty() => Ok(CcacheLocation::Subsidiary(PathBuf::from(path))),
            Some(_) => Err(Error::InvalidName(reference.to_string())),
            None => Ok(CcacheLocation::Collection(PathBuf::from(&reference.residual))),
        },
        other => Err(Error::UnsupportedType {
            name: reference.to_string(),
            cache_type: other.to_string(),
        }),
    }
}
