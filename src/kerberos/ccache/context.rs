use crate::error::{Error, Result};
use crate::kerberos::ccache::collection;
use crate::kerberos::ccache::file::{create_unique_file, FileCache};
use crate::kerberos::ccache::locator::{locate, parse_cache_name, CacheType, CcacheLocation};
use crate::kerberos::ccache::types::{Credential, Principal};
use crate::kerberos::env;
use std::path::Path;

/// An open credential cache.
///
/// Handles own their resources; `close` consumes the handle so a closed
/// cache cannot be used again.
pub trait CredentialCache {
    /// Sequence cursor state, only meaningful for the cache that created it.
    type Cursor;

    /// Full `TYPE:residual` name of the cache.
    fn name(&self) -> String;

    fn cache_type(&self) -> &CacheType;

    /// Whether `other` refers to the same underlying cache as `self`.
    fn same_cache(&self, other: &Self) -> bool {
        self.name() == other.name()
    }

    /// Default principal, or `None` when the cache is missing or empty.
    fn principal(&self) -> Result<Option<Principal>>;

    /// Sets the default principal. Records already in the cache are kept.
    fn initialize(&mut self, principal: &Principal) -> Result<()>;

    fn store(&mut self, cred: &Credential) -> Result<()>;

    fn start_seq(&self) -> Result<Self::Cursor>;

    /// Next record, or `None` at the end of the sequence.
    fn next_cred(&self, cursor: &mut Self::Cursor) -> Result<Option<Credential>>;

    fn end_seq(&self, cursor: Self::Cursor) -> Result<()>;

    fn close(self) -> Result<()>;
}

/// Entry point to the credential store: name resolution and cache creation.
pub trait Context {
    type Cache: CredentialCache;

    fn default_name(&self) -> String;

    fn set_default_name(&mut self, name: &str);

    fn resolve(&self, name: &str) -> Result<Self::Cache>;

    /// Creates an empty cache with a fresh name. Collection types create it
    /// inside the collection named by the current default name.
    fn new_unique(&self, cache_type: &CacheType) -> Result<Self::Cache>;
}

/// Context backed by ccache files on the local filesystem.
#[derive(Debug, Clone)]
pub struct NativeContext {
    default_name: String,
}

impl NativeContext {
    pub fn new() -> Self {
        Self::with_default_name(&env::default_cache_name())
    }

    pub fn with_default_name(name: &str) -> Self {
        Self {
            default_name: name.to_string(),
        }
    }
}

impl Default for NativeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for NativeContext {
    type Cache = FileCache;

    fn default_name(&self) -> String {
        self.default_name.clone()
    }

    fn set_default_name(&mut self, name: &str) {
        self.default_name = name.to_string();
    }

    fn resolve(&self, name: &str) -> Result<FileCache> {
        let reference = parse_cache_name(name)?;

        match locate(&reference)? {
            CcacheLocation::File(path) => {
                check_parent(name, &path)?;
                if path.is_dir() {
                    return Err(Error::Resolve {
                        name: name.to_string(),
                        reason: "path is a directory".to_string(),
                    });
                }
                Ok(FileCache::open(reference.to_string(), CacheType::file(), path))
            }
            CcacheLocation::Collection(dir) => {
                if dir.exists() && !dir.is_dir() {
                    return Err(Error::Resolve {
                        name: name.to_string(),
                        reason: "collection root is not a directory".to_string(),
                    });
                }
                let path = collection::primary_path(&dir)?;
                Ok(FileCache::open(
                    collection::subsidiary_name(&path),
                    CacheType::dir(),
                    path,
                ))
            }
            CcacheLocation::Subsidiary(path) => {
                check_parent(name, &path)?;
                Ok(FileCache::open(
                    collection::subsidiary_name(&path),
                    CacheType::dir(),
                    path,
                ))
            }
        }
    }

    fn new_unique(&self, cache_type: &CacheType) -> Result<FileCache> {
        match cache_type.as_str() {
            CacheType::FILE => {
                let path = create_unique_file(&std::env::temp_dir(), "krb5cc_")?;
                let name = format!("FILE:{}", path.display());
                Ok(FileCache::open(name, CacheType::file(), path))
            }
            CacheType::DIR => {
                let reference = parse_cache_name(&self.default_name)?;
                let dir = match locate(&reference) {
                    Ok(CcacheLocation::Collection(dir)) => dir,
                    Ok(CcacheLocation::Subsidiary(path)) => path
                        .parent()
                        .map(Path::to_path_buf)
                        .ok_or_else(|| Error::InvalidName(self.default_name.clone()))?,
                    _ => {
                        return Err(Error::Resolve {
                            name: self.default_name.clone(),
                            reason: "default cache is not a DIR collection".to_string(),
                        })
                    }
                };
                let path = collection::new_unique(&dir)?;
                Ok(FileCache::open(
                    collection::subsidiary_name(&path),
                    CacheType::dir(),
                    path,
                ))
            }
            other => Err(Error::UnsupportedType {
                name: self.default_name.clone(),
                cache_type: other.to_string(),
            }),
        }
    }
}

fn check_parent(name: &str, path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(Error::Resolve {
            name: name.to_string(),
            reason: format!("directory {} does not exist", parent.display()),
        }),
        _ => Ok(()),
    }
}
