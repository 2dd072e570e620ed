//! `DIR` collections: a directory of `tkt*` cache files plus a `primary`
//! file naming the one used when the collection itself is resolved.

use crate::error::{Error, Result};
use crate::kerberos::ccache::file::{create_private_dir, create_unique_file};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PRIMARY_FILE: &str = "primary";
const SUBSIDIARY_PREFIX: &str = "tkt";

/// Path of the collection's primary cache. Falls back to `tkt` when the
/// `primary` file is absent.
pub fn primary_path(dir: &Path) -> Result<PathBuf> {
    let primary = dir.join(PRIMARY_FILE);
    let name = match fs::read_to_string(&primary) {
        Ok(contents) => contents.trim().to_string(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => SUBSIDIARY_PREFIX.to_string(),
        Err(e) => return Err(Error::io(&primary, e)),
    };

    if !is_subsidiary_name(&name) {
        return Err(Error::Resolve {
            name: format!("DIR:{}", dir.display()),
            reason: format!("invalid primary cache name '{}'", name),
        });
    }

    Ok(dir.join(name))
}

pub fn subsidiary_name(path: &Path) -> String {
    format!("DIR::{}", path.display())
}

/// Creates a new empty `tktXXXXXX` cache inside the collection.
pub fn new_unique(dir: &Path) -> Result<PathBuf> {
    create_private_dir(dir)?;
    let path = create_unique_file(dir, SUBSIDIARY_PREFIX)?;
    log::debug!("Created cache {} in collection {}", path.display(), dir.display());
    Ok(path)
}

fn is_subsidiary_name(name: &str) -> bool {
    name.starts_with(SUBSIDIARY_PREFIX) && !name.contains('/') && !name.contains("..")
}
