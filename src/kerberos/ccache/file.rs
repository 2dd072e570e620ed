use crate::error::{Error, Result};
use crate::kerberos::ccache::context::CredentialCache;
use crate::kerberos::ccache::locator::CacheType;
use crate::kerberos::ccache::parser::{parse_ccache_bytes, read_credential, read_header, Header};
use crate::kerberos::ccache::types::*;
use crate::kerberos::ccache::writer::{write_ccache_bytes, write_credential};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const UNIQUE_ATTEMPTS: usize = 32;

/// A ccache stored in a single file, either standalone (`FILE`) or as one
/// member of a `DIR` collection.
#[derive(Debug)]
pub struct FileCache {
    name: String,
    cache_type: CacheType,
    path: PathBuf,
}

pub struct FileCursor {
    reader: BufReader<File>,
}

impl FileCache {
    pub fn open(name: String, cache_type: CacheType, path: PathBuf) -> Self {
        Self {
            name,
            cache_type,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_header(&self) -> Result<Option<Header>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let len = file.metadata().map_err(|e| Error::io(&self.path, e))?.len();
        if len == 0 {
            return Ok(None);
        }

        read_header(&mut BufReader::new(file))
            .map(Some)
            .map_err(|e| Error::parse(&self.path, e))
    }

    fn load(&self) -> Result<Option<CcacheFile>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        if data.is_empty() {
            return Ok(None);
        }

        parse_ccache_bytes(&data)
            .map(Some)
            .map_err(|e| Error::parse(&self.path, e))
    }
}

impl CredentialCache for FileCache {
    type Cursor = FileCursor;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn cache_type(&self) -> &CacheType {
        &self.cache_type
    }

    fn same_cache(&self, other: &Self) -> bool {
        match (fs::canonicalize(&self.path), fs::canonicalize(&other.path)) {
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => self.path == other.path,
        }
    }

    fn principal(&self) -> Result<Option<Principal>> {
        Ok(self.read_header()?.map(|h| h.default_principal))
    }

    fn initialize(&mut self, principal: &Principal) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if self.cache_type == CacheType::DIR && !parent.as_os_str().is_empty() {
                create_private_dir(parent)?;
            }
        }

        let ccache = match self.load()? {
            Some(mut existing) => {
                existing.default_principal = principal.clone();
                existing
            }
            None => CcacheFile {
                version: CCACHE_V4,
                default_principal: principal.clone(),
                credentials: Vec::new(),
            },
        };

        let data = write_ccache_bytes(&ccache).map_err(|e| Error::io(&self.path, e))?;
        replace_contents(&self.path, &data)
    }

    fn store(&mut self, cred: &Credential) -> Result<()> {
        if self.read_header()?.is_none() {
            return Err(Error::NotInitialized(self.name.clone()));
        }

        let file = open_private(&self.path, OpenOptions::new().append(true))?;
        let mut writer = BufWriter::new(file);
        write_credential(&mut writer, cred)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(&self.path, e))
    }

    fn start_seq(&self) -> Result<FileCursor> {
        let file = File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let mut reader = BufReader::new(file);
        read_header(&mut reader).map_err(|e| Error::parse(&self.path, e))?;

        Ok(FileCursor { reader })
    }

    fn next_cred(&self, cursor: &mut FileCursor) -> Result<Option<Credential>> {
        read_credential(&mut cursor.reader).map_err(|e| Error::parse(&self.path, e))
    }

    fn end_seq(&self, cursor: FileCursor) -> Result<()> {
        drop(cursor);
        Ok(())
    }

    fn close(self) -> Result<()> {
        log::trace!("Closed cache {}", self.name);
        Ok(())
    }
}

/// Exclusively creates an empty file named `prefix` plus a random suffix.
pub fn create_unique_file(dir: &Path, prefix: &str) -> Result<PathBuf> {
    let mut rng = rand::thread_rng();

    for _ in 0..UNIQUE_ATTEMPTS {
        let suffix: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        let path = dir.join(format!("{}{}", prefix, suffix));

        match open_private(&path, OpenOptions::new().write(true).create_new(true)) {
            Ok(_) => return Ok(path),
            Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::AlreadyExists => {
                continue
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::io(
        dir,
        io::Error::new(io::ErrorKind::AlreadyExists, "no unique cache name available"),
    ))
}

pub(crate) fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| Error::io(dir, e))
}

/// Writes `data` to a temporary sibling of `path` and renames it over
/// `path`. Until the rename the old contents stay in place.
fn replace_contents(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| Error::io(staged.path(), e))?;
    }
    staged
        .write_all(data)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| Error::io(path, e))?;
    staged.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

fn open_private(path: &Path, options: &mut OpenOptions) -> Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path).map_err(|e| Error::io(path, e))
}
