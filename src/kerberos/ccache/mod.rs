pub mod collection;
pub mod context;
pub mod file;
pub mod locator;
pub mod parser;
pub mod types;
pub mod writer;

pub use context::{Context, CredentialCache, NativeContext};
pub use file::FileCache;
pub use locator::{locate, parse_cache_name, CacheRef, CacheType, CcacheLocation};
pub use parser::{parse_ccache_bytes, ParseError};
pub use types::*;
pub use writer::write_ccache_bytes;
