use crate::error::{Error, Result};
use crate::kerberos::ccache::{CacheType, Context, CredentialCache};
use crate::transfer::engine::{copy_credentials, CopyReport};

/// Counts from one teardown pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Teardown {
    pub closed: usize,
    pub close_failures: usize,
    pub context_released: bool,
}

/// Owns the store context and every cache handle opened during a run.
///
/// `teardown` is the only place handles are released. It may be called any
/// number of times and is also run when the session is dropped.
pub struct Session<C: Context> {
    context: Option<C>,
    source: Option<C::Cache>,
    target: Option<C::Cache>,
    fresh: Option<C::Cache>,
}

impl<C: Context> Session<C> {
    pub fn new(context: C) -> Self {
        Self {
            context: Some(context),
            source: None,
            target: None,
            fresh: None,
        }
    }

    pub fn context(&self) -> Result<&C> {
        self.context.as_ref().ok_or(Error::SessionClosed)
    }

    pub fn open_source(&mut self, name: &str) -> Result<&C::Cache> {
        let cache = self.context()?.resolve(name)?;
        Ok(&*self.source.insert(cache))
    }

    pub fn open_target(&mut self, name: &str) -> Result<&C::Cache> {
        let cache = self.context()?.resolve(name)?;
        Ok(&*self.target.insert(cache))
    }

    /// Creates a new cache of `cache_type` inside the collection `root` and
    /// makes it the write-target. Only one may be opened per session.
    pub fn open_fresh(&mut self, root: &str, cache_type: &CacheType) -> Result<&C::Cache> {
        if self.fresh.is_some() {
            return Err(Error::WriteTargetExists(root.to_string()));
        }

        let context = self.context.as_mut().ok_or(Error::SessionClosed)?;
        context.set_default_name(root);
        let cache = context.new_unique(cache_type)?;
        Ok(&*self.fresh.insert(cache))
    }

    /// The cache records are written to: the fresh cache when one was
    /// created, the target otherwise.
    pub fn write_target(&self) -> Option<&C::Cache> {
        self.fresh.as_ref().or(self.target.as_ref())
    }

    /// Copies the source into the write-target. Refuses when both handles
    /// name the same cache, since records stored there would feed the
    /// source cursor.
    pub fn copy(&mut self) -> Result<CopyReport> {
        let source = self.source.as_ref().ok_or(Error::SessionClosed)?;
        let dest = match self.fresh.as_mut() {
            Some(fresh) => fresh,
            None => self.target.as_mut().ok_or(Error::SessionClosed)?,
        };
        if source.same_cache(dest) {
            return Err(Error::SameCache(source.name()));
        }
        copy_credentials(source, dest)
    }

    pub fn teardown(&mut self) -> Teardown {
        let mut summary = Teardown::default();

        for cache in [self.source.take(), self.target.take(), self.fresh.take()]
            .into_iter()
            .flatten()
        {
            let name = cache.name();
            match cache.close() {
                Ok(()) => summary.closed += 1,
                Err(e) => {
                    summary.close_failures += 1;
                    log::warn!("Closing {}: {}", name, e);
                }
            }
        }

        if let Some(context) = self.context.take() {
            drop(context);
            summary.context_released = true;
        }

        summary
    }
}

impl<C: Context> Drop for Session<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
