//! Copying every credential of one cache into another.

pub mod engine;
pub mod policy;
pub mod session;

#[cfg(test)]
mod mock;

pub use engine::{copy_credentials, replay, CopyReport};
pub use policy::{choose_route, WriteRoute};
pub use session::{Session, Teardown};

use crate::error::{Error, Result};
use crate::kerberos::ccache::{Context, CredentialCache};

#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Source cache name; the context default when unset.
    pub source: Option<String>,
    /// Target cache name. Required.
    pub target: Option<String>,
    /// Write into an occupied target instead of refusing or branching.
    pub force: bool,
}

/// Runs one copy. Every handle opened on the way is released before this
/// returns, whatever the outcome.
pub fn run<C: Context>(context: C, request: &Request) -> Result<CopyReport> {
    let target_name = request.target.clone().ok_or(Error::MissingTarget)?;

    let mut session = Session::new(context);
    let result = transfer(&mut session, &target_name, request);
    let summary = session.teardown();
    log::debug!(
        "Released {} cache handle(s), {} close failure(s)",
        summary.closed,
        summary.close_failures
    );

    result
}

fn transfer<C: Context>(
    session: &mut Session<C>,
    target_name: &str,
    request: &Request,
) -> Result<CopyReport> {
    let source_name = match &request.source {
        Some(name) => name.clone(),
        None => session.context()?.default_name(),
    };
    log::info!("Source cache: {}", source_name);

    let source = session.open_source(&source_name)?;
    let source_principal = source
        .principal()?
        .ok_or_else(|| Error::NoPrincipal(source_name.clone()))?;
    log::debug!("Source principal: {}", source_principal);

    log::info!("Target cache: {}", target_name);
    let target = session.open_target(target_name)?;
    let target_type = target.cache_type().clone();
    log::info!("Target cache type: {}", target_type);

    let existing = target.principal()?;
    match &existing {
        Some(principal) => log::warn!("Existing target cache principal: {}", principal),
        None => log::debug!("No existing principal found in target cache"),
    }

    match choose_route(target_name, &target_type, existing.as_ref(), request.force)? {
        WriteRoute::Direct => {}
        WriteRoute::NewInCollection => {
            let fresh = session.open_fresh(target_name, &target_type)?;
            log::info!("Generated new cache: {}", fresh.name());
        }
    }

    let report = session.copy()?;
    if let Some(dest) = session.write_target() {
        log::info!("Copied {} credential(s) to {}", report.copied, dest.name());
    }

    Ok(report)
}
