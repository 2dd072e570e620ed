use crate::error::{Error, Result};
use crate::kerberos::ccache::{Credential, CredentialCache};
use crate::kerberos::display::get_credential_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyReport {
    pub copied: usize,
}

enum Step {
    Read,
    Write(Credential),
    Finish(Option<Error>),
}

/// Replays every record of `source`, in order, into `dest`.
///
/// A failed write aborts at once and leaves the records already written in
/// place. A failed read ends the sequence and is reported after the cursor
/// has been released.
pub fn copy_credentials<S, W>(source: &S, dest: &mut W) -> Result<CopyReport>
where
    S: CredentialCache,
    W: CredentialCache,
{
    let mut cursor = source.start_seq().map_err(|e| Error::StartSeq {
        cache: source.name(),
        source: Box::new(e),
    })?;

    let mut copied = 0;
    let mut step = Step::Read;
    let failure = loop {
        step = match step {
            Step::Read => match source.next_cred(&mut cursor) {
                Ok(Some(cred)) => Step::Write(cred),
                Ok(None) => Step::Finish(None),
                Err(e) => Step::Finish(Some(Error::Read {
                    cache: source.name(),
                    copied,
                    source: Box::new(e),
                })),
            },
            Step::Write(cred) => {
                replay(dest, &cred)?;
                copied += 1;
                Step::Read
            }
            Step::Finish(failure) => break failure,
        };
    };

    if let Err(e) = source.end_seq(cursor) {
        log::warn!("Closing sequence on {}: {}", source.name(), e);
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(CopyReport { copied }),
    }
}

/// Points `dest` at the record's client and stores the record.
pub fn replay<W: CredentialCache>(dest: &mut W, cred: &Credential) -> Result<()> {
    log::info!("Copying credential: {}", get_credential_summary(cred));

    dest.initialize(&cred.client)
        .map_err(|e| Error::Initialize {
            cache: dest.name(),
            principal: cred.client.to_string(),
            source: Box::new(e),
        })?;

    dest.store(cred).map_err(|e| Error::Store {
        cache: dest.name(),
        client: cred.client.to_string(),
        server: cred.server.to_string(),
        source: Box::new(e),
    })
}
