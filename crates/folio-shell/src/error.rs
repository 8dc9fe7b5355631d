use folio_dom::DomError;
use thiserror::Error;

use crate::registry::LibraryError;

/// Errors returned by the shell entry points. Only a missing mount point is fatal.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The mount point is missing from the page shell.
    #[error("cannot find #{0} element in the document")]
    MissingMountPoint(String),

    /// The configured default page token is empty.
    #[error("default page token must not be empty")]
    InvalidDefaultPage,

    #[error("invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Failure of a single enhancer activation. Logged by the registry, never propagated.
#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Dom(#[from] DomError),
}
