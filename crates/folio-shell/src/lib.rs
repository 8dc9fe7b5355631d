//! Hash router and page-fragment lifecycle for the Folio site shell.
//!
//! The [`Shell`] owns the persistent page document and drives everything
//! that happens when the URL fragment changes:
//! - the [`Router`] turns the fragment identifier into a [`PageToken`]
//! - the [`FragmentLoader`] fetches `pages/<token>.html` and discards stale completions
//! - navigation links are synced, the [`ModuleRegistry`] re-runs every enhancer,
//!   and in-page anchors are rebound over the fresh markup
//!
//! The host feeds discrete events (load, hash change, click, scroll, fetch
//! completion via [`Shell::pump`]) and applies the scroll requests the shell
//! records on its [`Viewport`].

pub mod anchors;
pub mod chrome;
pub mod enhancers;
mod error;
pub mod events;
pub mod loader;
pub mod location;
pub mod nav_sync;
pub mod registry;
pub mod router;
mod shell;
pub mod state;
pub mod token;

pub use error::{EnhanceError, ShellError};
pub use events::{ClickOutcome, Handler};
pub use loader::{FragmentLoader, LoadOutcome};
pub use location::{Location, ScrollBehavior, ScrollRequest, Viewport};
pub use registry::{
    Capabilities, Capability, Enhancer, LibraryCall, LibraryError, LibraryHost, LoggingHost,
    Marker, ModuleRegistry, PassReport,
};
pub use router::{RouteTrigger, Router};
pub use shell::Shell;
pub use state::{NavigationState, ShellState};
pub use token::PageToken;
