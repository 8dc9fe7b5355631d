//! Owned UI state of the shell.

use crate::token::PageToken;

/// The current page token. Written only by the router.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    current: Option<PageToken>,
}

impl NavigationState {
    /// `None` until the first route has been evaluated.
    pub fn current(&self) -> Option<&PageToken> {
        self.current.as_ref()
    }

    pub(crate) fn set(&mut self, token: PageToken) {
        self.current = Some(token);
    }
}

/// All mutable UI state, created at start and kept for the whole session.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    pub(crate) navigation: NavigationState,
    pub(crate) mobile_nav_open: bool,
    /// Incremented every time the mount point content is replaced.
    pub(crate) generation: u64,
}

impl ShellState {
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn current_page(&self) -> Option<&PageToken> {
        self.navigation.current()
    }

    pub fn mobile_nav_open(&self) -> bool {
        self.mobile_nav_open
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
