use folio_config::FolioConfig;
use folio_dom::{Document, Listeners, NodeId};
use folio_io::FetchService;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::{
    anchors::{self, AnchorAction},
    chrome::{self, Chrome},
    enhancers::{apply_filter, fill_progress},
    error::ShellError,
    events::{ClickEvent, ClickOutcome, Handler},
    loader::{FragmentLoader, LoadOutcome, not_found_panel},
    location::{Location, ScrollBehavior, ScrollRequest, Viewport},
    nav_sync::sync_active_nav,
    registry::{Capabilities, LibraryHost, ModuleRegistry, PassReport, PassTarget},
    router::{RouteTrigger, Router},
    state::ShellState,
    token::PageToken,
};

/// The persistent page shell and the single owner of all navigation state.
pub struct Shell<F: FetchService, H: LibraryHost> {
    config: FolioConfig,
    doc: Document,
    mount: NodeId,
    state: ShellState,
    location: Location,
    viewport: Viewport,
    listeners: Listeners<Handler>,
    router: Router,
    loader: FragmentLoader,
    registry: ModuleRegistry,
    chrome: Chrome,
    capabilities: Capabilities,
    fetch: F,
    host: H,
}

impl<F: FetchService, H: LibraryHost> Shell<F, H> {
    /// Take ownership of the page document at `url`.
    ///
    /// Fails when the mount point is missing or the default page is empty.
    /// The host's capabilities are recorded here and never queried again.
    pub fn new(
        config: FolioConfig,
        doc: Document,
        url: Url,
        fetch: F,
        host: H,
    ) -> Result<Self, ShellError> {
        let mount = doc
            .element_by_id(&config.shell.app_id)
            .ok_or_else(|| ShellError::MissingMountPoint(config.shell.app_id.clone()))?;
        let router = Router::new(&config.router.default_page)?;
        let loader = FragmentLoader::new(
            config.router.pages_path.clone(),
            config.router.fragment_suffix.clone(),
        );
        let capabilities: Capabilities = host.capabilities().into_iter().collect();
        let mut listeners = Listeners::new();
        let chrome = Chrome::install(&doc, &mut listeners, &config);
        debug!(%url, default_page = router.default_page(), "shell created");

        Ok(Self {
            config,
            doc,
            mount,
            state: ShellState::default(),
            location: Location::new(url),
            viewport: Viewport::default(),
            listeners,
            router,
            loader,
            registry: ModuleRegistry::standard(),
            chrome,
            capabilities,
            fetch,
            host,
        })
    }

    /// Replace the standard enhancer list.
    pub fn with_registry(mut self, registry: ModuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The page finished loading: drop the preloader, evaluate the chrome
    /// once, bind the shell anchors and route the initial fragment.
    pub fn on_load(&mut self) -> Result<(), ShellError> {
        self.chrome.remove_preloader(&mut self.doc)?;
        self.chrome.on_scroll(&mut self.doc, self.viewport.scroll_y())?;
        self.bind_anchors();
        self.route(RouteTrigger::InitialLoad)
    }

    /// Change the fragment identifier from outside (address bar, history).
    /// The resulting route runs on the next [`pump`](Self::pump).
    pub fn set_location_hash(&mut self, hash: &str) -> bool {
        self.location.set_hash(hash)
    }

    /// Route every queued hash change, then apply finished fetches.
    /// Returns the number of loads installed into the mount point.
    pub fn pump(&mut self) -> Result<usize, ShellError> {
        while self.location.take_hash_change() {
            self.route(RouteTrigger::HashChange)?;
        }
        let mut applied = 0;
        for result in self.fetch.poll() {
            if let Some(outcome) = self.loader.accept(result) {
                self.install(outcome)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// True when no hash change is queued and the latest load has landed.
    pub fn is_settled(&self) -> bool {
        !self.location.has_pending_change() && !self.loader.is_loading()
    }

    /// Dispatch a click on `target` through its ancestors, then perform the
    /// default action of the enclosing anchor unless a handler prevented it.
    pub fn click(&mut self, target: NodeId) -> Result<ClickOutcome, ShellError> {
        let mut event = ClickEvent::new(target);
        let mut outcome = ClickOutcome::default();
        let generation = self.state.generation;

        'dispatch: for node in self.doc.element_path(target) {
            event.current_target = node;
            for handler in self.listeners.handlers(node) {
                self.run_handler(handler, &mut event)?;
                outcome.handlers_run += 1;
                if self.state.generation != generation {
                    // node ids on the remaining path may now name other nodes
                    trace!(handlers_run = outcome.handlers_run, "content replaced during click");
                    break 'dispatch;
                }
                if event.immediate_stopped() {
                    break;
                }
            }
            if event.propagation_stopped() {
                break;
            }
        }

        outcome.default_prevented = event.default_prevented();
        if !outcome.default_prevented && self.state.generation == generation {
            outcome.navigated_to = self.default_action(target);
        }
        Ok(outcome)
    }

    pub fn on_scroll(&mut self, scroll_y: f64) -> Result<(), ShellError> {
        self.viewport.set_scroll_y(scroll_y);
        self.chrome.on_scroll(&mut self.doc, scroll_y)?;
        Ok(())
    }

    /// A skills block reached its waypoint: fill its bars.
    ///
    /// `generation` is the one carried by the `Waypoint` call. Reports from an
    /// earlier generation are ignored, since their node id may have been
    /// reassigned by a compaction.
    pub fn waypoint_reached(&mut self, node: NodeId, generation: u64) -> Result<usize, ShellError> {
        if generation != self.state.generation || !self.doc.is_connected(node) {
            trace!(?node, generation, "waypoint for a replaced element, ignoring");
            return Ok(0);
        }
        Ok(fill_progress(&mut self.doc, node)?)
    }

    /// Run every enhancer over the current mount content.
    pub fn rerun_modules(&mut self) -> PassReport {
        self.registry.run_pass(PassTarget {
            doc: &mut self.doc,
            listeners: &mut self.listeners,
            host: &mut self.host,
            capabilities: &self.capabilities,
            modules: &self.config.modules,
            scope: self.mount,
            generation: self.state.generation,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn mount(&self) -> NodeId {
        self.mount
    }

    /// Serialized content of the mount point.
    pub fn mount_html(&self) -> String {
        self.doc.inner_html(self.mount)
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        self.viewport.take_requests()
    }

    pub fn listeners(&self) -> &Listeners<Handler> {
        &self.listeners
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn fetch(&self) -> &F {
        &self.fetch
    }

    pub fn fetch_mut(&mut self) -> &mut F {
        &mut self.fetch
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn current_token(&self) -> PageToken {
        self.state
            .current_page()
            .cloned()
            .unwrap_or_else(|| PageToken::new(self.router.default_page()))
    }

    fn route(&mut self, trigger: RouteTrigger) -> Result<(), ShellError> {
        let token = self.router.resolve(self.location.hash());
        info!(?trigger, %token, "navigating");
        self.state.navigation.set(token.clone());
        let base = self.location.href().clone();
        if let Some(outcome) = self.loader.begin(&token, &base, &mut self.fetch) {
            self.install(outcome)?;
        }
        Ok(())
    }

    fn install(&mut self, outcome: LoadOutcome) -> Result<(), ShellError> {
        match outcome {
            LoadOutcome::Loaded { token, html } => {
                self.replace_mount(&html)?;
                self.viewport.request(ScrollRequest::Top {
                    behavior: ScrollBehavior::Instant,
                });
                sync_active_nav(&mut self.doc, &self.config.shell.nav_id, &token)?;
                let report = self.rerun_modules();
                self.bind_anchors();
                debug!(
                    %token,
                    generation = self.state.generation,
                    activated = ?report.activated,
                    "fragment installed"
                );
            }
            LoadOutcome::Failed { token, reason } => {
                error!(%token, %reason, "failed to load page fragment");
                self.replace_mount(&not_found_panel(&token))?;
            }
        }
        Ok(())
    }

    fn replace_mount(&mut self, html: &str) -> Result<(), ShellError> {
        self.doc.set_inner_html(self.mount, html)?;
        self.state.generation += 1;
        let doc = &self.doc;
        let pruned = self.listeners.retain_nodes(|node| doc.is_connected(node));
        trace!(generation = self.state.generation, pruned, "mount content replaced");

        if let Some(map) = self.doc.compact_if_sparse() {
            self.mount = map
                .get(self.mount)
                .ok_or_else(|| ShellError::MissingMountPoint(self.config.shell.app_id.clone()))?;
            let dropped = self.listeners.remap(|node| map.get(node));
            self.chrome.remap(&map);
            self.viewport.remap(|node| map.get(node));
            debug!(
                live = map.len(),
                dropped,
                generation = self.state.generation,
                "document compacted"
            );
        }
        Ok(())
    }

    /// In-page anchors across the whole document, plus the close-menu
    /// binding on nav links. Already bound elements are left as they are.
    fn bind_anchors(&mut self) {
        let root = self.doc.root();
        for anchor in self.doc.anchors_with_href_prefix(root, "#") {
            self.listeners.bind(anchor, Handler::AnchorClick);
        }
        if let Some(nav) = self.doc.element_by_id(&self.config.shell.nav_id) {
            for link in self.doc.elements_by_tag(nav, "a") {
                self.listeners.bind(link, Handler::CloseMobileNav);
            }
        }
    }

    fn run_handler(&mut self, handler: Handler, event: &mut ClickEvent) -> Result<(), ShellError> {
        let node = event.current_target;
        match handler {
            Handler::AnchorClick => self.anchor_click(node, event)?,
            Handler::CloseMobileNav => {
                self.chrome
                    .close_mobile_nav_if_open(&mut self.doc, &mut self.state)?;
            }
            Handler::MobileNavToggle => {
                self.chrome.toggle_mobile_nav(&mut self.doc, &mut self.state)?;
            }
            Handler::DropdownToggle => {
                event.prevent_default();
                chrome::toggle_dropdown(&mut self.doc, node)?;
                event.stop_immediate_propagation();
            }
            Handler::ScrollTop => {
                event.prevent_default();
                self.viewport.request(ScrollRequest::Top {
                    behavior: ScrollBehavior::Smooth,
                });
            }
            Handler::IsotopeFilter => {
                let result = apply_filter(
                    &mut self.doc,
                    &mut self.host,
                    &self.capabilities,
                    &self.config.modules,
                    node,
                );
                if let Err(err) = result {
                    warn!(error = %err, "filter click failed");
                }
            }
        }
        Ok(())
    }

    fn anchor_click(&mut self, anchor: NodeId, event: &mut ClickEvent) -> Result<(), ShellError> {
        let href = self.doc.attr(anchor, "href").unwrap_or("").to_string();
        let current = self.current_token();
        match anchors::classify(&self.doc, &href, self.location.href(), &current) {
            AnchorAction::Suppress => event.prevent_default(),
            AnchorAction::PassThrough => {}
            AnchorAction::ScrollTo(node) => {
                event.prevent_default();
                self.viewport.request(ScrollRequest::IntoView {
                    node,
                    behavior: ScrollBehavior::Smooth,
                });
                self.chrome
                    .close_mobile_nav_if_open(&mut self.doc, &mut self.state)?;
            }
            AnchorAction::Reroute(token) => {
                event.prevent_default();
                if !self.location.set_hash(token.as_str()) {
                    self.route(RouteTrigger::Forced)?;
                }
            }
            AnchorAction::Navigate(token) => {
                event.prevent_default();
                self.location.set_hash(token.as_str());
                self.chrome
                    .close_mobile_nav_if_open(&mut self.doc, &mut self.state)?;
            }
        }
        Ok(())
    }

    /// Browser default for a click that nobody prevented.
    fn default_action(&mut self, target: NodeId) -> Option<Url> {
        let anchor = self.doc.closest_tag(target, "a")?;
        let href = self.doc.attr(anchor, "href")?.to_string();
        if let Some(hash) = href.strip_prefix('#') {
            self.location.set_hash(hash);
            return None;
        }
        match self.location.href().join(&href) {
            Ok(url) => {
                info!(%url, "leaving the page");
                Some(url)
            }
            Err(err) => {
                debug!(%href, error = %err, "unresolvable link target");
                None
            }
        }
    }
}
