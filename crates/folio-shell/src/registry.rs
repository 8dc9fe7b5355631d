//! Enhancement module registry.
//!
//! Each entry looks for a structural marker inside the freshly injected
//! content, checks that the library it drives was declared available by
//! the host, and activates behaviour on the matching elements. Entries run
//! in a fixed order after every fragment load; a failing entry is logged
//! and the pass continues.

use std::collections::HashSet;

use folio_config::{ModulesConfig, RevealOptions, TypedOptions};
use folio_dom::{Document, Listeners, NodeId};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{enhancers, error::EnhanceError, events::Handler};

/// Third-party libraries an enhancer may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Typed,
    Reveal,
    Lightbox,
    Carousel,
    Counter,
    Waypoint,
    Isotope,
    ImagesLoaded,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::Typed,
        Capability::Reveal,
        Capability::Lightbox,
        Capability::Carousel,
        Capability::Counter,
        Capability::Waypoint,
        Capability::Isotope,
        Capability::ImagesLoaded,
    ];
}

/// Libraries available in this session, recorded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Capabilities(HashSet<Capability>);

impl Capabilities {
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn contains_all(&self, required: &[Capability]) -> bool {
        required.iter().all(|c| self.contains(*c))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A request to an enhancement library.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryCall {
    Typed {
        target: NodeId,
        strings: Vec<String>,
        options: TypedOptions,
    },
    /// Hard refresh of the scroll-reveal library followed by init.
    RevealRefresh { options: RevealOptions },
    Lightbox { selector: String },
    Carousel {
        container: NodeId,
        config: serde_json::Value,
    },
    Counters { targets: Vec<NodeId> },
    /// Report back through `Shell::waypoint_reached` with `element` and
    /// `generation` once the element reaches `offset`.
    Waypoint {
        element: NodeId,
        offset: String,
        generation: u64,
    },
    Isotope {
        container: NodeId,
        item_selector: String,
        layout: String,
        filter: String,
        sort: String,
    },
    IsotopeArrange { container: NodeId, filter: String },
}

impl LibraryCall {
    pub fn capability(&self) -> Capability {
        match self {
            LibraryCall::Typed { .. } => Capability::Typed,
            LibraryCall::RevealRefresh { .. } => Capability::Reveal,
            LibraryCall::Lightbox { .. } => Capability::Lightbox,
            LibraryCall::Carousel { .. } => Capability::Carousel,
            LibraryCall::Counters { .. } => Capability::Counter,
            LibraryCall::Waypoint { .. } => Capability::Waypoint,
            LibraryCall::Isotope { .. } | LibraryCall::IsotopeArrange { .. } => {
                Capability::Isotope
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{library:?} rejected the call: {message}")]
    Rejected {
        library: Capability,
        message: String,
    },
}

/// Implemented by the host that embeds the actual enhancement libraries.
pub trait LibraryHost {
    /// Libraries available to this page. Queried once when the shell starts.
    fn capabilities(&self) -> Vec<Capability>;

    fn invoke(&mut self, call: LibraryCall) -> Result<(), LibraryError>;
}

/// Host that declares every library and only logs the calls it receives.
#[derive(Debug, Default)]
pub struct LoggingHost {
    calls: usize,
}

impl LoggingHost {
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl LibraryHost for LoggingHost {
    fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL.to_vec()
    }

    fn invoke(&mut self, call: LibraryCall) -> Result<(), LibraryError> {
        self.calls += 1;
        info!(library = ?call.capability(), ?call, "library call");
        Ok(())
    }
}

/// Structural marker an entry looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Class(&'static str),
    Attribute(&'static str),
}

impl Marker {
    pub fn find(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        match self {
            Marker::Class(class) => doc.elements_with_class(scope, class),
            Marker::Attribute(name) => doc.elements_with_attr(scope, name),
        }
    }
}

/// Elements already activated in the current generation, per module.
#[derive(Debug, Default)]
struct Ledger {
    generation: u64,
    claimed: HashSet<(NodeId, &'static str)>,
}

impl Ledger {
    fn enter(&mut self, generation: u64) {
        if self.generation != generation {
            self.claimed.clear();
            self.generation = generation;
        }
    }
}

/// Everything an enhancer may touch while it runs.
pub struct EnhanceContext<'a> {
    pub doc: &'a mut Document,
    pub listeners: &'a mut Listeners<Handler>,
    pub host: &'a mut dyn LibraryHost,
    pub capabilities: &'a Capabilities,
    pub modules: &'a ModulesConfig,
    /// Root of the injected content (the mount point).
    pub scope: NodeId,
    /// DOM generation the pass runs in.
    pub generation: u64,
    ledger: &'a mut Ledger,
}

impl EnhanceContext<'_> {
    pub fn is_claimed(&self, node: NodeId, module: &'static str) -> bool {
        self.ledger.claimed.contains(&(node, module))
    }

    /// Record that `module` has activated `node` in this generation.
    pub fn claim(&mut self, node: NodeId, module: &'static str) {
        self.ledger.claimed.insert((node, module));
    }

    pub fn invoke(&mut self, call: LibraryCall) -> Result<(), LibraryError> {
        self.host.invoke(call)
    }
}

pub trait Enhancer {
    fn name(&self) -> &'static str;

    fn marker(&self) -> Marker;

    fn requires(&self) -> &'static [Capability];

    /// Activate behaviour on `targets` (never empty). Must be safe to call
    /// any number of times on the same or on fresh content.
    fn activate(&self, cx: &mut EnhanceContext<'_>, targets: &[NodeId])
    -> Result<(), EnhanceError>;
}

/// Borrowed shell parts a registry pass runs against.
pub struct PassTarget<'a> {
    pub doc: &'a mut Document,
    pub listeners: &'a mut Listeners<Handler>,
    pub host: &'a mut dyn LibraryHost,
    pub capabilities: &'a Capabilities,
    pub modules: &'a ModulesConfig,
    pub scope: NodeId,
    pub generation: u64,
}

/// What happened to each entry during one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub activated: Vec<&'static str>,
    pub no_marker: Vec<&'static str>,
    pub unavailable: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

pub struct ModuleRegistry {
    entries: Vec<Box<dyn Enhancer>>,
    ledger: Ledger,
}

impl ModuleRegistry {
    /// The standard entries in their fixed run order.
    pub fn standard() -> Self {
        Self::with_entries(vec![
            Box::new(enhancers::TypedEffect),
            Box::new(enhancers::RevealRefresh),
            Box::new(enhancers::Lightbox),
            Box::new(enhancers::Carousel),
            Box::new(enhancers::Counters),
            Box::new(enhancers::SkillsProgress),
            Box::new(enhancers::FilterLayout),
        ])
    }

    pub fn with_entries(entries: Vec<Box<dyn Enhancer>>) -> Self {
        Self {
            entries,
            ledger: Ledger::default(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    pub fn run_pass(&mut self, target: PassTarget<'_>) -> PassReport {
        self.ledger.enter(target.generation);
        let mut report = PassReport::default();
        let mut cx = EnhanceContext {
            doc: target.doc,
            listeners: target.listeners,
            host: target.host,
            capabilities: target.capabilities,
            modules: target.modules,
            scope: target.scope,
            generation: target.generation,
            ledger: &mut self.ledger,
        };

        for entry in &self.entries {
            let name = entry.name();
            let targets = entry.marker().find(cx.doc, cx.scope);
            if targets.is_empty() {
                trace!(module = name, "no marker in content");
                report.no_marker.push(name);
                continue;
            }
            if !cx.capabilities.contains_all(entry.requires()) {
                debug!(module = name, required = ?entry.requires(), "library unavailable, skipping");
                report.unavailable.push(name);
                continue;
            }
            match entry.activate(&mut cx, &targets) {
                Ok(()) => report.activated.push(name),
                Err(err) => {
                    warn!(module = name, error = %err, "enhancer failed");
                    report.failed.push((name, err.to_string()));
                }
            }
        }
        report
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
