#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use folio_config::FolioConfig;
use folio_dom::{Document, NodeId};
use folio_io::{FetchRequest, FetchService, HttpResult};
use folio_shell::{Capability, LibraryCall, LibraryError, LibraryHost, Shell};
use url::Url;

pub const BASE_URL: &str = "https://folio.test/index.html";

pub const SHELL_HTML: &str = r##"<!DOCTYPE html>
<html>
<head><title>Folio</title></head>
<body class="index-page">
  <header id="header" class="header d-flex align-items-center sticky-top">
    <a id="logo" href="#home" class="logo">Folio</a>
    <nav id="navmenu" class="navmenu">
      <ul>
        <li><a id="nav-home" href="#home">Home</a></li>
        <li><a id="nav-about" href="#about">About</a></li>
        <li><a id="nav-portfolio" href="#portfolio">Portfolio</a></li>
        <li class="dropdown"><a id="dropdown-link" href="#"><span>More</span> <i id="dropdown-toggle" class="bi bi-chevron-down toggle-dropdown"></i></a>
          <ul id="dropdown-menu">
            <li><a id="nav-resume" href="#resume">Resume</a></li>
          </ul>
        </li>
      </ul>
      <i id="mobile-toggle" class="mobile-nav-toggle d-xl-none bi bi-list"></i>
    </nav>
  </header>
  <main id="app" class="main"></main>
  <footer><a id="external" href="https://github.com/folio">GitHub</a></footer>
  <a href="#" id="scroll-top" class="scroll-top"><i class="bi bi-arrow-up-short"></i></a>
  <div id="preloader"></div>
</body>
</html>"##;

pub const HOME: &str = r##"<section id="hero" class="hero section" data-aos="fade-in">
  <h2>I'm a <span class="typed" data-typed-items="Designer, Developer"></span></h2>
  <a id="to-about" href="#about">About me</a>
</section>"##;

pub const ABOUT: &str = r##"<section id="about" class="about section">
  <div class="container" data-aos="fade-up">
    <a id="about-self" href="#about">About</a>
    <a id="about-to-home" href="#home">Home</a>
    <div id="skills" class="skills-animation">
      <div class="progress"><div id="bar-rust" class="progress-bar" role="progressbar" aria-valuenow="90"></div></div>
      <div class="progress"><div id="bar-css" class="progress-bar" role="progressbar" aria-valuenow="65"></div></div>
    </div>
    <div class="stats"><span class="purecounter" data-purecounter-end="232"></span></div>
  </div>
</section>"##;

pub const PORTFOLIO: &str = r##"<section id="portfolio" class="portfolio section">
  <div id="gallery" class="isotope-layout" data-default-filter="*" data-layout="masonry" data-sort="original-order">
    <ul class="isotope-filters">
      <li id="filter-all" data-filter="*" class="filter-active">All</li>
      <li id="filter-app" data-filter=".filter-app">App</li>
    </ul>
    <span id="gallery-note" class="note filter-active">Selected work</span>
    <div class="isotope-container">
      <div class="isotope-item filter-app"><a href="img/app.jpg" class="glightbox">App</a></div>
    </div>
  </div>
  <div id="testimonials" class="swiper init-swiper">
    <script type="application/json" class="swiper-config">{"loop": true, "speed": 600}</script>
    <div class="swiper-wrapper"></div>
  </div>
</section>"##;

pub const RESUME: &str = r##"<section class="resume section">
  <h2>Resume</h2>
  <a id="resume-self" href="#resume">Resume</a>
</section>"##;

pub const SLIDES: &str = r##"<section class="slides">
  <div id="broken" class="init-swiper"><script type="application/json" class="swiper-config">{ loop: yes </script></div>
  <div id="plain" class="init-swiper"></div>
</section>"##;

/// Fetch service answering from an in-memory site.
///
/// In manual mode results are held until [`release`](Self::release) is
/// called, which lets tests decide the completion order.
#[derive(Debug, Default)]
pub struct ScriptedFetch {
    pages: HashMap<String, String>,
    auto_release: bool,
    issued: Vec<FetchRequest>,
    held: Vec<FetchRequest>,
    ready: Vec<HttpResult>,
}

impl ScriptedFetch {
    pub fn auto() -> Self {
        Self {
            auto_release: true,
            ..Self::default()
        }
    }

    pub fn manual() -> Self {
        Self::default()
    }

    pub fn page(mut self, name: &str, html: &str) -> Self {
        self.pages
            .insert(format!("/pages/{name}.html"), html.to_string());
        self
    }

    pub fn issued(&self) -> &[FetchRequest] {
        &self.issued
    }

    pub fn issued_paths(&self) -> Vec<String> {
        self.issued.iter().map(|r| r.url.path().to_string()).collect()
    }

    pub fn held_ids(&self) -> Vec<u64> {
        self.held.iter().map(|r| r.request_id).collect()
    }

    /// Complete a held request. Returns false if it is not held.
    pub fn release(&mut self, request_id: u64) -> bool {
        let Some(index) = self.held.iter().position(|r| r.request_id == request_id) else {
            return false;
        };
        let request = self.held.remove(index);
        let result = self.respond(&request);
        self.ready.push(result);
        true
    }

    fn respond(&self, request: &FetchRequest) -> HttpResult {
        match self.pages.get(request.url.path()) {
            Some(body) => HttpResult::ok(request.request_id, 200, body.clone()),
            None => HttpResult {
                request_id: request.request_id,
                status: Some(404),
                content_type: Some("text/html".to_string()),
                body: Some("<h1>404</h1>".to_string()),
                error: None,
            },
        }
    }
}

impl FetchService for ScriptedFetch {
    fn request(&mut self, request: FetchRequest) {
        self.issued.push(request.clone());
        if self.auto_release {
            let result = self.respond(&request);
            self.ready.push(result);
        } else {
            self.held.push(request);
        }
    }

    fn poll(&mut self) -> Vec<HttpResult> {
        std::mem::take(&mut self.ready)
    }

    fn has_pending(&self) -> bool {
        !self.held.is_empty() || !self.ready.is_empty()
    }

    fn cancel(&mut self, request_id: u64) {
        self.held.retain(|r| r.request_id != request_id);
    }
}

/// Library host that records every call it accepts.
#[derive(Debug)]
pub struct RecordingHost {
    available: Vec<Capability>,
    failing: HashSet<Capability>,
    pub calls: Vec<LibraryCall>,
}

impl RecordingHost {
    pub fn full() -> Self {
        Self {
            available: Capability::ALL.to_vec(),
            failing: HashSet::new(),
            calls: Vec::new(),
        }
    }

    pub fn without(missing: &[Capability]) -> Self {
        let mut host = Self::full();
        host.available.retain(|c| !missing.contains(c));
        host
    }

    /// Reject every call for `capability`.
    pub fn failing(mut self, capability: Capability) -> Self {
        self.failing.insert(capability);
        self
    }

    pub fn count(&self, capability: Capability) -> usize {
        self.calls
            .iter()
            .filter(|call| call.capability() == capability)
            .count()
    }
}

impl LibraryHost for RecordingHost {
    fn capabilities(&self) -> Vec<Capability> {
        self.available.clone()
    }

    fn invoke(&mut self, call: LibraryCall) -> Result<(), LibraryError> {
        let library = call.capability();
        if self.failing.contains(&library) {
            return Err(LibraryError::Rejected {
                library,
                message: "scripted failure".to_string(),
            });
        }
        self.calls.push(call);
        Ok(())
    }
}

pub type TestShell = Shell<ScriptedFetch, RecordingHost>;

pub fn site(fetch: ScriptedFetch) -> ScriptedFetch {
    fetch
        .page("home", HOME)
        .page("about", ABOUT)
        .page("portfolio", PORTFOLIO)
        .page("resume", RESUME)
        .page("slides", SLIDES)
}

pub fn shell_with(fetch: ScriptedFetch, host: RecordingHost) -> Result<TestShell> {
    let doc = Document::parse(SHELL_HTML);
    let url = Url::parse(BASE_URL)?;
    Ok(Shell::new(FolioConfig::default(), doc, url, fetch, host)?)
}

/// Shell over the whole site with every library available, already loaded.
pub fn loaded_shell() -> Result<TestShell> {
    let mut shell = shell_with(site(ScriptedFetch::auto()), RecordingHost::full())?;
    shell.on_load()?;
    settle(&mut shell)?;
    Ok(shell)
}

pub fn settle(shell: &mut TestShell) -> Result<()> {
    for _ in 0..16 {
        shell.pump()?;
        if shell.is_settled() {
            return Ok(());
        }
    }
    anyhow::bail!("shell did not settle")
}

pub fn navigate(shell: &mut TestShell, token: &str) -> Result<()> {
    shell.set_location_hash(token);
    settle(shell)
}

pub fn node(shell: &TestShell, id: &str) -> Result<NodeId> {
    shell
        .document()
        .element_by_id(id)
        .with_context(|| format!("no element with id {id}"))
}

pub fn active_nav_links(shell: &TestShell) -> Result<Vec<String>> {
    let doc = shell.document();
    let nav = node(shell, "navmenu")?;
    Ok(doc
        .elements_by_tag(nav, "a")
        .into_iter()
        .filter(|&a| doc.has_class(a, "active"))
        .filter_map(|a| doc.attr(a, "href").map(str::to_string))
        .collect())
}
