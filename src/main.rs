use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow, bail};
use folio_config::FolioConfig;
use folio_dom::Document;
use folio_io::{DirService, FetchService, HttpService};
use folio_shell::{LibraryHost, LoggingHost, Shell};
use tracing::{info, warn};
use url::Url;

const USAGE: &str = "usage: folio [SITE_DIR] [TOKEN...]";

/// Used when the site directory has no `index.html`.
const FALLBACK_SHELL: &str = r#"<!DOCTYPE html>
<html>
<head><title>Folio</title></head>
<body>
  <header id="header" class="header sticky-top"><nav id="navmenu" class="navmenu"><ul></ul></nav></header>
  <main id="app" class="main"></main>
</body>
</html>"#;

fn main() -> Result<()> {
    env_logger::init();

    if std::env::args().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    let mut args = std::env::args().skip(1);
    let site_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let tokens: Vec<String> = args.collect();

    let config = FolioConfig::load();
    let site_dir = site_dir
        .canonicalize()
        .with_context(|| format!("site directory {} not found", site_dir.display()))?;

    let index = site_dir.join("index.html");
    let markup = match std::fs::read_to_string(&index) {
        Ok(markup) => markup,
        Err(err) => {
            warn!(path = %index.display(), error = %err, "no page shell, using the built-in one");
            FALLBACK_SHELL.to_string()
        }
    };

    let (page_url, fetch) = match config.http.base_url.as_deref() {
        Some(base) => {
            let url = Url::parse(base).with_context(|| format!("invalid base url {base}"))?;
            let mut http = HttpService::new();
            if let Some(origins) = &config.http.origin_allowlist {
                http.set_origin_allowlist(origins.iter().cloned());
            }
            http.set_default_timeout(Duration::from_secs(config.http.timeout_secs));
            http.set_user_agent(config.http.user_agent.clone());
            (url, Box::new(http) as Box<dyn FetchService>)
        }
        None => {
            let dir = Url::from_directory_path(&site_dir)
                .map_err(|()| anyhow!("cannot express {} as a URL", site_dir.display()))?;
            let url = dir.join("index.html")?;
            (url, Box::new(DirService::new(site_dir.clone())) as Box<dyn FetchService>)
        }
    };
    let deadline = Duration::from_secs(config.http.timeout_secs + 1);

    info!(%page_url, "starting shell");
    let mut shell = Shell::new(
        config,
        Document::parse(&markup),
        page_url,
        fetch,
        LoggingHost::default(),
    )?;

    shell.on_load()?;
    settle(&mut shell, deadline)?;
    print_page(&shell);

    for token in &tokens {
        if !shell.set_location_hash(token) {
            info!(%token, "already on this page");
        }
        settle(&mut shell, deadline)?;
        print_page(&shell);
    }

    info!(library_calls = shell.host().calls(), "done");
    Ok(())
}

/// Pump events until the latest navigation has been installed.
fn settle<F: FetchService, H: LibraryHost>(
    shell: &mut Shell<F, H>,
    deadline: Duration,
) -> Result<()> {
    let start = Instant::now();
    loop {
        shell.pump()?;
        if shell.is_settled() {
            return Ok(());
        }
        if start.elapsed() > deadline {
            bail!("navigation did not complete within {deadline:?}");
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn print_page<F: FetchService, H: LibraryHost>(shell: &Shell<F, H>) {
    let token = shell
        .state()
        .current_page()
        .map(|t| t.as_str())
        .unwrap_or_default();
    println!("== #{token} (generation {}) ==", shell.state().generation());
    println!("{}", shell.mount_html().trim());
}
