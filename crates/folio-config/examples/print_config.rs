/// Example program to print the loaded configuration
///
/// Run with: cargo run -p folio-config --example print_config

fn main() {
    let config = folio_config::FolioConfig::load();

    println!("=== Folio Configuration ===\n");

    println!("Router:");
    println!("  Default Page: {}", config.router.default_page);
    println!("  Pages Path: {}", config.router.pages_path);
    println!("  Fragment Suffix: {}", config.router.fragment_suffix);
    println!();

    println!("Shell:");
    println!("  Mount Point: #{}", config.shell.app_id);
    println!("  Navigation: #{}", config.shell.nav_id);
    println!("  Sticky Classes: {:?}", config.shell.sticky_classes);
    println!();

    println!("HTTP:");
    println!("  Base URL: {:?}", config.http.base_url);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Origin Allowlist: {:?}", config.http.origin_allowlist);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
