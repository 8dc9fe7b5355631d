mod support;

use anyhow::Result;
use folio_shell::{ScrollBehavior, ScrollRequest};
use support::*;

#[test]
fn load_removes_the_preloader() -> Result<()> {
    let mut shell = shell_with(site(ScriptedFetch::auto()), RecordingHost::full())?;
    assert!(shell.document().element_by_id("preloader").is_some());
    shell.on_load()?;
    assert!(shell.document().element_by_id("preloader").is_none());
    Ok(())
}

#[test]
fn scroll_threshold_drives_scroll_top_and_header() -> Result<()> {
    let mut shell = loaded_shell()?;
    let button = node(&shell, "scroll-top")?;
    let body = shell
        .document()
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    assert!(!shell.document().has_class(button, "active"));

    shell.on_scroll(240.0)?;
    assert!(shell.document().has_class(button, "active"));
    assert!(shell.document().has_class(body, "scrolled"));
    assert_eq!(shell.viewport().scroll_y(), 240.0);

    shell.on_scroll(20.0)?;
    assert!(!shell.document().has_class(button, "active"));
    assert!(!shell.document().has_class(body, "scrolled"));
    Ok(())
}

#[test]
fn scroll_top_click_requests_smooth_scroll() -> Result<()> {
    let mut shell = loaded_shell()?;
    shell.on_scroll(500.0)?;
    shell.take_scroll_requests();

    let icon = shell
        .document()
        .first_with_class(node(&shell, "scroll-top")?, "bi-arrow-up-short")
        .ok_or_else(|| anyhow::anyhow!("no icon"))?;
    let outcome = shell.click(icon)?;

    assert!(outcome.default_prevented);
    assert_eq!(
        shell.take_scroll_requests(),
        vec![ScrollRequest::Top {
            behavior: ScrollBehavior::Smooth
        }]
    );
    assert_eq!(shell.viewport().scroll_y(), 0.0);
    assert_eq!(shell.location().hash(), "");
    Ok(())
}

#[test]
fn dropdown_toggle_opens_submenu_without_following_the_link() -> Result<()> {
    let mut shell = loaded_shell()?;
    let toggle = node(&shell, "dropdown-toggle")?;
    let link = node(&shell, "dropdown-link")?;
    let menu = node(&shell, "dropdown-menu")?;

    let outcome = shell.click(toggle)?;
    assert!(outcome.default_prevented);
    assert_eq!(outcome.handlers_run, 1);
    assert!(shell.document().has_class(link, "active"));
    assert!(shell.document().has_class(menu, "dropdown-active"));

    shell.click(toggle)?;
    assert!(!shell.document().has_class(link, "active"));
    assert!(!shell.document().has_class(menu, "dropdown-active"));
    Ok(())
}

#[test]
fn mobile_toggle_flips_menu_and_icon() -> Result<()> {
    let mut shell = loaded_shell()?;
    let toggle = node(&shell, "mobile-toggle")?;
    let body = shell
        .document()
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;

    shell.click(toggle)?;
    assert!(shell.state().mobile_nav_open());
    assert!(shell.document().has_class(body, "mobile-nav-active"));
    assert!(shell.document().has_class(toggle, "bi-x"));

    shell.click(toggle)?;
    assert!(!shell.state().mobile_nav_open());
    assert!(!shell.document().has_class(body, "mobile-nav-active"));
    assert!(shell.document().has_class(toggle, "bi-list"));
    Ok(())
}
