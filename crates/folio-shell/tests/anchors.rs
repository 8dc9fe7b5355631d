mod support;

use anyhow::Result;
use folio_shell::{Handler, ScrollBehavior, ScrollRequest};
use support::*;
use url::Url;

#[test]
fn empty_anchor_is_swallowed() -> Result<()> {
    let mut shell = loaded_shell()?;
    let link = node(&shell, "dropdown-link")?;
    let outcome = shell.click(link)?;

    assert!(outcome.default_prevented);
    assert_eq!(outcome.navigated_to, None);
    assert_eq!(shell.location().hash(), "");
    assert!(shell.is_settled());
    Ok(())
}

#[test]
fn non_fragment_link_leaves_the_page() -> Result<()> {
    let mut shell = loaded_shell()?;
    let link = node(&shell, "external")?;
    let outcome = shell.click(link)?;

    assert!(!outcome.default_prevented);
    assert_eq!(outcome.handlers_run, 0);
    assert_eq!(outcome.navigated_to, Some(Url::parse("https://github.com/folio")?));
    Ok(())
}

#[test]
fn anchor_to_current_page_section_scrolls_smoothly() -> Result<()> {
    let mut shell = loaded_shell()?;
    navigate(&mut shell, "about")?;
    shell.take_scroll_requests();
    let issued = shell.fetch().issued().len();

    let link = node(&shell, "about-self")?;
    let section = node(&shell, "about")?;
    let outcome = shell.click(link)?;

    assert!(outcome.default_prevented);
    assert_eq!(shell.location().hash(), "about");
    assert!(!shell.location().has_pending_change());
    assert_eq!(
        shell.take_scroll_requests(),
        vec![ScrollRequest::IntoView {
            node: section,
            behavior: ScrollBehavior::Smooth
        }]
    );
    settle(&mut shell)?;
    assert_eq!(shell.fetch().issued().len(), issued);
    Ok(())
}

#[test]
fn anchor_to_other_page_changes_the_hash() -> Result<()> {
    let mut shell = loaded_shell()?;
    let link = node(&shell, "to-about")?;
    let outcome = shell.click(link)?;

    assert!(outcome.default_prevented);
    assert_eq!(shell.location().hash(), "about");
    assert!(shell.location().has_pending_change());

    settle(&mut shell)?;
    assert_eq!(shell.state().current_page().map(|t| t.as_str()), Some("about"));
    assert_eq!(
        shell.fetch().issued_paths(),
        vec!["/pages/home.html", "/pages/about.html"]
    );
    Ok(())
}

#[test]
fn current_page_without_target_reroutes_once_when_hash_is_unchanged() -> Result<()> {
    let mut shell = loaded_shell()?;
    navigate(&mut shell, "resume")?;
    assert_eq!(shell.fetch().issued().len(), 2);

    let link = node(&shell, "resume-self")?;
    let outcome = shell.click(link)?;
    assert!(outcome.default_prevented);
    assert!(!shell.location().has_pending_change());
    assert_eq!(shell.fetch().issued().len(), 3);

    settle(&mut shell)?;
    assert_eq!(shell.fetch().issued().len(), 3);
    assert!(shell.document().element_by_id("resume-self").is_some());
    assert_eq!(shell.state().generation(), 3);
    Ok(())
}

#[test]
fn current_page_without_target_reroutes_once_when_hash_changes() -> Result<()> {
    let mut shell = loaded_shell()?;
    assert_eq!(shell.location().hash(), "");

    // the default page is current but the URL carries no fragment yet
    let logo = node(&shell, "logo")?;
    shell.click(logo)?;
    assert_eq!(shell.location().hash(), "home");
    assert_eq!(shell.fetch().issued().len(), 1);

    settle(&mut shell)?;
    assert_eq!(shell.fetch().issued().len(), 2);
    assert_eq!(shell.state().current_page().map(|t| t.as_str()), Some("home"));
    Ok(())
}

#[test]
fn nav_link_click_closes_the_mobile_menu() -> Result<()> {
    let mut shell = loaded_shell()?;
    let toggle = node(&shell, "mobile-toggle")?;
    shell.click(toggle)?;
    assert!(shell.state().mobile_nav_open());

    let link = node(&shell, "nav-about")?;
    let outcome = shell.click(link)?;
    assert_eq!(outcome.handlers_run, 2);
    assert!(!shell.state().mobile_nav_open());

    let body = shell
        .document()
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    assert!(!shell.document().has_class(body, "mobile-nav-active"));
    assert!(shell.document().has_class(toggle, "bi-list"));
    Ok(())
}

#[test]
fn persistent_anchors_keep_a_single_binding() -> Result<()> {
    let mut shell = loaded_shell()?;
    let bound_after_home = shell.listeners().len();
    for token in ["about", "portfolio", "home"] {
        navigate(&mut shell, token)?;
    }

    let nav_link = node(&shell, "nav-about")?;
    assert_eq!(
        shell.listeners().handlers(nav_link),
        vec![Handler::AnchorClick, Handler::CloseMobileNav]
    );
    assert_eq!(shell.listeners().len(), bound_after_home);
    Ok(())
}

#[test]
fn content_anchors_are_bound_after_every_load() -> Result<()> {
    let mut shell = loaded_shell()?;
    navigate(&mut shell, "about")?;
    let link = node(&shell, "about-to-home")?;
    assert!(shell.listeners().is_bound(link, Handler::AnchorClick));
    assert!(!shell.listeners().is_bound(link, Handler::CloseMobileNav));
    Ok(())
}
