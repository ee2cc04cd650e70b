use std::time::Duration;

use boxcutter::pdf::SessionError;
use boxcutter::test_utils::test_helpers::{
    CORRUPT, ControlledHost, MemoryBackend, MemoryDocument, document_bytes,
};
use boxcutter::{BoxCutterConfig, ViewStatus};

fn host(document: MemoryDocument) -> ControlledHost<MemoryBackend> {
    ControlledHost::new(MemoryBackend::new(document), BoxCutterConfig::default())
}

fn loaded(pages: usize) -> ControlledHost<MemoryBackend> {
    let mut host = host(MemoryDocument::new(pages));
    host.load(Some(document_bytes()));
    assert!(host.render());
    host
}

#[test]
fn status_follows_the_load_lifecycle() {
    let mut host = host(MemoryDocument::new(2));
    assert_eq!(host.cutter.status(), ViewStatus::Empty);

    host.load(Some(document_bytes()));
    assert_eq!(host.cutter.status(), ViewStatus::Rendering);
    assert_eq!(host.cutter.total_pages(), 2);

    assert!(host.render());
    assert_eq!(host.cutter.status(), ViewStatus::Page);
    let surface = host.cutter.surface().expect("page surface installed");
    assert_eq!(surface.page_number, 1);
    assert_eq!((surface.width(), surface.height()), (300, 300));
}

#[test]
fn undecodable_document_is_a_load_error() {
    let mut host = host(MemoryDocument::new(2));
    host.load(Some(CORRUPT.into()));

    assert!(matches!(
        host.cutter.status(),
        ViewStatus::Error(SessionError::Load(_))
    ));
    assert_eq!(host.cutter.total_pages(), 0);
    host.frame();
    assert!(host.ready.is_empty());
}

#[test]
fn missing_document_is_a_load_error() {
    let mut host = host(MemoryDocument::new(2));
    host.load(None);
    assert!(matches!(
        host.cutter.status(),
        ViewStatus::Error(SessionError::Load(_))
    ));
}

#[test]
fn reload_after_failure_recovers() {
    let mut host = host(MemoryDocument::new(2));
    host.load(Some(CORRUPT.into()));
    host.load(Some(document_bytes()));
    assert!(host.render());
    assert_eq!(host.cutter.status(), ViewStatus::Page);
}

#[test]
fn internal_navigation_clamps_to_the_document() {
    let mut host = loaded(3);

    host.cutter.previous_page();
    assert_eq!(host.cutter.current_page(), 1);

    host.cutter.next_page();
    host.cutter.next_page();
    host.cutter.next_page();
    host.process();
    assert_eq!(host.cutter.current_page(), 3);
    assert_eq!(host.page_changes, vec![2, 3]);

    host.cutter.jump_to_page(-4);
    assert_eq!(host.cutter.current_page(), 1);
    host.cutter.jump_to_page(99);
    assert_eq!(host.cutter.current_page(), 3);

    assert!(host.render());
    assert_eq!(host.cutter.surface().map(|s| s.page_number), Some(3));
}

#[test]
fn controlled_page_is_clamped_into_range() {
    let mut host = host(MemoryDocument::new(10));
    host.control_page(15);
    host.load(Some(document_bytes()));

    assert_eq!(host.cutter.current_page(), 10);
    assert_eq!(host.page, Some(10));

    host.control_page(0);
    assert_eq!(host.cutter.current_page(), 1);
    assert_eq!(host.page, Some(1));

    assert!(host.render());
    assert_eq!(host.cutter.surface().map(|s| s.page_number), Some(1));
}

#[test]
fn controlled_host_follows_internal_navigation() {
    let mut host = loaded(5);
    host.control_page(2);
    host.cutter.next_page();
    host.process();

    assert_eq!(host.page, Some(3));
    assert_eq!(host.cutter.current_page(), 3);
}

#[test]
fn zero_page_document_ignores_navigation() {
    let mut host = host(MemoryDocument::new(0));
    host.load(Some(document_bytes()));

    host.cutter.next_page();
    host.cutter.previous_page();
    host.cutter.jump_to_page(4);
    host.process();

    assert_eq!(host.cutter.current_page(), 1);
    assert!(host.page_changes.is_empty());
    assert!(!host.render());
    assert!(host.ready.is_empty());
    assert_eq!(host.cutter.status(), ViewStatus::NoPages);
}

#[test]
fn reload_starts_at_the_default_scale() {
    let mut host = loaded(2);
    host.cutter.set_scale(3.0);
    assert!(host.render());
    assert_eq!(host.cutter.surface().map(|s| s.width()), Some(600));

    host.load(Some(document_bytes()));
    assert_eq!(host.cutter.scale(), 1.5);
    assert!(host.render());
    assert_eq!(host.cutter.surface().map(|s| s.width()), Some(300));
    assert_eq!(host.ready.last().map(|info| info.scale), Some(1.5));
}

#[test]
fn readiness_is_announced_once_per_load() {
    let mut host = host(MemoryDocument::new(4));
    host.load(Some(document_bytes()));
    assert!(host.cutter.wait_for_render(Duration::from_secs(5)));
    assert!(host.ready.is_empty());

    host.frame();
    assert_eq!(host.ready.len(), 1);
    let info = &host.ready[0];
    assert_eq!(info.total_pages, 4);
    assert_eq!(info.current_page, 1);
    assert_eq!((info.width, info.height), (300, 300));

    host.cutter.next_page();
    assert!(host.render());
    assert_eq!(host.ready.len(), 1);

    host.load(Some(document_bytes()));
    assert!(host.render());
    assert_eq!(host.ready.len(), 2);
}

#[test]
fn reload_before_the_frame_drops_the_announcement() {
    let mut host = host(MemoryDocument::new(4));
    host.load(Some(document_bytes()));
    assert!(host.cutter.wait_for_render(Duration::from_secs(5)));

    host.load(Some(document_bytes()));
    host.frame();
    assert!(host.ready.is_empty());

    assert!(host.render());
    assert_eq!(host.ready.len(), 1);
}

#[test]
fn ready_capability_jumps_with_clamping() {
    let mut host = loaded(6);
    let jump = host.ready[0].jump.clone();

    assert!(jump.jump_to(4));
    host.frame();
    assert_eq!(host.cutter.current_page(), 4);

    assert!(jump.jump_to_str("not a page"));
    host.frame();
    assert_eq!(host.cutter.current_page(), 1);

    assert!(jump.jump_to(60));
    host.frame();
    assert_eq!(host.cutter.current_page(), 6);
}

#[test]
fn stale_jump_capability_is_ignored() {
    let mut host = loaded(6);
    let stale = host.ready[0].jump.clone();

    host.load(Some(document_bytes()));
    assert!(host.render());
    assert!(stale.jump_to(5));
    host.frame();

    assert_eq!(host.cutter.current_page(), 1);
    assert_ne!(stale.generation(), host.ready[1].jump.generation());
}

#[test]
fn superseded_renders_are_swallowed() {
    let slow = MemoryDocument::new(4).with_render_delay(Duration::from_millis(100));
    let mut host = host(slow);
    host.load(Some(document_bytes()));
    host.cutter.next_page();
    host.cutter.next_page();

    assert!(host.render());
    assert_eq!(host.cutter.status(), ViewStatus::Page);
    assert_eq!(host.cutter.surface().map(|s| s.page_number), Some(3));
    assert!(host.cutter.error().is_none());
    assert_eq!(host.ready.len(), 1);
    assert_eq!(host.ready[0].current_page, 3);
}

#[test]
fn render_failure_is_scoped_to_its_page() {
    let mut host = host(MemoryDocument::new(3).with_failing_page(1));
    host.load(Some(document_bytes()));
    assert!(host.render());

    host.cutter.next_page();
    assert!(!host.render());
    assert!(matches!(
        host.cutter.status(),
        ViewStatus::Error(SessionError::Render { page: 2, .. })
    ));

    host.cutter.previous_page();
    assert!(host.cutter.error().is_none());
    assert!(host.render());
    assert_eq!(host.cutter.status(), ViewStatus::Page);
}

#[test]
fn invalid_scale_falls_back_to_default() {
    let mut host = loaded(1);
    host.cutter.set_scale(f64::NAN);
    assert_eq!(host.cutter.scale(), 1.5);
    host.cutter.set_scale(0.01);
    assert_eq!(host.cutter.scale(), 0.1);
}
