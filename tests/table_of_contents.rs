use boxcutter::pdf::{DestItem, Destination, OutlineNode, PageRef};
use boxcutter::test_utils::test_helpers::{
    ControlledHost, MemoryBackend, MemoryDocument, document_bytes,
};
use boxcutter::widget::boxcutter::Drawer;
use boxcutter::{BoxCutterConfig, TocItem};

fn explicit(index: usize) -> Option<Destination> {
    Some(Destination::Explicit(MemoryDocument::dest(index)))
}

fn outline() -> Vec<OutlineNode> {
    vec![
        OutlineNode::new("Introduction", explicit(0)).with_items(vec![
            OutlineNode::new("Motivation", explicit(1)),
            OutlineNode::new("Scope", explicit(2)),
        ]),
        OutlineNode::new("Methods", Some(Destination::Named("methods".into()))),
        OutlineNode::new("Broken link", Some(Destination::Named("missing".into()))),
        OutlineNode::new("Dangling", None),
        OutlineNode::new(
            "Bad reference",
            Some(Destination::Explicit(vec![DestItem::Ref(PageRef::new(99, 0))])),
        ),
        OutlineNode::new(
            "Not a page",
            Some(Destination::Explicit(vec![DestItem::Number(3.0)])),
        ),
        OutlineNode::new("Results", explicit(7)),
    ]
}

fn host_with(document: MemoryDocument, depth: usize) -> ControlledHost<MemoryBackend> {
    let config = BoxCutterConfig {
        outline_max_depth: depth,
        ..BoxCutterConfig::default()
    };
    let mut host = ControlledHost::new(MemoryBackend::new(document), config);
    host.load(Some(document_bytes()));
    host
}

fn outlined() -> MemoryDocument {
    MemoryDocument::new(10)
        .with_outline(outline())
        .with_named("methods", MemoryDocument::dest(4))
}

fn summary(items: &[TocItem]) -> Vec<(u32, &str)> {
    items
        .iter()
        .map(|i| (i.page_number, i.title.as_str()))
        .collect()
}

#[test]
fn outline_extraction_keeps_resolvable_top_level_entries() {
    let mut host = host_with(outlined(), 1);

    assert_eq!(host.cutter.extract_outline(), Some(3));
    host.process();

    assert_eq!(
        summary(&host.toc),
        vec![(1, "Introduction"), (5, "Methods"), (8, "Results")]
    );
    assert_eq!(host.toc_updates, 1);
}

#[test]
fn deeper_outline_is_flattened_in_preorder() {
    let mut host = host_with(outlined(), 2);

    assert_eq!(host.cutter.extract_outline(), Some(5));
    host.process();

    assert_eq!(
        summary(&host.toc),
        vec![
            (1, "Introduction"),
            (2, "Motivation"),
            (3, "Scope"),
            (5, "Methods"),
            (8, "Results"),
        ]
    );
}

#[test]
fn document_without_outline_leaves_toc_alone() {
    let mut host = host_with(MemoryDocument::new(3), 1);
    host.cutter.add_bookmark();
    host.process();

    assert_eq!(host.cutter.extract_outline(), None);
    host.process();

    assert_eq!(summary(&host.toc), vec![(1, "Page 1")]);
    assert_eq!(host.toc_updates, 1);
}

#[test]
fn unreadable_outline_leaves_toc_alone() {
    let mut host = host_with(MemoryDocument::new(3).with_broken_outline(), 1);
    assert_eq!(host.cutter.extract_outline(), None);
    host.process();
    assert_eq!(host.toc_updates, 0);
}

#[test]
fn outline_extraction_without_document_does_nothing() {
    let mut host = ControlledHost::new(
        MemoryBackend::new(outlined()),
        BoxCutterConfig::default(),
    );
    assert_eq!(host.cutter.extract_outline(), None);
}

#[test]
fn bookmarks_are_unique_sorted_and_reported_once() {
    let mut host = host_with(MemoryDocument::new(5), 1);
    host.cutter.jump_to_page(4);
    assert!(host.cutter.add_bookmark());
    assert!(!host.cutter.add_bookmark());
    host.cutter.jump_to_page(2);
    assert!(host.cutter.add_bookmark());
    host.process();

    assert_eq!(summary(&host.toc), vec![(2, "Page 2"), (4, "Page 4")]);
    assert_eq!(host.toc_updates, 2);
    assert!(host.cutter.is_current_page_bookmarked());

    // Feeding the list back does not echo another change
    host.cutter.set_toc(host.toc.clone());
    host.process();
    assert_eq!(host.toc_updates, 2);
}

#[test]
fn rename_and_remove_bookmarks() {
    let mut host = host_with(MemoryDocument::new(5), 1);
    host.cutter.add_bookmark();
    host.process();

    assert!(host.cutter.rename_bookmark(0, "Cover"));
    assert!(!host.cutter.rename_bookmark(3, "Nothing here"));
    host.process();
    assert_eq!(summary(&host.toc), vec![(1, "Cover")]);

    assert!(host.cutter.remove_bookmark());
    assert!(!host.cutter.remove_bookmark());
    host.process();
    assert!(host.toc.is_empty());
    assert!(!host.cutter.is_current_page_bookmarked());
}

#[test]
fn host_toc_is_adopted_without_echo() {
    let mut host = host_with(MemoryDocument::new(5), 1);
    host.cutter.set_toc(vec![TocItem::bookmark(3, "Chapter 3")]);
    host.process();

    assert_eq!(host.toc_updates, 0);
    assert_eq!(summary(host.cutter.toc()), vec![(3, "Chapter 3")]);
}

#[test]
fn opening_a_toc_entry_jumps_to_its_page() {
    let mut host = host_with(outlined(), 1);
    host.cutter.extract_outline();
    host.process();

    assert!(host.cutter.open_toc_entry(2));
    assert_eq!(host.cutter.current_page(), 8);
    assert!(!host.cutter.open_toc_entry(9));
    assert_eq!(host.cutter.current_page(), 8);
}

#[test]
fn toc_entry_beyond_the_document_is_clamped() {
    let mut host = host_with(MemoryDocument::new(3), 1);
    host.cutter.set_toc(vec![TocItem::bookmark(40, "Appendix")]);

    assert!(host.cutter.open_toc_entry(0));
    assert_eq!(host.cutter.current_page(), 3);
}

#[test]
fn toc_items_serialize_like_the_host_expects() {
    let item = TocItem::bookmark(2, "Page 2");
    let json = serde_json::to_value(&item).expect("serializable");
    assert_eq!(json["type"], "bookmark");
    assert_eq!(json["pageNumber"], 2);
    assert_eq!(json["title"], "Page 2");
    assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn drawers_toggle_exclusively() {
    let mut host = host_with(MemoryDocument::new(1), 1);
    assert!(host.cutter.toggle_drawer(Drawer::Contents));
    assert!(host.cutter.panels().is_open(Drawer::Contents));

    host.cutter.set_show_snippets_collection(false);
    assert!(!host.cutter.toggle_drawer(Drawer::Snippets));
    assert!(host.cutter.panels().is_open(Drawer::Contents));
}
