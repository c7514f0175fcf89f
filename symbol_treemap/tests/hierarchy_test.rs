use std::collections::HashSet;

use symbol_treemap::error::TreemapError;
use symbol_treemap::hierarchy::{ColorSource, HierarchyBuilder, PathEntries, ROOT_NAME};
use symbol_treemap::model::{SymbolKind, SymbolRecord, TreeNode};

fn record(name: &str, size: u64, kind: SymbolKind) -> SymbolRecord {
    SymbolRecord {
        name: name.to_string(),
        line: "1".to_string(),
        size,
        kind,
        binding: "GLOBAL".to_string(),
    }
}

fn entries(pairs: &[(&str, Vec<SymbolRecord>)]) -> PathEntries {
    pairs
        .iter()
        .map(|(path, records)| (path.to_string(), records.clone()))
        .collect()
}

fn build(entries: PathEntries) -> TreeNode {
    HierarchyBuilder::new(ColorSource::seeded(1))
        .build(ROOT_NAME, entries)
        .expect("build")
}

fn child_names(node: &TreeNode) -> Vec<&str> {
    node.children().iter().map(TreeNode::name).collect()
}

fn assert_sizes_add_up(node: &TreeNode) {
    if let TreeNode::Path(_) = node {
        let children_total = node.children().iter().map(TreeNode::size).sum::<u64>();
        assert_eq!(node.size(), children_total, "size of {}", node.name());
        for child in node.children() {
            assert_sizes_add_up(child);
        }
    }
}

fn assert_unique_child_names(node: &TreeNode) {
    let path_children = node
        .children()
        .iter()
        .filter(|child| matches!(child, TreeNode::Path(_)))
        .map(TreeNode::name)
        .collect::<Vec<_>>();
    let distinct = path_children.iter().collect::<HashSet<_>>();
    assert_eq!(distinct.len(), path_children.len(), "under {}", node.name());
    for child in node.children() {
        assert_unique_child_names(child);
    }
}

#[test]
fn groups_paths_by_segment() {
    let tree = build(entries(&[
        ("a/b.c", vec![record("x", 50, SymbolKind::Function)]),
        ("a/d.c", vec![record("y", 150, SymbolKind::Object)]),
    ]));

    assert_eq!(tree.name(), "root");
    assert_eq!(tree.size(), 200);
    assert_eq!(child_names(&tree), vec!["a"]);

    let a = tree.find_child("a").expect("a");
    assert!(!a.is_file());
    assert_eq!(child_names(a), vec!["b.c", "d.c"]);

    let b = tree.descend(&["a", "b.c"]).expect("b.c");
    assert!(b.is_file());
    assert_eq!(b.size(), 50);
    assert_eq!(b.children()[0].symbol().map(|symbol| symbol.size), Some(50));
}

#[test]
fn every_record_becomes_exactly_one_leaf() {
    let input = entries(&[
        (
            "src/net/socket.c",
            vec![
                record("connect", 300, SymbolKind::Function),
                record("connect", 300, SymbolKind::Function),
            ],
        ),
        ("src/core/sched.c", vec![record("runqueue", 64, SymbolKind::Object)]),
        ("??", vec![record("mystery", 8, SymbolKind::Other)]),
    ]);
    let tree = build(input);

    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.size(), 672);
    assert_sizes_add_up(&tree);
    assert_unique_child_names(&tree);
}

#[test]
fn file_symbols_precede_subdirectories() {
    let tree = build(entries(&[
        ("net", vec![record("net_init", 10, SymbolKind::Function)]),
        ("net/socket.c", vec![record("connect", 20, SymbolKind::Function)]),
    ]));

    let net = tree.find_child("net").expect("net");
    assert!(net.is_file());
    assert_eq!(child_names(net), vec!["net_init", "socket.c"]);
    assert_eq!(net.size(), 30);
}

#[test]
fn leaves_keep_input_order() {
    let tree = build(entries(&[(
        "main.c",
        vec![
            record("zeta", 1, SymbolKind::Function),
            record("alpha", 2, SymbolKind::Function),
            record("mid", 3, SymbolKind::Object),
        ],
    )]));

    let file = tree.find_child("main.c").expect("main.c");
    assert_eq!(child_names(file), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn empty_input_builds_an_empty_root() {
    let tree = build(PathEntries::new());
    assert_eq!(tree.name(), "root");
    assert_eq!(tree.size(), 0);
    assert!(tree.children().is_empty());
    assert!(!tree.is_file());
}

#[test]
fn malformed_paths_are_rejected() {
    for (path, reason) in [
        ("a//b.c", "empty path segment"),
        ("a/", "trailing path separator"),
        ("./b.c", "unresolved '.' segment"),
    ] {
        let result = HierarchyBuilder::new(ColorSource::seeded(1)).build(
            ROOT_NAME,
            entries(&[(path, vec![record("x", 1, SymbolKind::Function)])]),
        );
        match result {
            Err(TreemapError::MalformedPath {
                path: reported,
                reason: actual,
            }) => {
                assert_eq!(reported, path);
                assert_eq!(actual, reason);
            }
            other => panic!("expected MalformedPath for {path:?}, got {other:?}"),
        }
    }
}

#[test]
fn seeded_colors_are_reproducible() {
    let input = entries(&[
        ("a/b.c", vec![record("x", 5, SymbolKind::Function)]),
        ("c.c", vec![record("y", 7, SymbolKind::Object)]),
    ]);
    let first = HierarchyBuilder::new(ColorSource::seeded(42))
        .build(ROOT_NAME, input.clone())
        .expect("build");
    let second = HierarchyBuilder::new(ColorSource::seeded(42))
        .build(ROOT_NAME, input)
        .expect("build");

    fn colors(node: &TreeNode, out: &mut Vec<symbol_treemap::model::Rgb>) {
        out.push(node.color());
        for child in node.children() {
            colors(child, out);
        }
    }
    let (mut left, mut right) = (Vec::new(), Vec::new());
    colors(&first, &mut left);
    colors(&second, &mut right);
    assert_eq!(left, right);
    assert!(left.iter().all(|color| {
        [color.red, color.green, color.blue]
            .iter()
            .all(|channel| (0.0..1.0).contains(channel))
    }));
}
