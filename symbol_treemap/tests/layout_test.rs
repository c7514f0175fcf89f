use symbol_treemap::hierarchy::{ColorSource, HierarchyBuilder, PathEntries, ROOT_NAME};
use symbol_treemap::layout::{Axis, LaidOutNode, Rect, layout_subtree, layout_treemap};
use symbol_treemap::model::{SymbolKind, SymbolRecord, TreeNode};

const EPSILON: f64 = 1e-9;

fn record(name: &str, size: u64) -> SymbolRecord {
    SymbolRecord {
        name: name.to_string(),
        line: "?".to_string(),
        size,
        kind: SymbolKind::Function,
        binding: "GLOBAL".to_string(),
    }
}

fn tree(pairs: &[(&str, &[(&str, u64)])]) -> TreeNode {
    let entries = pairs
        .iter()
        .map(|(path, symbols)| {
            let records = symbols
                .iter()
                .map(|(name, size)| record(name, *size))
                .collect();
            (path.to_string(), records)
        })
        .collect::<PathEntries>();
    HierarchyBuilder::new(ColorSource::seeded(3))
        .build(ROOT_NAME, entries)
        .expect("build")
}

fn find<'a>(laid_out: &'a [LaidOutNode<'a>], name: &str) -> &'a LaidOutNode<'a> {
    laid_out
        .iter()
        .find(|entry| entry.node.name() == name)
        .unwrap_or_else(|| panic!("{name} not laid out"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn children_split_the_parent_by_size() {
    let root = tree(&[("a/b.c", &[("x", 50)]), ("a/d.c", &[("y", 150)])]);
    let a = root.find_child("a").expect("a");

    let laid_out = layout_subtree(a, Rect::UNIT, Axis::Horizontal);
    let b = find(&laid_out, "b.c");
    let d = find(&laid_out, "d.c");

    assert_eq!(b.rect, Rect::new([0.0, 0.0], [0.25, 1.0]));
    assert_close(d.rect.lower[0], 0.25);
    assert_eq!(d.rect.upper, [1.0, 1.0]);
    assert_eq!(b.axis, Axis::Vertical);
    assert_eq!(b.depth, 1);
}

#[test]
fn axis_alternates_with_depth() {
    let root = tree(&[("a/b.c", &[("x", 50)]), ("a/d.c", &[("y", 150)])]);
    let laid_out = layout_treemap(&root);

    let b = find(&laid_out, "b.c");
    assert_eq!(b.depth, 2);
    assert_eq!(b.axis, Axis::Horizontal);
    assert_eq!(b.rect, Rect::new([0.0, 0.0], [1.0, 0.25]));

    let y = find(&laid_out, "y");
    assert_eq!(y.rect.upper, [1.0, 1.0]);
}

#[test]
fn emits_every_node_parents_first() {
    let root = tree(&[
        ("lib/a.c", &[("f", 3), ("g", 1)]),
        ("lib/b.c", &[("h", 4)]),
        ("main.c", &[("main", 8)]),
    ]);
    let laid_out = layout_treemap(&root);

    assert_eq!(laid_out.len(), root.node_count());
    let names = laid_out
        .iter()
        .map(|entry| entry.node.name())
        .collect::<Vec<_>>();
    similar_asserts::assert_eq!(
        names,
        vec!["root", "lib", "a.c", "f", "g", "b.c", "h", "main.c", "main"]
    );
}

#[test]
fn leaf_areas_cover_the_unit_square() {
    let root = tree(&[
        ("lib/a.c", &[("f", 3), ("g", 1)]),
        ("lib/b.c", &[("h", 7)]),
        ("main.c", &[("main", 13), ("init", 2)]),
        ("??", &[("unknown", 5)]),
    ]);
    let laid_out = layout_treemap(&root);

    let leaves = laid_out
        .iter()
        .filter(|entry| entry.node.symbol().is_some())
        .collect::<Vec<_>>();
    assert_eq!(leaves.len(), 6);

    let total = root.size() as f64;
    for leaf in &leaves {
        assert_close(leaf.rect.area(), leaf.node.size() as f64 / total);
    }
    assert_close(leaves.iter().map(|leaf| leaf.rect.area()).sum(), 1.0);

    for (index, left) in leaves.iter().enumerate() {
        for right in &leaves[index + 1..] {
            let overlap_x = left.rect.upper[0].min(right.rect.upper[0])
                - left.rect.lower[0].max(right.rect.lower[0]);
            let overlap_y = left.rect.upper[1].min(right.rect.upper[1])
                - left.rect.lower[1].max(right.rect.lower[1]);
            assert!(
                overlap_x <= EPSILON || overlap_y <= EPSILON,
                "{} overlaps {}",
                left.node.name(),
                right.node.name()
            );
        }
    }
}

#[test]
fn children_stay_inside_their_parent() {
    let root = tree(&[
        ("a/b/c.c", &[("one", 11), ("two", 29)]),
        ("a/d.c", &[("three", 17)]),
        ("e.c", &[("four", 1)]),
    ]);

    fn check(node: &TreeNode, laid_out: &[LaidOutNode<'_>]) {
        let parent = laid_out
            .iter()
            .find(|entry| std::ptr::eq(entry.node, node))
            .expect("parent laid out");
        for child in node.children() {
            let inner = laid_out
                .iter()
                .find(|entry| std::ptr::eq(entry.node, child))
                .expect("child laid out");
            for axis in 0..2 {
                assert!(inner.rect.lower[axis] >= parent.rect.lower[axis] - EPSILON);
                assert!(inner.rect.upper[axis] <= parent.rect.upper[axis] + EPSILON);
            }
            check(child, laid_out);
        }
    }
    let laid_out = layout_treemap(&root);
    check(&root, &laid_out);
}

#[test]
fn last_child_reaches_the_parent_edge() {
    let root = tree(&[("f.c", &[("a", 1), ("b", 1), ("c", 1)])]);
    let laid_out = layout_treemap(&root);

    let thirds = ["a", "b", "c"].map(|name| find(&laid_out, name).rect);
    let along = Axis::Vertical.index();
    assert_eq!(thirds[2].upper[along], 1.0);
    assert_eq!(thirds[0].upper[along], thirds[1].lower[along]);
    assert_eq!(thirds[1].upper[along], thirds[2].lower[along]);
}

#[test]
fn zero_size_subtree_is_not_subdivided() {
    let root = tree(&[("empty.c", &[("nothing", 0)]), ("full.c", &[("all", 10)])]);
    let laid_out = layout_treemap(&root);

    let names = laid_out
        .iter()
        .map(|entry| entry.node.name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["root", "empty.c", "full.c", "all"]);

    let empty = find(&laid_out, "empty.c");
    assert_close(empty.rect.width(), 0.0);
    assert_eq!(find(&laid_out, "full.c").rect, Rect::UNIT);
}

#[test]
fn empty_tree_lays_out_only_the_root() {
    let root = tree(&[]);
    let laid_out = layout_treemap(&root);
    assert_eq!(laid_out.len(), 1);
    assert_eq!(laid_out[0].rect, Rect::UNIT);
}
