//! Benchmarks for visible-set derivation, layout, and painting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storyviz_core::{Rect, Size};
use storyviz_widgets::coverage_tree::{compute_layout, CategoryTag, CoverageTree, ExpansionState};
use storyviz_widgets::{LayoutConfig, TreeIndex, TreeNode};

/// Root with `branches` categories of `leaves` leaves each.
fn wide_tree(branches: usize, leaves: usize) -> TreeNode {
    TreeNode::root("root").with_children((0..branches).map(|b| {
        TreeNode::branch(format!("category {b}")).with_children(
            (0..leaves).map(|l| TreeNode::leaf(format!("variable {b}.{l}"), CategoryTag::Both)),
        )
    }))
}

/// Single chain `depth` levels deep.
fn deep_tree(depth: usize) -> TreeNode {
    let mut node = TreeNode::leaf("bottom", CategoryTag::Public);
    for d in (1..depth).rev() {
        node = TreeNode::branch(format!("level {d}")).with_child(node);
    }
    TreeNode::root("root").with_child(node)
}

fn bench_visible_set(c: &mut Criterion) {
    let index = TreeIndex::build(&wide_tree(20, 50));
    let mut state = ExpansionState::new(&index);
    state.expand_all(&index);

    c.bench_function("visible_set_1000_leaves", |b| {
        b.iter(|| black_box(state.visible(black_box(&index))));
    });
}

fn bench_layout_wide(c: &mut Criterion) {
    let index = TreeIndex::build(&wide_tree(20, 50));
    let mut state = ExpansionState::new(&index);
    state.expand_all(&index);
    let visible = state.visible(&index);
    let area = Rect::new(0.0, 0.0, 1440.0, 900.0);
    let config = LayoutConfig::default();

    c.bench_function("layout_wide_1000_leaves", |b| {
        b.iter(|| black_box(compute_layout(&index, &visible, black_box(area), &config)));
    });
}

fn bench_layout_deep(c: &mut Criterion) {
    let index = TreeIndex::build(&deep_tree(60));
    let mut state = ExpansionState::new(&index);
    state.expand_all(&index);
    let visible = state.visible(&index);
    let area = Rect::new(0.0, 0.0, 1440.0, 900.0);
    let config = LayoutConfig::default();

    c.bench_function("layout_deep_60_levels", |b| {
        b.iter(|| black_box(compute_layout(&index, &visible, black_box(area), &config)));
    });
}

fn bench_toggle_and_refresh(c: &mut Criterion) {
    let mut tree = CoverageTree::new(&wide_tree(12, 8));
    tree.set_container_size(Size::new(1200.0, 600.0));
    let first = tree.index().root().children[0];

    c.bench_function("toggle_refresh_96_leaves", |b| {
        b.iter(|| black_box(tree.toggle(black_box(first))));
    });
}

fn bench_svg_frame(c: &mut Criterion) {
    let mut tree = CoverageTree::new(&wide_tree(12, 8));
    tree.set_container_size(Size::new(1200.0, 600.0));
    tree.expand_all();

    c.bench_function("svg_frame_96_leaves", |b| {
        b.iter(|| black_box(tree.to_svg()));
    });
}

criterion_group!(
    benches,
    bench_visible_set,
    bench_layout_wide,
    bench_layout_deep,
    bench_toggle_and_refresh,
    bench_svg_frame
);
criterion_main!(benches);
