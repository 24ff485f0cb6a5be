// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editor-like shell: a toolbar row above a splitter holding a sidebar and a scrolled document.
//!
//! This example shows how to:
//! - build nested compositions, a splitter, and a scroll area with a scroll bar,
//! - drive a splitter drag and a scroll bar drag with pointer positions,
//! - commit, read back damage, and paint a geometry snapshot through a delegate.
//!
//! Run with layout diagnostics:
//! - `RUST_LOG=understory_canvas=debug cargo run -p understory_canvas_demos --example editor_shell`

use tracing_subscriber::EnvFilter;
use understory_canvas::{
    Axis, BoxLayout, Canvas, IntPoint, IntRect, IntSize, Layout, Margins, NodeId, PaintDelegate,
    Sizing, SnapshotCell, TreeError,
};

/// Prints each painted leaf instead of drawing it.
struct PrintPainter<'a> {
    names: &'a [(NodeId, &'static str)],
}

impl PaintDelegate for PrintPainter<'_> {
    type Context = usize;

    fn paint_item(&mut self, count: &mut usize, item: NodeId, rect: IntRect, is_selected: bool) {
        *count += 1;
        let name = self
            .names
            .iter()
            .find(|(id, _)| *id == item)
            .map_or("?", |(_, name)| name);
        let mark = if is_selected { "*" } else { " " };
        println!(
            "{mark} {name:<10} x={:<4} y={:<5} w={:<4} h={}",
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height()
        );
    }

    fn push_clip(&mut self, _: &mut usize, clip: IntRect) {
        println!("  clip {clip:?}");
    }
}

fn main() -> Result<(), TreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut canvas = Canvas::new();

    // Toolbar: three fixed buttons pushed to the left by a trailing stretch.
    let shell = canvas.create_composition(Layout::column());
    let toolbar = canvas.create_composition(Layout::Box(
        BoxLayout::new(Axis::Horizontal)
            .with_margins(Margins::uniform(4))
            .with_spacing(4),
    ));
    let mut names = Vec::new();
    for name in ["open", "save", "run"] {
        let button = canvas.create_item(Sizing::fixed(IntSize::new(48, 24)));
        canvas.add_canvas_item(toolbar, button)?;
        names.push((button, name));
    }
    canvas.add_stretch(toolbar)?;

    // Body: sidebar | document with a vertical scroll bar.
    let body = canvas.create_splitter(Axis::Horizontal);
    let sidebar = canvas.create_item(Sizing::default().with_minimum_width(120));
    let viewer = canvas.create_composition(Layout::row());
    let area = canvas.create_scroll_area();
    let bar = canvas.create_scroll_bar(area, Axis::Vertical)?;
    let document = canvas.create_item(Sizing::default().with_preferred_height(2400));
    canvas.add_canvas_item(area, document)?;
    canvas.add_canvas_item(viewer, area)?;
    canvas.add_canvas_item(viewer, bar)?;
    canvas.add_canvas_item(body, sidebar)?;
    canvas.add_canvas_item(body, viewer)?;
    canvas.set_pane_fractions(body, &[1.0, 3.0])?;
    names.extend([
        (sidebar, "sidebar"),
        (document, "document"),
        (bar, "scrollbar"),
    ]);

    canvas.add_canvas_item(shell, toolbar)?;
    canvas.add_canvas_item(shell, body)?;
    canvas.update_layout(shell, IntPoint::ZERO, IntSize::new(800, 600), false);
    let damage = canvas.commit();
    tracing::info!(union = ?damage.union_rect(), "first commit");

    // Widen the sidebar by dragging the boundary 100px to the right.
    let boundary = canvas.canvas_size(sidebar).map_or(0, |s| s.width);
    if canvas.splitter_begin_drag(body, IntPoint::new(boundary, 200))? {
        canvas.splitter_drag_to(body, IntPoint::new(boundary + 100, 200))?;
        canvas.splitter_end_drag(body)?;
    }

    // Drag the scroll bar thumb half way down its track.
    if let Some(thumb) = canvas.scroll_bar_thumb_rect(bar) {
        let grip = thumb.center();
        canvas.scroll_bar_begin_drag(bar, grip)?;
        let track = canvas.canvas_size(bar).map_or(0, |s| s.height);
        canvas.scroll_bar_drag_to(bar, IntPoint::new(grip.x, grip.y + track / 2))?;
        canvas.scroll_bar_end_drag(bar)?;
    }
    println!("document offset {:?}", canvas.scroll_offset(area));

    let damage = canvas.commit();
    tracing::info!(rects = damage.dirty_rects.len(), "second commit");

    let cell = SnapshotCell::default();
    cell.publish(canvas.snapshot(shell));
    let snapshot = cell.load();
    let mut painted = 0;
    snapshot.paint(&mut painted, &mut PrintPainter { names: &names }, |id| {
        id == document
    });
    println!("painted {painted} leaves at epoch {}", snapshot.epoch());

    let hits = canvas.canvas_items_at_point(shell, IntPoint::new(30, 16));
    println!("hit stack at (30, 16): {hits:?}");
    Ok(())
}
