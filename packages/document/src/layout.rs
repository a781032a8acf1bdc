//! # Auto Layout
//!
//! Resolves the size and child positions of auto-layout frames.
//!
//! Children are stacked along the layout direction with `item_spacing`
//! between them, offset by the frame's padding. A frame whose sizing is
//! `Auto` hugs its contents on that axis; `Fixed` keeps its current size.
//! Frames without a layout mode leave their children where they are.

use crate::{LayoutMode, Node, NodeData, Sizing, TextProps};

/// Advance of one glyph, as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.6;

/// Line height, as a multiple of the font size
const LINE_HEIGHT: f64 = 1.2;

/// Size of a text node that auto-resizes to its characters
pub fn measure_text(text: &TextProps) -> (f64, f64) {
    let lines: Vec<&str> = text.characters.split('\n').collect();
    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let width = widest as f64 * text.font_size * GLYPH_WIDTH;
    let height = lines.len() as f64 * text.font_size * LINE_HEIGHT;
    (width, height)
}

/// Position `children` inside `frame` and return the frame's resolved size.
///
/// Returns `None` when the node is not an auto-layout frame.
pub fn resolve_auto_layout(frame: &Node, children: &mut [&mut Node]) -> Option<(f64, f64)> {
    let props = match &frame.data {
        NodeData::Frame(props) if props.layout.mode != LayoutMode::None => props,
        _ => return None,
    };
    let layout = &props.layout;
    let padding = layout.padding;
    let vertical = layout.mode == LayoutMode::Vertical;

    let mut cursor = if vertical { padding.top } else { padding.left };
    let mut along = 0.0;
    let mut across: f64 = 0.0;

    for (index, child) in children.iter_mut().enumerate() {
        if index > 0 {
            cursor += layout.item_spacing;
            along += layout.item_spacing;
        }

        if vertical {
            child.x = padding.left;
            child.y = cursor;
            cursor += child.height;
            along += child.height;
            across = across.max(child.width);
        } else {
            child.x = cursor;
            child.y = padding.top;
            cursor += child.width;
            along += child.width;
            across = across.max(child.height);
        }
    }

    let (mut width, mut height) = (frame.width, frame.height);
    let hug_primary = layout.primary_sizing == Sizing::Auto;
    let hug_counter = layout.counter_sizing == Sizing::Auto;

    if vertical {
        if hug_primary {
            height = padding.top + along + padding.bottom;
        }
        if hug_counter {
            width = padding.left + across + padding.right;
        }
    } else {
        if hug_primary {
            width = padding.left + along + padding.right;
        }
        if hug_counter {
            height = padding.top + across + padding.bottom;
        }
    }

    Some((width, height))
}
