// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented text dump of a retained tree.

use std::fmt::Write as _;

use scenesync_core::node::NodeHandle;
use scenesync_core::shape::DescriptorAttr;
use scenesync_core::tree::RetainedTree;

/// Renders `tree` as one line per node, children indented under their
/// container in paint order.
///
/// ```text
/// root
///   #2 C cx=5 cy=6 r=7 color=[7,0,0,255]
///   #1 R x=1 y=2 width=3 height=4 color=[10,20,30,255]
///     #3 -
/// ```
///
/// Nodes without a payload print `-`. Unresolved fields print `?`.
#[must_use]
pub fn render(tree: &RetainedTree) -> String {
    let mut out = String::from("root\n");
    for child in tree.children(NodeHandle::ROOT) {
        render_node(tree, child, 1, &mut out);
    }
    out
}

fn render_node(tree: &RetainedTree, id: NodeHandle, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    _ = write!(out, "{id} ");
    match tree.shape(id) {
        None => out.push('-'),
        Some(DescriptorAttr::R(rect)) => {
            _ = write!(
                out,
                "R x={} y={} width={} height={} color={}",
                field(rect.x),
                field(rect.y),
                field(rect.width),
                field(rect.height),
                color(rect.color),
            );
        }
        Some(DescriptorAttr::C(circle)) => {
            _ = write!(
                out,
                "C cx={} cy={} r={} color={}",
                field(circle.cx),
                field(circle.cy),
                field(circle.r),
                color(circle.color),
            );
        }
    }
    out.push('\n');
    for child in tree.children(id) {
        render_node(tree, child, depth + 1, out);
    }
}

fn field<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("?"), |v| v.to_string())
}

fn color(channels: [Option<u8>; 4]) -> String {
    let parts: Vec<String> = channels.into_iter().map(field).collect();
    format!("[{}]", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenesync_core::protocol::RenderingCore;
    use scenesync_core::shape::{
        CircleAttrs, RectAttrs, RectPayload, Rgba, ShapeAttrs, ShapeDescriptor, serialize,
    };

    fn h(raw: u32) -> NodeHandle {
        NodeHandle::from_raw(raw)
    }

    #[test]
    fn empty_tree() {
        assert_eq!(render(&RetainedTree::new()), "root\n");
    }

    #[test]
    fn nested_tree() {
        let mut tree = RetainedTree::new();
        let rect = ShapeAttrs::Rect(RectAttrs::new(1, 2, 3, 4, Rgba::new(10, 20, 30, 255)));
        let circle = ShapeAttrs::Circle(CircleAttrs::new(5, 6, 7, Rgba::new(7, 0, 0, 255)));

        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.set_shape_by_serde(h(1), &serialize(&rect).unwrap())
            .unwrap();
        tree.create_child_append_to_container(h(2), 0).unwrap();
        tree.set_shape_by_serde(h(2), &serialize(&circle).unwrap())
            .unwrap();
        tree.append_child(h(1), h(3)).unwrap();

        assert_eq!(
            render(&tree),
            "root\n\
             \x20 #2 C cx=5 cy=6 r=7 color=[7,0,0,255]\n\
             \x20 #1 R x=1 y=2 width=3 height=4 color=[10,20,30,255]\n\
             \x20   #3 -\n"
        );
    }

    #[test]
    fn unresolved_fields_print_placeholder() {
        let mut tree = RetainedTree::new();
        tree.create_child_append_to_container(h(1), 0).unwrap();
        tree.set_shape_by_serde(
            h(1),
            &ShapeDescriptor::new(DescriptorAttr::R(RectPayload {
                x: Some(1),
                ..RectPayload::default()
            })),
        )
        .unwrap();
        assert_eq!(
            render(&tree),
            "root\n  #1 R x=1 y=? width=? height=? color=[?,?,?,?]\n"
        );
    }
}
