// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded mutations.
//!
//! [`export`] writes the calls recorded by a
//! [`MutationLog`](scenesync_core::protocol::MutationLog) as a JSON array,
//! one object per call, keyed by the wire method name:
//!
//! ```json
//! [
//!   { "op": "createChildAppendToContainer", "child": 1, "index": 0 },
//!   { "op": "setShapeBySerde", "id": 1, "descriptor": { "field2": [[0]], ... } },
//!   { "op": "removeChildFromContainer", "child": 1, "parent": 0 }
//! ]
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use scenesync_core::protocol::Mutation;

/// Writes `mutations` as a pretty-printed JSON array.
pub fn export(mutations: &[Mutation], writer: &mut dyn Write) -> io::Result<()> {
    let events = mutations
        .iter()
        .map(to_value)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

/// Converts one call into its JSON object.
pub fn to_value(mutation: &Mutation) -> serde_json::Result<Value> {
    let op = mutation.op_name();
    Ok(match mutation {
        Mutation::Create { child, index } => json!({
            "op": op,
            "child": child,
            "index": index,
        }),
        Mutation::SetShape { id, descriptor } => json!({
            "op": op,
            "id": id,
            "descriptor": serde_json::to_value(descriptor)?,
        }),
        Mutation::Remove { child, parent } => json!({
            "op": op,
            "child": child,
            "parent": parent,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenesync_core::node::NodeHandle;
    use scenesync_core::protocol::{MutationLog, RenderingCore};
    use scenesync_core::shape::{CircleAttrs, Rgba, ShapeAttrs, ShapeDescriptor, serialize};

    #[test]
    fn export_uses_wire_names() {
        let mut log = MutationLog::new();
        let one = NodeHandle::from_raw(1);
        let circle = ShapeAttrs::Circle(CircleAttrs::new(5, 6, 7, Rgba::new(7, 0, 0, 255)));
        log.create_child_append_to_container(one, 0).unwrap();
        log.set_shape_by_serde(one, &serialize(&circle).unwrap())
            .unwrap();
        log.remove_child_from_container(one, NodeHandle::ROOT)
            .unwrap();

        let mut out = Vec::new();
        export(log.mutations(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["op"], "createChildAppendToContainer");
        assert_eq!(parsed[0]["child"], 1);
        assert_eq!(parsed[0]["index"], 0);
        assert_eq!(parsed[1]["op"], "setShapeBySerde");
        assert_eq!(
            parsed[1]["descriptor"],
            json!({
                "field2": [[0]],
                "field3": [0, 0, 0, 0],
                "attr": { "C": { "cx": 5, "cy": 6, "r": 7, "color": [7, 0, 0, 255] } },
            })
        );
        assert_eq!(parsed[2]["op"], "removeChildFromContainer");
        assert_eq!(parsed[2]["parent"], 0);
    }

    #[test]
    fn descriptor_round_trips_through_export() {
        let descriptor = serialize(&ShapeAttrs::Circle(CircleAttrs::default())).unwrap();
        let value = to_value(&Mutation::SetShape {
            id: NodeHandle::from_raw(4),
            descriptor: descriptor.clone(),
        })
        .unwrap();
        let back: ShapeDescriptor = serde_json::from_value(value["descriptor"].clone()).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn export_empty_log() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
