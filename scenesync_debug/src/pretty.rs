// Copyright 2026 the Scenesync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable event output.

use std::io::Write;

use scenesync_core::trace::{
    CreateEvent, MutationSink, RemoveEvent, ResolveFailedEvent, SetShapeEvent, ShapeSkippedEvent,
    UpdateEvent,
};

/// A [`MutationSink`] that writes one line per event to `W`.
///
/// Write errors are ignored; a sink has no way to report them to the mapper.
#[derive(Debug)]
pub struct PrettyPrintSink<W> {
    writer: W,
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MutationSink for PrettyPrintSink<W> {
    fn on_create(&mut self, e: &CreateEvent) {
        _ = writeln!(
            self.writer,
            "[create]   {:?} {} {} under {} at {} ({:?})",
            e.instance, e.kind, e.handle, e.parent, e.index, e.core,
        );
    }

    fn on_set_shape(&mut self, e: &SetShapeEvent) {
        _ = writeln!(
            self.writer,
            "[shape]    {:?} {} {} on {}",
            e.instance, e.kind, e.handle, e.op,
        );
    }

    fn on_shape_skipped(&mut self, e: &ShapeSkippedEvent) {
        _ = writeln!(
            self.writer,
            "[skip]     {:?} {} {} has no descriptor",
            e.instance, e.kind, e.handle,
        );
    }

    fn on_remove(&mut self, e: &RemoveEvent) {
        _ = writeln!(
            self.writer,
            "[remove]   {:?} {} from {} ({:?})",
            e.instance, e.handle, e.parent, e.core,
        );
    }

    fn on_update(&mut self, e: &UpdateEvent) {
        _ = writeln!(
            self.writer,
            "[update]   {:?} {} policy={:?} resent={}",
            e.instance, e.handle, e.policy, e.resent,
        );
    }

    fn on_resolve_failed(&mut self, e: &ResolveFailedEvent) {
        _ = writeln!(
            self.writer,
            "[orphan]   {:?} {} aborted: no Surface root",
            e.instance, e.op,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenesync_core::lifecycle::Mapper;
    use scenesync_core::protocol::MutationLog;
    use scenesync_core::shape::{RectAttrs, Rgba, ShapeAttrs, TriangleAttrs};
    use scenesync_core::trace::Tracer;

    /// Shares the output buffer between the mapper-owned sink and the test.
    #[derive(Clone, Default)]
    struct Shared(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_line_per_event() {
        let out = Shared::default();
        let mut mapper = Mapper::new();
        mapper.set_tracer(Tracer::new(Box::new(PrettyPrintSink::new(out.clone()))));

        let surface = mapper.attach_surface(MutationLog::new());
        let rect = mapper
            .declare(
                ShapeAttrs::Rect(RectAttrs::new(0, 0, 10, 10, Rgba::new(0, 0, 0, 255))),
                Some(surface),
            )
            .unwrap();
        let tri = mapper
            .declare(ShapeAttrs::Triangle(TriangleAttrs::default()), Some(surface))
            .unwrap();
        let orphan = mapper.declare(ShapeAttrs::Layer, None).unwrap();
        mapper.mount(rect).unwrap();
        mapper.mount(tri).unwrap();
        mapper.update(rect).unwrap();
        mapper.unmount(rect).unwrap();
        assert!(mapper.mount(orphan).is_err());

        let text = String::from_utf8(out.0.borrow().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[0],
            "[create]   InstanceId(1) Rect #1 under #0 at 0 (CoreId(0))"
        );
        assert_eq!(lines[1], "[shape]    InstanceId(1) Rect #1 on mount");
        assert_eq!(
            lines[3],
            "[skip]     InstanceId(2) Triangle #2 has no descriptor"
        );
        assert!(lines[4].starts_with("[update]"));
        assert_eq!(
            lines[5],
            "[remove]   InstanceId(1) #1 from #0 (CoreId(0))"
        );
        assert_eq!(
            lines[6],
            "[orphan]   InstanceId(3) mount aborted: no Surface root"
        );
    }

    #[test]
    fn orphan_line() {
        let mut sink = PrettyPrintSink::new(Vec::new());
        let mut mapper: Mapper<MutationLog> = Mapper::new();
        let orphan = mapper.declare(ShapeAttrs::Layer, None).unwrap();
        sink.on_resolve_failed(&ResolveFailedEvent {
            instance: orphan,
            op: scenesync_core::lifecycle::LifecycleOp::Mount,
        });
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "[orphan]   InstanceId(0) mount aborted: no Surface root\n");
    }
}
