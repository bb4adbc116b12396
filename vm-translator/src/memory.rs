//! Memory segment address mapping.
//!
//! Maps the logical VM segments onto Hack RAM: four segments are reached
//! through a base pointer, two sit at fixed addresses, `constant` is
//! immediate, and `static` becomes a per-file symbolic name.

use crate::parser::Segment;

/// How a segment's slots are addressed in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAccess {
    /// Immediate value, no memory access.
    Constant,
    /// Indirect through a base pointer register (LCL, ARG, THIS, THAT).
    Indirect(&'static str),
    /// Fixed RAM base: 3 for pointer, 5 for temp.
    Direct(u16),
    /// Per-file symbolic name `<file>.<index>`.
    Static,
}

/// Determine the access mode for a segment.
pub fn segment_access(segment: Segment) -> SegmentAccess {
    match segment {
        Segment::Constant => SegmentAccess::Constant,
        Segment::Local => SegmentAccess::Indirect("LCL"),
        Segment::Argument => SegmentAccess::Indirect("ARG"),
        Segment::This => SegmentAccess::Indirect("THIS"),
        Segment::That => SegmentAccess::Indirect("THAT"),
        Segment::Pointer => SegmentAccess::Direct(3),
        Segment::Temp => SegmentAccess::Direct(5),
        Segment::Static => SegmentAccess::Static,
    }
}
