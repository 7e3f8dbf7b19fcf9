use std::fmt;

use thiserror::Error;

/// Byte regions the decoder reads from, used to label overruns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Chunk,
    Header,
    Table,
    Bitstream,
    Opcodes,
    Sizes,
    Vectors,
    Pixels,
    Packed,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stream::Chunk => "chunk",
            Stream::Header => "frame header",
            Stream::Table => "trie table",
            Stream::Bitstream => "opcode bitstream",
            Stream::Opcodes => "opcode",
            Stream::Sizes => "size",
            Stream::Vectors => "vector",
            Stream::Pixels => "pixel",
            Stream::Packed => "packed image",
        };
        f.write_str(name)
    }
}

/// Error conditions returned while decoding a chunk.
#[derive(Debug, Error)]
pub enum XanError {
    #[error("{stream} stream truncated: needed {needed} byte(s) at offset {offset}, {available} available")]
    Truncated {
        stream: Stream,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("palette chunk holds {0} bytes, expected at least 768")]
    PaletteTooSmall(usize),
    #[error("palette set already holds {0} palettes")]
    PaletteSetFull(usize),
    #[error("frame select chunk holds {0} bytes, expected at least 4")]
    SelectTooSmall(usize),
    #[error("{segment} segment offset {offset} lies outside the {len} byte payload")]
    SegmentOutOfRange {
        segment: &'static str,
        offset: usize,
        len: usize,
    },
    #[error("trie node {node:#04x} indexes slot {slot} outside a {len} byte table")]
    TrieIndexOutOfRange { node: u8, slot: isize, len: usize },
    #[error("back-reference distance {distance} exceeds the {written} byte(s) written")]
    BackReferenceOutOfRange { distance: usize, written: usize },
    #[error("unpacked output overran its {capacity} byte buffer")]
    UnpackOverflow { capacity: usize },
    #[error("motion vector ({dx}, {dy}) reads row {row} outside the previous frame")]
    MotionOutOfBounds { dx: i32, dy: i32, row: isize },
    #[error("run of {size} pixel(s) exceeds the {remaining} left in the frame")]
    RunOverflow { size: usize, remaining: usize },
    #[error("invalid frame dimensions {width}x{height} (stride {stride})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        stride: usize,
    },
    #[error("failed to allocate {0} byte buffer")]
    Allocation(usize),
}
