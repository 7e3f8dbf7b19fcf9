use std::sync::Arc;

use log::{debug, trace};

use crate::buffers::FrameBuffers;
use crate::chunk;
use crate::config::{CodecVariant, DecoderConfig};
use crate::cursor::ByteCursor;
use crate::error::{Stream, XanError};
use crate::frame::{Frame, alloc_zeroed};
use crate::huffman;
use crate::palette::PaletteSet;
use crate::reconstruct::{RunStats, RunStreams, reconstruct};
use crate::unpack::{UNPACK_PADDING, unpack};

pub const FRAME_HEADER_LEN: usize = 8;
/// Image segment marker announcing packed pixel data.
pub const IMAGE_PACKED: u8 = 2;

/// Segment offsets at the start of a video payload, relative to the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub huffman_offset: usize,
    pub size_offset: usize,
    pub vector_offset: usize,
    pub image_offset: usize,
}

impl FrameHeader {
    /// Read the four offsets and check that each lands inside `payload`.
    /// The image segment must hold at least its marker byte.
    pub fn parse(payload: &[u8]) -> Result<Self, XanError> {
        let mut cursor = ByteCursor::new(payload, Stream::Header);
        let header = Self {
            huffman_offset: cursor.read_le16()? as usize,
            size_offset: cursor.read_le16()? as usize,
            vector_offset: cursor.read_le16()? as usize,
            image_offset: cursor.read_le16()? as usize,
        };

        let len = payload.len();
        let checks = [
            ("huffman", header.huffman_offset, len),
            ("size", header.size_offset, len),
            ("vector", header.vector_offset, len),
            ("image", header.image_offset, len.saturating_sub(1)),
        ];
        for (segment, offset, limit) in checks {
            if offset > limit {
                return Err(XanError::SegmentOutOfRange {
                    segment,
                    offset,
                    len,
                });
            }
        }
        Ok(header)
    }
}

/// Stateful decoder for one video stream.
///
/// Chunks must be fed in presentation order: every frame after the first is
/// painted relative to the frame decoded just before it.
#[derive(Debug)]
pub struct XanDecoder {
    config: DecoderConfig,
    palettes: PaletteSet,
    buffers: FrameBuffers,
    opcodes: Vec<u8>,
    unpacked: Vec<u8>,
    frames_decoded: u64,
}

impl XanDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self, XanError> {
        config.validate()?;
        let pixels = config.pixel_count();
        Ok(Self {
            buffers: FrameBuffers::new(config.width, config.height, config.stride())?,
            opcodes: alloc_zeroed(pixels)?,
            unpacked: alloc_zeroed(pixels + UNPACK_PADDING)?,
            palettes: PaletteSet::new(),
            frames_decoded: 0,
            config,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    /// Frame the next chunk will be painted against.
    pub fn previous_frame(&self) -> Option<&Arc<Frame>> {
        self.buffers.previous()
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Decode one chunk into a new frame.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<Arc<Frame>, XanError> {
        let variant = self.config.variant;
        let payload = match variant {
            CodecVariant::Wc3 => chunk::demux(chunk, &mut self.palettes)?,
            CodecVariant::Wc4 => chunk,
        };

        let palette = self.palettes.snapshot();
        let opcodes = &mut self.opcodes;
        let unpacked = &mut self.unpacked;
        let index = self.frames_decoded;

        let frame = self
            .buffers
            .cycle(palette, |current, previous| match variant {
                CodecVariant::Wc3 => {
                    let stats = decode_payload(payload, opcodes, unpacked, current, previous)?;
                    trace!(
                        "frame {index}: {} opcodes, {} literal, {} unchanged, {} motion pixels",
                        stats.opcodes,
                        stats.literal_pixels,
                        stats.unchanged_pixels,
                        stats.motion_pixels
                    );
                    Ok(())
                }
                CodecVariant::Wc4 => {
                    debug!(
                        "frame {index}: {} payloads are not decoded, leaving frame blank",
                        variant.long_name()
                    );
                    Ok(())
                }
            })?;

        self.frames_decoded += 1;
        Ok(frame)
    }
}

/// Run the per-frame pipeline on a `VGA ` payload: decode opcodes, expand
/// the image segment if packed, then paint `current`.
pub fn decode_payload(
    payload: &[u8],
    opcodes: &mut [u8],
    unpacked: &mut [u8],
    current: &mut Frame,
    previous: &Frame,
) -> Result<RunStats, XanError> {
    let header = FrameHeader::parse(payload)?;

    let opcode_count = huffman::decode_opcodes(&payload[header.huffman_offset..], opcodes)?;

    let image = &payload[header.image_offset..];
    let (&marker, image_data) = image.split_first().ok_or(XanError::Truncated {
        stream: Stream::Pixels,
        offset: header.image_offset,
        needed: 1,
        available: 0,
    })?;

    let pixels: &[u8] = if marker == IMAGE_PACKED {
        let capacity = unpacked.len().saturating_sub(UNPACK_PADDING);
        let written = unpack(image_data, unpacked, capacity)?;
        if written < capacity {
            debug!("packed image stopped after {written} of {capacity} bytes");
        }
        &unpacked[..capacity]
    } else {
        if marker > IMAGE_PACKED {
            debug!("unexpected image marker {marker}, treating data as unpacked");
        }
        image_data
    };

    reconstruct(
        RunStreams {
            opcodes: &opcodes[..opcode_count],
            sizes: &payload[header.size_offset..],
            vectors: &payload[header.vector_offset..],
            pixels,
        },
        current,
        previous,
    )
}
