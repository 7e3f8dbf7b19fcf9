#![allow(dead_code)]

use std::collections::HashMap;

use xan_formats::chunk::{TAG_PALT, TAG_SHOT, TAG_VGA};
use xan_formats::decoder::{FRAME_HEADER_LEN, IMAGE_PACKED};
use xan_formats::huffman::TRIE_END;
use xan_formats::palette::PALETTE_SIZE;

const FIRST_INNER_NODE: u8 = 0x17;

/// Encode `opcodes` as a table segment: a balanced trie over the symbols in
/// use (plus the end node) followed by the LSB-first bitstream.
pub fn opcode_segment(opcodes: &[u8]) -> Vec<u8> {
    let mut symbols: Vec<u8> = opcodes.to_vec();
    symbols.push(TRIE_END);
    symbols.sort_unstable();
    symbols.dedup();
    if symbols.len() == 1 {
        symbols.push(TRIE_END);
    }

    let mut inner: Vec<(u8, u8)> = Vec::new();
    let mut codes: HashMap<u8, Vec<u8>> = HashMap::new();
    build_node(&symbols, Vec::new(), &mut inner, &mut codes);

    let mut segment = vec![inner.len() as u8];
    segment.extend(inner.iter().map(|&(zero, _)| zero));
    segment.extend(inner.iter().map(|&(_, one)| one));

    let mut bits = BitWriter::default();
    for opcode in opcodes.iter().chain(std::iter::once(&TRIE_END)) {
        for &bit in &codes[opcode] {
            bits.push(bit);
        }
    }
    segment.extend(bits.finish());
    segment
}

/// Inner nodes are numbered in post-order so the root ends up last, where
/// the decoder expects it.
fn build_node(
    symbols: &[u8],
    prefix: Vec<u8>,
    inner: &mut Vec<(u8, u8)>,
    codes: &mut HashMap<u8, Vec<u8>>,
) -> u8 {
    if let [symbol] = symbols {
        codes.entry(*symbol).or_insert(prefix);
        return *symbol;
    }
    let (low, high) = symbols.split_at(symbols.len() / 2);
    let mut zero = prefix.clone();
    zero.push(0);
    let mut one = prefix;
    one.push(1);
    let left = build_node(low, zero, inner, codes);
    let right = build_node(high, one, inner, codes);
    inner.push((left, right));
    FIRST_INNER_NODE + (inner.len() - 1) as u8
}

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn push(&mut self, bit: u8) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit != 0 {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (self.len % 8);
        }
        self.len += 1;
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Pack `data` with literal-only control bytes: runs of up to 112 bytes
/// (`0xE0..=0xFB`), then a terminal byte carrying the last 0..=3 bytes.
pub fn pack_stored(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut rest = data;
    while rest.len() >= 4 {
        let run = (rest.len() / 4 * 4).min(112);
        out.push(0xE0 | ((run - 4) / 4) as u8);
        out.extend_from_slice(&rest[..run]);
        rest = &rest[run..];
    }
    out.push(0xFC | rest.len() as u8);
    out.extend_from_slice(rest);
    out
}

pub enum Image {
    Raw(Vec<u8>),
    Packed(Vec<u8>),
}

/// Streams for one `VGA ` payload, laid out as header, table segment,
/// sizes, vectors, image.
pub struct Payload {
    pub opcodes: Vec<u8>,
    pub sizes: Vec<u8>,
    pub vectors: Vec<u8>,
    pub image: Image,
}

impl Payload {
    pub fn encode(&self) -> Vec<u8> {
        let segment = opcode_segment(&self.opcodes);
        let huffman = FRAME_HEADER_LEN;
        let sizes = huffman + segment.len();
        let vectors = sizes + self.sizes.len();
        let image = vectors + self.vectors.len();

        let mut out = Vec::new();
        for offset in [huffman, sizes, vectors, image] {
            out.extend_from_slice(&(offset as u16).to_le_bytes());
        }
        out.extend(segment);
        out.extend_from_slice(&self.sizes);
        out.extend_from_slice(&self.vectors);
        match &self.image {
            Image::Raw(pixels) => {
                out.push(0);
                out.extend_from_slice(pixels);
            }
            Image::Packed(pixels) => {
                out.push(IMAGE_PACKED);
                out.extend(pack_stored(pixels));
            }
        }
        out
    }
}

pub fn record(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(tag);
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// Raw palette with every channel set to `level` (6-bit).
pub fn flat_palette(level: u8) -> Vec<u8> {
    vec![level; PALETTE_SIZE]
}

/// A full chunk: palette records, an optional select, then the video payload.
pub fn chunk(palettes: &[Vec<u8>], select: Option<u32>, payload: &Payload) -> Vec<u8> {
    let mut out = Vec::new();
    for raw in palettes {
        out.extend(record(&TAG_PALT, raw));
    }
    if let Some(index) = select {
        out.extend(record(&TAG_SHOT, &index.to_le_bytes()));
    }
    out.extend(record(&TAG_VGA, &payload.encode()));
    out
}

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 4;

/// Three frames of an 8x4 sequence.
///
/// 1. Black palette, packed literal image counting 0..32.
/// 2. Row 0 unchanged, rows 1..4 copied from one row up.
/// 3. A second palette selected, four literal pixels, the rest unchanged.
pub fn sequence() -> Vec<Vec<u8>> {
    let first = Payload {
        opcodes: vec![0, 9],
        sizes: vec![32],
        vectors: vec![],
        image: Image::Packed((0..32).collect()),
    };
    let second = Payload {
        opcodes: vec![8, 19],
        sizes: vec![24],
        vectors: vec![0x0F],
        image: Image::Raw(vec![]),
    };
    let third = Payload {
        opcodes: vec![0, 4, 10],
        sizes: vec![0x00, 28],
        vectors: vec![],
        image: Image::Raw(vec![200, 201, 202, 203]),
    };
    vec![
        chunk(&[flat_palette(0)], None, &first),
        chunk(&[], None, &second),
        chunk(&[flat_palette(0x3F)], Some(1), &third),
    ]
}

/// Expected indices for each frame of [`sequence`].
pub fn sequence_indices() -> Vec<Vec<u8>> {
    let first: Vec<u8> = (0..32).collect();
    let mut second = first[..8].to_vec();
    second.extend_from_slice(&first[..24]);
    let mut third = vec![200, 201, 202, 203];
    third.extend_from_slice(&second[4..]);
    vec![first, second, third]
}
