//! Opcode stream decoder.
//!
//! The table segment starts with a node count `N` followed by `2 * N` bytes:
//! the bit-0 children of every inner node, then the bit-1 children. Inner
//! nodes are numbered from `0x17`, so node `v` finds its children at
//! `v - 0x17` and `v - 0x17 + N`; the root is `N + 0x16`. Child values below
//! `0x16` are opcodes, `0x16` itself ends the stream. The bitstream follows
//! the table directly.

use crate::cursor::BitReader;
use crate::error::{Stream, XanError};

/// Node value that terminates the opcode stream.
pub const TRIE_END: u8 = 0x16;
const FIRST_INNER_NODE: isize = 0x17;

/// Borrowed view of the flattened two-child lookup table.
#[derive(Debug, Clone, Copy)]
pub struct TrieTable<'a> {
    node_count: u8,
    children: &'a [u8],
}

impl<'a> TrieTable<'a> {
    /// Split a table segment into the lookup table and the bitstream that
    /// follows it.
    pub fn parse(segment: &'a [u8]) -> Result<(Self, &'a [u8]), XanError> {
        let node_count = *segment.first().ok_or(XanError::Truncated {
            stream: Stream::Table,
            offset: 0,
            needed: 1,
            available: 0,
        })?;
        let table_len = node_count as usize * 2;
        let body = &segment[1..];
        if body.len() < table_len {
            return Err(XanError::Truncated {
                stream: Stream::Table,
                offset: 1,
                needed: table_len,
                available: body.len(),
            });
        }
        let (children, bits) = body.split_at(table_len);
        Ok((
            Self {
                node_count,
                children,
            },
            bits,
        ))
    }

    /// Node every symbol walk starts from, wrapping in 8 bits.
    #[inline]
    pub fn root(&self) -> u8 {
        self.node_count.wrapping_add(TRIE_END)
    }

    /// Follow one edge: bit 0 reads the low half of the table, bit 1 the high.
    pub fn child(&self, node: u8, bit: u8) -> Result<u8, XanError> {
        let slot = node as isize - FIRST_INNER_NODE + bit as isize * self.node_count as isize;
        usize::try_from(slot)
            .ok()
            .and_then(|index| self.children.get(index))
            .copied()
            .ok_or(XanError::TrieIndexOutOfRange {
                node,
                slot,
                len: self.children.len(),
            })
    }
}

/// Decode opcodes from `segment` into `dest`, returning how many were
/// written. Decoding stops at the end node or once `dest` is full.
pub fn decode_opcodes(segment: &[u8], dest: &mut [u8]) -> Result<usize, XanError> {
    let (table, bitstream) = TrieTable::parse(segment)?;
    let mut bits = BitReader::new(bitstream);
    let root = table.root();
    let mut node = root;
    let mut written = 0usize;

    while node != TRIE_END {
        let bit = bits.read_bit()?;
        node = table.child(node, bit)?;

        if node < TRIE_END {
            let Some(slot) = dest.get_mut(written) else {
                return Ok(written);
            };
            *slot = node;
            written += 1;
            node = root;
        }
    }

    Ok(written)
}
