use log::debug;

use crate::cursor::ByteCursor;
use crate::error::{Stream, XanError};
use crate::palette::{PALETTE_SIZE, PaletteSet};

/// Tag constants in file byte order.
pub const TAG_PALT: [u8; 4] = *b"PALT";
pub const TAG_SHOT: [u8; 4] = *b"SHOT";
pub const TAG_VGA: [u8; 4] = *b"VGA ";

const CHUNK_HEADER_LEN: usize = 8;
const SELECT_SIZE: usize = 4;

/// Walk the tagged prefix of a chunk, feeding palette (`PALT`) and palette
/// select (`SHOT`) records into `palettes`, and return the video payload
/// that follows the `VGA ` tag.
///
/// Tag lengths are big-endian and clamped to the bytes left in the chunk.
/// Only unknown tags are skipped by their length. When no `VGA ` tag turns
/// up, whatever is left after the scan is returned.
pub fn demux<'a>(chunk: &'a [u8], palettes: &mut PaletteSet) -> Result<&'a [u8], XanError> {
    let mut cursor = ByteCursor::new(chunk, Stream::Chunk);

    while cursor.remaining() > CHUNK_HEADER_LEN {
        let tag = cursor.read_tag()?;
        let declared = cursor.read_be32()? as usize;
        if tag == TAG_VGA {
            break;
        }

        // Palette and select records consume only their fixed body; any
        // declared excess is read as the next tag.
        let size = declared.min(cursor.remaining());
        match tag {
            TAG_PALT => {
                if size < PALETTE_SIZE {
                    return Err(XanError::PaletteTooSmall(size));
                }
                palettes.push_raw(cursor.take(PALETTE_SIZE)?)?;
            }
            TAG_SHOT => {
                if size < SELECT_SIZE {
                    return Err(XanError::SelectTooSmall(size));
                }
                palettes.select(cursor.read_le32()?);
            }
            other => {
                cursor.take(size)?;
                debug!("skipping {} chunk ({size} bytes)", tag_name(&other));
            }
        }
    }

    Ok(cursor.rest())
}

/// Printable form of a tag, with non-ASCII bytes escaped.
pub fn tag_name(tag: &[u8; 4]) -> String {
    tag.iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}
