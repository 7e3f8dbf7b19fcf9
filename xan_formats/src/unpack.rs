use crate::cursor::ByteCursor;
use crate::error::{Stream, XanError};

/// Slack past the nominal capacity that a single control byte may spill into.
pub const UNPACK_PADDING: usize = 130;

/// Expand the packed image segment into `dest`.
///
/// `capacity` is the nominal output size; `dest` must be at least
/// `capacity + UNPACK_PADDING` long because literal and back-reference runs
/// are only checked against the end of the buffer, not the capacity. Returns
/// the number of bytes produced. A long back-reference that would cross the
/// capacity ends the unpack early without an error.
pub fn unpack(src: &[u8], dest: &mut [u8], capacity: usize) -> Result<usize, XanError> {
    let mut src = ByteCursor::new(src, Stream::Packed);
    let mut pos = 0usize;

    while pos < capacity {
        let opcode = src.read_u8()?;

        if opcode < 0xE0 {
            let (size, back, size2) = if opcode & 0x80 == 0 {
                let size = (opcode & 3) as usize;
                let back = (((opcode & 0x60) as usize) << 3) + src.read_u8()? as usize + 1;
                let size2 = ((opcode & 0x1C) >> 2) as usize + 3;
                (size, back, size2)
            } else if opcode & 0x40 == 0 {
                let size = (src.peek_u8()? >> 6) as usize;
                let back = (src.read_be16()? & 0x3FFF) as usize + 1;
                let size2 = (opcode & 0x3F) as usize + 4;
                (size, back, size2)
            } else {
                let size = (opcode & 3) as usize;
                let back = (((opcode & 0x10) as usize) << 12) + src.read_be16()? as usize + 1;
                let size2 = (((opcode & 0x0C) as usize) << 6) + src.read_u8()? as usize + 5;
                if size + size2 > capacity - pos {
                    return Ok(pos);
                }
                (size, back, size2)
            };

            pos = copy_literal(&mut src, dest, pos, size)?;
            pos = copy_back(dest, pos, back, size2)?;
        } else {
            let finish = opcode >= 0xFC;
            let size = if finish {
                (opcode & 3) as usize
            } else {
                (((opcode & 0x1F) as usize) << 2) + 4
            };

            pos = copy_literal(&mut src, dest, pos, size)?;
            if finish {
                break;
            }
        }
    }

    Ok(pos)
}

fn copy_literal(
    src: &mut ByteCursor<'_>,
    dest: &mut [u8],
    pos: usize,
    size: usize,
) -> Result<usize, XanError> {
    let end = pos + size;
    let capacity = dest.len();
    let out = dest
        .get_mut(pos..end)
        .ok_or(XanError::UnpackOverflow { capacity })?;
    out.copy_from_slice(src.take(size)?);
    Ok(end)
}

/// Byte-at-a-time so that a distance shorter than the run repeats the
/// bytes this copy has just produced.
fn copy_back(dest: &mut [u8], pos: usize, back: usize, size: usize) -> Result<usize, XanError> {
    if back > pos {
        return Err(XanError::BackReferenceOutOfRange {
            distance: back,
            written: pos,
        });
    }
    let end = pos + size;
    if end > dest.len() {
        return Err(XanError::UnpackOverflow {
            capacity: dest.len(),
        });
    }
    for index in pos..end {
        dest[index] = dest[index - back];
    }
    Ok(end)
}
