// SPDX-License-Identifier: GPL-2.0-or-later
//
// Xan frame reconstruction. A frame is painted in raster order from runs:
// literal runs come from the pixel stream, unchanged runs and motion runs
// come from the previous frame. Run lengths and motion vectors live in their
// own streams next to the opcode stream that sequences them.

use crate::cursor::ByteCursor;
use crate::error::{Stream, XanError};
use crate::frame::Frame;

/// Streams consumed while painting one frame.
#[derive(Debug, Clone, Copy)]
pub struct RunStreams<'a> {
    pub opcodes: &'a [u8],
    pub sizes: &'a [u8],
    pub vectors: &'a [u8],
    pub pixels: &'a [u8],
}

/// What a reconstruction pass did, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub opcodes: usize,
    pub literal_pixels: usize,
    pub unchanged_pixels: usize,
    pub motion_pixels: usize,
    pub end_x: usize,
    pub end_y: usize,
}

/// Paint `current` from `streams`, referencing `previous` for copied runs.
///
/// Exactly `width * height` pixels are written; a run longer than what is
/// left of the frame is an error rather than being clipped.
pub fn reconstruct(
    streams: RunStreams<'_>,
    current: &mut Frame,
    previous: &Frame,
) -> Result<RunStats, XanError> {
    let mut opcodes = ByteCursor::new(streams.opcodes, Stream::Opcodes);
    let mut sizes = ByteCursor::new(streams.sizes, Stream::Sizes);
    let mut vectors = ByteCursor::new(streams.vectors, Stream::Vectors);
    let mut pixels = ByteCursor::new(streams.pixels, Stream::Pixels);

    let width = current.width();
    let mut remaining = width * current.height();
    let mut stats = RunStats::default();
    let (mut x, mut y) = (0usize, 0usize);
    let mut flag = false;

    while remaining > 0 {
        let opcode = opcodes.read_u8()?;
        stats.opcodes += 1;

        let size = match opcode {
            0 => {
                flag = !flag;
                continue;
            }
            1..=8 => opcode as usize,
            12..=18 => (opcode - 10) as usize,
            9 | 19 => sizes.read_u8()? as usize,
            10 | 20 => sizes.read_be16()? as usize,
            11 | 21 => sizes.read_be24()? as usize,
            // Unreachable from the opcode trie (symbols stop below 0x16); a
            // stray value is a zero-length motion run, consuming one vector.
            _ => 0,
        };

        if size > remaining {
            return Err(XanError::RunOverflow { size, remaining });
        }

        if opcode < 12 {
            flag = !flag;
            if flag {
                copy_pixel_run(current, previous, x, y, size, 0, 0)?;
                stats.unchanged_pixels += size;
            } else {
                let run = pixels.take(size)?;
                output_pixel_run(current, run, x, y)?;
                stats.literal_pixels += size;
            }
        } else {
            let vector = vectors.read_u8()?;
            let motion_x = sign_extend_nibble(vector >> 4);
            let motion_y = sign_extend_nibble(vector & 0x0F);
            copy_pixel_run(current, previous, x, y, size, motion_x, motion_y)?;
            stats.motion_pixels += size;
            flag = false;
        }

        remaining -= size;
        y += (x + size) / width;
        x = (x + size) % width;
    }

    stats.end_x = x;
    stats.end_y = y;
    Ok(stats)
}

#[inline]
fn sign_extend_nibble(value: u8) -> i32 {
    (((value << 4) as i8) >> 4) as i32
}

fn output_pixel_run(frame: &mut Frame, mut run: &[u8], x: usize, y: usize) -> Result<(), XanError> {
    let width = frame.width();
    let line_inc = frame.stride() - width;
    let mut index = y * frame.stride() + x;
    let mut current_x = x;
    let plane = frame.pixels_mut();

    while !run.is_empty() {
        let count = run.len().min(width - current_x);
        let remaining = run.len();
        plane
            .get_mut(index..index + count)
            .ok_or(XanError::RunOverflow {
                size: remaining,
                remaining: 0,
            })?
            .copy_from_slice(&run[..count]);
        run = &run[count..];
        index += count;
        current_x += count;

        if current_x >= width {
            index += line_inc;
            current_x = 0;
        }
    }
    Ok(())
}

/// Copy a run from `previous` at `(x + motion_x, y + motion_y)`. The read
/// and write positions wrap to the next row independently; a read column
/// left or right of the picture is carried into the neighbouring row first.
fn copy_pixel_run(
    current: &mut Frame,
    previous: &Frame,
    x: usize,
    y: usize,
    pixel_count: usize,
    motion_x: i32,
    motion_y: i32,
) -> Result<(), XanError> {
    let width = current.width();
    let stride = current.stride();
    let line_inc = stride - width;
    let height = previous.height() as isize;

    let mut cur_index = y * stride + x;
    let mut cur_x = x;

    let read_x = x as isize + motion_x as isize;
    let mut prev_row = y as isize + motion_y as isize + read_x.div_euclid(width as isize);
    let mut prev_x = read_x.rem_euclid(width as isize) as usize;

    let source = previous.pixels();
    let plane = current.pixels_mut();
    let mut left = pixel_count;

    while left > 0 {
        if prev_row < 0 || prev_row >= height {
            return Err(XanError::MotionOutOfBounds {
                dx: motion_x,
                dy: motion_y,
                row: prev_row,
            });
        }
        let count = left.min(width - cur_x).min(width - prev_x);
        let prev_index = prev_row as usize * stride + prev_x;

        plane
            .get_mut(cur_index..cur_index + count)
            .ok_or(XanError::RunOverflow {
                size: left,
                remaining: 0,
            })?
            .copy_from_slice(&source[prev_index..prev_index + count]);

        left -= count;
        cur_index += count;
        cur_x += count;
        prev_x += count;

        if cur_x >= width {
            cur_index += line_inc;
            cur_x = 0;
        }
        if prev_x >= width {
            prev_row += 1;
            prev_x = 0;
        }
    }
    Ok(())
}
