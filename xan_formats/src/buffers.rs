use std::sync::Arc;

use crate::error::XanError;
use crate::frame::Frame;
use crate::palette::Palette;

/// Owns the reference frame between decode calls and hands out a fresh
/// frame to paint on each call.
///
/// A produced frame is shared with the caller through an `Arc`; the manager
/// keeps its own handle as the motion reference for the next call and drops
/// it when that call succeeds. Pixels are never copied to swap roles.
#[derive(Debug)]
pub struct FrameBuffers {
    width: usize,
    height: usize,
    stride: usize,
    frame_len: usize,
    previous: Option<Arc<Frame>>,
}

impl FrameBuffers {
    pub fn new(width: usize, height: usize, stride: usize) -> Result<Self, XanError> {
        let frame_len = stride
            .checked_mul(height)
            .filter(|_| stride >= width && width > 0 && height > 0)
            .ok_or(XanError::InvalidDimensions {
                width,
                height,
                stride,
            })?;
        Ok(Self {
            width,
            height,
            stride,
            frame_len,
            previous: None,
        })
    }

    /// Bytes in one frame plane, stride padding included.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Reference frame for the next call, if one has been produced.
    pub fn previous(&self) -> Option<&Arc<Frame>> {
        self.previous.as_ref()
    }

    /// Run one decode: allocate the current frame, let `paint` fill it from
    /// the previous one, then promote it to previous and return it.
    ///
    /// Before the first frame the previous frame is a zeroed stand-in. If
    /// `paint` fails the reference frame is left untouched.
    pub fn cycle<F>(&mut self, palette: Palette, paint: F) -> Result<Arc<Frame>, XanError>
    where
        F: FnOnce(&mut Frame, &Frame) -> Result<(), XanError>,
    {
        let previous = match &self.previous {
            Some(frame) => Arc::clone(frame),
            None => Arc::new(self.allocate(Palette::default())?),
        };
        let mut current = self.allocate(palette)?;

        paint(&mut current, &previous)?;

        let produced = Arc::new(current);
        self.previous = Some(Arc::clone(&produced));
        Ok(produced)
    }

    fn allocate(&self, palette: Palette) -> Result<Frame, XanError> {
        let frame = Frame::blank(self.width, self.height, self.stride, palette)?;
        debug_assert_eq!(frame.pixels().len(), self.frame_len);
        Ok(frame)
    }
}
