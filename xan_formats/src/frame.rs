use crate::error::XanError;
use crate::palette::Palette;

/// One decoded 8-bit indexed picture and the palette it was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    stride: usize,
    pixels: Vec<u8>,
    palette: Palette,
}

impl Frame {
    /// Zero-filled frame. Allocation failure is reported instead of aborting.
    pub fn blank(
        width: usize,
        height: usize,
        stride: usize,
        palette: Palette,
    ) -> Result<Self, XanError> {
        let len = stride
            .checked_mul(height)
            .filter(|_| stride >= width)
            .ok_or(XanError::InvalidDimensions {
                width,
                height,
                stride,
            })?;
        let pixels = alloc_zeroed(len)?;
        Ok(Self {
            width,
            height,
            stride,
            pixels,
            palette,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The whole plane, stride padding included.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.pixels[start..start + self.width]
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.stride + x]
    }

    /// Visible pixels in raster order without stride padding.
    pub fn indices(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    /// Expand through the attached palette into RGBA8.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height * 4);
        for y in 0..self.height {
            for &index in self.row(y) {
                let [r, g, b] = self.palette.rgb(index);
                out.extend_from_slice(&[r, g, b, 0xFF]);
            }
        }
        out
    }
}

/// Zero-filled buffer, reporting allocation failure as an error.
pub(crate) fn alloc_zeroed(len: usize) -> Result<Vec<u8>, XanError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| XanError::Allocation(len))?;
    buffer.resize(len, 0);
    Ok(buffer)
}
