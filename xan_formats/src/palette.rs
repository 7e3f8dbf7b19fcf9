use log::warn;

use crate::error::XanError;
use crate::gamma;

pub const PALETTE_COUNT: usize = 256;
/// Raw palette chunk size: one RGB triple per entry.
pub const PALETTE_SIZE: usize = PALETTE_COUNT * 3;
pub const PALETTES_MAX: usize = 256;

/// 256 gamma-corrected colours packed as `0x00RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    entries: [u32; PALETTE_COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: [0; PALETTE_COUNT],
        }
    }
}

impl Palette {
    /// Build a palette from a raw chunk, correcting every channel.
    pub fn from_raw(raw: &[u8]) -> Result<Self, XanError> {
        if raw.len() < PALETTE_SIZE {
            return Err(XanError::PaletteTooSmall(raw.len()));
        }
        let mut entries = [0u32; PALETTE_COUNT];
        for (entry, rgb) in entries.iter_mut().zip(raw.chunks_exact(3)) {
            let r = gamma::correct(rgb[0]) as u32;
            let g = gamma::correct(rgb[1]) as u32;
            let b = gamma::correct(rgb[2]) as u32;
            *entry = (r << 16) | (g << 8) | b;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[u32; PALETTE_COUNT] {
        &self.entries
    }

    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        let packed = self.entries[index as usize];
        [(packed >> 16) as u8, (packed >> 8) as u8, packed as u8]
    }
}

/// Every palette seen so far in the stream plus the one frames are tagged with.
#[derive(Debug, Default, Clone)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
    active: usize,
}

impl PaletteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    /// Ingest a raw `PALT` payload.
    pub fn push_raw(&mut self, raw: &[u8]) -> Result<(), XanError> {
        if raw.len() < PALETTE_SIZE {
            return Err(XanError::PaletteTooSmall(raw.len()));
        }
        if self.palettes.len() >= PALETTES_MAX {
            return Err(XanError::PaletteSetFull(self.palettes.len()));
        }
        self.palettes.push(Palette::from_raw(raw)?);
        Ok(())
    }

    /// Switch the active palette. Out-of-range indices are logged and ignored.
    pub fn select(&mut self, index: u32) -> bool {
        match usize::try_from(index) {
            Ok(index) if index < self.palettes.len() => {
                self.active = index;
                true
            }
            _ => {
                warn!(
                    "invalid palette {index} selected ({} available)",
                    self.palettes.len()
                );
                false
            }
        }
    }

    /// Copy of the active palette, black if none has arrived yet.
    pub fn snapshot(&self) -> Palette {
        self.palettes.get(self.active).copied().unwrap_or_default()
    }
}
