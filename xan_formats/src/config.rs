use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::XanError;
use crate::unpack::UNPACK_PADDING;

/// Which game's flavour of the codec a stream uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecVariant {
    /// Wing Commander III: tagged chunks with palettes and a `VGA ` payload.
    #[default]
    Wc3,
    /// Wing Commander IV: raw payloads. Decoding is a stub that leaves the
    /// frame blank.
    Wc4,
}

impl CodecVariant {
    pub fn name(self) -> &'static str {
        match self {
            CodecVariant::Wc3 => "xan_wc3",
            CodecVariant::Wc4 => "xan_wc4",
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            CodecVariant::Wc3 => "Wing Commander III / Xan",
            CodecVariant::Wc4 => "Wing Commander IV / Xxan",
        }
    }
}

/// Per-stream decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub width: usize,
    pub height: usize,
    /// Row pitch of output frames; defaults to `width`.
    #[serde(default)]
    pub stride: Option<usize>,
    #[serde(default)]
    pub variant: CodecVariant,
}

impl DecoderConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            stride: None,
            variant: CodecVariant::default(),
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn with_variant(mut self, variant: CodecVariant) -> Self {
        self.variant = variant;
        self
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride.unwrap_or(self.width)
    }

    /// Visible pixels per frame.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn validate(&self) -> Result<(), XanError> {
        let stride = self.stride();
        let fits = stride.checked_mul(self.height).is_some()
            && self
                .width
                .checked_mul(self.height)
                .and_then(|pixels| pixels.checked_add(UNPACK_PADDING))
                .is_some();
        if self.width == 0 || self.height == 0 || stride < self.width || !fits {
            return Err(XanError::InvalidDimensions {
                width: self.width,
                height: self.height,
                stride,
            });
        }
        Ok(())
    }

    /// Load a JSON config such as `{"width": 320, "height": 165}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read decoder config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse decoder config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid decoder config {}", path.display()))?;
        Ok(config)
    }
}
