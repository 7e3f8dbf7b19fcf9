pub mod buffers;
pub mod chunk;
pub mod config;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod gamma;
pub mod huffman;
pub mod palette;
pub mod reconstruct;
pub mod unpack;

pub use config::{CodecVariant, DecoderConfig};
pub use decoder::{FrameHeader, XanDecoder};
pub use error::{Stream, XanError};
pub use frame::Frame;
pub use palette::{Palette, PaletteSet};
pub use reconstruct::RunStats;
