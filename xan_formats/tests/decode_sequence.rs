mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{HEIGHT, Image, Payload, WIDTH, chunk, flat_palette, sequence, sequence_indices};
use xan_formats::{CodecVariant, DecoderConfig, XanDecoder, XanError};

fn decoder() -> Result<XanDecoder> {
    Ok(XanDecoder::new(DecoderConfig::new(WIDTH, HEIGHT))?)
}

#[test]
fn sequence_decodes_frame_by_frame() -> Result<()> {
    let mut decoder = decoder()?;
    let expected = sequence_indices();

    for (index, (chunk, want)) in sequence().iter().zip(&expected).enumerate() {
        let frame = decoder.decode(chunk)?;
        assert_eq!(&frame.indices(), want, "frame {index} pixels differ");
    }
    assert_eq!(decoder.frames_decoded(), 3);
    Ok(())
}

#[test]
fn palettes_follow_the_stream() -> Result<()> {
    let mut decoder = decoder()?;
    let chunks = sequence();

    let first = decoder.decode(&chunks[0])?;
    assert_eq!(first.palette().rgb(31), [0, 0, 0]);

    // No palette records: the frame keeps the active palette.
    let second = decoder.decode(&chunks[1])?;
    assert_eq!(second.palette(), first.palette());
    assert_eq!(decoder.palettes().active_index(), 0);

    let third = decoder.decode(&chunks[2])?;
    assert_eq!(decoder.palettes().len(), 2);
    assert_eq!(decoder.palettes().active_index(), 1);
    assert_eq!(third.palette().rgb(200), [0xFD, 0xFD, 0xFD]);

    // Frames already handed out keep the palette they were decoded with.
    assert_eq!(first.palette().rgb(200), [0, 0, 0]);
    Ok(())
}

#[test]
fn previous_frame_is_shared_with_caller() -> Result<()> {
    let mut decoder = decoder()?;
    let chunks = sequence();

    assert!(decoder.previous_frame().is_none());
    let first = decoder.decode(&chunks[0])?;
    assert!(Arc::ptr_eq(decoder.previous_frame().unwrap(), &first));

    let second = decoder.decode(&chunks[1])?;
    let reference = Arc::clone(decoder.previous_frame().unwrap());
    assert!(Arc::ptr_eq(&reference, &second));

    let third = decoder.decode(&chunks[2])?;
    assert_eq!(&third.indices()[4..], &reference.indices()[4..]);
    assert!(Arc::ptr_eq(decoder.previous_frame().unwrap(), &third));
    assert!(!Arc::ptr_eq(&second, &third));
    Ok(())
}

#[test]
fn first_frame_copies_read_black() -> Result<()> {
    let mut decoder = decoder()?;
    let payload = Payload {
        opcodes: vec![11, 13],
        sizes: vec![0x00, 0x00, 0x1D],
        vectors: vec![0xFF],
        image: Image::Raw(vec![]),
    };
    let frame = decoder.decode(&chunk(&[], None, &payload))?;
    assert!(frame.indices().iter().all(|&p| p == 0));
    assert_eq!(frame.palette().rgb(0), [0, 0, 0]);
    Ok(())
}

#[test]
fn padded_stride_keeps_visible_pixels() -> Result<()> {
    let config = DecoderConfig::new(WIDTH, HEIGHT).with_stride(WIDTH + 4);
    let mut decoder = XanDecoder::new(config)?;
    let expected = sequence_indices();

    for (chunk, want) in sequence().iter().zip(&expected) {
        let frame = decoder.decode(chunk)?;
        assert_eq!(frame.stride(), WIDTH + 4);
        assert_eq!(&frame.indices(), want);
    }
    Ok(())
}

#[test]
fn long_literal_runs_cross_rows() -> Result<()> {
    let mut decoder = XanDecoder::new(DecoderConfig::new(64, 4))?;
    let pixels: Vec<u8> = (0..=255).collect();
    let payload = Payload {
        opcodes: vec![0, 10],
        sizes: vec![0x01, 0x00],
        vectors: vec![],
        image: Image::Packed(pixels.clone()),
    };
    let frame = decoder.decode(&chunk(&[flat_palette(0x20)], None, &payload))?;
    assert_eq!(frame.indices(), pixels);
    assert_eq!(frame.row(3)[63], 255);
    Ok(())
}

#[test]
fn corrupt_chunk_leaves_decoder_usable() -> Result<()> {
    let mut decoder = decoder()?;
    let chunks = sequence();
    let first = decoder.decode(&chunks[0])?;

    // Motion one row above the picture.
    let bad = Payload {
        opcodes: vec![19],
        sizes: vec![32],
        vectors: vec![0x0F],
        image: Image::Raw(vec![]),
    };
    let err = decoder.decode(&chunk(&[], None, &bad)).unwrap_err();
    assert!(matches!(err, XanError::MotionOutOfBounds { dy: -1, .. }));
    assert!(Arc::ptr_eq(decoder.previous_frame().unwrap(), &first));

    let second = decoder.decode(&chunks[1])?;
    assert_eq!(second.indices(), sequence_indices()[1]);
    Ok(())
}

#[test]
fn wc4_streams_decode_to_blank_frames() -> Result<()> {
    let config = DecoderConfig::new(WIDTH, HEIGHT).with_variant(CodecVariant::Wc4);
    let mut decoder = XanDecoder::new(config)?;
    for chunk in sequence() {
        let frame = decoder.decode(&chunk)?;
        assert!(frame.indices().iter().all(|&p| p == 0));
    }
    assert!(decoder.palettes().is_empty());
    assert_eq!(decoder.frames_decoded(), 3);
    Ok(())
}
