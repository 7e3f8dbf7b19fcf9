use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use memmap2::Mmap;
use serde::Serialize;
use walkdir::WalkDir;
use xan_formats::{CodecVariant, DecoderConfig, Frame, XanDecoder};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Decode Xan video chunks into raw frame dumps."
)]
struct Args {
    /// Chunk file, or a directory of chunk files decoded in path order.
    input: PathBuf,
    /// Output directory where decoded frames will be written.
    output: PathBuf,
    /// Frame width in pixels.
    #[arg(long, required_unless_present = "config")]
    width: Option<usize>,
    /// Frame height in pixels.
    #[arg(long, required_unless_present = "config")]
    height: Option<usize>,
    /// Row pitch of decoded frames (defaults to the width).
    #[arg(long)]
    stride: Option<usize>,
    /// Codec flavour the chunks were written with.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    /// JSON decoder config; flags given alongside it take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output pixel format for decoded frames (default: rgba).
    #[arg(long, value_enum, default_value_t = OutputFormat::Rgba)]
    format: OutputFormat,
    /// File extension of chunk files when scanning a directory.
    #[arg(long, default_value = "bin")]
    ext: String,
    /// Optional limit on the number of frames to decode.
    #[arg(long)]
    limit: Option<usize>,
    /// Skip overwriting frames that already exist on disk.
    #[arg(long)]
    skip_existing: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum VariantArg {
    Wc3,
    Wc4,
}

impl From<VariantArg> for CodecVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Wc3 => CodecVariant::Wc3,
            VariantArg::Wc4 => CodecVariant::Wc4,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Rgba,
    Pal8,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Rgba => "rgba",
            OutputFormat::Pal8 => "pal8",
        }
    }

    fn encode(self, frame: &Frame) -> Vec<u8> {
        match self {
            OutputFormat::Rgba => frame.to_rgba(),
            OutputFormat::Pal8 => frame.indices(),
        }
    }
}

#[derive(Serialize)]
struct Manifest {
    codec: &'static str,
    width: usize,
    height: usize,
    format: &'static str,
    frames: Vec<ManifestFrame>,
}

#[derive(Serialize)]
struct ManifestFrame {
    index: usize,
    source: String,
    palette_count: usize,
    active_palette: usize,
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let inputs = collect_inputs(&args.input, &args.ext)?;
    if inputs.is_empty() {
        bail!(
            "no .{} chunk files found under {}",
            args.ext,
            args.input.display()
        );
    }

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut decoder = XanDecoder::new(config).context("invalid decoder configuration")?;
    let mut manifest = Manifest {
        codec: config.variant.name(),
        width: config.width,
        height: config.height,
        format: args.format.extension(),
        frames: Vec::new(),
    };

    let mut written = 0usize;
    for (index, path) in inputs.iter().enumerate() {
        if let Some(limit) = args.limit {
            if index >= limit {
                break;
            }
        }

        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let chunk = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map {}", path.display()))?;

        // Every chunk is decoded, even when its output is skipped, so later
        // frames see the right reference frame and palettes.
        let frame = decoder
            .decode(&chunk)
            .with_context(|| format!("failed to decode frame {index} from {}", path.display()))?;

        let filename = format!("frame_{:05}.{}", index, args.format.extension());
        let output_path = args.output.join(&filename);
        manifest.frames.push(ManifestFrame {
            index,
            source: path.display().to_string(),
            palette_count: decoder.palettes().len(),
            active_palette: decoder.palettes().active_index(),
            output: filename,
        });

        if args.skip_existing && output_path.exists() {
            continue;
        }

        let mut out = File::create(&output_path)
            .with_context(|| format!("failed to create {}", output_path.display()))?;
        out.write_all(&args.format.encode(&frame))
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        written += 1;
    }

    let manifest_path = args.output.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serializing frame manifest")?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    println!(
        "Decoded {} frame(s) from {} into {} ({written} written, {:?} pixels)",
        manifest.frames.len(),
        args.input.display(),
        args.output.display(),
        args.format
    );

    Ok(())
}

fn resolve_config(args: &Args) -> Result<DecoderConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => DecoderConfig::from_json_file(path)?,
        None => DecoderConfig::new(0, 0),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(stride) = args.stride {
        config.stride = Some(stride);
    }
    if let Some(variant) = args.variant {
        config.variant = variant.into();
    }
    config.validate().context("invalid frame geometry")?;
    Ok(config)
}

fn collect_inputs(input: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(input).with_context(|| format!("failed to stat {}", input.display()))?;
    if meta.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).into_iter().filter_map(|res| res.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(ext))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
