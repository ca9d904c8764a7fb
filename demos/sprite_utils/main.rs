//! Sprite archive CLI utility.
//!
//! # Features
//!
//! - **info**: Show the format, layout and frame sizes of an archive
//! - **unpack**: Extract every frame to PNG images with a JSON manifest
//! - **pack**: Build an archive from a directory written by `unpack`
//! - **convert**: Re-encode an archive in another format
//! - **sheet**: Draw every frame into a single spritesheet PNG
//! - **slice**: Cut a spritesheet PNG into frames and encode them
//!
//! # Palette
//!
//! `.spr` files and photo albums store palette indices. The default creature palette is used
//! unless a 768 byte palette file is given with `--palette` or `NORNSPR_PALETTE`.
//!
//! # Usage
//!
//! ```bash
//! # Show archive information as JSON
//! cargo run --example sprite_utils -- info norn.c16 --json
//!
//! # Unpack frames, then pack them back into an .s16
//! cargo run --example sprite_utils -- unpack norn.c16 -o frames/
//! cargo run --example sprite_utils -- pack frames/ norn.s16
//!
//! # Turn a background image into a .blk
//! cargo run --example sprite_utils -- slice room.png room.blk --cols 1 --rows 1
//!
//! # Use another palette
//! NORNSPR_PALETTE=palette.dta cargo run --example sprite_utils -- unpack norn.spr
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use log::{debug, info, warn};
use nornspr_rs::prelude::file::spritesheet;
use nornspr_rs::prelude::{
	CollectionInfo, Frame, Layout, Palette, PaletteHandle, PixelFormat, SheetOrder,
	SpriteCollection, SpriteFormat,
};
use serde::{Deserialize, Serialize};

const MANIFEST_NAME: &str = "manifest.json";

fn main() -> Result<()> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let palette = load_palette(cli.palette.as_deref())?;
	match cli.command {
		Command::Info(args) => run_info(args, &palette),
		Command::Unpack(args) => run_unpack(args, &palette),
		Command::Pack(args) => run_pack(args, &palette),
		Command::Convert(args) => run_convert(args, &palette),
		Command::Sheet(args) => run_sheet(args, &palette),
		Command::Slice(args) => run_slice(args, &palette),
	}
}

#[derive(Parser)]
#[command(name = "sprite_utils")]
#[command(author = "nornspr-rs project")]
#[command(version)]
#[command(about = "Inspect, unpack, pack and convert sprite archives", long_about = None)]
struct Cli {
	/// Palette file used for .spr files and photo albums
	#[arg(short, long, global = true, env = "NORNSPR_PALETTE", value_name = "PALETTE")]
	palette: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Display information about an archive
	Info(InfoArgs),
	/// Extract every frame to PNG images
	Unpack(UnpackArgs),
	/// Build an archive from an unpacked directory
	Pack(PackArgs),
	/// Re-encode an archive in another format
	Convert(ConvertArgs),
	/// Draw all frames of an archive into one PNG
	Sheet(SheetArgs),
	/// Cut a PNG spritesheet into frames and encode them
	Slice(SliceArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Archive to inspect
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Format to decode as, instead of guessing from the file name
	#[arg(short, long, value_name = "EXT")]
	format: Option<String>,

	/// Print the summary as JSON
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct UnpackArgs {
	/// Archive to unpack
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// Output directory (defaults to `<input>_frames/`)
	#[arg(short, long, value_name = "DIR")]
	output: Option<PathBuf>,

	/// Format to decode as, instead of guessing from the file name
	#[arg(short, long, value_name = "EXT")]
	format: Option<String>,
}

#[derive(Args)]
struct PackArgs {
	/// Directory written by `unpack`
	#[arg(value_name = "DIR")]
	input: PathBuf,

	/// Archive to write; its extension picks the format
	#[arg(value_name = "FILE")]
	output: PathBuf,

	/// Format to encode as, instead of using the output extension
	#[arg(short, long, value_name = "EXT")]
	format: Option<String>,
}

#[derive(Args)]
struct ConvertArgs {
	/// Archive to read
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Archive to write; its extension picks the format
	#[arg(value_name = "OUTPUT")]
	output: PathBuf,
}

#[derive(Args)]
struct SheetArgs {
	/// Archive to draw
	#[arg(value_name = "FILE")]
	input: PathBuf,

	/// PNG to write
	#[arg(value_name = "PNG")]
	output: PathBuf,

	/// Number of columns (defaults to the most square grid)
	#[arg(short, long, value_name = "COUNT")]
	cols: Option<u32>,

	/// Lay frames out with coloured dividers instead of a fixed grid
	#[arg(long, default_value_t = false)]
	dividers: bool,
}

#[derive(Args)]
struct SliceArgs {
	/// Spritesheet image
	#[arg(value_name = "PNG")]
	input: PathBuf,

	/// Archive to write; its extension picks the format
	#[arg(value_name = "FILE")]
	output: PathBuf,

	/// Number of columns in the sheet
	#[arg(short, long, value_name = "COUNT", default_value_t = 1)]
	cols: u32,

	/// Number of rows in the sheet
	#[arg(short, long, value_name = "COUNT", default_value_t = 1)]
	rows: u32,

	/// Number frames down each column instead of along each row
	#[arg(long, default_value_t = false)]
	column_major: bool,
}

/// Manifest written next to unpacked frames
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
	/// Format the frames were decoded from
	format: SpriteFormat,
	/// Collection metadata
	info: CollectionInfo,
	/// PNG file name of every frame, in order
	files: Vec<String>,
	/// First bytes of the source archive, hex encoded
	header: String,
}

fn load_palette(path: Option<&Path>) -> Result<Palette> {
	let handle = PaletteHandle::default();
	if let Some(path) = path {
		let data = fs::read(path).with_context(|| format!("Failed to read palette {}", path.display()))?;
		handle.load(&data).with_context(|| format!("Invalid palette {}", path.display()))?;
		debug!("loaded palette {}", path.display());
	}
	Ok(handle.snapshot())
}

fn resolve_format(path: &Path, explicit: Option<&str>) -> Result<SpriteFormat> {
	match explicit {
		Some(ext) => Ok(SpriteFormat::from_extension(ext)?),
		None => Ok(SpriteFormat::from_path(path)?),
	}
}

fn read_archive(
	path: &Path,
	explicit: Option<&str>,
	palette: &Palette,
) -> Result<(SpriteFormat, SpriteCollection, Vec<u8>)> {
	let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
	let format = match resolve_format(path, explicit) {
		Ok(format) => format,
		Err(err) => {
			let Some(format) = SpriteFormat::sniff(&data) else {
				return Err(err.context("Content does not match any known format"));
			};
			warn!("{err:#}; guessed {format} from the file content");
			format
		}
	};
	let collection = format
		.decode_path(path, &data, palette)
		.with_context(|| format!("Unable to open {} as {format}", path.display()))?;
	Ok((format, collection, data))
}

fn write_archive(
	path: &Path,
	format: SpriteFormat,
	collection: &SpriteCollection,
	palette: &Palette,
) -> Result<()> {
	if collection.read_only {
		warn!("writing a collection decoded from a read-only layout");
	}
	let bytes = format
		.encode(collection, palette)
		.with_context(|| format!("Unable to save {} as {format}", path.display()))?;
	fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
	info!("wrote {} ({} frames, {} bytes)", path.display(), collection.len(), bytes.len());
	Ok(())
}

fn frame_to_image(frame: &Frame) -> Result<RgbaImage> {
	RgbaImage::from_raw(frame.width(), frame.height(), frame.to_rgba_bytes())
		.context("Frame buffer does not match its dimensions")
}

fn image_to_frame(path: &Path) -> Result<Frame> {
	let image = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?.to_rgba8();
	Ok(Frame::from_rgba_bytes(image.width(), image.height(), image.as_raw())?)
}

fn run_info(args: InfoArgs, palette: &Palette) -> Result<()> {
	let (format, collection, data) = read_archive(&args.input, args.format.as_deref(), palette)?;
	let info = collection.info();

	if args.json {
		println!("{}", serde_json::to_string_pretty(&info)?);
		return Ok(());
	}

	println!("File:         {}", args.input.display());
	println!("Format:       {format}");
	println!("Size:         {} bytes", data.len());
	println!("Header:       {}", hex::encode(&data[..data.len().min(16)]));
	println!("Pixel format: {}", info.pixel_format);
	match info.layout {
		Layout::Strip => println!("Layout:       strip"),
		Layout::Background {
			cols,
			rows,
		} => {
			println!("Layout:       {cols}x{rows} background");
			if !collection.is_grid_consistent() {
				println!("              grid does not match the {} tiles", info.frame_count);
			}
		}
	}
	if info.read_only {
		println!("Read-only:    yes");
	}
	println!("Frames:       {}", info.frame_count);
	for (index, (width, height)) in info.frame_sizes.iter().enumerate() {
		println!("  {index:4}: {width}x{height}");
	}
	Ok(())
}

fn run_unpack(args: UnpackArgs, palette: &Palette) -> Result<()> {
	let (format, collection, data) = read_archive(&args.input, args.format.as_deref(), palette)?;
	let output_dir = args.output.unwrap_or_else(|| {
		let stem = args.input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		args.input.with_file_name(format!("{stem}_frames"))
	});
	fs::create_dir_all(&output_dir)
		.with_context(|| format!("Failed to create {}", output_dir.display()))?;

	let mut files = Vec::with_capacity(collection.len());
	for (index, frame) in collection.iter().enumerate() {
		let name = format!("frame_{index:03}.png");
		if frame.is_empty() {
			warn!("frame {index} is empty, skipping image");
		} else {
			frame_to_image(frame)?.save(output_dir.join(&name))?;
		}
		files.push(name);
	}

	let manifest = Manifest {
		format,
		info: collection.info(),
		files,
		header: hex::encode(&data[..data.len().min(16)]),
	};
	fs::write(output_dir.join(MANIFEST_NAME), serde_json::to_string_pretty(&manifest)?)?;
	println!("✓ Unpacked {} -> {} ({} frames)", args.input.display(), output_dir.display(), collection.len());
	Ok(())
}

fn run_pack(args: PackArgs, palette: &Palette) -> Result<()> {
	let manifest_path = args.input.join(MANIFEST_NAME);
	let json = fs::read_to_string(&manifest_path)
		.with_context(|| format!("Failed to read {}", manifest_path.display()))?;
	let manifest: Manifest = serde_json::from_str(&json)?;

	let mut frames = Vec::with_capacity(manifest.files.len());
	for (name, (width, height)) in manifest.files.iter().zip(&manifest.info.frame_sizes) {
		let path = args.input.join(name);
		if path.exists() {
			frames.push(image_to_frame(&path)?);
		} else {
			frames.push(Frame::new(*width, *height));
		}
	}
	if frames.len() != manifest.info.frame_count {
		bail!("Manifest lists {} frames but {} images", manifest.info.frame_count, frames.len());
	}

	let mut collection = SpriteCollection::from_frames(frames).with_pixel_format(manifest.info.pixel_format);
	collection.layout = manifest.info.layout;

	let format = resolve_format(&args.output, args.format.as_deref())?;
	write_archive(&args.output, format, &collection, palette)
}

fn run_convert(args: ConvertArgs, palette: &Palette) -> Result<()> {
	let (source, collection, _) = read_archive(&args.input, None, palette)?;
	let target = SpriteFormat::from_path(&args.output)?;
	debug!("converting {source} to {target}");
	let collection = match (collection.pixel_format, target) {
		(PixelFormat::BigEndian555, SpriteFormat::C16 | SpriteFormat::Blk) => {
			collection.with_pixel_format(PixelFormat::Rgb555)
		}
		_ => collection,
	};
	write_archive(&args.output, target, &collection, palette)
}

fn run_sheet(args: SheetArgs, palette: &Palette) -> Result<()> {
	let (_, collection, _) = read_archive(&args.input, None, palette)?;
	let sheet = if args.dividers {
		spritesheet::pack_with_dividers(&collection.frames)
	} else {
		let (cols, rows) = match (args.cols, collection.layout) {
			(Some(cols), _) if cols > 0 => (cols, (collection.len() as u32).div_ceil(cols)),
			(_, Layout::Background {
				cols,
				rows,
			}) => (u32::from(cols), u32::from(rows)),
			_ => spritesheet::square_grid(collection.len()),
		};
		let order = if matches!(collection.layout, Layout::Background { .. }) {
			SheetOrder::ColumnMajor
		} else {
			SheetOrder::RowMajor
		};
		spritesheet::combine(&collection.frames, cols, rows, order)?
	};
	if sheet.is_empty() {
		bail!("{} has no frames to draw", args.input.display());
	}
	frame_to_image(&sheet)?.save(&args.output)?;
	println!("✓ Wrote {}x{} sheet to {}", sheet.width(), sheet.height(), args.output.display());
	Ok(())
}

fn run_slice(args: SliceArgs, palette: &Palette) -> Result<()> {
	let image = image_to_frame(&args.input)?;
	let format = SpriteFormat::from_path(&args.output)?;
	let collection = if format == SpriteFormat::Blk && args.cols * args.rows == 1 {
		// let the BLK encoder cut the image into tiles
		SpriteCollection::from_frames(vec![image])
	} else {
		let order = if args.column_major {
			SheetOrder::ColumnMajor
		} else {
			SheetOrder::RowMajor
		};
		spritesheet::slice(&image, args.cols, args.rows, order)?
	};
	write_archive(&args.output, format, &collection, palette)
}
