//! Benchmark suite for sprite codecs
//!
//! Measures encoding and decoding throughput for the 16-bit formats, palette matching for
//! `.spr` encoding, and background tiling.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nornspr_benches::{generate_indexed_frame, generate_sprite_collection, generate_sprite_frame, sizes};
use nornspr_types::file::{Palette, Pixel, PixelFormat, SpriteCollection, blk, c16, s16, spr};
use std::hint::black_box;

const FRAMES: usize = 8;

fn pixel_count(collection: &SpriteCollection) -> u64 {
	collection.iter().map(|f| u64::from(f.width()) * u64::from(f.height())).sum()
}

/// Benchmark C16 run-length encoding and decoding
fn bench_c16(c: &mut Criterion) {
	let mut group = c.benchmark_group("c16");

	for (name, size) in [("small", sizes::SMALL), ("medium", sizes::MEDIUM), ("large", sizes::LARGE)] {
		let collection = generate_sprite_collection(FRAMES, size);
		let Ok(data) = c16::encode(&collection) else {
			eprintln!("Warning: Could not encode {name} sprites");
			continue;
		};

		group.throughput(Throughput::Elements(pixel_count(&collection)));
		group.bench_with_input(BenchmarkId::new("encode", name), &collection, |b, collection| {
			b.iter(|| black_box(c16::encode(black_box(collection))));
		});
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| black_box(c16::decode(black_box(data))));
		});
	}

	group.finish();
}

/// Benchmark scanline encoding on its own
fn bench_c16_scanline(c: &mut Criterion) {
	let mut group = c.benchmark_group("c16_scanline");

	let frame = generate_sprite_frame(640, 1);
	let row = frame.pixels();
	group.throughput(Throughput::Elements(row.len() as u64));
	for format in [PixelFormat::Rgb555, PixelFormat::Rgb565] {
		group.bench_with_input(BenchmarkId::new("encode", format!("{format:?}")), &format, |b, format| {
			b.iter(|| black_box(c16::encode_scanline(black_box(row), *format)));
		});
	}

	group.finish();
}

/// Benchmark uncompressed 16-bit archives
fn bench_s16(c: &mut Criterion) {
	let mut group = c.benchmark_group("s16");

	let collection = generate_sprite_collection(FRAMES, sizes::LARGE);
	let data = match s16::encode(&collection) {
		Ok(d) => d,
		Err(err) => {
			eprintln!("Warning: Could not encode s16 sprites: {err}");
			return;
		}
	};

	group.throughput(Throughput::Elements(pixel_count(&collection)));
	group.bench_function("encode", |b| {
		b.iter(|| black_box(s16::encode(black_box(&collection))));
	});
	group.bench_function("decode", |b| {
		b.iter(|| black_box(s16::decode(black_box(&data))));
	});

	group.finish();
}

/// Benchmark nearest colour search, the hot path of `.spr` encoding
fn bench_palette_matching(c: &mut Criterion) {
	let mut group = c.benchmark_group("palette");
	let palette = Palette::creatures();

	let pixels: Vec<Pixel> = (0..4096u32)
		.map(|i| Pixel::rgb((i * 7) as u8, (i * 13) as u8, (i * 29) as u8))
		.collect();
	group.throughput(Throughput::Elements(pixels.len() as u64));
	group.bench_function("find_nearest_index", |b| {
		b.iter(|| {
			let total: u32 = pixels.iter().map(|p| u32::from(palette.find_nearest_index(*p))).sum();
			black_box(total)
		});
	});

	let (width, height) = sizes::MEDIUM;
	let collection: SpriteCollection =
		(0..FRAMES).map(|_| generate_indexed_frame(width, height, &palette)).collect();
	group.throughput(Throughput::Elements(pixel_count(&collection)));
	group.bench_function("spr_encode", |b| {
		b.iter(|| black_box(spr::encode(black_box(&collection), &palette)));
	});

	group.finish();
}

/// Benchmark cutting a room background into tiles and writing it out
fn bench_background(c: &mut Criterion) {
	let mut group = c.benchmark_group("blk");

	let (width, height) = sizes::BACKGROUND;
	let image = generate_sprite_frame(width, height);
	group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
	group.bench_function("tile_frame", |b| {
		b.iter(|| black_box(blk::tile_frame(black_box(&image))));
	});

	let Ok(tiles) = blk::tile_frame(&image) else {
		eprintln!("Warning: Could not tile background");
		group.finish();
		return;
	};
	group.bench_function("encode", |b| {
		b.iter(|| black_box(blk::encode(black_box(&tiles))));
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_c16,
	bench_c16_scanline,
	bench_s16,
	bench_palette_matching,
	bench_background,
);

criterion_main!(benches);
