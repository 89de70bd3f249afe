//! Benchmarks for rbiclean normalization performance.
//!
//! Run with: cargo bench
//!
//! Rows are synthetic but shaped like real directory sheets: shouty casing,
//! abbreviations, doubled punctuation and embedded PIN codes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use rbiclean::{normalize_line, AbbreviationTable, Normalizer, RawRecord};

const BANKS: &[&str] = &[
    "STATE BANK OF INDIA",
    "HDFC BANK",
    "ICICI BANK LIMITED",
    "PUNJAB NATIONAL BANK",
    "THE KANGRA CO-OPERATIVE BANK",
];

const STREETS: &[&str] = &[
    "NO.12 OPP. BUS STAND",
    "D.NO 5/2,, GANDHI ROAD",
    "P.O BOX 101 ANNA NAGAR(WEST)",
    "RBO, 21ST CROSS  DISTT: SALEM",
    "PLOT NO:14,SECTOR-17",
    "NEAR SBI ATM , MAIN ROAD -",
];

const CITIES: &[&str] = &["CHENNAI", "MUMBAI", "SALEM", "PUNE", "KOLKATA", "NEW DELHI"];

fn pick(rng: &mut StdRng, items: &[&str]) -> String {
    items.choose(rng).copied().unwrap_or_default().to_string()
}

/// Generates `count` random rows from a fixed seed.
fn create_records(count: usize) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(42);

    (0..count)
        .map(|i| {
            let bank = pick(&mut rng, BANKS);
            let street = pick(&mut rng, STREETS);
            let city = pick(&mut rng, CITIES);
            let pin: u32 = rng.gen_range(110_000..=855_999);

            RawRecord::from_fields(
                [
                    bank,
                    format!("BANK{i:07}"),
                    format!("{}.0", rng.gen_range(100_000_000u64..999_999_999)),
                    format!("{street} BRANCH"),
                    format!("{street}, {city} {pin}"),
                    format!("0{}", rng.gen_range(10_000_000u64..99_999_999)),
                    city.clone(),
                    if rng.gen_bool(0.2) { "NA".to_string() } else { city },
                    "TAMIL NADU".to_string(),
                ],
                i as u64 + 2,
            )
            .unwrap()
        })
        .collect()
}

/// Benchmark single-line normalization in both modes.
fn bench_normalize_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_line");

    for (label, address_mode) in [("plain", false), ("address", true)] {
        group.bench_function(label, |b| {
            b.iter(|| {
                for street in STREETS {
                    black_box(normalize_line(black_box(street), address_mode));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark whole-record normalization, sequential vs. rayon.
fn bench_normalize_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_batch");
    let normalizer = Normalizer::new(AbbreviationTable::builtin().unwrap());

    for row_count in [100, 1_000, 10_000].iter() {
        let records = create_records(*row_count);
        group.throughput(Throughput::Elements(*row_count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", row_count), &records, |b, records| {
            b.iter(|| normalizer.normalize_batch(black_box(records), false));
        });
        group.bench_with_input(BenchmarkId::new("parallel", row_count), &records, |b, records| {
            b.iter(|| normalizer.normalize_batch(black_box(records), true));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize_line, bench_normalize_batch);
criterion_main!(benches);
