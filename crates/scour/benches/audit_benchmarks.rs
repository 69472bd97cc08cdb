//! Audit and cleaning performance benchmarks.
//!
//! Measures parsing, the full audit and a typical cleaning chain across
//! table sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scour::{Auditor, Cleaner, Columns, Keep, MissingStrategy, Parser, StringNormalization};

/// Generate synthetic CSV data with mixed column kinds.
fn generate_csv_data(rows: usize) -> String {
    let mut data = String::from("id,name,age,salary,city,joined\n");

    for row in 0..rows {
        let name = if row % 17 == 0 { "" } else { "  Élodie   Martin " };
        let age = if row % 101 == 0 { 999 } else { 20 + row % 45 };
        let salary = if row % 13 == 0 {
            "NA".to_string()
        } else {
            format!("{:.2}", 2_000.0 + (row % 300) as f64 * 7.5)
        };
        data.push_str(&format!(
            "{},{},{},{},City_{},2023-{:02}-{:02}\n",
            row % (rows / 2 + 1),
            name,
            age,
            salary,
            row % 10,
            (row % 12) + 1,
            (row % 28) + 1
        ));
    }

    data
}

/// Benchmark parsing CSV text into a table.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(Parser::new().parse_str(data).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the full audit.
fn bench_audit(c: &mut Criterion) {
    let mut group = c.benchmark_group("audit");

    for rows in [100, 1_000, 10_000].iter() {
        let table = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(Auditor::new(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark a typical cleaning chain.
fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_chain");

    for rows in [100, 1_000, 10_000].iter() {
        let table = Parser::new().parse_str(&generate_csv_data(*rows)).unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| {
                let mut cleaner = Cleaner::new(table).unwrap();
                cleaner
                    .drop_duplicates(Keep::First)
                    .unwrap()
                    .handle_missing(MissingStrategy::Median, Columns::Auto)
                    .unwrap()
                    .normalize_strings(StringNormalization::default(), Columns::Auto)
                    .unwrap()
                    .strip_accents(Columns::Auto)
                    .unwrap()
                    .remove_outliers_iqr("age", 1.5)
                    .unwrap();
                black_box(cleaner.into_table())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_audit, bench_clean);
criterion_main!(benches);
