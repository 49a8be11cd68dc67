use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schemadoc::render::{OutputFormat, RenderOptions, Renderer};
use schemadoc::schema::filter;
use schemadoc::{Column, ForeignKey, Table, Tables};
use std::hint::black_box;
use std::io;

/// `count` tables of 12 columns, each referencing its predecessor.
fn generate_schema(count: usize) -> Tables {
    (0..count)
        .map(|i| {
            let mut table = Table::new(format!("table_{:05}", i))
                .with_column(Column::new("id", "INTEGER").primary_key());
            for c in 0..10 {
                table = table.with_column(Column::new(format!("col_{}", c), "TEXT"));
            }
            table = table.with_column(Column::new("parent_id", "INTEGER").not_null());
            if i > 0 {
                table = table.with_reference(ForeignKey::new(
                    "parent_id",
                    format!("table_{:05}", i - 1),
                    "id",
                ));
            }
            table
        })
        .collect()
}

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for count in [10, 100, 500] {
        let tables = generate_schema(count);
        group.throughput(Throughput::Elements(count as u64));

        for format in [
            OutputFormat::Dot,
            OutputFormat::D2,
            OutputFormat::Markdown,
            OutputFormat::Html,
            OutputFormat::Json,
        ] {
            let renderer = Renderer::new(RenderOptions {
                format,
                fk: true,
                ..RenderOptions::default()
            })
            .unwrap();

            group.bench_with_input(
                BenchmarkId::new(format.to_string(), format!("{}_tables", count)),
                &tables,
                |b, tables| {
                    b.iter(|| renderer.render(black_box(tables.clone()), io::sink()).unwrap())
                },
            );
        }
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let tables = generate_schema(1000);
    let exclude: &[&str] = &["table_001*", "table_0042", "TABLE_009*"];
    let include: &[&str] = &[];

    group.throughput(Throughput::Elements(1000));
    group.bench_function("exclude_prefixes_1000_tables", |b| {
        b.iter(|| filter(black_box(tables.clone()), exclude, include).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_formats, bench_filter);
criterion_main!(benches);
