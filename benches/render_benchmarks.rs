use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mark_template::{Document, RuntimeValues, TypedValue, render};

/// Generate a document where every placeholder appears twice
fn generate_document(variables: usize) -> String {
    let mut text = String::from("# Invoice\n\n");
    for i in 0..variables {
        text.push_str(&format!(
            "Item {}: ${{{{name: item{}, type: NUMBER, defaultValue: {}}}}}\n",
            i, i, i
        ));
        text.push_str(&format!(
            "Repeated: ${{{{name: item{}, type: NUMBER, defaultValue: {}}}}}\n",
            i, i
        ));
    }
    text
}

fn generate_values(variables: usize, step: usize) -> RuntimeValues {
    (0..variables)
        .step_by(step)
        .map(|i| (format!("item{}", i), TypedValue::from(i as f64 * 1.5)))
        .collect()
}

/// Benchmark rendering with and without runtime values
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for count in [1, 10, 100, 500] {
        let doc = Document::load(generate_document(count)).unwrap();
        let some_values = generate_values(count, 2);
        let all_values = generate_values(count, 1);
        group.throughput(Throughput::Bytes(doc.text().len() as u64));

        group.bench_with_input(BenchmarkId::new("defaults", count), &doc, |b, doc| {
            b.iter(|| render(black_box(doc), &RuntimeValues::new(), false));
        });

        group.bench_with_input(BenchmarkId::new("runtime_values", count), &doc, |b, doc| {
            b.iter(|| render(black_box(doc), black_box(&some_values), false));
        });

        group.bench_with_input(BenchmarkId::new("strict", count), &doc, |b, doc| {
            b.iter(|| render(black_box(doc), black_box(&all_values), true));
        });
    }

    group.finish();
}

/// Benchmark document loading, which scans and parses every placeholder
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_load");

    for count in [10, 100, 500] {
        let text = generate_document(count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("load", count), &text, |b, text| {
            b.iter(|| Document::load(black_box(text.as_str())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_load);
criterion_main!(benches);
