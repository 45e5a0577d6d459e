use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use streamcsv::source::IterLines;
use streamcsv::{CsvReader, KeyedFields, ReaderConfig, Tokenizer, TokenizerConfig};

fn benchmark_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    let plain = "12345,Name_12345,1234500,2024-01-01,true,some free text here";
    let quoted = r#"12345,"Name, with comma","say ""hi""",2024-01-01,"multi, part, field""#;
    let backslash = r#"12345,"Name, with comma","say \"hi\"",2024-01-01,"C:\temp\x""#;

    let doubling = Tokenizer::default();
    let escaping = Tokenizer::new(TokenizerConfig::new(',', '"', '\\'));

    group.bench_function("plain", |b| b.iter(|| doubling.split(black_box(plain))));
    group.bench_function("quoted", |b| b.iter(|| doubling.split(black_box(quoted))));
    group.bench_function("backslash", |b| {
        b.iter(|| escaping.split(black_box(backslash)))
    });

    group.finish();
}

fn build_lines(size: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(size + 1);
    lines.push("ID,Name,Value".to_string());
    for i in 0..size {
        lines.push(format!("{},\"Name_{}\",{}", i, i, i * 100));
    }
    lines
}

fn benchmark_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for size in [1000, 10000, 100000].iter() {
        let lines = build_lines(*size);

        group.bench_with_input(BenchmarkId::new("rows", size), &lines, |b, lines| {
            b.iter(|| {
                let source = IterLines::new(lines.iter().cloned());
                let mut reader = CsvReader::with_config(source, ReaderConfig::new());
                for row in reader.records() {
                    black_box(row.unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("keyed", size), &lines, |b, lines| {
            b.iter(|| {
                let mut reader = CsvReader::new(
                    IterLines::new(lines.iter().cloned()),
                    ReaderConfig::new(),
                    KeyedFields,
                );
                for record in reader.records() {
                    black_box(record.unwrap());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_split, benchmark_read);
criterion_main!(benches);
