use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use unicore::{canon_caseless_match, graphemes, nfc, nfd, str_width};

fn bench(c: &mut Criterion) {
    let reference = concat!(
        "In the quiet twilight, dreams unfold, soft whispers of a story untold.\n",
        "月明かりが静かに照らし出し、夢を見る心の奥で詩が静かに囁かれる\n",
        "Stars collide in the early light of hope, echoing the silent call of the night.\n",
        "夜の静寂、希望と孤独が混ざり合うその中で詩が永遠に続く\n",
    );
    let buffer = reference.repeat(10);
    let bytes = buffer.as_bytes();
    let decomposed = nfd(bytes);

    c.benchmark_group("graphemes")
        .throughput(Throughput::Bytes(bytes.len() as u64))
        .bench_function("iterate", |b| {
            b.iter(|| graphemes(black_box(bytes)).count())
        });

    c.benchmark_group("width")
        .throughput(Throughput::Bytes(bytes.len() as u64))
        .bench_function("str_width", |b| b.iter(|| str_width(black_box(bytes))))
        .bench_function("str_width_ascii", |b| {
            let ascii = "In the quiet twilight, dreams unfold. ".repeat(40);
            b.iter(|| str_width(black_box(ascii.as_bytes())))
        });

    c.benchmark_group("normalize")
        .throughput(Throughput::Bytes(bytes.len() as u64))
        .bench_function("nfd", |b| b.iter(|| nfd(black_box(bytes))))
        .bench_function("nfc_recompose", |b| {
            b.iter(|| nfc(black_box(decomposed.as_bytes())))
        })
        .bench_function("nfc_quick_check", |b| b.iter(|| nfc(black_box(bytes))));

    c.benchmark_group("caseless")
        .throughput(Throughput::Bytes(bytes.len() as u64))
        .bench_function("canon_match", |b| {
            b.iter(|| canon_caseless_match(black_box(bytes), black_box(decomposed.as_bytes())))
        });
}

criterion_group!(benches, bench);
criterion_main!(benches);
