use criterion::{criterion_group, criterion_main, Criterion};
use index::ingest::index_text;
use index::{query, Index};

fn corpus() -> String {
    // Synthetic prose with a recurring phrase so the phrase bench has work.
    let mut text = String::new();
    for i in 0..200 {
        text.push_str("the quick brown fox jumps over the lazy dog ");
        text.push_str(&format!("filler{} ", i % 97));
    }
    text
}

fn bench_index_text(c: &mut Criterion) {
    let text = corpus();
    c.bench_function("index_text_200_sentences", |b| {
        b.iter(|| {
            let mut idx = Index::new();
            index_text(&mut idx, &text, 1).unwrap();
            idx
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let text = corpus();
    let mut idx = Index::new();
    for doc in 0..10 {
        index_text(&mut idx, &text, doc).unwrap();
    }
    c.bench_function("single_term_query", |b| b.iter(|| query(&idx, "fox")));
    c.bench_function("phrase_query", |b| {
        b.iter(|| query(&idx, "quick brown fox"))
    });
}

criterion_group!(benches, bench_index_text, bench_queries);
criterion_main!(benches);
