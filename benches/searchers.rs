//! cargo bench --bench searchers --features bench
use std::hint::black_box;

use binseek::multi_sequence::MultiSequenceMatcher;
use binseek::search::horspool::HorspoolSearcher;
use binseek::search::set_horspool::SetHorspoolSearcher;
use binseek::search::sunday::SundaySearcher;
use binseek::search::wu_manber::WuManberSearcher;
use binseek::search::Searcher;
use binseek::sequence::ByteString;
use criterion::{criterion_group, criterion_main, Criterion};

const NEEDLE: &[u8] = b"needle";

fn haystack(prefix_len: usize, found: bool) -> Vec<u8> {
    let mut hay = vec![b'x'; prefix_len];
    if found {
        hay.extend_from_slice(NEEDLE);
    } else {
        hay.extend_from_slice(b"unrelatd");
    }
    hay
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let short_hit = haystack(20, true);
    let long_hit = haystack(10_000, true);
    let long_miss = haystack(10_000, false);

    {
        let searcher = HorspoolSearcher::new(ByteString::new(NEEDLE.to_vec()));
        assert!(searcher.search_forward(&short_hit, 0, short_hit.len()).is_some());
        c.bench_function("horspool_short", |b| b.iter(|| searcher.search_forward(black_box(&short_hit), 0, short_hit.len())));
        c.bench_function("horspool_long_hit", |b| b.iter(|| searcher.search_forward(black_box(&long_hit), 0, long_hit.len())));
        c.bench_function("horspool_long_miss", |b| b.iter(|| searcher.search_forward(black_box(&long_miss), 0, long_miss.len())));
    }

    {
        let searcher = SundaySearcher::new(ByteString::new(NEEDLE.to_vec()));
        assert!(searcher.search_forward(&short_hit, 0, short_hit.len()).is_some());
        c.bench_function("sunday_short", |b| b.iter(|| searcher.search_forward(black_box(&short_hit), 0, short_hit.len())));
        c.bench_function("sunday_long_hit", |b| b.iter(|| searcher.search_forward(black_box(&long_hit), 0, long_hit.len())));
        c.bench_function("sunday_long_miss", |b| b.iter(|| searcher.search_forward(black_box(&long_miss), 0, long_miss.len())));
    }

    {
        let trie = MultiSequenceMatcher::builder(vec![
            ByteString::new(b"needle".to_vec()),
            ByteString::new(b"haystack".to_vec()),
            ByteString::new(b"forest".to_vec()),
        ])
        .build();

        let set_horspool = SetHorspoolSearcher::new(&trie);
        assert!(set_horspool.search_forward(&short_hit, 0, short_hit.len()).is_some());
        c.bench_function("set_horspool_short", |b| {
            b.iter(|| set_horspool.search_forward(black_box(&short_hit), 0, short_hit.len()))
        });
        c.bench_function("set_horspool_long_hit", |b| {
            b.iter(|| set_horspool.search_forward(black_box(&long_hit), 0, long_hit.len()))
        });
        c.bench_function("set_horspool_long_miss", |b| {
            b.iter(|| set_horspool.search_forward(black_box(&long_miss), 0, long_miss.len()))
        });

        let wu_manber = WuManberSearcher::new(&trie).unwrap();
        assert!(wu_manber.search_forward(&short_hit, 0, short_hit.len()).is_some());
        c.bench_function("wu_manber_short", |b| b.iter(|| wu_manber.search_forward(black_box(&short_hit), 0, short_hit.len())));
        c.bench_function("wu_manber_long_hit", |b| b.iter(|| wu_manber.search_forward(black_box(&long_hit), 0, long_hit.len())));
        c.bench_function("wu_manber_long_miss", |b| b.iter(|| wu_manber.search_forward(black_box(&long_miss), 0, long_miss.len())));
    }

    {
        assert!(short_hit.windows(NEEDLE.len()).any(|w| w == NEEDLE));
        c.bench_function("std_find_short", |b| {
            b.iter(|| black_box(&short_hit).windows(NEEDLE.len()).position(|w| w == NEEDLE))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
