// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rebound_store::key::{KeyLayout, SortPolicy};
use rebound_store::trie::{TrieMap, TrieSet};
use rebound_store::visited::VisitedSet;
use std::hint::black_box;

const KEYS: usize = 100_000;

/// Random canonical keys for `robots` robots on a 16x16 board.
fn sample_keys(robots: usize, seed: u64) -> (KeyLayout, Vec<u64>) {
    let layout = KeyLayout::new(robots, 8, SortPolicy::AllButLast);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let keys = (0..KEYS)
        .map(|_| {
            let placement: Vec<usize> = (0..robots).map(|_| rng.gen_range(0..256)).collect();
            layout.encode::<u64>(&placement)
        })
        .collect();
    (layout, keys)
}

fn bench_trie_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_set_insert");
    group.throughput(Throughput::Elements(KEYS as u64));

    for robots in [3usize, 4, 5] {
        let (layout, keys) = sample_keys(robots, robots as u64);
        group.bench_with_input(BenchmarkId::new("robots", robots), &keys, |b, keys| {
            b.iter(|| {
                let mut set = VisitedSet::for_layout(&layout);
                for &k in keys {
                    black_box(set.add(k as u128));
                }
                black_box(set.len())
            })
        });
    }
    group.finish();
}

fn bench_trie_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_map_put_if_greater");
    group.throughput(Throughput::Elements(KEYS as u64));

    let (layout, keys) = sample_keys(5, 99);
    group.bench_function("wide", |b| {
        b.iter(|| {
            let mut map = TrieMap::<u64>::new(layout.total_bits());
            for (i, &k) in keys.iter().enumerate() {
                black_box(map.put_if_greater(k, (i & 0x3F) as u8));
            }
            black_box(map.len())
        })
    });

    let (layout, keys) = sample_keys(4, 98);
    group.bench_function("narrow", |b| {
        b.iter(|| {
            let mut set = TrieSet::<u32>::new(layout.total_bits());
            for &k in &keys {
                black_box(set.add(k as u32));
            }
            black_box(set.allocated_memory_bytes())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_trie_set, bench_trie_map);
criterion_main!(benches);
