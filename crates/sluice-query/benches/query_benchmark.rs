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
use rand::{Rng, SeedableRng, rngs::StdRng};
use sluice_model::{
    pipeline::{Pipeline, PipelineBuilder},
    range_set::RangeSet,
    shift::MappingRule,
};
use sluice_query::{config::QueryConfigBuilder, engine::QueryEngine};
use std::hint::black_box;

type IntegerType = i64;

const STAGES: usize = 7;
const RULES_PER_STAGE: usize = 40;

/// Builds a seven-stage pipeline shaped like a real almanac: a few dozen
/// disjoint rules per stage over a domain of a few billion values.
fn random_pipeline(rng: &mut StdRng) -> Pipeline<IntegerType> {
    let mut builder = PipelineBuilder::new();
    for _ in 0..STAGES {
        let mut cursor: IntegerType = rng.random_range(0..1_000);
        let mut rules = Vec::with_capacity(RULES_PER_STAGE);
        for _ in 0..RULES_PER_STAGE {
            cursor += rng.random_range(0..20_000_000);
            let len = rng.random_range(1..100_000_000);
            let dest = rng.random_range(0..4_000_000_000);
            rules.push(MappingRule::new(dest, cursor, len));
            cursor += len;
        }
        builder.add_stage(rules);
    }
    builder
        .build()
        .unwrap_or_else(|e| panic!("Failed to build benchmark pipeline: {}", e))
}

fn random_ranges(rng: &mut StdRng, count: usize) -> RangeSet<IntegerType> {
    let pairs: Vec<(IntegerType, IntegerType)> = (0..count)
        .map(|_| {
            (
                rng.random_range(0..3_000_000_000),
                rng.random_range(1..400_000_000),
            )
        })
        .collect();
    RangeSet::from_pairs(pairs).unwrap()
}

fn bench_range_mode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xA1_3A_4A_C0);
    let pipeline = random_pipeline(&mut rng);
    let mut group = c.benchmark_group("range_mode");

    for count in [10usize, 100, 1_000] {
        let ranges = random_ranges(&mut rng, count);
        group.throughput(Throughput::Elements(count as u64));

        for threads in [1usize, 4] {
            let config = QueryConfigBuilder::new().threads(threads).build();
            let engine = QueryEngine::with_config(&pipeline, config);

            group.bench_with_input(
                BenchmarkId::new(format!("threads_{}", threads), count),
                &ranges,
                |b, ranges| {
                    b.iter(|| {
                        engine
                            .minimum_for_range_set(black_box(ranges))
                            .unwrap_or_else(|e| panic!("range query failed: {}", e))
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_point_mode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xA1_3A_4A_C0);
    let pipeline = random_pipeline(&mut rng);
    let engine = QueryEngine::new(&pipeline);
    let mut group = c.benchmark_group("point_mode");

    for count in [1_000usize, 100_000] {
        let values: Vec<IntegerType> = (0..count)
            .map(|_| rng.random_range(0..3_000_000_000))
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &values, |b, values| {
            b.iter(|| {
                engine
                    .minimum_for_points(black_box(values))
                    .unwrap_or_else(|e| panic!("point query failed: {}", e))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_range_mode, bench_point_mode);
criterion_main!(benches);
