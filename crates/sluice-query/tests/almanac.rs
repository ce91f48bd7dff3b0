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

use rand::{Rng, SeedableRng, rngs::StdRng};
use sluice_model::{
    loading::AlmanacLoader,
    pipeline::{Pipeline, PipelineBuilder},
    range_set::RangeSet,
    shift::MappingRule,
};
use sluice_query::{config::QueryConfigBuilder, engine::QueryEngine, error::QueryError};

type IntegerType = i64;

const SAMPLE: &str = r#"
# Sample almanac: four seeds, seven stages.
seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
"#;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A pipeline of `stages` stages with up to `rules` disjoint rules each,
/// spread over a domain of a few billion values.
fn random_pipeline(rng: &mut StdRng, stages: usize, rules: usize) -> Pipeline<IntegerType> {
    let mut builder = PipelineBuilder::new();
    for _ in 0..stages {
        let mut cursor: IntegerType = rng.random_range(0..1_000);
        let mut stage = Vec::with_capacity(rules);
        for _ in 0..rules {
            cursor += rng.random_range(0..50_000_000);
            let len = rng.random_range(1..200_000_000);
            let dest = rng.random_range(0..4_000_000_000);
            stage.push(MappingRule::new(dest, cursor, len));
            cursor += len;
        }
        builder.add_stage(stage);
    }
    builder.build().expect("random stages are disjoint")
}

#[test]
fn test_sample_almanac() {
    init_logger();

    let almanac = AlmanacLoader::new()
        .verify_category_chain(true)
        .from_str::<IntegerType>(SAMPLE)
        .expect("sample almanac loads");
    let engine = QueryEngine::new(almanac.pipeline());

    assert_eq!(engine.minimum_for_points(almanac.seed_points()), Ok(35));

    let ranges = almanac.seed_ranges().unwrap();
    assert_eq!(engine.minimum_for_range_set(&ranges), Ok(46));
    assert_eq!(engine.minimum_by_enumeration(&ranges), Ok(46));
}

#[test]
fn test_sample_almanac_statistics() {
    init_logger();

    let almanac = AlmanacLoader::new()
        .from_str::<IntegerType>(SAMPLE)
        .unwrap();
    let engine = QueryEngine::new(almanac.pipeline());
    let outcome = engine
        .evaluate_ranges(&almanac.seed_ranges().unwrap())
        .unwrap();

    let stats = outcome.statistics();
    assert_eq!(outcome.minimum(), 46);
    assert_eq!(stats.input_ranges, 2);
    assert_eq!(stats.stage_fragments.len(), 7);
    assert!(stats.output_fragments >= 1);
    assert!(stats.peak_fragments() >= stats.input_ranges);
}

#[test]
fn test_parallel_equals_sequential_on_random_pipelines() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..10 {
        let pipeline = random_pipeline(&mut rng, 7, 30);
        let pairs: Vec<(IntegerType, IntegerType)> = (0..10)
            .map(|_| {
                (
                    rng.random_range(0..3_000_000_000),
                    rng.random_range(1..500_000_000),
                )
            })
            .collect();
        let ranges = RangeSet::from_pairs(pairs).unwrap();

        let sequential = QueryEngine::new(&pipeline)
            .minimum_for_range_set(&ranges)
            .unwrap();

        for threads in [2, 4, 8] {
            let config = QueryConfigBuilder::new().threads(threads).build();
            let parallel = QueryEngine::with_config(&pipeline, config)
                .minimum_for_range_set(&ranges)
                .unwrap();
            assert_eq!(parallel, sequential, "threads = {}", threads);
        }
    }
}

#[test]
fn test_large_ranges_are_not_enumerated() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    let pipeline = random_pipeline(&mut rng, 7, 30);

    // Billions of values: far beyond the enumeration limit, cheap in range mode.
    let ranges = RangeSet::from_pairs([(0, 3_000_000_000), (3_500_000_000, 2_000_000_000)]).unwrap();
    let engine = QueryEngine::new(&pipeline);

    assert!(engine.minimum_for_range_set(&ranges).is_ok());
    assert!(matches!(
        engine.minimum_by_enumeration(&ranges),
        Err(QueryError::EnumerationLimitExceeded { .. })
    ));
}

#[test]
fn test_range_minimum_bounded_by_sampled_points() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(1234);
    let pipeline = random_pipeline(&mut rng, 5, 20);
    let engine = QueryEngine::new(&pipeline);

    let ranges = RangeSet::from_pairs([(100, 1_000_000_000)]).unwrap();
    let minimum = engine.minimum_for_range_set(&ranges).unwrap();

    // Every sampled value maps at or above the range minimum.
    let samples: Vec<IntegerType> = (0..1_000)
        .map(|_| rng.random_range(100..1_000_000_100))
        .collect();
    let sampled = engine.minimum_for_points(&samples).unwrap();
    assert!(minimum <= sampled);
}
