//! Fuzz test for the differ: arbitrary result sets never panic, and the
//! chunked scan and the view materializer agree with each other.
//!
//! This fuzzer generates random pairs of result sets (ragged rows, duplicate
//! and differently-cased column names, failed sources) and verifies that:
//! 1. Diffing twice yields the same verdicts
//! 2. The chunk size does not change the verdicts
//! 3. The view reports the same divergent row count as the scan

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use result_diff_rs::{MonospaceMeasure, ResultSet, ScanOptions, ViewMaterializer, diff_all};

#[derive(Debug, Arbitrary)]
struct Input {
    left: ResultSet,
    right: ResultSet,
    chunk_size: u8,
    sort: bool,
}

fn main() {
    loop {
        fuzz!(|input: Input| {
            let options = ScanOptions::default().with_sort(input.sort);
            let sources = vec![input.left.clone(), input.right.clone()];

            let first = diff_all(sources.clone(), options).expect("default chunk size is valid");
            let second = diff_all(sources.clone(), options).expect("default chunk size is valid");

            // Property 1: idempotence (sources may hold NaN, compare verdicts only)
            assert_eq!(first.diff_row_count, second.diff_row_count);
            assert_eq!(first.divergent_rows, second.divergent_rows);
            assert_eq!(first.diff_maps, second.diff_maps);

            // Property 2: chunking is invisible
            let chunk_size = usize::from(input.chunk_size.max(1));
            let chunked = diff_all(sources, options.with_chunk_size(chunk_size))
                .expect("chunk size is at least one");
            assert_eq!(
                first.divergent_rows, chunked.divergent_rows,
                "Chunk size {chunk_size} changed the verdicts"
            );
            assert_eq!(first.diff_maps, chunked.diff_maps);

            // Property 3: view and scan agree
            let view = ViewMaterializer::new(MonospaceMeasure::default())
                .with_options(result_diff_rs::ViewOptions::default().with_sort(input.sort))
                .diff_and_map_to_view(input.left, input.right);
            assert_eq!(view.diff_count, first.diff_row_count);
            assert_eq!(view.row_count, first.row_count);
        });
    }
}
