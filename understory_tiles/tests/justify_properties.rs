// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for row packing, deferral, and page caching.

use std::collections::HashSet;

use kurbo::Size;
use proptest::prelude::*;
use understory_tiles::{
    CellSequence, GridMode, GridSegment, HeaderItem, JustifyConfig, PageSpec, PageSpecCache,
    Segment, TileItem, build_cells, compute_page,
};

const EPSILON: f64 = 1e-6;

#[derive(Clone, Debug)]
enum SegmentSpec {
    Header,
    Grid {
        mode: GridMode,
        height: f64,
        spacing: f64,
        max_scale: f64,
        aspects: Vec<f64>,
    },
}

fn segment_spec() -> impl Strategy<Value = SegmentSpec> {
    prop_oneof![
        1 => Just(SegmentSpec::Header),
        4 => (
            prop_oneof![Just(GridMode::Fit), Just(GridMode::Fill)],
            50.0..200.0_f64,
            0.0..20.0_f64,
            1.0..2.0_f64,
            prop::collection::vec(0.5..2.5_f64, 0..40),
        )
            .prop_map(|(mode, height, spacing, max_scale, aspects)| SegmentSpec::Grid {
                mode,
                height,
                spacing,
                max_scale,
                aspects,
            }),
    ]
}

fn build(specs: &[SegmentSpec]) -> CellSequence<usize> {
    let segments = specs.iter().enumerate().map(|(n, spec)| match spec {
        SegmentSpec::Header => Segment::Header(HeaderItem::new(format!("h{n}"), n)),
        SegmentSpec::Grid {
            mode,
            height,
            spacing,
            max_scale,
            aspects,
        } => Segment::Grid(
            GridSegment::new(format!("g{n}"), *mode, *height)
                .with_spacing(*spacing)
                .with_max_scale_factor(*max_scale)
                .with_items(aspects.iter().enumerate().map(|(i, aspect)| {
                    TileItem::new(format!("t{i}"), i, Size::new(aspect * 100.0, 100.0))
                })),
        ),
    });
    build_cells(segments.collect::<Vec<_>>())
}

/// Rows of `page` that were closed because the next cell overflowed them.
fn closed_rows(page: &PageSpec) -> Vec<(usize, usize)> {
    page.rows()
        .windows(2)
        .filter(|pair| page.run_of(pair[0].start) == page.run_of(pair[1].start))
        .map(|pair| (pair[0].start, pair[1].start))
        .collect()
}

fn inputs() -> impl Strategy<Value = (Vec<SegmentSpec>, f64, usize)> {
    (
        prop::collection::vec(segment_spec(), 1..8),
        600.0..1600.0_f64,
        1..120_usize,
    )
}

proptest! {
    #[test]
    fn scale_factors_stay_within_bounds(
        (specs, width, lookahead) in inputs(),
        start in any::<prop::sample::Index>(),
    ) {
        let cells = build(&specs);
        prop_assume!(!cells.is_empty());
        let start = start.index(cells.len());
        let config = JustifyConfig::default().with_lookahead(lookahead);
        let page = compute_page(&cells, start, width, &config).unwrap();

        for row in page.rows() {
            let grid = cells.grid_of(row.start).unwrap();
            prop_assert!(row.scale_factor >= 1.0);
            prop_assert!(row.scale_factor <= grid.max_scale_factor.max(1.0) + EPSILON);
            if !grid.is_fill() {
                prop_assert_eq!(row.scale_factor, 1.0);
            }
        }
    }

    #[test]
    fn closed_fill_rows_span_the_viewport((specs, width, lookahead) in inputs()) {
        let cells = build(&specs);
        prop_assume!(!cells.is_empty());
        let config = JustifyConfig::default().with_lookahead(lookahead);
        let page = compute_page(&cells, 0, width, &config).unwrap();

        for (from, to) in closed_rows(&page) {
            let grid = cells.grid_of(from).unwrap();
            if !grid.is_fill() {
                continue;
            }
            let tiles: f64 = (from..to).map(|i| page.final_size(i).unwrap().width).sum();
            #[allow(clippy::cast_precision_loss, reason = "Rows are short")]
            let gaps = grid.spacing * (to - from - 1) as f64;
            let scale = page.scale_factor(from);
            if scale < grid.max_scale_factor - EPSILON {
                prop_assert!(
                    (tiles + gaps - width).abs() < EPSILON,
                    "row {from}..{to} spans {}",
                    tiles + gaps
                );
            } else {
                prop_assert!(tiles + gaps <= width + EPSILON);
            }
        }
    }

    #[test]
    fn deferred_rows_are_sparse_and_continue_their_grid(
        (specs, width, lookahead) in inputs(),
        start in any::<prop::sample::Index>(),
    ) {
        let cells = build(&specs);
        prop_assume!(!cells.is_empty());
        let start = start.index(cells.len());
        let config = JustifyConfig::default().with_lookahead(lookahead);
        let page = compute_page(&cells, start, width, &config).unwrap();

        prop_assert!(page.item_count() > 0);
        prop_assert!(page.item_count() <= lookahead);

        if let Some(extra) = page.extra_cells() {
            prop_assert_eq!(extra.start, page.end());
            prop_assert!(extra.start > start);
            prop_assert_eq!(extra.end, (start + lookahead).min(cells.len()));
            // The grid continues past the window.
            prop_assert!(cells.same_grid(extra.start, extra.end));

            let grid = cells.grid_of(extra.start).unwrap();
            let used: f64 = cells.cells()[extra.clone()]
                .iter()
                .map(|cell| cell.aspect_ratio * grid.min_row_height + grid.spacing)
                .sum();
            prop_assert!(used / grid.row_budget(width) < config.min_fill);

            let deferred: Vec<usize> =
                page.extra_cells_in(&cells).iter().map(|c| c.content).collect();
            let expected: Vec<usize> = cells.cells()[extra].iter().map(|c| c.content).collect();
            prop_assert_eq!(deferred, expected);
        }
    }

    #[test]
    fn pages_partition_the_sequence((specs, width, lookahead) in inputs()) {
        let cells = build(&specs);
        let config = JustifyConfig::default().with_lookahead(lookahead);
        let mut start = 0;
        while start < cells.len() {
            let page = compute_page(&cells, start, width, &config).unwrap();
            prop_assert_eq!(page.start(), start);
            prop_assert!(page.rows().first().is_some_and(|row| row.start == start));
            start = page.end();
        }
        prop_assert_eq!(start, cells.len());
    }

    #[test]
    fn cache_matches_fresh_computation(
        specs in prop::collection::vec(segment_spec(), 1..6),
        requests in prop::collection::vec(
            (
                any::<prop::sample::Index>(),
                prop_oneof![Just(640.0), Just(800.0), Just(1280.0)],
            ),
            1..40,
        ),
    ) {
        let cells = build(&specs);
        prop_assume!(!cells.is_empty());
        let mut cache = PageSpecCache::new();
        let mut seen = HashSet::new();
        let mut current_width = None;
        let mut expected_computations = 0;

        for (start, width) in requests {
            let start = start.index(cells.len());
            if current_width != Some(width) {
                current_width = Some(width);
                seen.clear();
            }
            if seen.insert(start) {
                expected_computations += 1;
            }

            let cached = cache.get(&cells, start, width).unwrap().clone();
            let fresh = compute_page(&cells, start, width, cache.config()).unwrap();
            prop_assert_eq!(cached, fresh);
            prop_assert_eq!(cache.computations(), expected_computations);
        }
    }
}
