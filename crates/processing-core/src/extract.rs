//! Peak/valley extraction and grouping into action events.
//!
//! # Algorithm
//!
//! 1. **Candidates**: interior samples the series rises strictly into and
//!    falls strictly out of. A flat top counts once, at the floor of its
//!    midpoint. Candidates below `min_height` are dropped.
//! 2. **Spacing**: candidates are visited from highest to lowest value, ties
//!    broken by the lower position. Each surviving candidate suppresses all
//!    others closer than `min_distance`.
//! 3. **Valleys** are the peaks of the negated series.
//! 4. **Grouping**: runs of consecutive extrema of the same kind collapse
//!    into one extremum at the mean position of the run.
//! 5. **Labels**: valleys and peaks map to their configured categories.

use flowbeat_common::ExtractConfig;
use flowbeat_frame_model::{ActionEvent, Extremum, ExtremumKind, ScoreSeries};

/// Indices of local maxima, including plateau midpoints. Endpoints never
/// qualify.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut maxima = vec![];
    if x.len() < 3 {
        return maxima;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Local maxima with `value >= min_height`, at least `min_distance` apart.
pub fn find_peaks(x: &[f64], min_height: f64, min_distance: usize) -> Vec<usize> {
    let peaks: Vec<usize> = local_maxima(x)
        .into_iter()
        .filter(|&p| x[p] >= min_height)
        .collect();
    select_by_distance(&peaks, x, min_distance)
}

/// Drop peaks closer than `distance` to a higher (or equally high, earlier)
/// peak. `peaks` must be ascending.
fn select_by_distance(peaks: &[usize], x: &[f64], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&i, &j| {
        x[peaks[j]]
            .total_cmp(&x[peaks[i]])
            .then(peaks[i].cmp(&peaks[j]))
    });

    let mut keep = vec![true; peaks.len()];
    for &i in &order {
        if !keep[i] {
            continue;
        }

        let mut k = i;
        while k > 0 && peaks[i] - peaks[k - 1] < distance {
            k -= 1;
            keep[k] = false;
        }

        let mut k = i + 1;
        while k < peaks.len() && peaks[k] - peaks[i] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Peaks and valleys of `series`, merged and sorted by position.
pub fn find_extrema(series: &ScoreSeries, config: &ExtractConfig) -> Vec<Extremum> {
    let values = series.values();
    let negated = series.negated();

    let peaks = find_peaks(values, config.min_height, config.min_distance)
        .into_iter()
        .map(|p| Extremum::new(p, values[p], ExtremumKind::Peak));
    let valleys = find_peaks(negated.values(), config.min_height, config.min_distance)
        .into_iter()
        .map(|p| Extremum::new(p, values[p], ExtremumKind::Valley));

    let mut extrema: Vec<Extremum> = peaks.chain(valleys).collect();
    extrema.sort_by_key(|e| e.position);
    extrema
}

/// An open run of same-kind extrema.
struct Run {
    kind: ExtremumKind,
    position_sum: usize,
    count: usize,
}

impl Run {
    fn start(extremum: &Extremum) -> Self {
        Self {
            kind: extremum.kind,
            position_sum: extremum.position,
            count: 1,
        }
    }

    fn close(self, series: &ScoreSeries) -> Extremum {
        let position = self.position_sum / self.count;
        let value = series.get(position).unwrap_or_default();
        Extremum::new(position, value, self.kind)
    }
}

/// Collapse runs of consecutive same-kind extrema into one each.
///
/// A run ends whenever the kind changes; distance plays no part. The
/// representative sits at the truncated mean position and takes the series
/// value found there.
pub fn group_extrema(extrema: &[Extremum], series: &ScoreSeries) -> Vec<Extremum> {
    let mut grouped = vec![];
    let mut open: Option<Run> = None;

    for extremum in extrema {
        match open.as_mut() {
            Some(run) if run.kind == extremum.kind => {
                run.position_sum += extremum.position;
                run.count += 1;
            }
            _ => {
                if let Some(run) = open.take() {
                    grouped.push(run.close(series));
                }
                open = Some(Run::start(extremum));
            }
        }
    }

    if let Some(run) = open {
        grouped.push(run.close(series));
    }
    grouped
}

/// Map grouped extrema to events, keeping their order.
pub fn label_events(grouped: &[Extremum], config: &ExtractConfig) -> Vec<ActionEvent> {
    grouped
        .iter()
        .map(|e| {
            let category = match e.kind {
                ExtremumKind::Valley => config.valley_category,
                ExtremumKind::Peak => config.peak_category,
            };
            ActionEvent::new(e.position, category)
        })
        .collect()
}

/// Full extraction: extrema, grouping and labelling.
pub fn extract_events(series: &ScoreSeries, config: &ExtractConfig) -> Vec<ActionEvent> {
    let extrema = find_extrema(series, config);
    let grouped = group_extrema(&extrema, series);
    label_events(&grouped, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(min_distance: usize) -> ExtractConfig {
        ExtractConfig {
            min_distance,
            ..Default::default()
        }
    }

    fn pairs(events: &[ActionEvent]) -> Vec<(usize, i32)> {
        events.iter().map(|e| (e.position, e.category)).collect()
    }

    #[test]
    fn triangle_wave_without_spacing() {
        let series = ScoreSeries::new(vec![
            0.0, 1.0, 2.0, 1.0, 0.0, -1.0, -2.0, -1.0, 0.0, 1.0, 2.0, 1.0, 0.0,
        ]);
        let events = extract_events(&series, &config(1));
        assert_eq!(pairs(&events), vec![(2, 90), (6, 10), (10, 90)]);
    }

    #[test]
    fn flat_series_has_no_events() {
        let series = ScoreSeries::new(vec![0.0; 64]);
        assert!(extract_events(&series, &ExtractConfig::default()).is_empty());
        assert!(extract_events(&ScoreSeries::default(), &ExtractConfig::default()).is_empty());
    }

    #[test]
    fn endpoints_are_never_extrema() {
        assert!(local_maxima(&[5.0, 1.0, 0.0]).is_empty());
        assert!(local_maxima(&[0.0, 1.0, 5.0]).is_empty());
        assert!(local_maxima(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn plateau_counts_once_at_floor_midpoint() {
        assert_eq!(local_maxima(&[0.0, 3.0, 3.0, 0.0]), vec![1]);
        assert_eq!(local_maxima(&[0.0, 3.0, 3.0, 3.0, 0.0]), vec![2]);
        // A plateau running into the end is not a peak.
        assert!(local_maxima(&[0.0, 3.0, 3.0, 3.0]).is_empty());
        // A shoulder that keeps rising is not a peak.
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 4.0, 0.0]), vec![3]);
    }

    #[test]
    fn negative_maxima_fail_the_height_filter() {
        let x = [-5.0, -1.0, -5.0, 2.0, 0.0];
        assert_eq!(local_maxima(&x), vec![1, 3]);
        assert_eq!(find_peaks(&x, 0.0, 1), vec![3]);
    }

    #[test]
    fn spacing_keeps_the_higher_peak() {
        let x = [0.0, 3.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0, 0.0];
        assert_eq!(find_peaks(&x, 0.0, 3), vec![3, 9]);
        assert_eq!(find_peaks(&x, 0.0, 7), vec![3]);
    }

    #[test]
    fn spacing_ties_favour_the_earlier_peak() {
        let x = [0.0, 2.0, 0.0, 2.0, 0.0, 2.0, 0.0];
        assert_eq!(find_peaks(&x, 0.0, 3), vec![1, 5]);
        assert_eq!(find_peaks(&x, 0.0, 5), vec![1]);
    }

    #[test]
    fn suppressed_peak_does_not_suppress_others() {
        // 4.0 falls to 5.0 first, so it never gets to remove 3.5.
        let x = [0.0, 5.0, 0.0, 4.0, 0.0, 3.5, 0.0];
        assert_eq!(find_peaks(&x, 0.0, 3), vec![1, 5]);
    }

    #[test]
    fn grouping_merges_runs_and_rereads_values() {
        let series = ScoreSeries::new((0..12).map(|i| i as f64 * 0.5).collect());
        let extrema = vec![
            Extremum::new(1, 0.5, ExtremumKind::Peak),
            Extremum::new(4, 2.0, ExtremumKind::Peak),
            Extremum::new(6, 3.0, ExtremumKind::Valley),
            Extremum::new(9, 4.5, ExtremumKind::Peak),
            Extremum::new(11, 5.5, ExtremumKind::Peak),
        ];
        let grouped = group_extrema(&extrema, &series);
        assert_eq!(
            grouped,
            vec![
                Extremum::new(2, 1.0, ExtremumKind::Peak),
                Extremum::new(6, 3.0, ExtremumKind::Valley),
                Extremum::new(10, 5.0, ExtremumKind::Peak),
            ]
        );
    }

    #[test]
    fn grouping_flushes_final_run() {
        let series = ScoreSeries::new(vec![0.0; 10]);
        let extrema = vec![
            Extremum::new(3, 0.0, ExtremumKind::Valley),
            Extremum::new(5, 0.0, ExtremumKind::Valley),
            Extremum::new(8, 0.0, ExtremumKind::Valley),
        ];
        let grouped = group_extrema(&extrema, &series);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].position, 5);
        assert!(group_extrema(&[], &series).is_empty());
    }

    #[test]
    fn grouping_is_a_no_op_on_its_output() {
        let series = ScoreSeries::new(vec![
            0.0, 1.0, 0.0, 1.5, 0.0, -1.0, 0.0, -2.0, 0.0, 3.0, 0.0,
        ]);
        let extrema = find_extrema(&series, &config(1));
        let grouped = group_extrema(&extrema, &series);
        assert_eq!(group_extrema(&grouped, &series), grouped);
        assert!(grouped.windows(2).all(|w| w[0].kind != w[1].kind));
    }

    #[test]
    fn default_spacing_merges_ripple() {
        // Ripple on a hump: peaks at 3 and 5 are too close for the default
        // spacing and only the taller one survives.
        let series = ScoreSeries::new(vec![
            0.0, 0.5, 1.0, 2.0, 1.8, 2.2, 1.0, 0.5, 0.0, -0.5, -1.0, -2.0, -1.0, -0.5, 0.0,
        ]);
        let events = extract_events(&series, &ExtractConfig::default());
        assert_eq!(pairs(&events), vec![(5, 90), (11, 10)]);
    }

    #[test]
    fn custom_categories_are_used() {
        let series = ScoreSeries::new(vec![0.0, 1.0, 0.0, -1.0, 0.0]);
        let config = ExtractConfig {
            min_distance: 1,
            valley_category: 0,
            peak_category: 100,
            ..Default::default()
        };
        assert_eq!(
            pairs(&extract_events(&series, &config)),
            vec![(1, 100), (3, 0)]
        );
    }

    proptest! {
        #[test]
        fn grouped_events_alternate_in_order(
            steps in prop::collection::vec(-6i8..=6, 0..96),
            min_distance in 1usize..12,
        ) {
            let series = ScoreSeries::new(steps.iter().map(|&v| f64::from(v)).collect());
            let config = config(min_distance);

            let grouped = group_extrema(&find_extrema(&series, &config), &series);
            let events = label_events(&grouped, &config);

            for pair in grouped.windows(2) {
                prop_assert!(pair[0].position < pair[1].position);
                prop_assert_ne!(pair[0].kind, pair[1].kind);
            }
            for event in &events {
                prop_assert!(event.position < series.len());
                prop_assert!(event.category == 10 || event.category == 90);
            }
            prop_assert_eq!(group_extrema(&grouped, &series), grouped);
        }
    }
}
