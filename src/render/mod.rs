//! Status-driven rendering contract.
//!
//! [`render`] is a pure function from the dashboard's [`ViewState`] to a
//! [`View`]. Front-ends (TUI widgets, text report) only ever draw a `View`,
//! never the raw state, so the status → view mapping lives in one place.

use crate::domain::{Gender, LoadStatus, ViewState};

pub const PAGE_TITLE: &str = "Co-WIN";
pub const PAGE_HEADING: &str = "CoWIN Vaccination in India";
pub const FAILURE_MESSAGE: &str = "Something went wrong";

pub const COVERAGE_TITLE: &str = "Vaccination Coverage";
pub const GENDER_TITLE: &str = "Vaccination by gender";
pub const AGE_TITLE: &str = "Vaccination by Age";

pub const DOSE1_COLOR: Rgb = Rgb(0x5a, 0x8d, 0xee);
pub const DOSE2_COLOR: Rgb = Rgb(0xf5, 0x43, 0x94);

const AGE_COLORS: [Rgb; 3] = [
    Rgb(0x2d, 0x87, 0xbb),
    Rgb(0xa3, 0xdf, 0x9f),
    Rgb(0x64, 0xc2, 0xa6),
];

/// Angular range a pie is drawn over, in degrees.
pub const HALF_CIRCLE: Sweep = Sweep { start_deg: 0.0, end_deg: 180.0 };
pub const FULL_CIRCLE: Sweep = Sweep { start_deg: 0.0, end_deg: 360.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub fn gender_color(gender: Gender) -> Rgb {
    match gender {
        Gender::Male => Rgb(0xf5, 0x43, 0x94),
        Gender::Female => Rgb(0x5a, 0x8d, 0xee),
        Gender::Other => Rgb(0x2c, 0xc6, 0xc6),
    }
}

/// One of four mutually exclusive screens.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Nothing to show (load not started).
    Empty,
    Loading,
    Failure,
    Charts(ChartSet),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub coverage: BarChartModel,
    pub gender: PieChartModel,
    pub age: PieChartModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: &'static str,
    pub color: Rgb,
}

/// One x-axis position: a date with one value per series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarGroup {
    pub label: String,
    pub values: [u64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartModel {
    pub title: &'static str,
    pub series: [BarSeries; 2],
    pub groups: Vec<BarGroup>,
    pub max_value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl Sweep {
    pub fn span(self) -> f64 {
        self.end_deg - self.start_deg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    pub color: Rgb,
    /// Fraction of the pie's total, `0.0..=1.0`.
    pub share: f64,
    pub start_deg: f64,
    pub end_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartModel {
    pub title: &'static str,
    pub sweep: Sweep,
    pub total: u64,
    pub slices: Vec<PieSlice>,
}

/// Map the current state to the view that should be on screen.
pub fn render(state: &ViewState) -> View {
    match state.status() {
        LoadStatus::Initial => View::Empty,
        LoadStatus::InProgress => View::Loading,
        LoadStatus::Failure => View::Failure,
        LoadStatus::Success => View::Charts(ChartSet {
            coverage: coverage_chart(state),
            gender: gender_chart(state),
            age: age_chart(state),
        }),
    }
}

fn coverage_chart(state: &ViewState) -> BarChartModel {
    let groups: Vec<BarGroup> = state
        .daily_doses()
        .iter()
        .map(|d| BarGroup {
            label: d.date.clone(),
            values: [d.dose1_count, d.dose2_count],
        })
        .collect();
    let max_value = groups
        .iter()
        .flat_map(|g| g.values)
        .max()
        .unwrap_or(0);

    BarChartModel {
        title: COVERAGE_TITLE,
        series: [
            BarSeries { name: "Dose 1", color: DOSE1_COLOR },
            BarSeries { name: "Dose 2", color: DOSE2_COLOR },
        ],
        groups,
        max_value,
    }
}

fn gender_chart(state: &ViewState) -> PieChartModel {
    // Slices follow the fixed label order; counts are looked up by key.
    let entries = Gender::ALL.iter().map(|&gender| {
        let count = state
            .gender_counts()
            .iter()
            .find(|g| g.gender == gender)
            .map(|g| g.count)
            .unwrap_or(0);
        (gender.display_name().to_string(), count, gender_color(gender))
    });
    pie_chart(GENDER_TITLE, HALF_CIRCLE, entries)
}

fn age_chart(state: &ViewState) -> PieChartModel {
    let entries = state
        .age_buckets()
        .iter()
        .zip(AGE_COLORS.iter().cycle())
        .map(|(bucket, &color)| (bucket.age_range.clone(), bucket.count, color));
    pie_chart(AGE_TITLE, FULL_CIRCLE, entries)
}

/// Lay slices out proportionally over `sweep`.
///
/// Angles are derived from cumulative counts, so the last slice ends exactly
/// on `sweep.end_deg`. A zero total yields zero-width slices.
pub fn pie_chart(
    title: &'static str,
    sweep: Sweep,
    entries: impl IntoIterator<Item = (String, u64, Rgb)>,
) -> PieChartModel {
    let entries: Vec<(String, u64, Rgb)> = entries.into_iter().collect();
    let total: u128 = entries.iter().map(|(_, count, _)| u128::from(*count)).sum();

    let angle_at = |cumulative: u128| {
        if total == 0 {
            sweep.start_deg
        } else {
            sweep.start_deg + sweep.span() * (cumulative as f64 / total as f64)
        }
    };

    let mut cumulative = 0u128;
    let mut slices = Vec::with_capacity(entries.len());
    for (label, count, color) in entries {
        let start_deg = angle_at(cumulative);
        cumulative += u128::from(count);
        let end_deg = angle_at(cumulative);
        let share = if total == 0 { 0.0 } else { count as f64 / total as f64 };
        slices.push(PieSlice {
            label,
            count,
            color,
            share,
            start_deg,
            end_deg,
        });
    }

    PieChartModel {
        title,
        sweep,
        total: u64::try_from(total).unwrap_or(u64::MAX),
        slices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgeBucketCount, GenderCount, VaccinationData};
    use crate::loader::testing::sample_data;

    fn success_state(data: VaccinationData) -> ViewState {
        let mut state = ViewState::new();
        state.begin();
        state.commit(data);
        state
    }

    #[test]
    fn each_status_maps_to_one_view() {
        let mut state = ViewState::new();
        assert_eq!(render(&state), View::Empty);
        state.begin();
        assert_eq!(render(&state), View::Loading);
        state.fail();
        assert_eq!(render(&state), View::Failure);
    }

    #[test]
    fn failure_ignores_retained_data() {
        let mut state = success_state(sample_data());
        state.fail();
        assert_eq!(render(&state), View::Failure);
    }

    #[test]
    fn success_builds_three_charts() {
        let View::Charts(charts) = render(&success_state(sample_data())) else {
            panic!("expected charts");
        };

        assert_eq!(charts.coverage.title, COVERAGE_TITLE);
        assert_eq!(
            charts.coverage.groups,
            vec![BarGroup {
                label: "2021-09-10".to_string(),
                values: [100, 60],
            }]
        );
        assert_eq!(charts.coverage.max_value, 100);
        assert_eq!(charts.coverage.series[0].color.hex(), "#5a8dee");
        assert_eq!(charts.coverage.series[1].color.hex(), "#f54394");

        assert_eq!(charts.gender.sweep, HALF_CIRCLE);
        assert_eq!(charts.gender.total, 100);
        let labels: Vec<&str> = charts.gender.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Male", "Female", "Others"]);

        assert_eq!(charts.age.sweep, FULL_CIRCLE);
        let labels: Vec<&str> = charts.age.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["18-44", "45-60", "60+"]);
        assert_eq!(charts.age.slices[0].color.hex(), "#2d87bb");
    }

    #[test]
    fn gender_slices_follow_keys_not_input_order() {
        let data = VaccinationData::new(
            Vec::new(),
            (0..3)
                .map(|i| AgeBucketCount { age_range: format!("{i}"), count: 1 })
                .collect(),
            vec![
                GenderCount { gender: Gender::Other, count: 3 },
                GenderCount { gender: Gender::Female, count: 2 },
                GenderCount { gender: Gender::Male, count: 1 },
            ],
        )
        .unwrap();

        let View::Charts(charts) = render(&success_state(data)) else {
            panic!("expected charts");
        };
        let slices: Vec<(&str, u64)> = charts
            .gender
            .slices
            .iter()
            .map(|s| (s.label.as_str(), s.count))
            .collect();
        assert_eq!(slices, vec![("Male", 1), ("Female", 2), ("Others", 3)]);
        assert_eq!(charts.gender.slices[0].color.hex(), "#f54394");
    }

    #[test]
    fn pie_slices_tile_the_sweep() {
        let pie = pie_chart(
            AGE_TITLE,
            FULL_CIRCLE,
            vec![
                ("a".to_string(), 50, AGE_COLORS[0]),
                ("b".to_string(), 30, AGE_COLORS[1]),
                ("c".to_string(), 20, AGE_COLORS[2]),
            ],
        );

        assert_eq!(pie.slices[0].start_deg, 0.0);
        assert!((pie.slices[0].end_deg - 180.0).abs() < 1e-9);
        for pair in pie.slices.windows(2) {
            assert_eq!(pair[0].end_deg, pair[1].start_deg);
        }
        assert_eq!(pie.slices[2].end_deg, 360.0);
        assert!((pie.slices[1].share - 0.3).abs() < 1e-12);
    }

    #[test]
    fn zero_total_pie_has_empty_slices() {
        let pie = pie_chart(
            GENDER_TITLE,
            HALF_CIRCLE,
            Gender::ALL
                .iter()
                .map(|&g| (g.display_name().to_string(), 0, gender_color(g))),
        );
        assert_eq!(pie.total, 0);
        assert!(pie.slices.iter().all(|s| s.share == 0.0 && s.start_deg == s.end_deg));
    }

    #[test]
    fn huge_counts_still_tile_the_sweep() {
        let entries = [u64::MAX, 1, 0]
            .into_iter()
            .zip(Gender::ALL)
            .map(|(count, g)| (g.display_name().to_string(), count, gender_color(g)));
        let pie = pie_chart(GENDER_TITLE, HALF_CIRCLE, entries);

        assert_eq!(pie.total, u64::MAX);
        assert_eq!(pie.slices[0].start_deg, 0.0);
        assert_eq!(pie.slices[2].end_deg, 180.0);
    }
}
