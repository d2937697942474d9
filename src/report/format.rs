//! Plain-text rendering of a [`View`].
//!
//! Output is deterministic (fixed-width bars, fixed decimals) so it can be
//! piped into other tools and asserted on in tests.

use crate::render::{
    BarChartModel, FAILURE_MESSAGE, PAGE_HEADING, PAGE_TITLE, PieChartModel, View,
};

const DOSE1_GLYPH: char = '#';
const DOSE2_GLYPH: char = '=';

/// Format a view as text. `width` is the bar length for the largest count.
pub fn format_view(view: &View, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {PAGE_TITLE} | {PAGE_HEADING} ===\n"));

    match view {
        View::Empty => {}
        View::Loading => out.push_str("Loading...\n"),
        View::Failure => {
            out.push_str(FAILURE_MESSAGE);
            out.push('\n');
        }
        View::Charts(charts) => {
            out.push('\n');
            out.push_str(&format_bar_chart(&charts.coverage, width));
            out.push('\n');
            out.push_str(&format_pie_chart(&charts.gender));
            out.push('\n');
            out.push_str(&format_pie_chart(&charts.age));
        }
    }

    out
}

fn format_bar_chart(chart: &BarChartModel, width: usize) -> String {
    let width = width.max(10);
    let mut out = String::new();
    out.push_str(chart.title);
    out.push('\n');
    out.push_str(&format!(
        "Legend: {DOSE1_GLYPH} {}  {DOSE2_GLYPH} {}\n",
        chart.series[0].name, chart.series[1].name
    ));

    if chart.groups.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = chart.groups.iter().map(|g| g.label.len()).max().unwrap_or(0);
    for group in &chart.groups {
        for (idx, (&value, glyph)) in group
            .values
            .iter()
            .zip([DOSE1_GLYPH, DOSE2_GLYPH])
            .enumerate()
        {
            let label = if idx == 0 { group.label.as_str() } else { "" };
            let filled = bar_len(value, chart.max_value, width);
            let bar: String = std::iter::repeat_n(glyph, filled)
                .chain(std::iter::repeat_n(' ', width - filled))
                .collect();
            out.push_str(&format!("{label:<label_width$} |{bar}| {value}\n"));
        }
    }

    out
}

fn format_pie_chart(chart: &PieChartModel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({:.0}-{:.0} deg)\n",
        chart.title, chart.sweep.start_deg, chart.sweep.end_deg
    ));

    let label_width = chart.slices.iter().map(|s| s.label.len()).max().unwrap_or(0);
    for slice in &chart.slices {
        out.push_str(&format!(
            "  {:<label_width$} {:>8} {:>6.1}% {:>6.1} -> {:>6.1}\n",
            slice.label,
            slice.count,
            slice.share * 100.0,
            slice.start_deg,
            slice.end_deg,
        ));
    }

    out
}

fn bar_len(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let filled = (value as f64 / max as f64 * width as f64).round() as usize;
    filled.min(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ViewState;
    use crate::loader::testing::sample_data;
    use crate::render::render;

    #[test]
    fn text_golden_snapshot_charts() {
        let mut state = ViewState::new();
        state.begin();
        state.commit(sample_data());

        let txt = format_view(&render(&state), 10);
        let expected = concat!(
            "=== Co-WIN | CoWIN Vaccination in India ===\n",
            "\n",
            "Vaccination Coverage\n",
            "Legend: # Dose 1  = Dose 2\n",
            "2021-09-10 |##########| 100\n",
            "           |======    | 60\n",
            "\n",
            "Vaccination by gender (0-180 deg)\n",
            "  Male         40   40.0%    0.0 ->   72.0\n",
            "  Female       45   45.0%   72.0 ->  153.0\n",
            "  Others       15   15.0%  153.0 ->  180.0\n",
            "\n",
            "Vaccination by Age (0-360 deg)\n",
            "  18-44       50   50.0%    0.0 ->  180.0\n",
            "  45-60       30   30.0%  180.0 ->  288.0\n",
            "  60+         20   20.0%  288.0 ->  360.0\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn non_chart_views() {
        let header = "=== Co-WIN | CoWIN Vaccination in India ===\n";
        assert_eq!(format_view(&View::Empty, 20), header);
        assert_eq!(format_view(&View::Loading, 20), format!("{header}Loading...\n"));
        assert_eq!(
            format_view(&View::Failure, 20),
            format!("{header}Something went wrong\n")
        );
    }

    #[test]
    fn bar_len_scales_and_clamps() {
        assert_eq!(bar_len(0, 0, 10), 0);
        assert_eq!(bar_len(50, 100, 10), 5);
        assert_eq!(bar_len(100, 100, 10), 10);
        assert_eq!(bar_len(1, 1000, 10), 0);
    }
}
