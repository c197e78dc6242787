use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::model::{PlotGroup, PlotSeries};

const PALETTE: [Color; 8] = [
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
    Color::LightGreen,
    Color::LightCyan,
];

fn palette_color(idx: usize) -> Color {
    PALETTE[idx % PALETTE.len()]
}

/// Stack every plot group vertically across the frame.
pub fn draw(area: Rect, f: &mut Frame, groups: &[PlotGroup]) {
    if groups.is_empty() {
        let empty = Paragraph::new("Nothing to plot.")
            .block(Block::default().borders(Borders::ALL).title("caseplot"));
        f.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = groups
        .iter()
        .map(|_| Constraint::Ratio(1, groups.len() as u32))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (group, row) in groups.iter().zip(rows.iter()) {
        draw_group(f, *row, group);
    }
}

fn draw_group(f: &mut Frame, area: Rect, group: &PlotGroup) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(group.title.clone()));

    if group.series.iter().all(|s| s.points.is_empty()) {
        let empty = Paragraph::new("No data for any case.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let ((x_min, x_max), (y_min, y_max)) = bounds(&group.series);
    let datasets = group.series.iter().map(dataset).collect::<Vec<_>>();

    let x_axis = Axis::default()
        .title("days")
        .bounds([x_min, x_max])
        .labels(axis_labels(x_min, x_max));
    let y_axis = Axis::default()
        .bounds([y_min, y_max])
        .labels(axis_labels(y_min, y_max));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);
    f.render_widget(chart, area);
}

fn dataset(series: &PlotSeries) -> Dataset<'_> {
    let mut ds = Dataset::default()
        .marker(if series.style.markers_only {
            symbols::Marker::Dot
        } else {
            symbols::Marker::Braille
        })
        .graph_type(if series.style.markers_only {
            GraphType::Scatter
        } else {
            GraphType::Line
        })
        .style(Style::default().fg(palette_color(series.style.color)))
        .data(&series.points);
    if let Some(label) = &series.label {
        ds = ds.name(label.clone());
    }
    ds
}

fn axis_labels(min: f64, max: f64) -> Vec<Line<'static>> {
    let mid = (min + max) / 2.0;
    [min, mid, max]
        .iter()
        .map(|v| Line::from(format!("{v:.1}")))
        .collect()
}

/// Data extents across all series, with a little vertical headroom so curves
/// do not sit on the frame border.
fn bounds(series: &[PlotSeries]) -> ((f64, f64), (f64, f64)) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for &(px, py) in &s.points {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
    }
    if !x.0.is_finite() {
        return ((0.0, 1.0), (0.0, 1.0));
    }
    let pad = ((y.1 - y.0).abs()).max(1e-9) * 0.05;
    ((x.0, x.1.max(x.0 + 1e-9)), (y.0 - pad, y.1 + pad))
}
