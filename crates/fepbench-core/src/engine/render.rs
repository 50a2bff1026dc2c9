use super::error::RenderError;
use super::report::PreparedReport;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

/// Draws prepared reports to their output files.
pub trait ReportRenderer {
    fn render(&mut self, report: &PreparedReport) -> Result<(), RenderError>;
}

const SHADE_INNER: f64 = 0.5;
const SHADE_OUTER: f64 = 1.0;
const POINT_RADIUS: i32 = 4;
const ERROR_CAP_PX: u32 = 4;

/// Renders reports with `plotters`: SVG for `.svg` paths, a bitmap otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for PlottersRenderer {
    fn render(&mut self, report: &PreparedReport) -> Result<(), RenderError> {
        let path = report.output.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::OutputDirectory {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let size = (report.size_px, report.size_px);
        let result = if is_vector_output(path) {
            draw_report(SVGBackend::new(path, size).into_drawing_area(), report)
        } else {
            draw_report(BitMapBackend::new(path, size).into_drawing_area(), report)
        };
        result.map_err(|message| RenderError::Drawing {
            path: path.to_path_buf(),
            message,
        })?;

        debug!("Wrote report '{}' to {}.", report.kind.key(), path.display());
        Ok(())
    }
}

/// Axis range covering the configured limits and every point with its error bar.
pub fn axis_range(report: &PreparedReport) -> (f64, f64) {
    let series = &report.series;
    let values = series
        .x
        .iter()
        .zip(&series.xerr)
        .chain(series.y.iter().zip(&series.yerr))
        .flat_map(|(v, e)| [v - e.abs(), v + e.abs()])
        .filter(|v| v.is_finite());

    let (mut low, mut high) = report.limits;
    for v in values {
        low = low.min(v);
        high = high.max(v);
    }
    (low.floor(), high.ceil())
}

fn band(low: f64, high: f64, offset: f64) -> Vec<(f64, f64)> {
    vec![
        (low, low - offset),
        (high, high - offset),
        (high, high + offset),
        (low, low + offset),
    ]
}

fn draw_report<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    report: &PreparedReport,
) -> Result<(), String> {
    draw_chart(&root, report).map_err(|e| e.to_string())?;
    root.present().map_err(|e| e.to_string())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    report: &PreparedReport,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let (low, high) = axis_range(report);

    let mut chart = ChartBuilder::on(root)
        .caption(&report.title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(low..high, low..high)?;

    chart
        .configure_mesh()
        .x_desc(report.x_label.as_str())
        .y_desc(report.y_label.as_str())
        .light_line_style(RGBColor(230, 230, 230))
        .axis_desc_style(("sans-serif", 14))
        .label_style(("sans-serif", 12))
        .draw()?;

    chart.draw_series([
        Polygon::new(band(low, high, SHADE_OUTER), BLACK.mix(0.08).filled()),
        Polygon::new(band(low, high, SHADE_INNER), BLACK.mix(0.12).filled()),
    ])?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(low, low), (high, high)],
        BLACK.stroke_width(1),
    )))?;

    let series = &report.series;
    let points = || series.x.iter().copied().zip(series.y.iter().copied());
    let error_style = RGBColor(90, 90, 90).stroke_width(1);
    chart.draw_series(points().zip(&series.yerr).map(|((x, y), e)| {
        ErrorBar::new_vertical(x, y - e, y, y + e, error_style, ERROR_CAP_PX)
    }))?;
    chart.draw_series(points().zip(&series.xerr).map(|((x, y), e)| {
        ErrorBar::new_horizontal(y, x - e, x, x + e, error_style, ERROR_CAP_PX)
    }))?;
    chart.draw_series(
        points().map(|(x, y)| Circle::new((x, y), POINT_RADIUS, BLUE.mix(0.8).filled())),
    )?;

    let text_style = ("sans-serif", 13).into_font().color(&BLACK);
    let step = (high - low) / 18.0;
    for (i, summary) in report.statistics.iter().enumerate() {
        chart.draw_series(std::iter::once(Text::new(
            summary.annotation(report.confidence),
            (low + step * 0.5, high - step * (i as f64 + 1.0)),
            text_style.clone(),
        )))?;
    }
    Ok(())
}

/// Whether `path` will be written with the vector backend.
pub fn is_vector_output(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
