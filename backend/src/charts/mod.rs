//! Chart composition and rasterisation.
//!
//! [`Visualizer`] turns analysed snapshot data into [`Figure`] values (SVG
//! documents of a known size), rasterises them to PNG and writes them to
//! disk. Appearance comes from the [`ChartStyle`] passed at construction.

mod scale;
mod style;
mod svg;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use chrono::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{DailySeries, SnapshotFrame};

pub use self::scale::DATE_TICK_FORMAT;
use self::scale::{
    LinearScale, date_ticks, day_start, epoch_seconds, padded_time_domain, value_label,
};
pub use self::style::{ChartStyle, FigureSize};
use self::svg::{Anchor, Marker, Panel, Stroke, SvgCanvas};

/// Days subtracted from every timestamp on the content evolution chart so
/// each point lines up with the day its figures describe.
pub const DISPLAY_DAY_SHIFT: i64 = 1;

/// Fixed y-axis bounds of the average-daily-views bar panel.
pub const AVERAGE_VIEWS_AXIS: (f64, f64) = (2_500.0, 4_500.0);

/// Title of the content evolution chart.
pub const CONTENT_EVOLUTION_TITLE: &str = "article size evolution";
/// Title of the total views panel.
pub const TOTAL_VIEWS_TITLE: &str = "Total views";
/// Title of the average daily views panel.
pub const AVERAGE_VIEWS_TITLE: &str = "Average views per day";

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const PANEL_GAP: f64 = 80.0;
const BAR_WIDTH_DAYS: f64 = 0.8;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Errors raised while rendering or writing charts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// SVG parsing, pixmap allocation or PNG encoding failed.
    #[error("chart rendering failed: {message}")]
    Render { message: String },
    /// Writing an image file failed.
    #[error("chart file operation failed ({path}): {message}")]
    Io { path: PathBuf, message: String },
}

impl ChartError {
    fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    fn io(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}

/// A composed chart that has not been rasterised yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    title: &'static str,
    size: FigureSize,
    svg: String,
}

impl Figure {
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub fn size(&self) -> FigureSize {
        self.size
    }

    /// SVG source of the figure.
    #[must_use]
    pub fn svg(&self) -> &str {
        self.svg.as_str()
    }
}

/// Builds and renders the content evolution and views charts.
#[derive(Clone)]
pub struct Visualizer {
    style: Arc<ChartStyle>,
    fonts: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for Visualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualizer")
            .field("style", &self.style)
            .field("font_faces", &self.fonts.len())
            .finish()
    }
}

impl Visualizer {
    /// Create a visualizer using `style` and the fonts installed on the host.
    #[must_use]
    pub fn new(style: ChartStyle) -> Self {
        let mut fonts = usvg::fontdb::Database::new();
        fonts.load_system_fonts();
        debug!(faces = fonts.len(), "loaded chart fonts");
        Self {
            style: Arc::new(style),
            fonts: Arc::new(fonts),
        }
    }

    #[must_use]
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Character count over time, each point shifted back
    /// [`DISPLAY_DAY_SHIFT`] days.
    #[must_use]
    pub fn plot_content_evolution(&self, frame: &SnapshotFrame) -> Figure {
        let size = self.style.content_figure;
        let mut canvas = SvgCanvas::new(&self.style, size);
        let panel = Panel {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: f64::from(size.width) - MARGIN_LEFT - MARGIN_RIGHT,
            height: f64::from(size.height) - MARGIN_TOP - MARGIN_BOTTOM,
        };
        canvas.panel(panel);
        self.panel_title(&mut canvas, panel, CONTENT_EVOLUTION_TITLE);
        canvas.vertical_text(
            MARGIN_LEFT / 4.0,
            panel.top + panel.height / 2.0,
            self.style.font_size,
            "Character count",
        );

        let shift = Duration::days(DISPLAY_DAY_SHIFT);
        let points: Vec<_> = frame
            .char_count_series()
            .map(|(at, count)| (at - shift, count as f64))
            .collect();
        let (Some(first), Some(last)) = (
            points.iter().map(|(at, _)| *at).min(),
            points.iter().map(|(at, _)| *at).max(),
        ) else {
            self.no_data(&mut canvas, panel);
            return self.figure(CONTENT_EVOLUTION_TITLE, size, canvas);
        };

        let x = LinearScale::new(padded_time_domain(first, last), panel.x_range());
        let Some(y) = LinearScale::padded(points.iter().map(|(_, v)| *v), panel.y_range()) else {
            self.no_data(&mut canvas, panel);
            return self.figure(CONTENT_EVOLUTION_TITLE, size, canvas);
        };
        self.date_axis(&mut canvas, panel, &x, first, last);
        self.value_axis(&mut canvas, panel, &y);

        let pixels: Vec<(f64, f64)> = points
            .iter()
            .map(|(at, value)| (x.map(epoch_seconds(*at)), y.map(*value)))
            .collect();
        canvas.series(&pixels, &self.style.content_line, Stroke::Solid, Marker::Circle);
        self.figure(CONTENT_EVOLUTION_TITLE, size, canvas)
    }

    /// Two stacked panels: total views per day as a dashed line and average
    /// daily views as bars on a fixed axis. Gap days break the line and leave
    /// no bar.
    #[must_use]
    pub fn plot_views(&self, daily: &DailySeries) -> Figure {
        let size = self.style.views_figure;
        let mut canvas = SvgCanvas::new(&self.style, size);
        let panel_height =
            (f64::from(size.height) - MARGIN_TOP - MARGIN_BOTTOM - PANEL_GAP) / 2.0;
        let width = f64::from(size.width) - MARGIN_LEFT - MARGIN_RIGHT;
        let upper = Panel {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width,
            height: panel_height,
        };
        let lower = Panel {
            left: MARGIN_LEFT,
            top: upper.bottom() + PANEL_GAP,
            width,
            height: panel_height,
        };
        for (panel, title) in [(upper, TOTAL_VIEWS_TITLE), (lower, AVERAGE_VIEWS_TITLE)] {
            canvas.panel(panel);
            self.panel_title(&mut canvas, panel, title);
        }

        let Some((first_day, last_day)) = daily.span() else {
            self.no_data(&mut canvas, upper);
            self.no_data(&mut canvas, lower);
            return self.figure(TOTAL_VIEWS_TITLE, size, canvas);
        };
        let first = first_day.and_time(chrono::NaiveTime::MIN);
        let last = last_day.and_time(chrono::NaiveTime::MIN);

        let upper_x = LinearScale::new(padded_time_domain(first, last), upper.x_range());
        self.date_axis(&mut canvas, upper, &upper_x, first, last);
        let totals = daily
            .days()
            .iter()
            .filter_map(|day| day.total_views.map(|views| views as f64));
        if let Some(upper_y) = LinearScale::padded(totals, upper.y_range()) {
            self.value_axis(&mut canvas, upper, &upper_y);
            let mut segment: Vec<(f64, f64)> = Vec::new();
            for day in daily.days() {
                if let Some(views) = day.total_views {
                    segment.push((upper_x.map(day_start(day.day)), upper_y.map(views as f64)));
                } else if !segment.is_empty() {
                    canvas.series(&segment, &self.style.views_line, Stroke::Dashed, Marker::Square);
                    segment.clear();
                }
            }
            canvas.series(&segment, &self.style.views_line, Stroke::Dashed, Marker::Square);
        }

        let lower_x = LinearScale::new(padded_time_domain(first, last), lower.x_range());
        let lower_y = LinearScale::new(AVERAGE_VIEWS_AXIS, lower.y_range());
        self.date_axis(&mut canvas, lower, &lower_x, first, last);
        self.value_axis(&mut canvas, lower, &lower_y);
        let bars: Vec<(f64, f64)> = daily
            .days()
            .iter()
            .filter_map(|day| {
                day.average_daily_views
                    .map(|mean| (lower_x.map(day_start(day.day)), lower_y.map(mean)))
            })
            .collect();
        let bar_width = lower_x.extent(BAR_WIDTH_DAYS * SECONDS_PER_DAY);
        canvas.bars(lower, &bars, bar_width, &self.style.views_bars);

        self.figure(TOTAL_VIEWS_TITLE, size, canvas)
    }

    /// Rasterise `figure` to an in-memory PNG.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Render`] when the SVG cannot be parsed, the
    /// pixmap cannot be allocated or PNG encoding fails.
    pub fn render_png(&self, figure: &Figure) -> Result<Vec<u8>, ChartError> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fonts);
        let tree = usvg::Tree::from_str(figure.svg(), &options)
            .map_err(|err| ChartError::render(format!("invalid svg: {err}")))?;
        let FigureSize { width, height } = figure.size();
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| ChartError::render(format!("cannot allocate {width}x{height} pixmap")))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        pixmap
            .encode_png()
            .map_err(|err| ChartError::render(format!("png encoding failed: {err}")))
    }

    /// Write each figure to `{prefix}_{n}.png`, numbering from 1.
    ///
    /// Each image is staged under a temporary name in the target directory
    /// and renamed into place, so a failure never leaves a partial file. The
    /// first failure aborts the remaining writes.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Render`] for rasterisation failures and
    /// [`ChartError::Io`] for filesystem failures.
    pub fn save_plots(
        &self,
        figures: Vec<Figure>,
        prefix: &Path,
    ) -> Result<Vec<PathBuf>, ChartError> {
        let (directory_path, stem) = split_prefix(prefix)?;
        Dir::create_ambient_dir_all(&directory_path, ambient_authority())
            .map_err(|err| ChartError::io(&directory_path, err))?;
        let directory = Dir::open_ambient_dir(&directory_path, ambient_authority())
            .map_err(|err| ChartError::io(&directory_path, err))?;

        let mut written = Vec::with_capacity(figures.len());
        for (index, figure) in figures.into_iter().enumerate() {
            let file_name = format!("{stem}_{}.png", index + 1);
            let png = self.render_png(&figure)?;
            drop(figure);
            write_atomically(&directory, &directory_path, &file_name, &png)?;
            let path = directory_path.join(&file_name);
            info!(path = %path.display(), bytes = png.len(), "wrote chart");
            written.push(path);
        }
        Ok(written)
    }

    fn figure(&self, title: &'static str, size: FigureSize, canvas: SvgCanvas<'_>) -> Figure {
        Figure {
            title,
            size,
            svg: canvas.finish(),
        }
    }

    fn panel_title(&self, canvas: &mut SvgCanvas<'_>, panel: Panel, title: &str) {
        canvas.text(
            panel.left + panel.width / 2.0,
            panel.top - 14.0,
            self.style.title_size,
            Anchor::Middle,
            title,
        );
    }

    fn no_data(&self, canvas: &mut SvgCanvas<'_>, panel: Panel) {
        canvas.text(
            panel.left + panel.width / 2.0,
            panel.top + panel.height / 2.0,
            self.style.font_size,
            Anchor::Middle,
            "No data",
        );
    }

    fn date_axis(
        &self,
        canvas: &mut SvgCanvas<'_>,
        panel: Panel,
        x: &LinearScale,
        first: chrono::NaiveDateTime,
        last: chrono::NaiveDateTime,
    ) {
        for day in date_ticks(first, last) {
            let position = x.map(day_start(day));
            if position < panel.left || position > panel.right() {
                continue;
            }
            canvas.vertical_grid(panel, position);
            canvas.text(
                position,
                panel.bottom() + 20.0,
                self.style.font_size,
                Anchor::Middle,
                &day.format(DATE_TICK_FORMAT).to_string(),
            );
        }
    }

    fn value_axis(&self, canvas: &mut SvgCanvas<'_>, panel: Panel, y: &LinearScale) {
        for tick in y.value_ticks() {
            let position = y.map(tick);
            canvas.horizontal_grid(panel, position);
            canvas.text(
                panel.left - 8.0,
                position + 4.0,
                self.style.font_size,
                Anchor::End,
                &value_label(tick),
            );
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(ChartStyle::default())
    }
}

fn split_prefix(prefix: &Path) -> Result<(PathBuf, String), ChartError> {
    let stem = prefix
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ChartError::io(prefix, "output prefix has no file name"))?;
    let directory = match prefix.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, stem.to_owned()))
}

fn write_atomically(
    directory: &Dir,
    directory_path: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<(), ChartError> {
    let staged = format!(".{file_name}.tmp-{}", Uuid::new_v4().simple());
    let result = directory
        .write(&staged, bytes)
        .map_err(|err| ChartError::io(directory_path.join(&staged), err))
        .and_then(|()| {
            directory
                .rename(&staged, directory, file_name)
                .map_err(|err| ChartError::io(directory_path.join(file_name), err))
        });
    if result.is_err() {
        match directory.remove_file(&staged) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => debug!(error = %err, file = %staged, "failed to remove staged chart"),
        }
    }
    result
}
