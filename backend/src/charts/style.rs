//! Chart appearance passed explicitly to the visualizer.

/// Width and height of a figure in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl FigureSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Palette, typography and figure geometry for every chart.
///
/// The default mimics the familiar ggplot look: grey panels, white grid lines
/// and dark-grey text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Figure background.
    pub background: String,
    /// Plot area background.
    pub panel_background: String,
    /// Grid line colour.
    pub grid: String,
    /// Axis label and tick colour.
    pub text: String,
    /// Font family list used for every label.
    pub font_family: String,
    /// Tick and axis label size.
    pub font_size: f32,
    /// Panel title size.
    pub title_size: f32,
    /// Content-size line and markers.
    pub content_line: String,
    /// Total-views line and markers.
    pub views_line: String,
    /// Average-daily-views bars.
    pub views_bars: String,
    /// Size of the content evolution figure.
    pub content_figure: FigureSize,
    /// Size of the two-panel views figure.
    pub views_figure: FigureSize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_owned(),
            panel_background: "#E5E5E5".to_owned(),
            grid: "#FFFFFF".to_owned(),
            text: "#555555".to_owned(),
            font_family: "DejaVu Sans, Liberation Sans, Arial, sans-serif".to_owned(),
            font_size: 13.0,
            title_size: 17.0,
            content_line: "#0000FF".to_owned(),
            views_line: "#008000".to_owned(),
            views_bars: "#FFA500".to_owned(),
            content_figure: FigureSize::new(1200, 600),
            views_figure: FigureSize::new(1200, 800),
        }
    }
}
