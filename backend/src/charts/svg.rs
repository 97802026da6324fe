//! Minimal SVG document builder used to compose figures.

use super::style::{ChartStyle, FigureSize};

/// Plot area in figure pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Panel {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal pixel range, left to right.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.left, self.right())
    }

    /// Vertical pixel range, bottom to top, so larger values sit higher.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        (self.bottom(), self.top)
    }
}

/// Marker glyph drawn at each data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

/// Line stroke pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    Dashed,
}

/// Text anchoring for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Middle,
    End,
}

impl Anchor {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Accumulates SVG elements for one figure.
#[derive(Debug)]
pub struct SvgCanvas<'a> {
    style: &'a ChartStyle,
    size: FigureSize,
    body: String,
    clip_ids: usize,
}

impl<'a> SvgCanvas<'a> {
    /// Start a canvas filled with the style's background.
    #[must_use]
    pub fn new(style: &'a ChartStyle, size: FigureSize) -> Self {
        let mut canvas = Self {
            style,
            size,
            body: String::new(),
            clip_ids: 0,
        };
        canvas.body.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            size.width,
            size.height,
            escape(&style.background)
        ));
        canvas
    }

    /// Fill the panel background.
    pub fn panel(&mut self, panel: Panel) {
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            panel.left,
            panel.top,
            panel.width,
            panel.height,
            escape(&self.style.panel_background)
        ));
    }

    /// Vertical grid line at `x` spanning the panel.
    pub fn vertical_grid(&mut self, panel: Panel, x: f64) {
        self.grid_line(x, panel.top, x, panel.bottom());
    }

    /// Horizontal grid line at `y` spanning the panel.
    pub fn horizontal_grid(&mut self, panel: Panel, y: f64) {
        self.grid_line(panel.left, y, panel.right(), y);
    }

    fn grid_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.body.push_str(&format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="1"/>"#,
            escape(&self.style.grid)
        ));
    }

    /// Text label using the style's font.
    pub fn text(&mut self, x: f64, y: f64, size: f32, anchor: Anchor, content: &str) {
        self.body.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{size}" fill="{}" text-anchor="{}">{}</text>"#,
            escape(&self.style.font_family),
            escape(&self.style.text),
            anchor.as_str(),
            escape(content)
        ));
    }

    /// Label rotated a quarter turn counter-clockwise around its anchor.
    pub fn vertical_text(&mut self, x: f64, y: f64, size: f32, content: &str) {
        self.body.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" transform="rotate(-90 {x:.2} {y:.2})" font-family="{}" font-size="{size}" fill="{}" text-anchor="middle">{}</text>"#,
            escape(&self.style.font_family),
            escape(&self.style.text),
            escape(content)
        ));
    }

    /// Connected line through `points`, with markers at every point.
    pub fn series(&mut self, points: &[(f64, f64)], colour: &str, stroke: Stroke, marker: Marker) {
        if points.len() > 1 {
            let coords: Vec<String> = points
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect();
            let dash = match stroke {
                Stroke::Solid => "",
                Stroke::Dashed => r#" stroke-dasharray="8 5""#,
            };
            self.body.push_str(&format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"{dash}/>"#,
                coords.join(" "),
                escape(colour)
            ));
        }
        for (x, y) in points {
            self.marker(*x, *y, colour, marker);
        }
    }

    fn marker(&mut self, x: f64, y: f64, colour: &str, marker: Marker) {
        let fill = escape(colour);
        let element = match marker {
            Marker::Circle => format!(r#"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="{fill}"/>"#),
            Marker::Square => format!(
                r#"<rect x="{:.2}" y="{:.2}" width="8" height="8" fill="{fill}"/>"#,
                x - 4.0,
                y - 4.0
            ),
        };
        self.body.push_str(&element);
    }

    /// Vertical bars clipped to the panel; each bar is `(centre_x, top_y)`
    /// and rises from the panel bottom.
    pub fn bars(&mut self, panel: Panel, bars: &[(f64, f64)], width: f64, colour: &str) {
        self.clip_ids += 1;
        let clip_id = format!("panel-clip-{}", self.clip_ids);
        self.body.push_str(&format!(
            r#"<clipPath id="{clip_id}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath><g clip-path="url(#{clip_id})">"#,
            panel.left, panel.top, panel.width, panel.height
        ));
        for (centre, top) in bars {
            let clamped_top = top.clamp(panel.top - 1.0, panel.bottom());
            self.body.push_str(&format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{width:.2}" height="{:.2}" fill="{}"/>"#,
                centre - width / 2.0,
                clamped_top,
                panel.bottom() - clamped_top,
                escape(colour)
            ));
        }
        self.body.push_str("</g>");
    }

    /// Close the document.
    #[must_use]
    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{}</svg>"#,
            self.body,
            w = self.size.width,
            h = self.size.height
        )
    }
}

/// Escape text for inclusion in SVG content or attribute values.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn escapes_markup_characters() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[rstest]
    fn series_with_one_point_draws_only_a_marker() {
        let style = ChartStyle::default();
        let mut canvas = SvgCanvas::new(&style, FigureSize::new(10, 10));
        canvas.series(&[(1.0, 2.0)], "#000", Stroke::Solid, Marker::Circle);
        let svg = canvas.finish();
        assert!(!svg.contains("<polyline"));
        assert!(svg.contains("<circle"));
    }

    #[rstest]
    fn bars_are_clipped_to_their_panel() {
        let style = ChartStyle::default();
        let panel = Panel {
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let mut canvas = SvgCanvas::new(&style, FigureSize::new(10, 10));
        canvas.bars(panel, &[(5.0, -50.0)], 2.0, "#FFA500");
        let svg = canvas.finish();
        assert!(svg.contains(r#"clip-path="url(#panel-clip-1)""#));
        assert!(svg.contains(r#"y="-1.00""#));
    }
}
