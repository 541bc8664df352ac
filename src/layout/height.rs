// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Section height models for equal-height balancing.

use crate::render::render_line;
use crate::song::SongSection;
use crate::template::{SectionBreakBehavior, Template};

/// Estimates how tall a section renders in a column.
///
/// Implementations must be pure: the same section, template and width
/// always give the same height.
pub trait HeightEstimator {
    /// Estimated height in pixels of `section` in a column `column_width` wide
    fn section_height(&self, section: &SongSection, template: &Template, column_width: f32) -> f32;
}

/// Default height model built from the template's font metrics.
///
/// A section's height is the sum of:
/// - one body line of space when `section_break_behavior` is `SpaceBefore`
/// - `heading_font_size * line_spacing` when the section has a label
/// - each line's rendered height, multiplied by the number of rows the
///   line wraps to when it is wider than the column
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMetricsEstimator;

impl FontMetricsEstimator {
    fn wrap_rows(content_width: f32, column_width: f32) -> f32 {
        if column_width <= 0.0 || content_width <= column_width {
            1.0
        } else {
            (content_width / column_width).ceil()
        }
    }
}

impl HeightEstimator for FontMetricsEstimator {
    fn section_height(&self, section: &SongSection, template: &Template, column_width: f32) -> f32 {
        let spacing = match template.section_break_behavior {
            SectionBreakBehavior::SpaceBefore => template.body_font_size * template.line_spacing,
            SectionBreakBehavior::Compact => 0.0,
        };
        let heading = if section.has_heading() {
            template.heading_font_size * template.line_spacing
        } else {
            0.0
        };
        let lines: f32 = section
            .lines
            .iter()
            .map(|line| {
                let rendered = render_line(line, template);
                rendered.height() * Self::wrap_rows(rendered.intrinsic_width(), column_width)
            })
            .sum();

        spacing + heading + lines
    }
}

/// Counts lines only; handy for tests and for callers without font metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCountEstimator;

impl HeightEstimator for LineCountEstimator {
    fn section_height(&self, section: &SongSection, _template: &Template, _column_width: f32) -> f32 {
        section.lines.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{Segment, SongLine};

    fn template() -> Template {
        Template {
            heading_font_size: 20.0,
            body_font_size: 10.0,
            chord_font_size: 10.0,
            line_spacing: 1.0,
            ..Template::default()
        }
    }

    #[test]
    fn test_font_metrics_height() {
        let section = SongSection::new(
            "Chorus",
            vec![
                SongLine::with_chords("Glory", vec![Segment::new(0, "G", "Glory")]),
                SongLine::lyrics("hallelujah"),
                SongLine::directive("new_page"),
            ],
        );
        // space before 10 + heading 20 + (10 chord + 10 lyric) + 10 lyric + 0
        let height = FontMetricsEstimator.section_height(&section, &template(), 1000.0);
        assert_eq!(height, 60.0);
    }

    #[test]
    fn test_compact_unlabelled_section() {
        let t = Template {
            section_break_behavior: SectionBreakBehavior::Compact,
            ..template()
        };
        let section = SongSection::new("", vec![SongLine::lyrics("a"), SongLine::blank()]);
        assert_eq!(FontMetricsEstimator.section_height(&section, &t, 1000.0), 20.0);
    }

    #[test]
    fn test_wrapping_adds_rows() {
        let t = Template {
            section_break_behavior: SectionBreakBehavior::Compact,
            ..template()
        };
        // 20 chars at 6px = 120px in a 50px column wraps to 3 rows
        let section = SongSection::new("", vec![SongLine::lyrics("x".repeat(20))]);
        assert_eq!(FontMetricsEstimator.section_height(&section, &t, 50.0), 30.0);
        // zero-width columns never divide by zero
        assert_eq!(FontMetricsEstimator.section_height(&section, &t, 0.0), 10.0);
    }

    #[test]
    fn test_line_count_estimator() {
        let section = SongSection::new("V", vec![SongLine::lyrics("a"), SongLine::lyrics("b")]);
        assert_eq!(LineCountEstimator.section_height(&section, &template(), 1.0), 2.0);
    }
}
