// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Column distribution.
//!
//! Packs a song's sections into `template.column_count` columns. A section
//! is never split: its heading and lines always land in the same column.
//! Distribution is a pure function of its inputs; `LayoutSession` adds the
//! bookkeeping that decides when to run it again.

pub mod height;
pub mod session;

pub use height::{FontMetricsEstimator, HeightEstimator, LineCountEstimator};
pub use session::LayoutSession;

use thiserror::Error;
use tracing::debug;

use crate::song::{SongError, SongSection};
use crate::template::{ColumnBalancingStrategy, Template, TemplateError};

/// Sections assigned to one column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnContent {
    /// 0-based column number
    pub index: usize,
    /// Sections in display order
    pub sections: Vec<SongSection>,
}

impl ColumnContent {
    /// Create a column
    pub fn new(index: usize, sections: Vec<SongSection>) -> Self {
        Self { index, sections }
    }

    /// Whether no section was assigned to this column
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Precondition violations for a distribution pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] TemplateError),
    #[error("available width must be a positive, finite number (got {0})")]
    InvalidWidth(f32),
    #[error("malformed song: {0}")]
    InvalidSong(#[from] SongError),
}

/// Distribute sections across columns using the default height model
pub fn distribute_content(
    sections: &[SongSection],
    template: &Template,
    available_width: f32,
) -> Result<Vec<ColumnContent>, LayoutError> {
    distribute_content_with(sections, template, available_width, &FontMetricsEstimator)
}

/// Distribute sections across columns with a caller-supplied height model.
///
/// The result always holds exactly `template.column_count` columns; columns
/// that receive no section are present and empty.
pub fn distribute_content_with(
    sections: &[SongSection],
    template: &Template,
    available_width: f32,
    estimator: &dyn HeightEstimator,
) -> Result<Vec<ColumnContent>, LayoutError> {
    template.validate()?;
    if !available_width.is_finite() || available_width <= 0.0 {
        return Err(LayoutError::InvalidWidth(available_width));
    }

    let column_count = template.column_count;
    debug!(
        strategy = template.column_balancing_strategy.name(),
        sections = sections.len(),
        columns = column_count,
        width = available_width,
        "distributing sections"
    );

    let assignment = match template.column_balancing_strategy {
        ColumnBalancingStrategy::EqualCount => assign_sequential(sections.len(), column_count),
        ColumnBalancingStrategy::EqualHeight => {
            let widths = template.effective_column_widths(available_width);
            assign_shortest_column(sections, template, &widths, estimator)
        }
    };

    let mut columns: Vec<ColumnContent> =
        (0..column_count).map(|i| ColumnContent::new(i, Vec::new())).collect();
    for (section, column) in sections.iter().zip(assignment) {
        columns[column].sections.push(section.clone());
    }
    Ok(columns)
}

/// Column index for each section under sequential fill.
///
/// Column 0 takes the first `ceil(n / columns)` sections, column 1 the next
/// batch, and so on, so reading columns in order gives the song order.
fn assign_sequential(section_count: usize, column_count: usize) -> Vec<usize> {
    let per_column = section_count.div_ceil(column_count).max(1);
    (0..section_count)
        .map(|i| (i / per_column).min(column_count - 1))
        .collect()
}

/// Column index for each section under greedy shortest-column placement.
///
/// Each section goes to the column with the smallest accumulated height;
/// ties go to the lowest column index.
fn assign_shortest_column(
    sections: &[SongSection],
    template: &Template,
    widths: &[f32],
    estimator: &dyn HeightEstimator,
) -> Vec<usize> {
    let mut heights = vec![0.0f32; widths.len()];
    sections
        .iter()
        .map(|section| {
            let column = heights
                .iter()
                .enumerate()
                .fold(0, |best, (i, &h)| if h < heights[best] { i } else { best });
            heights[column] += estimator.section_height(section, template, widths[column]);
            column
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::SongLine;

    fn sections(n: usize) -> Vec<SongSection> {
        (0..n)
            .map(|i| SongSection::new(format!("S{}", i), vec![SongLine::lyrics(format!("line {}", i))]))
            .collect()
    }

    fn labels(column: &ColumnContent) -> Vec<&str> {
        column.sections.iter().map(|s| s.label.as_str()).collect()
    }

    fn with_columns(count: usize, strategy: ColumnBalancingStrategy) -> Template {
        Template {
            column_count: count,
            column_balancing_strategy: strategy,
            ..Template::default()
        }
    }

    #[test]
    fn test_sequential_fill() {
        let template = with_columns(2, ColumnBalancingStrategy::EqualCount);
        let columns = distribute_content(&sections(3), &template, 800.0).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(labels(&columns[0]), vec!["S0", "S1"]);
        assert_eq!(labels(&columns[1]), vec!["S2"]);
    }

    #[test]
    fn test_assign_sequential_shapes() {
        assert_eq!(assign_sequential(4, 3), vec![0, 0, 1, 1]);
        assert_eq!(assign_sequential(7, 3), vec![0, 0, 0, 1, 1, 1, 2]);
        assert_eq!(assign_sequential(2, 5), vec![0, 1]);
        assert_eq!(assign_sequential(0, 2), Vec::<usize>::new());
        assert_eq!(assign_sequential(5, 1), vec![0; 5]);
    }

    #[test]
    fn test_empty_song_gives_empty_columns() {
        let template = with_columns(3, ColumnBalancingStrategy::EqualCount);
        let columns = distribute_content(&[], &template, 800.0).unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(ColumnContent::is_empty));
        assert_eq!(
            columns.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_fewer_sections_than_columns() {
        let template = with_columns(4, ColumnBalancingStrategy::EqualCount);
        let columns = distribute_content(&sections(2), &template, 800.0).unwrap();
        assert_eq!(columns.len(), 4);
        assert!(!columns[0].is_empty());
        assert!(!columns[1].is_empty());
        assert!(columns[2].is_empty());
        assert!(columns[3].is_empty());
    }

    #[test]
    fn test_equal_height_picks_shortest_column() {
        let template = with_columns(2, ColumnBalancingStrategy::EqualHeight);
        let tall = SongSection::new("Tall", (0..6).map(|_| SongLine::lyrics("x")).collect());
        let short = |label: &str| SongSection::new(label, vec![SongLine::lyrics("x")]);
        let input = vec![tall, short("A"), short("B"), short("C")];

        let columns =
            distribute_content_with(&input, &template, 800.0, &LineCountEstimator).unwrap();
        assert_eq!(labels(&columns[0]), vec!["Tall"]);
        assert_eq!(labels(&columns[1]), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_equal_height_ties_go_to_lowest_index() {
        let template = with_columns(3, ColumnBalancingStrategy::EqualHeight);
        let columns =
            distribute_content_with(&sections(4), &template, 900.0, &LineCountEstimator).unwrap();
        assert_eq!(labels(&columns[0]), vec!["S0", "S3"]);
        assert_eq!(labels(&columns[1]), vec!["S1"]);
        assert_eq!(labels(&columns[2]), vec!["S2"]);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let template = with_columns(0, ColumnBalancingStrategy::EqualCount);
        assert_eq!(
            distribute_content(&sections(1), &template, 800.0),
            Err(LayoutError::InvalidTemplate(TemplateError::NoColumns))
        );

        let template = with_columns(2, ColumnBalancingStrategy::EqualCount);
        assert!(matches!(
            distribute_content(&sections(1), &template, 0.0),
            Err(LayoutError::InvalidWidth(_))
        ));
        assert!(matches!(
            distribute_content(&sections(1), &template, -5.0),
            Err(LayoutError::InvalidWidth(_))
        ));
        assert!(matches!(
            distribute_content(&sections(1), &template, f32::INFINITY),
            Err(LayoutError::InvalidWidth(_))
        ));
    }

    #[test]
    fn test_zero_width_columns_degrade_gracefully() {
        // gaps eat all the width; every column is zero pixels wide
        let template = Template {
            column_count: 3,
            column_gap: 500.0,
            column_balancing_strategy: ColumnBalancingStrategy::EqualHeight,
            ..Template::default()
        };
        let columns = distribute_content(&sections(5), &template, 100.0).unwrap();
        assert_eq!(columns.len(), 3);
        let total: usize = columns.iter().map(|c| c.sections.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_idempotent() {
        for strategy in [ColumnBalancingStrategy::EqualCount, ColumnBalancingStrategy::EqualHeight] {
            let template = with_columns(3, strategy);
            let input = sections(8);
            let first = distribute_content(&input, &template, 1024.0).unwrap();
            let second = distribute_content(&input, &template, 1024.0).unwrap();
            assert_eq!(first, second);
        }
    }
}
