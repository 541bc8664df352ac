// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recompute-on-input-change wrapper around the distribution pass.
//!
//! The host calls `update` whenever its own change detection fires
//! (resize, template reload, new song). The session compares the new
//! inputs with the ones behind its current columns and only redistributes
//! when something that affects the result changed. It caches exactly one
//! result, so its output never depends on the order of earlier calls.

use tracing::{debug, trace};

use super::{distribute_content_with, ColumnContent, FontMetricsEstimator, HeightEstimator, LayoutError};
use crate::song::{ParsedSong, SongSection};
use crate::template::{ChordAlignment, ColumnBalancingStrategy, Template};

/// Template fields that can change a distribution
#[derive(Debug, Clone, PartialEq)]
enum DistributionKey {
    /// Sequential fill only depends on the column count
    EqualCount { column_count: usize },
    /// Height estimates depend on fonts, spacing, widths and chord style
    EqualHeight { template: Template },
}

impl DistributionKey {
    fn new(template: &Template) -> Self {
        match template.column_balancing_strategy {
            ColumnBalancingStrategy::EqualCount => DistributionKey::EqualCount {
                column_count: template.column_count,
            },
            ColumnBalancingStrategy::EqualHeight => DistributionKey::EqualHeight {
                template: Template {
                    name: String::new(),
                    chord_alignment: ChordAlignment::default(),
                    ..template.clone()
                },
            },
        }
    }
}

#[derive(Debug, Clone)]
struct LayoutInputs {
    width: f32,
    key: DistributionKey,
    sections: Vec<SongSection>,
}

/// Holds the current column layout and the inputs it was computed from
pub struct LayoutSession<E: HeightEstimator = FontMetricsEstimator> {
    estimator: E,
    inputs: Option<LayoutInputs>,
    columns: Vec<ColumnContent>,
    recomputations: u64,
}

impl LayoutSession<FontMetricsEstimator> {
    /// Create a session using the default height model
    pub fn new() -> Self {
        Self::with_estimator(FontMetricsEstimator)
    }
}

impl Default for LayoutSession<FontMetricsEstimator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HeightEstimator> LayoutSession<E> {
    /// Create a session with a custom height model
    pub fn with_estimator(estimator: E) -> Self {
        Self {
            estimator,
            inputs: None,
            columns: Vec::new(),
            recomputations: 0,
        }
    }

    /// Redistribute if any input changed.
    ///
    /// Returns `Ok(true)` when the columns were recomputed. The template is
    /// validated on every call, cached or not. A width that is not positive
    /// defers the layout: nothing is computed and the previous columns stay
    /// in place. On error the previous columns are kept too.
    pub fn update(
        &mut self,
        sections: &[SongSection],
        template: &Template,
        available_width: f32,
    ) -> Result<bool, LayoutError> {
        template.validate()?;
        if !available_width.is_finite() || available_width <= 0.0 {
            debug!(width = available_width, "deferring layout until a positive width is known");
            return Ok(false);
        }

        let key = DistributionKey::new(template);
        if let Some(inputs) = &self.inputs {
            if inputs.width == available_width && inputs.key == key && inputs.sections == sections {
                trace!("layout inputs unchanged");
                return Ok(false);
            }
        }

        let columns = distribute_content_with(sections, template, available_width, &self.estimator)?;
        trace!(columns = columns.len(), "layout recomputed");
        self.columns = columns;
        self.inputs = Some(LayoutInputs {
            width: available_width,
            key,
            sections: sections.to_vec(),
        });
        self.recomputations += 1;
        Ok(true)
    }

    /// Validate a song, then redistribute its sections if anything changed
    pub fn update_song(
        &mut self,
        song: &ParsedSong,
        template: &Template,
        available_width: f32,
    ) -> Result<bool, LayoutError> {
        song.validate()?;
        self.update(&song.sections, template, available_width)
    }

    /// Current columns (empty until the first successful update)
    pub fn columns(&self) -> &[ColumnContent] {
        &self.columns
    }

    /// Width the current columns were computed for
    pub fn width(&self) -> Option<f32> {
        self.inputs.as_ref().map(|i| i.width)
    }

    /// Number of distribution passes run so far
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Forget the cached inputs so the next update recomputes
    pub fn invalidate(&mut self) {
        self.inputs = None;
    }
}
