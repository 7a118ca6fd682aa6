//! Body sizing из метрик видимости спрайтов

use serde::{Deserialize, Serialize};

use crate::assets::VisibilityMetrics;
use crate::settings::{
    COLLISION_MIN_HALF_WIDTH, COLLISION_MIN_WIDTH, COLLISION_SCALE, FIGHTER_HEIGHT, FIGHTER_WIDTH,
};

/// Aggregates metrics over every state sheet of one fighter.
///
/// Each maximum/minimum keeps the frame dimension it was measured in, so the
/// final box scales the whole frame, not just its opaque part.
#[derive(Debug, Clone, Copy)]
pub struct MetricsAccumulator {
    frame_size: f32,
    metrics: VisibilityMetrics,
}

impl MetricsAccumulator {
    pub fn new(frame_size: u32) -> Self {
        let size = frame_size as f32;
        Self {
            frame_size: size,
            metrics: VisibilityMetrics {
                max_visible_height: 0.0,
                frame_height_for_max: size,
                max_visible_width: 0.0,
                frame_width_for_max: size,
                min_bottom_margin: f32::INFINITY,
                frame_height_for_bottom: size,
            },
        }
    }

    pub fn add(&mut self, sheet: &VisibilityMetrics) {
        let acc = &mut self.metrics;
        if sheet.max_visible_height > acc.max_visible_height {
            acc.max_visible_height = sheet.max_visible_height;
            acc.frame_height_for_max = sheet.frame_height_for_max;
        }
        if sheet.max_visible_width > acc.max_visible_width {
            acc.max_visible_width = sheet.max_visible_width;
            acc.frame_width_for_max = sheet.frame_width_for_max;
        }
        if sheet.min_bottom_margin < acc.min_bottom_margin {
            acc.min_bottom_margin = sheet.min_bottom_margin;
            acc.frame_height_for_bottom = sheet.frame_height_for_bottom;
        }
    }

    /// Final metrics with non-positive values replaced by the frame size.
    pub fn finish(self) -> VisibilityMetrics {
        let size = self.frame_size;
        let mut metrics = self.metrics;
        if metrics.max_visible_height <= 0.0 {
            metrics.max_visible_height = size;
        }
        if metrics.frame_height_for_max <= 0.0 {
            metrics.frame_height_for_max = size;
        }
        if metrics.max_visible_width <= 0.0 {
            metrics.max_visible_width = size;
            metrics.frame_width_for_max = size;
        }
        if metrics.frame_width_for_max <= 0.0 {
            metrics.frame_width_for_max = size;
        }
        if metrics.frame_height_for_bottom <= 0.0 {
            metrics.frame_height_for_bottom = size;
        }
        if !metrics.min_bottom_margin.is_finite() {
            metrics.min_bottom_margin = 0.0;
        }
        metrics
    }
}

/// Render box, collision extent and ground line of a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDimensions {
    pub width: f32,
    pub height: f32,
    /// Narrower than `width / 2`; used by separation and hit tests
    pub collision_half_width: f32,
    pub scale: f32,
    /// Center y when standing
    pub ground_y: f32,
}

impl BodyDimensions {
    pub fn from_metrics(
        metrics: &VisibilityMetrics,
        min_scale: f32,
        max_scale: f32,
        base_ground_y: f32,
    ) -> Self {
        let raw_scale = FIGHTER_HEIGHT / metrics.max_visible_height;
        let scale = raw_scale.min(max_scale).max(min_scale);

        let height = metrics.frame_height_for_max * scale;
        let width = (metrics.frame_width_for_max * scale)
            .min(FIGHTER_WIDTH * max_scale)
            .max(FIGHTER_WIDTH * min_scale);

        let visible_width = if metrics.max_visible_width > 0.0 {
            metrics.max_visible_width * scale
        } else {
            width
        };
        let collision_width = COLLISION_MIN_WIDTH.max(visible_width * COLLISION_SCALE);
        let collision_half_width = (collision_width / 2.0)
            .min(width / 2.0)
            .max(COLLISION_MIN_HALF_WIDTH);

        let bottom_margin = metrics.min_bottom_margin * (height / metrics.frame_height_for_bottom.max(1.0));
        let ground_y = base_ground_y + height / 2.0 - bottom_margin;

        Self {
            width,
            height,
            collision_half_width,
            scale,
            ground_y,
        }
    }
}
