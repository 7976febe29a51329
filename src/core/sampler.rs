use super::types::{CurvePoint, CurveSample};

pub const REVENUE_CURVE_SAMPLES: usize = 220;
pub const ALLOCATION_CURVE_SAMPLES: usize = 240;

const PLOT_MARGIN_LEFT: f64 = 46.0;
const PLOT_MARGIN_TOP: f64 = 16.0;
const PLOT_MARGIN_HORIZONTAL: f64 = 66.0;
const PLOT_MARGIN_VERTICAL: f64 = 54.0;

/// Evaluates `f` on `samples + 1` evenly spaced points of `[0, 1]` and records
/// the first maximum. Non-finite evaluations are stored as zero.
pub fn sample_curve<F>(f: F, samples: usize) -> CurveSample
where
    F: Fn(f64) -> f64,
{
    let samples = samples.max(1);
    let mut points = Vec::with_capacity(samples + 1);
    let mut peak_index = 0;
    let mut peak_value = f64::NEG_INFINITY;

    for i in 0..=samples {
        let x = i as f64 / samples as f64;
        let y = f(x);
        let y = if y.is_finite() { y } else { 0.0 };
        if y > peak_value {
            peak_index = i;
            peak_value = y;
        }
        points.push(CurvePoint { x, y });
    }

    CurveSample {
        points,
        peak_index,
        peak_value,
    }
}

impl CurveSample {
    pub fn peak_x(&self) -> f64 {
        self.points.get(self.peak_index).map_or(0.0, |p| p.x)
    }

    /// Divisor that maps every sampled `y` into `[0, 1]`; an all-zero curve
    /// scales by one so it lies on the baseline.
    pub fn y_scale(&self) -> f64 {
        if self.peak_value > 0.0 {
            self.peak_value
        } else {
            1.0
        }
    }
}

/// Screen rectangle a curve is drawn into, with `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn for_canvas(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            x0: PLOT_MARGIN_LEFT,
            y0: PLOT_MARGIN_TOP,
            width: (canvas_width - PLOT_MARGIN_HORIZONTAL).max(0.0),
            height: (canvas_height - PLOT_MARGIN_VERTICAL).max(0.0),
        }
    }

    pub fn project_point(&self, point: CurvePoint, sample: &CurveSample) -> CurvePoint {
        CurvePoint {
            x: self.x0 + point.x * self.width,
            y: self.y0 + self.height - (point.y / sample.y_scale()) * self.height,
        }
    }

    pub fn project(&self, sample: &CurveSample) -> Vec<CurvePoint> {
        sample
            .points
            .iter()
            .map(|&point| self.project_point(point, sample))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sample_curve_covers_unit_interval_uniformly() {
        let sample = sample_curve(|x| x, 4);
        let xs: Vec<f64> = sample.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(sample.peak_index, 4);
        assert_approx(sample.peak_value, 1.0);
        assert_approx(sample.peak_x(), 1.0);
    }

    #[test]
    fn sample_curve_keeps_first_peak_on_ties() {
        let sample = sample_curve(|_| 1.0, 10);
        assert_eq!(sample.peak_index, 0);

        let sample = sample_curve(|x| (x - 0.5).abs(), 10);
        assert_eq!(sample.peak_index, 0);
        assert_approx(sample.peak_value, 0.5);
    }

    #[test]
    fn sample_curve_treats_zero_samples_as_one_interval() {
        let sample = sample_curve(|x| x, 0);
        assert_eq!(sample.points.len(), 2);
    }

    #[test]
    fn sample_curve_replaces_non_finite_values() {
        let sample = sample_curve(|x| if x == 0.0 { f64::NAN } else { 1.0 / x }, 4);
        assert_approx(sample.points[0].y, 0.0);
        assert_eq!(sample.peak_index, 1);
        assert_approx(sample.peak_value, 4.0);
    }

    #[test]
    fn plot_area_projects_peak_to_top_and_zero_to_baseline() {
        let sample = sample_curve(|x| x * (1.0 - x), 10);
        let area = PlotArea::for_canvas(566.0, 360.0);
        assert_approx(area.width, 500.0);
        assert_approx(area.height, 306.0);

        let projected = area.project(&sample);
        assert_eq!(projected.len(), 11);
        assert_approx(projected[0].x, 46.0);
        assert_approx(projected[0].y, 16.0 + 306.0);
        assert_approx(projected[5].y, 16.0);
        assert_approx(projected[10].x, 546.0);
    }

    #[test]
    fn plot_area_keeps_flat_zero_curve_on_baseline() {
        let sample = sample_curve(|_| 0.0, 8);
        assert_approx(sample.y_scale(), 1.0);
        let area = PlotArea {
            x0: 0.0,
            y0: 0.0,
            width: 100.0,
            height: 50.0,
        };
        for point in area.project(&sample) {
            assert_approx(point.y, 50.0);
        }
    }
}
