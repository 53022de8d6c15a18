use average::Mean;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use linfa::{Dataset, traits::Fit};
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use tankwatch_quantities::{Days, PercentPerDay};

use crate::{core::reading::Level, prelude::*};

/// Segments whose timestamps barely differ carry no information about the slope.
const MIN_TIME_VARIANCE: f64 = 1e-9;

/// Least-squares slope of the level over time, pooled over the segments.
///
/// Every segment gets its own intercept: the points are centred on their segment means
/// and the pooled cloud is fit through the origin. Segments of a single point do not
/// contribute. Returns `None` when the points do not span any time.
#[instrument(level = "debug", skip_all, fields(n_segments = segments.len()))]
pub fn pooled_slope(segments: &[Vec<Level>]) -> Option<PercentPerDay> {
    let origin = segments.iter().flatten().next()?.0;
    let (xs, ys): (Vec<f64>, Vec<f64>) = segments
        .iter()
        .filter(|segment| segment.len() >= 2)
        .flat_map(|segment| centre(segment, origin))
        .unzip();

    let time_variance: f64 = xs.iter().map(|x| x * x).sum();
    if time_variance < MIN_TIME_VARIANCE {
        debug!(n_points = xs.len(), "not enough spread in time");
        return None;
    }

    let records = Array2::from_shape_vec((xs.len(), 1), xs).ok()?;
    let dataset = Dataset::new(records, Array1::from(ys));
    let regression = LinearRegression::new()
        .with_intercept(false)
        .fit(&dataset)
        .inspect_err(|error| warn!(%error, "failed to fit the consumption regression"))
        .ok()?;
    let slope = regression.params()[0];
    slope.is_finite().then(|| PercentPerDay::from(slope))
}

/// Elapsed days and levels of the segment, minus their segment means.
fn centre(segment: &[Level], origin: DateTime<Utc>) -> impl Iterator<Item = (f64, f64)> {
    let points = segment
        .iter()
        .map(|(timestamp, level)| (Days::from(*timestamp - origin).get(), level.get()))
        .collect_vec();
    let mean_x: Mean = points.iter().map(|(x, _)| *x).collect();
    let mean_y: Mean = points.iter().map(|(_, y)| *y).collect();
    let (mean_x, mean_y) = (mean_x.mean(), mean_y.mean());
    points.into_iter().map(move |(x, y)| (x - mean_x, y - mean_y))
}
