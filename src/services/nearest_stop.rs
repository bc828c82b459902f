use crate::{
    model::{Coordinate, Stop},
    utils::haversine_distance,
};

#[derive(Clone, Debug, PartialEq)]
pub struct NearestStop<'a> {
    pub stop: &'a Stop,
    /// Straight line distance in meters
    pub distance: f64,
}

/// The stop closest to `origin` by great-circle distance.
///
/// Ties go to the stop that comes first in `stops`. A stop whose distance can't be
/// computed (NaN coordinates) is never picked, so this can return None even for a
/// non-empty slice.
pub fn nearest_stop(origin: Coordinate, stops: &[Stop]) -> Option<NearestStop<'_>> {
    let mut nearest: Option<NearestStop> = None;

    for stop in stops {
        let distance = haversine_distance(origin, stop.position);

        let closer = match &nearest {
            Some(n) => distance < n.distance,
            None => distance < f64::INFINITY,
        };

        if closer {
            nearest = Some(NearestStop { stop, distance });
        }
    }

    nearest
}
