use crate::model::{Coordinate, UserLocation};

/// Where the user's position comes from. There's no device positioning on a terminal,
/// so a location is either given explicitly or unavailable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LocationSource {
    Fixed(Coordinate),
    Unavailable,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LocationError {
    #[error("geolocation isn't available")]
    Unsupported,

    #[error("({lat}, {lng}) is not a valid position")]
    OutOfRange { lat: f64, lng: f64 },
}

impl LocationSource {
    pub fn from_args(lat: Option<f64>, lng: Option<f64>) -> Self {
        match (lat, lng) {
            (Some(lat), Some(lng)) => LocationSource::Fixed(Coordinate::new(lat, lng)),
            _ => LocationSource::Unavailable,
        }
    }

    pub fn current_position(&self) -> Result<UserLocation, LocationError> {
        let position = match self {
            LocationSource::Fixed(position) => *position,
            LocationSource::Unavailable => return Err(LocationError::Unsupported),
        };

        if !(-90.0..=90.0).contains(&position.lat) || !(-180.0..=180.0).contains(&position.lng) {
            return Err(LocationError::OutOfRange {
                lat: position.lat,
                lng: position.lng,
            });
        }

        Ok(UserLocation::now(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_position() {
        assert_eq!(
            LocationSource::from_args(Some(-15.84), None).current_position(),
            Err(LocationError::Unsupported)
        );

        let location = LocationSource::from_args(Some(-15.84), Some(-70.02))
            .current_position()
            .expect("a location");
        assert_eq!(location.position, Coordinate::new(-15.84, -70.02));

        assert!(matches!(
            LocationSource::Fixed(Coordinate::new(-95.0, 0.0)).current_position(),
            Err(LocationError::OutOfRange { .. })
        ));
        assert!(matches!(
            LocationSource::Fixed(Coordinate::new(0.0, f64::NAN)).current_position(),
            Err(LocationError::OutOfRange { .. })
        ));
    }
}
