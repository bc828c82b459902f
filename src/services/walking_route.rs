//! Responsible for finding the nearest stop to the user and the walk there
use tracing::{error, info};

use crate::{
    client::{BackendClient, RoutingClient, RoutingError},
    model::{Coordinate, Direction, WalkingRoute},
    services::nearest_stop,
    view::{RouteInfo, WalkingInfo},
};

#[derive(Clone, Debug, PartialEq)]
pub struct RouteOutcome {
    pub info: RouteInfo,
    /// Only set when it can be drawn
    pub route: Option<WalkingRoute>,
}

impl RouteOutcome {
    fn without_route(info: RouteInfo) -> Self {
        RouteOutcome { info, route: None }
    }
}

/// Fetches the stops going in `direction`, picks the nearest to `origin` and asks the
/// routing service for a walking path to it.
///
/// Every step can fail on its own. Failures end up in the returned [`RouteInfo`] and are
/// never retried.
#[tracing::instrument(skip(backend, router))]
pub async fn find_walking_route(
    backend: &BackendClient,
    router: &RoutingClient,
    origin: Coordinate,
    direction: Direction,
) -> RouteOutcome {
    let stops = match backend.fetch_stops_by_direction(direction).await {
        Ok(stops) => stops,
        Err(e) => {
            error!("{:?}", anyhow::Error::from(e).context("error fetching stops"));
            return RouteOutcome::without_route(RouteInfo::StopsFailed);
        }
    };

    if stops.is_empty() {
        info!("no stops for direction {}", direction.api_tag());
        return RouteOutcome::without_route(RouteInfo::NoStops);
    }

    let Some(nearest) = nearest_stop(origin, &stops) else {
        return RouteOutcome::without_route(RouteInfo::NoNearestStop);
    };

    info!(
        stop_id = nearest.stop.id,
        distance = nearest.distance,
        "nearest stop is {}",
        nearest.stop.name
    );

    let (walking, route) = match router.walking_route(origin, nearest.stop.position).await {
        Ok(route) if route.path.len() >= 2 => (
            WalkingInfo::Drawn {
                distance: route.distance,
                duration: route.duration,
            },
            Some(route),
        ),
        Ok(_) | Err(RoutingError::NoRoute { .. }) => (WalkingInfo::NotFound, None),
        Err(e) => {
            error!("{:?}", anyhow::Error::from(e).context("error fetching walking route"));
            (WalkingInfo::Failed, None)
        }
    };

    RouteOutcome {
        info: RouteInfo::Found {
            stop_name: nearest.stop.name.clone(),
            distance: nearest.distance,
            walking,
        },
        route,
    }
}
