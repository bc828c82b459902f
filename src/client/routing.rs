//! Walking directions from an OSRM instance
use itertools::Itertools;
use reqwest::{Client, Url};
use tracing::info;

use super::{join_url, read_json, send, FetchError};
use crate::model::{api_model::OsrmRouteResponse, Coordinate, WalkingRoute};

#[derive(Clone, Debug)]
pub struct RoutingClient {
    http: Client,
    base_url: Url,
}

#[derive(thiserror::Error, Debug)]
pub enum RoutingError {
    #[error("error requesting the walking route")]
    Fetch(#[from] FetchError),

    #[error("the routing service found no route ({code}): {}", message.as_deref().unwrap_or("no message"))]
    NoRoute {
        code: String,
        message: Option<String>,
    },
}

impl RoutingClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        RoutingClient { http, base_url }
    }

    /// Best walking route between 2 points, following streets
    #[tracing::instrument(err, skip(self))]
    pub async fn walking_route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkingRoute, RoutingError> {
        let mut url = join_url(
            &self.base_url,
            &format!(
                "route/v1/foot/{},{};{},{}",
                from.lng, from.lat, to.lng, to.lat
            ),
        )?;
        url.set_query(Some("overview=full&geometries=geojson"));

        let response = send(&self.http, &url).await?;

        // NoRoute and InvalidQuery come back as a 400 with the usual body
        let rejected = match response.error_for_status_ref() {
            Ok(_) => None,
            Err(e) if response.status().is_client_error() => Some(e),
            Err(e) => return Err(FetchError::from(e).into()),
        };

        let response: OsrmRouteResponse = match read_json(response, url).await {
            Ok(response) => response,
            Err(e) => return Err(rejected.map_or(e, FetchError::from).into()),
        };

        if response.code != "Ok" {
            return Err(RoutingError::NoRoute {
                code: response.code,
                message: response.message,
            });
        }

        let Some(route) = response.routes.into_iter().next() else {
            return Err(RoutingError::NoRoute {
                code: response.code,
                message: response.message,
            });
        };

        info!(
            "got walking route of {:.0} m with {} points",
            route.distance,
            route.geometry.coordinates.len()
        );

        Ok(WalkingRoute {
            path: route
                .geometry
                .coordinates
                .into_iter()
                .map(Coordinate::from_lng_lat)
                .collect_vec(),
            distance: route.distance,
            duration: route.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::client::build_http_client;
    use crate::test_support::serve;

    async fn client_for(router: Router) -> RoutingClient {
        let base_url = serve(router).await;
        RoutingClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            base_url,
        )
    }

    #[tokio::test]
    async fn test_walking_route_is_converted_to_lat_lng() -> Result<(), anyhow::Error> {
        let client = client_for(Router::new().route(
            "/route/v1/foot/{coordinates}",
            get(|Path(coordinates): Path<String>| async move {
                assert_eq!(coordinates, "-70.021,-15.841;-70.02,-15.84");
                Json(json!({"code": "Ok", "routes": [{
                    "distance": 171.4,
                    "duration": 123.2,
                    "geometry": {"type": "LineString", "coordinates": [
                        [-70.021, -15.841], [-70.0205, -15.8405], [-70.02, -15.84]
                    ]}
                }]}))
            }),
        ))
        .await;

        let route = client
            .walking_route(
                Coordinate::new(-15.841, -70.021),
                Coordinate::new(-15.840, -70.020),
            )
            .await?;

        assert_eq!(route.path.len(), 3);
        assert_eq!(route.path[0], Coordinate::new(-15.841, -70.021));
        assert_eq!(route.path[2], Coordinate::new(-15.84, -70.02));
        assert_eq!(route.distance, 171.4);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_route() {
        let client = client_for(Router::new().route(
            "/route/v1/foot/{coordinates}",
            get(|| async { Json(json!({"code": "NoRoute", "message": "Impossible route", "routes": []})) }),
        ))
        .await;

        let result = client
            .walking_route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await;

        match result {
            Err(RoutingError::NoRoute { code, .. }) => assert_eq!(code, "NoRoute"),
            other => panic!("expected NoRoute, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_route_with_bad_request_status() {
        let client = client_for(Router::new().route(
            "/route/v1/foot/{coordinates}",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"code": "NoRoute", "message": "Impossible route between points"})),
                )
            }),
        ))
        .await;

        let result = client
            .walking_route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await;

        match result {
            Err(RoutingError::NoRoute { code, message }) => {
                assert_eq!(code, "NoRoute");
                assert_eq!(message.as_deref(), Some("Impossible route between points"));
            }
            other => panic!("expected NoRoute, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejection_without_osrm_body_is_http_error() {
        let client = client_for(Router::new().route(
            "/route/v1/foot/{coordinates}",
            get(|| async { (StatusCode::NOT_FOUND, "no such profile") }),
        ))
        .await;

        let result = client
            .walking_route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await;

        assert!(matches!(
            result,
            Err(RoutingError::Fetch(FetchError::Http { .. }))
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let client = client_for(Router::new().route(
            "/route/v1/foot/{coordinates}",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"code": "Ok", "routes": []})),
                )
            }),
        ))
        .await;

        let result = client
            .walking_route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await;

        assert!(matches!(
            result,
            Err(RoutingError::Fetch(FetchError::Http { .. }))
        ));
    }
}
