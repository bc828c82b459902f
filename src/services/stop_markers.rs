//! Responsible for the stop markers and what clicking them shows
use futures::future::join_all;
use itertools::Itertools;
use tracing::{error, info};

use crate::{
    client::{BackendClient, FetchError},
    map::MapLayers,
    model::{Direction, Stop, StopArrival},
};

pub const ARRIVAL_UNKNOWN_TEXT: &str = "No se pudo determinar un bus cercano.";

/// Puts a marker on the map for every stop, optionally only the ones going in `direction`
pub async fn load_stop_markers(
    backend: &BackendClient,
    map: &mut MapLayers,
    direction: Option<Direction>,
) -> Result<Vec<Stop>, FetchError> {
    let stops = backend
        .fetch_stops()
        .await?
        .into_iter()
        .filter(|s| direction.is_none_or(|d| s.direction == d))
        .collect_vec();

    map.set_stop_markers(&stops);
    info!("placed {} stop markers", stops.len());

    Ok(stops)
}

/// Nearest approaching bus for a stop. A failed lookup is logged and reported as unknown.
pub async fn lookup_arrival(backend: &BackendClient, stop_id: i64) -> StopArrival {
    match backend.fetch_stop_arrival(stop_id).await {
        Ok(arrival) => arrival,
        Err(e) => {
            error!("{:?}", anyhow::Error::from(e).context("error fetching stop info"));
            StopArrival::Unavailable {
                message: ARRIVAL_UNKNOWN_TEXT.to_string(),
            }
        }
    }
}

/// Looks up every stop concurrently, keeping the order of `stops`
pub async fn lookup_arrivals<'a>(
    backend: &BackendClient,
    stops: &'a [Stop],
) -> Vec<(&'a Stop, StopArrival)> {
    let arrivals = join_all(stops.iter().map(|s| lookup_arrival(backend, s.id))).await;

    stops.iter().zip(arrivals).collect_vec()
}

/// The ETA payload of a stop, or None if it couldn't be fetched
pub async fn stop_eta(backend: &BackendClient, stop_id: i64) -> Option<serde_json::Value> {
    match backend.fetch_stop_eta(stop_id).await {
        Ok(eta) => {
            info!(stop_id, "stop eta: {eta}");
            Some(eta)
        }
        Err(e) => {
            error!("{:?}", anyhow::Error::from(e).context("error fetching stop eta"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::client::build_http_client;
    use crate::test_support::{serve, stops_json};

    async fn backend() -> BackendClient {
        let router = Router::new()
            .route("/api/paraderos/", get(|| async { Json(stops_json()) }))
            .route(
                "/api/paradero-info/{id}/",
                get(|Path(id): Path<i64>| async move {
                    Json(json!({"success": true, "bus": {"nombre": format!("UNA-0{id}")},
                                "tiempo_minutos": id}))
                }),
            );

        BackendClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            serve(router).await,
        )
    }

    #[tokio::test]
    async fn test_load_markers_for_direction() -> Result<(), anyhow::Error> {
        let backend = backend().await;
        let mut map = MapLayers::default();

        let stops = load_stop_markers(&backend, &mut map, Some(Direction::Return)).await?;

        assert_eq!(stops.len(), 2);
        assert_eq!(
            map.stop_markers().iter().map(|m| m.title.as_str()).collect_vec(),
            vec!["Paradero 1: Dante Nava", "Paradero 2: Plaza de Armas"]
        );

        load_stop_markers(&backend, &mut map, None).await?;
        assert_eq!(map.stop_markers().len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_arrivals_keeps_order() -> Result<(), anyhow::Error> {
        let backend = backend().await;
        let stops = backend.fetch_stops().await?;

        let arrivals = lookup_arrivals(&backend, &stops).await;

        assert_eq!(arrivals.len(), 4);
        for (stop, arrival) in arrivals {
            assert_eq!(
                arrival,
                StopArrival::Approaching {
                    bus_name: format!("UNA-0{}", stop.id),
                    minutes: stop.id,
                    distance_m: None,
                }
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_lookups_degrade() {
        let backend = backend().await;

        // no eta route on the stand-in backend
        assert_eq!(stop_eta(&backend, 1).await, None);

        let unreachable = BackendClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            "http://127.0.0.1:9/".parse().unwrap(),
        );
        assert_eq!(
            lookup_arrival(&unreachable, 1).await,
            StopArrival::Unavailable {
                message: ARRIVAL_UNKNOWN_TEXT.to_string()
            }
        );
    }
}
