//! Client of the LizardTrip backend API
use itertools::Itertools;
use reqwest::{Client, Url};
use tracing::{error, info};

use super::{get_json, join_url, FetchError};
use crate::model::{
    api_model::{BusesNextStopResponse, StopInfoResponse, StopsResponse},
    Bus, Direction, Stop, StopArrival,
};

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        BackendClient { http, base_url }
    }

    /// Active buses together with the stop each one is heading to
    #[tracing::instrument(err, skip(self))]
    pub async fn fetch_buses(&self) -> Result<Vec<Bus>, FetchError> {
        let url = join_url(&self.base_url, "api/buses-next-stop/")?;
        let response: BusesNextStopResponse = get_json(&self.http, url).await?;

        info!("got {} buses", response.buses.len());

        Ok(response.buses.into_iter().map(Bus::from).collect_vec())
    }

    /// Every stop of every route, ordered like the backend returns them.
    /// Stops with an unknown direction are skipped.
    #[tracing::instrument(err, skip(self))]
    pub async fn fetch_stops(&self) -> Result<Vec<Stop>, FetchError> {
        let url = join_url(&self.base_url, "api/paraderos/")?;
        let response: StopsResponse = get_json(&self.http, url).await?;

        let stops = response
            .paraderos
            .into_iter()
            .filter_map(|s| {
                let id = s.id;
                match Stop::try_from(s) {
                    Err(e) => {
                        error!("Error turning paradero {id} into a Stop {e}");
                        None
                    }
                    Ok(s) => Some(s),
                }
            })
            .collect_vec();

        info!("got {} stops", stops.len());

        Ok(stops)
    }

    /// The backend has no direction filter so the filtering happens here
    pub async fn fetch_stops_by_direction(
        &self,
        direction: Direction,
    ) -> Result<Vec<Stop>, FetchError> {
        Ok(self
            .fetch_stops()
            .await?
            .into_iter()
            .filter(|s| s.direction == direction)
            .collect_vec())
    }

    /// Nearest bus that hasn't passed the stop yet
    #[tracing::instrument(err, skip(self))]
    pub async fn fetch_stop_arrival(&self, stop_id: i64) -> Result<StopArrival, FetchError> {
        let url = join_url(&self.base_url, &format!("api/paradero-info/{stop_id}/"))?;
        let response: StopInfoResponse = get_json(&self.http, url).await?;

        Ok(response.into())
    }

    /// The ETA payload of a stop. Its shape is owned by the backend so it's kept opaque.
    #[tracing::instrument(err, skip(self))]
    pub async fn fetch_stop_eta(&self, stop_id: i64) -> Result<serde_json::Value, FetchError> {
        let url = join_url(&self.base_url, &format!("api/paradero-eta/{stop_id}/"))?;

        get_json(&self.http, url).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::client::build_http_client;
    use crate::test_support::{serve, stops_json};

    async fn client_for(router: Router) -> BackendClient {
        let base_url = serve(router).await;
        BackendClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            base_url,
        )
    }

    #[tokio::test]
    async fn test_fetch_buses() -> Result<(), anyhow::Error> {
        let client = client_for(Router::new().route(
            "/api/buses-next-stop/",
            get(|| async {
                Json(json!({"buses": [
                    {"bus_id": 1, "nombre": "UNA-01", "ruta": "Ruta 1", "orientacion": "vuelta",
                     "orientacion_icono": "⬇️", "proximo_paradero": {"nombre": "Plaza de Armas"}},
                    {"bus_id": 2, "nombre": "UNA-02", "ruta": "Ruta 1", "orientacion": null,
                     "proximo_paradero": null}
                ]}))
            }),
        ))
        .await;

        let buses = client.fetch_buses().await?;

        assert_eq!(buses.len(), 2);
        assert_eq!(buses[0].direction, Some(Direction::Return));
        assert_eq!(
            buses[0].next_stop.as_ref().map(|n| n.name.as_str()),
            Some("Plaza de Armas")
        );
        assert_eq!(buses[1].next_stop, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_stops_skips_unknown_direction() -> Result<(), anyhow::Error> {
        let client = client_for(Router::new().route(
            "/api/paraderos/",
            get(|| async {
                Json(json!({"paraderos": [
                    {"id": 1, "nombre": "A", "lat": -15.84, "lng": -70.02, "orden": 1, "orientacion": "ida"},
                    {"id": 2, "nombre": "B", "lat": -15.85, "lng": -70.03, "orden": 2, "orientacion": "circular"}
                ]}))
            }),
        ))
        .await;

        let stops = client.fetch_stops().await?;

        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name, "A");

        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_stops_by_direction() -> Result<(), anyhow::Error> {
        let client = client_for(
            Router::new().route("/api/paraderos/", get(|| async { Json(stops_json()) })),
        )
        .await;

        let stops = client.fetch_stops_by_direction(Direction::Return).await?;

        assert!(!stops.is_empty());
        assert!(stops.iter().all(|s| s.direction == Direction::Return));

        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let client = client_for(Router::new().route(
            "/api/buses-next-stop/",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        assert!(matches!(
            client.fetch_buses().await,
            Err(FetchError::Http { .. })
        ));
    }

    #[tokio::test]
    async fn test_html_body_is_parsing_error() {
        let client = client_for(Router::new().route(
            "/api/buses-next-stop/",
            get(|| async { "<html>Server Error</html>" }),
        ))
        .await;

        match client.fetch_buses().await {
            Err(FetchError::Parsing { body, .. }) => assert!(body.contains("Server Error")),
            other => panic!("expected a parsing error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_stop_arrival_and_eta() -> Result<(), anyhow::Error> {
        let client = client_for(
            Router::new()
                .route(
                    "/api/paradero-info/{id}/",
                    get(|Path(id): Path<i64>| async move {
                        if id == 3 {
                            Json(json!({"success": true, "bus": {"id": 1, "nombre": "UNA-01"},
                                        "distancia_metros": 1251, "tiempo_minutos": 3}))
                        } else {
                            Json(json!({"success": false,
                                        "message": "No hay buses cercanos aún no pasaron este paradero."}))
                        }
                    }),
                )
                .route(
                    "/api/paradero-eta/{id}/",
                    get(|Path(id): Path<i64>| async move { Json(json!({"paradero_id": id, "buses": []})) }),
                ),
        )
        .await;

        assert_eq!(
            client.fetch_stop_arrival(3).await?,
            StopArrival::Approaching {
                bus_name: "UNA-01".to_string(),
                minutes: 3,
                distance_m: Some(1251.0),
            }
        );
        assert!(matches!(
            client.fetch_stop_arrival(4).await?,
            StopArrival::Unavailable { .. }
        ));
        assert_eq!(client.fetch_stop_eta(7).await?["paradero_id"], 7);

        Ok(())
    }
}
