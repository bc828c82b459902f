//! Local stand-ins for the backend and the routing service
use axum::Router;
use reqwest::Url;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serves `router` on a random local port and returns its base url
pub async fn serve(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Stops around Puno: the first "ida" stop is the nearest to (-15.841, -70.021)
pub fn stops_json() -> Value {
    json!({"paraderos": [
        {"id": 1, "nombre": "Puerta Principal UNA", "lat": -15.840, "lng": -70.020,
         "ruta": "Ruta 1", "orientacion": "ida", "orden": 1},
        {"id": 2, "nombre": "Mercado Bellavista", "lat": -15.845, "lng": -70.025,
         "ruta": "Ruta 1", "orientacion": "ida", "orden": 2},
        {"id": 3, "nombre": "Dante Nava", "lat": -15.8405, "lng": -70.0212,
         "ruta": "Ruta 1", "orientacion": "vuelta", "orden": 1},
        {"id": 4, "nombre": "Plaza de Armas", "lat": -15.8402, "lng": -70.0219,
         "ruta": "Ruta 1", "orientacion": "vuelta", "orden": 2}
    ]})
}

pub fn walking_route_json() -> Value {
    json!({"code": "Ok", "routes": [{
        "distance": 171.4,
        "duration": 123.2,
        "geometry": {"type": "LineString", "coordinates": [
            [-70.021, -15.841], [-70.0205, -15.8405], [-70.02, -15.84]
        ]}
    }]})
}
