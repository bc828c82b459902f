use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct BusesNextStopResponse {
    #[serde(default)]
    pub buses: Vec<ApiBus>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiBus {
    pub bus_id: i64,
    pub nombre: String,
    /// Route name, "Sin ruta" or missing when the bus has no current route
    #[serde(default)]
    pub ruta: Option<String>,
    /// "ida" or "vuelta". Null when the backend can't determine it.
    #[serde(default)]
    pub orientacion: Option<String>,
    /// Emoji picked by the backend for the direction
    #[serde(default)]
    pub orientacion_icono: Option<String>,
    #[serde(default)]
    pub proximo_paradero: Option<ApiNextStop>,
}

/// Only the name is used. The rest of the object differs between backend versions.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiNextStop {
    pub nombre: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub orden: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StopsResponse {
    #[serde(default)]
    pub paraderos: Vec<ApiStop>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiStop {
    pub id: i64,
    pub nombre: String,
    #[serde(deserialize_with = "degrees_from_number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "degrees_from_number_or_string")]
    pub lng: f64,
    pub orden: i32,
    /// "ida" or "vuelta"
    pub orientacion: String,
    #[serde(default)]
    pub ruta: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StopInfoResponse {
    pub success: bool,
    #[serde(default)]
    pub bus: Option<StopInfoBus>,
    #[serde(default)]
    pub distancia_metros: Option<f64>,
    #[serde(default)]
    pub tiempo_minutos: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StopInfoBus {
    #[serde(default)]
    pub id: Option<i64>,
    pub nombre: String,
}

/// OSRM `route` service response with `geometries=geojson`
#[derive(Debug, Deserialize, Serialize)]
pub struct OsrmRouteResponse {
    /// "Ok" on success, an error code like "NoRoute" otherwise
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OsrmRoute {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OsrmGeometry {
    /// [lng, lat] pairs
    pub coordinates: Vec<[f64; 2]>,
}

// Django decimal fields end up as strings if a view forgets to cast them to float
fn degrees_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Degrees::deserialize(deserializer)? {
        Degrees::Number(n) => Ok(n),
        Degrees::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}
