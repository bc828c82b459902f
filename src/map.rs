//! What the overlay has drawn on the map
use std::fs;
use std::path::Path;

use anyhow::Context;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use itertools::Itertools;
use serde_json::{json, Map};

use crate::model::{Coordinate, Stop, WalkingRoute};
use crate::view::stop_label;

pub const WALKING_ROUTE_COLOR: &str = "#28a745";
pub const USER_MARKER_COLOR: &str = "#007bff";

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub title: String,
    /// Set for stop markers, clicking them looks up arrivals
    pub stop_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapLayers {
    user_marker: Option<Marker>,
    /// Clustered together on the map
    stop_markers: Vec<Marker>,
    walking_route: Option<Vec<Coordinate>>,
}

impl MapLayers {
    pub fn user_marker(&self) -> Option<&Marker> {
        self.user_marker.as_ref()
    }

    pub fn stop_markers(&self) -> &[Marker] {
        &self.stop_markers
    }

    pub fn walking_route(&self) -> Option<&[Coordinate]> {
        self.walking_route.as_deref()
    }

    /// Replaces the previous user marker
    pub fn place_user_marker(&mut self, position: Coordinate) {
        self.user_marker = Some(Marker {
            position,
            title: "Tu ubicación".to_string(),
            stop_id: None,
        });
    }

    pub fn set_stop_markers(&mut self, stops: &[Stop]) {
        self.stop_markers = stops
            .iter()
            .map(|s| Marker {
                position: s.position,
                title: stop_label(s),
                stop_id: Some(s.id),
            })
            .collect_vec();
    }

    /// Replaces the previous route. Returns false if the route has too few points to draw,
    /// in which case the previous one is kept.
    pub fn draw_walking_route(&mut self, route: &WalkingRoute) -> bool {
        if route.path.len() < 2 {
            return false;
        }

        self.walking_route = Some(route.path.clone());

        true
    }

    pub fn clear_walking_route(&mut self) {
        self.walking_route = None;
    }

    /// Every layer as one collection, coordinates in `[lng, lat]` order
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = vec![];

        if let Some(user) = &self.user_marker {
            let mut properties = Map::new();
            properties.insert("layer".to_string(), json!("user"));
            properties.insert("title".to_string(), json!(user.title));
            properties.insert("marker-color".to_string(), json!(USER_MARKER_COLOR));

            features.push(feature(point(user.position), properties));
        }

        for marker in &self.stop_markers {
            let mut properties = Map::new();
            properties.insert("layer".to_string(), json!("stops"));
            properties.insert("cluster".to_string(), json!(true));
            properties.insert("title".to_string(), json!(marker.title));
            properties.insert("stop_id".to_string(), json!(marker.stop_id));

            features.push(feature(point(marker.position), properties));
        }

        if let Some(path) = &self.walking_route {
            let line =
                Value::LineString(path.iter().map(|c| c.to_lng_lat().to_vec()).collect_vec());

            let mut properties = Map::new();
            properties.insert("layer".to_string(), json!("walking_route"));
            properties.insert("stroke".to_string(), json!(WALKING_ROUTE_COLOR));
            properties.insert("stroke-width".to_string(), json!(5));

            features.push(feature(line, properties));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    pub fn write_geojson(&self, path: &Path) -> anyhow::Result<()> {
        let geojson = GeoJson::from(self.to_geojson());
        let json_string =
            serde_json::to_string_pretty(&geojson).context("couldn't serialize the map layers")?;

        fs::write(path, json_string).with_context(|| format!("couldn't write {}", path.display()))
    }
}

fn point(position: Coordinate) -> Value {
    Value::Point(position.to_lng_lat().to_vec())
}

fn feature(value: Value, properties: Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
