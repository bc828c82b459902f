//! Everything the overlay holds between user actions
use anyhow::Context;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    client::{build_http_client, BackendClient, FetchError, RoutingClient},
    config::Config,
    map::MapLayers,
    model::{Direction, Stop},
    services::{
        find_walking_route, load_stop_markers, EtaRefresher, LocationError, LocationSource,
    },
    view::{EtaPanel, LocationPanel, LocationStatus, RouteInfo},
};

/// Created once at startup. Dropping it (or [`AppContext::shutdown`]) stops the refresh loop.
pub struct AppContext {
    pub config: Config,
    pub backend: BackendClient,
    pub router: RoutingClient,
    pub map: MapLayers,
    pub location_panel: LocationPanel,
    eta: EtaRefresher,
    refresh_task: Option<JoinHandle<()>>,
}

impl AppContext {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http =
            build_http_client(config.request_timeout).context("couldn't build the http client")?;

        let backend = BackendClient::new(http.clone(), config.backend_url.clone());
        let router = RoutingClient::new(http, config.routing_url.clone());

        Ok(AppContext {
            eta: EtaRefresher::new(backend.clone(), EtaPanel::default()),
            backend,
            router,
            map: MapLayers::default(),
            location_panel: LocationPanel::default(),
            config,
            refresh_task: None,
        })
    }

    pub fn eta(&self) -> &EtaRefresher {
        &self.eta
    }

    /// Starts polling the buses. Calling it again while running only subscribes again.
    pub fn start_eta_refresh(&mut self) -> watch::Receiver<EtaPanel> {
        let updates = self.eta.subscribe();

        if !self.is_refreshing() {
            self.refresh_task = Some(self.eta.spawn(self.config.refresh_interval));
        }

        updates
    }

    pub fn stop_eta_refresh(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
            info!("Stopped refreshing buses");
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_task.is_some()
    }

    /// Takes the user's position, marks it on the map and searches the walking route
    /// for the selected direction
    pub async fn share_location(&mut self, source: &LocationSource) {
        self.location_panel.show();
        self.location_panel.status = LocationStatus::Locating;

        match source.current_position() {
            Ok(location) => {
                info!(at = %location.captured_at, "location shared: {}", location.position);
                self.location_panel.status = LocationStatus::Shared(location);
                self.map.place_user_marker(location.position);
                self.update_walking_route().await;
            }
            Err(LocationError::Unsupported) => {
                self.location_panel.status = LocationStatus::Unsupported;
            }
            Err(e) => {
                warn!("{e}");
                self.location_panel.status = LocationStatus::Failed;
            }
        }
    }

    /// Searches the route again if a location was already shared
    pub async fn change_direction(&mut self, direction: Direction) {
        if self.location_panel.set_direction(direction) {
            self.update_walking_route().await;
        }
    }

    async fn update_walking_route(&mut self) {
        let Some(location) = self.location_panel.location() else {
            return;
        };

        self.location_panel.route_info = RouteInfo::Searching;

        let outcome = find_walking_route(
            &self.backend,
            &self.router,
            location.position,
            self.location_panel.direction,
        )
        .await;

        match &outcome.route {
            Some(route) => {
                self.map.draw_walking_route(route);
            }
            None => self.map.clear_walking_route(),
        }
        self.location_panel.route_info = outcome.info;
    }

    pub async fn load_stop_markers(
        &mut self,
        direction: Option<Direction>,
    ) -> Result<Vec<Stop>, FetchError> {
        load_stop_markers(&self.backend, &mut self.map, direction).await
    }

    pub fn shutdown(mut self) {
        self.stop_eta_refresh();
        info!("Shut down");
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.stop_eta_refresh();
    }
}
