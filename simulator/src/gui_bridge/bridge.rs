use crate::gui_bridge::model::VisualizationModel;
use log::{info, warn};
use serde_json::json;
use sinecore::engine::{Command, EngineHandle};
use sinecore::prelude::ParameterBounds;
use std::net::SocketAddr;
use warp::{http::StatusCode, Filter};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// HTTP surface used by the visualizer: `GET /series` for the latest
/// snapshot and `POST /control` for commands.
#[derive(Clone)]
pub struct GuiBridge {
    handle: EngineHandle,
    bounds: ParameterBounds,
}

impl GuiBridge {
    pub fn new(handle: EngineHandle) -> Self {
        Self {
            handle,
            bounds: ParameterBounds::default(),
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let bridge = self.clone();
        let bridge_filter = warp::any().map(move || bridge.clone());

        let series_route = warp::path("series")
            .and(warp::get())
            .and(bridge_filter.clone())
            .map(|bridge: GuiBridge| warp::reply::json(&bridge.model()));

        let control_route = warp::path("control")
            .and(warp::post())
            .and(warp::body::json())
            .and(bridge_filter)
            .map(|command: Command, bridge: GuiBridge| {
                match bridge.dispatch(command) {
                    Ok(()) => warp::reply::with_status(
                        warp::reply::json(&json!({"status": "ok"})),
                        StatusCode::OK,
                    ),
                    Err(err) => {
                        warn!("control rejected: {:#}", err);
                        warp::reply::with_status(
                            warp::reply::json(&json!({"status": "error", "message": err.to_string()})),
                            StatusCode::BAD_REQUEST,
                        )
                    }
                }
            });

        series_route.or(control_route)
    }

    pub async fn serve(self, address: SocketAddr) {
        info!("GUI bridge listening on http://{}", address);
        warp::serve(self.routes()).run(address).await;
    }

    pub fn dispatch(&self, command: Command) -> anyhow::Result<()> {
        command.validate(&self.bounds)?;
        self.handle.send(command)?;
        Ok(())
    }

    pub fn model(&self) -> VisualizationModel {
        VisualizationModel::from_snapshot(self.handle.snapshot())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinecore::engine::Engine;
    use sinecore::prelude::StartRequest;
    use sinecore::signal::{CollectingSink, SamplerConfig};
    use std::time::Duration;
    use tokio::time::sleep;

    fn bridge() -> GuiBridge {
        let (engine, handle) = Engine::new(SamplerConfig::default(), CollectingSink::default());
        engine.spawn();
        GuiBridge::new(handle)
    }

    #[tokio::test(start_paused = true)]
    async fn control_start_feeds_series_route() {
        let gui = bridge();
        let routes = gui.routes();

        let response = warp::test::request()
            .method("POST")
            .path("/control")
            .json(&Command::Start(StartRequest {
                amplitude: 50.0,
                frequency: 10.0,
                phase_degrees: 0.0,
                interval_ms: 100,
            }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        sleep(Duration::from_millis(250)).await;

        let response = warp::test::request()
            .method("GET")
            .path("/series")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let model: VisualizationModel = serde_json::from_slice(response.body()).unwrap();
        assert!(model.snapshot.running);
        assert_eq!(model.snapshot.samples.len(), 2);
        assert_eq!(model.log[0], "time: 0 | value: 0");
    }

    #[tokio::test(start_paused = true)]
    async fn control_rejects_out_of_range_values() {
        let gui = bridge();
        let response = warp::test::request()
            .method("POST")
            .path("/control")
            .json(&Command::SetFrequency { value: 5_000.0 })
            .reply(&gui.routes())
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(gui.model().snapshot.metrics.ignored_commands, 0);
    }
}
