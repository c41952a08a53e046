use anyhow::Result;
use environment_dashboard::{api, config, controller, telemetry};
use config::Config;
use environment_dashboard::render::ThresholdView;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let app_state = controller::AppState::new(cfg.clone())?;
    let dashboard = app_state.dashboard.clone();

    let thresholds = ThresholdView::from(dashboard.thresholds());
    info!(
        heater_below_c = %thresholds.temp_min,
        fan_above_pct = %thresholds.humidity_max,
        "automation thresholds"
    );
    controller::spawn_render_logger(&dashboard);

    if cfg.simulation.autostart {
        dashboard.start();
    }

    let app = api::router(app_state);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - dashboard controls are reachable from the network");
    }

    info!(%addr, "starting environment dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    dashboard.shutdown();
    warn!("shutdown complete");
    Ok(())
}
