use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vivu_api::{app, app_config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vivu_api=debug,vivu_order=debug,vivu_offer=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let state = AppState::new(config.policies()?);
    for (service, policy) in state.policies.iter() {
        tracing::info!(
            %service,
            child = policy.multipliers.child,
            infant = policy.multipliers.infant,
            tax_rate = policy.tax_rate,
            "Loaded pricing policy"
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Vivu fare service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
