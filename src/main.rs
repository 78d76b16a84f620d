// CMS demo seeder - populates an empty content store with demo pages

use tracing_subscriber::EnvFilter;

use cms_demo_seeder::{
    app_state::AppState,
    config::Config,
    data_seeder::{EventFixture, FakeContentGenerator},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage and services
    let app_state = AppState::new(config.clone()).await?;

    if config.seed.event_count > 0 {
        let mut generator = FakeContentGenerator::new(&config.content.locale, config.seed.rng_seed);
        EventFixture::new(config.seed.event_count)
            .load(&app_state.events, &mut generator)
            .await?;
    }

    let loaded = app_state
        .fixture_executor()
        .execute(app_state.documents.as_ref())
        .await?;

    tracing::info!(
        "Seeded webspace '{}' ({}) with fixtures: {}",
        config.content.webspace,
        config.content.locale,
        loaded.join(", ")
    );

    Ok(())
}
