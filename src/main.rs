use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lunch_buddy_api::{
    api::{create_router, AppState},
    config::{Config, RestaurantProvider, StorageBackend},
    db::{
        create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle, MemoryStore,
        PgSuggestionStore, SuggestionStore,
    },
    services::{GooglePlacesFinder, RestaurantFinder, SearchTarget, StaticCatalogFinder, WeeklySuggestionEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lunch_buddy_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = build_store(&config).await?;
    let (finder, cache_writer) = build_finder(&config)?;

    tracing::info!(
        store = store.name(),
        finder = finder.name(),
        finder_timeout_ms = config.finder_timeout_ms,
        "Suggestion engine configured"
    );

    let engine = WeeklySuggestionEngine::new(store, finder, config.finder_timeout());
    let app = create_router(AppState::new(Arc::new(engine)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn SuggestionStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            run_migrations(&pool).await.context("Failed to run migrations")?;
            Ok(Arc::new(PgSuggestionStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; suggestions are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn build_finder(
    config: &Config,
) -> anyhow::Result<(Arc<dyn RestaurantFinder>, Option<CacheWriterHandle>)> {
    match config.restaurant_provider {
        RestaurantProvider::Static => Ok((Arc::new(StaticCatalogFinder::default()), None)),
        RestaurantProvider::GooglePlaces => {
            let api_key = config
                .google_places_api_key
                .clone()
                .context("GOOGLE_PLACES_API_KEY is required for the google_places provider")?;
            let redis_client = create_redis_client(&config.redis_url)?;
            let (cache, handle) = Cache::new(redis_client);

            let finder = GooglePlacesFinder::new(
                api_key,
                config.google_places_api_url.clone(),
                SearchTarget {
                    latitude: config.target_latitude,
                    longitude: config.target_longitude,
                    radius_meters: config.search_radius_meters,
                },
            )
            .with_cache(cache);
            Ok((Arc::new(finder), Some(handle)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
