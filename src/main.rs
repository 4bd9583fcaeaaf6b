//! OpenSASE Storefront - shop, cart and wishlist service

use anyhow::Result;
use opensase_storefront::api::{CartApi, CatalogApi, HttpBackend, OrderApi, WishlistApi};
use opensase_storefront::cart::{CartGateway, CartStore, GuestLists, MemoryCartStore, PgCartStore, WishlistGateway};
use opensase_storefront::domain::events::EventBus;
use opensase_storefront::http::{router, AppState};
use opensase_storefront::{Config, LocalCatalog};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CART_SUBJECT: &str = "storefront.cart.updated";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;

    let store: Arc<dyn CartStore> = match &config.database_url {
        Some(url) => {
            let db = PgPoolOptions::new().max_connections(10).connect(url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            Arc::new(PgCartStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, guest carts live in memory");
            Arc::new(MemoryCartStore::new())
        }
    };

    let catalog = match &config.catalog_path {
        Some(path) => LocalCatalog::from_path(path).await?,
        None => LocalCatalog::sample()?,
    };

    let events = EventBus::new();
    let guest = GuestLists::new(store, events.clone());
    let backend = config.backend_url.as_deref().map(HttpBackend::new).transpose()?.map(Arc::new);
    let state = AppState {
        catalog: match &backend { Some(b) => b.clone() as Arc<dyn CatalogApi>, None => Arc::new(catalog) },
        carts: CartGateway::new(backend.clone().map(|b| b as Arc<dyn CartApi>), guest.clone()),
        wishlists: WishlistGateway::new(backend.clone().map(|b| b as Arc<dyn WishlistApi>), guest),
        orders: backend.map(|b| b as Arc<dyn OrderApi>),
        events: events.clone(),
        page_size: config.page_size,
        shutdown: CancellationToken::new(),
    };

    if let Some(url) = &config.nats_url {
        match async_nats::connect(url).await {
            Ok(client) => { tokio::spawn(forward_events(client, events, state.shutdown.clone())); }
            Err(e) => tracing::warn!(error = %e, "NATS unavailable, cart events stay local"),
        }
    }

    let shutdown = state.shutdown.clone();
    let app = router(state);
    tracing::info!("🛍️ OpenSASE Storefront listening on 0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    axum::serve(listener, app).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("shutting down");
        shutdown.cancel();
    }).await?;
    Ok(())
}

/// Relays bus events to NATS so other storefront instances can refresh.
async fn forward_events(client: async_nats::Client, events: EventBus, shutdown: CancellationToken) {
    let mut rx = events.subscribe();
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            r = rx.recv() => match r {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        };
        let payload = match serde_json::to_vec(&event) { Ok(p) => p, Err(_) => continue };
        let subject = if event.name() == "cartUpdated" { CART_SUBJECT.to_string() } else { format!("storefront.{}", event.name()) };
        if let Err(e) = client.publish(subject, payload.into()).await {
            tracing::warn!(error = %e, "failed to publish storefront event");
        }
    }
}
