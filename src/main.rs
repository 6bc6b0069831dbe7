use crate::auth::SaltedCredentials;
use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::database_store::DatabaseStore;
use crate::http::{create_app, AppState};
use crate::local_store::InMemoryStore;
use crate::store::AppointmentStore;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod auth;
mod availability;
mod configuration;
mod configuration_handler;
mod database_store;
mod error;
mod http;
mod local_store;
mod roster;
mod schema;
mod session;
mod slots;
mod store;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#################");
    println!("# Turno Manager #");
    println!("#################");

    let configuration = ConfigurationHandler::parse_arguments();
    let credentials = Arc::new(SaltedCredentials::new(
        configuration.admin_username(),
        configuration.admin_password_salt(),
        configuration.admin_password_digest(),
    ));

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessable at:\n{}", address);
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap();

    let app = if let Some(database_url) = configuration.database_url() {
        let store = loop {
            match DatabaseStore::new(&database_url) {
                Ok(store) => {
                    info!("Successfully connected to database");
                    break store;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection: {database_url}. Retry in 1 sec. You may want to restart with database disabled (impersistent appointments).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        build_app(store, credentials).await
    } else {
        info!("No database configured, keeping appointments in memory");
        build_app(InMemoryStore::default(), credentials).await
    };

    axum::serve(listener, app).await.unwrap();
}

async fn build_app<S: AppointmentStore>(store: S, credentials: Arc<SaltedCredentials>) -> Router {
    let (roster, _feed_task) = roster::activate(&store)
        .await
        .expect("Failed to load the admin roster");
    create_app(AppState {
        store,
        roster,
        credentials,
    })
}
