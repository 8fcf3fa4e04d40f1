use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod deployment;
pub mod error;
pub mod routes;
pub mod session;

pub use deployment::{DeploymentImpl, LocalDeployment};
pub use error::ApiError;

/// The full application router. State is attached by the caller so tests
/// can assemble the router around their own deployment.
pub fn app_router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new()
        .nest("/api", routes::router(deployment))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
