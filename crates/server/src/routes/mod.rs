use axum::Router;
use serde::Deserialize;

use crate::DeploymentImpl;

pub mod academy;
pub mod accounts;
pub mod admin;
pub mod auth;
pub mod billing;
pub mod clients;
pub mod decor;
pub mod finance;
pub mod inventory;
pub mod personnel;
pub mod portal;
pub mod purchasing;
pub mod settings;
pub mod shop;
pub mod studio;
pub mod sync;
pub mod wifi;

/// Shared list filter: archived rows are hidden unless asked for.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new()
        .merge(auth::router(deployment))
        .merge(clients::router(deployment))
        .merge(academy::router(deployment))
        .merge(studio::router(deployment))
        .merge(decor::router(deployment))
        .merge(shop::router(deployment))
        .merge(wifi::router(deployment))
        .merge(purchasing::router(deployment))
        .merge(finance::router(deployment))
        .merge(personnel::router(deployment))
        .merge(inventory::router(deployment))
        .merge(billing::router(deployment))
        .merge(settings::router(deployment))
        .merge(accounts::router(deployment))
        .merge(sync::router(deployment))
        .merge(admin::router(deployment))
        .merge(portal::router(deployment))
}
