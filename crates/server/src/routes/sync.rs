//! Generic table synchronization endpoints. `GET` returns the full stored
//! collection; `PUT` reconciles a submitted collection against it (diff,
//! single transaction, whole-revert on failure).

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::{
    models::{
        academy::{Course, Student},
        account::{Permission, User},
        billing::BillingDocument,
        client::Client,
        decor::DecorProject,
        finance::Transaction,
        inventory::InventoryItem,
        personnel::Employee,
        purchasing::{PurchaseOrder, Supplier},
        shop::{Product, Sale},
        studio::StudioBooking,
        wifi::WifiVoucher,
    },
    sync::SyncRecord,
};
use services::services::{
    permissions::PermissionService,
    sync::{SyncError, SyncService},
};
use sqlx::SqlitePool;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

/// Permission tag guarding each syncable table. Accounts, roles, payroll
/// and settings are deliberately absent: their writes stay behind their
/// service-mediated endpoints.
fn table_permission(table: &str) -> Option<Permission> {
    Some(match table {
        "clients" => Permission::Clients,
        "courses" | "students" => Permission::Academy,
        "studio_bookings" => Permission::Studio,
        "decor_projects" => Permission::Decor,
        "products" | "sales" => Permission::Shop,
        "wifi_vouchers" => Permission::WifiZone,
        "suppliers" | "purchase_orders" => Permission::Purchasing,
        "transactions" => Permission::Finance,
        "employees" => Permission::Personnel,
        "inventory_items" => Permission::Inventory,
        "billing_documents" => Permission::Billing,
        _ => return None,
    })
}

async fn fetch<T: SyncRecord>(pool: &SqlitePool) -> Result<serde_json::Value, ApiError> {
    let rows = SyncService::fetch_collection::<T>(pool).await?;
    Ok(serde_json::to_value(rows).map_err(SyncError::Serialization)?)
}

async fn apply<T: SyncRecord>(
    pool: &SqlitePool,
    body: serde_json::Value,
) -> Result<serde_json::Value, ApiError> {
    let desired: Vec<T> = serde_json::from_value(body).map_err(SyncError::Serialization)?;
    let outcome = SyncService::sync_collection(pool, desired).await?;
    Ok(serde_json::to_value(outcome).map_err(SyncError::Serialization)?)
}

async fn require_table_permission(
    pool: &SqlitePool,
    user: &User,
    table: &str,
) -> Result<(), ApiError> {
    let permission = table_permission(table).ok_or(ApiError::NotFound)?;
    PermissionService::require(pool, user, permission).await?;
    Ok(())
}

pub async fn fetch_table(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(table): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, ApiError> {
    let pool = &deployment.db().pool;
    require_table_permission(pool, &user, &table).await?;
    let rows = match table.as_str() {
        "clients" => fetch::<Client>(pool).await?,
        "courses" => fetch::<Course>(pool).await?,
        "students" => fetch::<Student>(pool).await?,
        "studio_bookings" => fetch::<StudioBooking>(pool).await?,
        "decor_projects" => fetch::<DecorProject>(pool).await?,
        "products" => fetch::<Product>(pool).await?,
        "sales" => fetch::<Sale>(pool).await?,
        "wifi_vouchers" => fetch::<WifiVoucher>(pool).await?,
        "suppliers" => fetch::<Supplier>(pool).await?,
        "purchase_orders" => fetch::<PurchaseOrder>(pool).await?,
        "transactions" => fetch::<Transaction>(pool).await?,
        "employees" => fetch::<Employee>(pool).await?,
        "inventory_items" => fetch::<InventoryItem>(pool).await?,
        "billing_documents" => fetch::<BillingDocument>(pool).await?,
        _ => return Err(ApiError::NotFound),
    };
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn sync_table(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path(table): Path<String>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, ApiError> {
    let pool = &deployment.db().pool;
    require_table_permission(pool, &user, &table).await?;
    let outcome = match table.as_str() {
        "clients" => apply::<Client>(pool, body).await?,
        "courses" => apply::<Course>(pool, body).await?,
        "students" => apply::<Student>(pool, body).await?,
        "studio_bookings" => apply::<StudioBooking>(pool, body).await?,
        "decor_projects" => apply::<DecorProject>(pool, body).await?,
        "products" => apply::<Product>(pool, body).await?,
        "sales" => apply::<Sale>(pool, body).await?,
        "wifi_vouchers" => apply::<WifiVoucher>(pool, body).await?,
        "suppliers" => apply::<Supplier>(pool, body).await?,
        "purchase_orders" => apply::<PurchaseOrder>(pool, body).await?,
        "transactions" => apply::<Transaction>(pool, body).await?,
        "employees" => apply::<Employee>(pool, body).await?,
        "inventory_items" => apply::<InventoryItem>(pool, body).await?,
        "billing_documents" => apply::<BillingDocument>(pool, body).await?,
        _ => return Err(ApiError::NotFound),
    };
    Ok(ResponseJson(ApiResponse::success(outcome)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/sync",
        Router::new().route("/{table}", get(fetch_table).put(sync_table)),
    )
}
