//! Admin-only destructive operations. Purge permanently deletes a row,
//! and only rows that are already archived are eligible.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::delete,
};
use db::models::{
    academy::{Course, Student},
    account::{Role, User},
    billing::BillingDocument,
    client::Client,
    decor::DecorProject,
    finance::Transaction,
    inventory::InventoryItem,
    personnel::{Employee, PayrollRun},
    purchasing::{PurchaseOrder, Supplier},
    shop::{Product, Sale},
    studio::StudioBooking,
    wifi::WifiVoucher,
};
use sqlx::SqlitePool;
use tracing::warn;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError, session::StaffSession};

async fn require_admin(pool: &SqlitePool, user: &User) -> Result<(), ApiError> {
    let role = match user.role_id {
        Some(role_id) => Role::find_by_id(pool, role_id).await?,
        None => None,
    };
    match role {
        Some(role) if role.is_admin() => Ok(()),
        _ => Err(ApiError::AdminOnly),
    }
}

/// `DELETE /admin/purge/{table}/{id}`. Every purge refuses non-archived
/// rows at the data layer, which reads back as a not-found here.
pub async fn purge_row(
    State(deployment): State<DeploymentImpl>,
    StaffSession(user): StaffSession,
    Path((table, id)): Path<(String, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &deployment.db().pool;
    require_admin(pool, &user).await?;
    let purged = match table.as_str() {
        "clients" => Client::purge(pool, id).await?,
        "courses" => Course::purge(pool, id).await?,
        "students" => Student::purge(pool, id).await?,
        "studio_bookings" => StudioBooking::purge(pool, id).await?,
        "decor_projects" => DecorProject::purge(pool, id).await?,
        "products" => Product::purge(pool, id).await?,
        "sales" => Sale::purge(pool, id).await?,
        "wifi_vouchers" => WifiVoucher::purge(pool, id).await?,
        "suppliers" => Supplier::purge(pool, id).await?,
        "purchase_orders" => PurchaseOrder::purge(pool, id).await?,
        "transactions" => Transaction::purge(pool, id).await?,
        "employees" => Employee::purge(pool, id).await?,
        "payroll_runs" => PayrollRun::purge(pool, id).await?,
        "inventory_items" => InventoryItem::purge(pool, id).await?,
        "billing_documents" => BillingDocument::purge(pool, id).await?,
        "users" => User::purge(pool, id).await?,
        _ => return Err(ApiError::NotFound),
    };
    if purged == 0 {
        return Err(ApiError::Conflict(
            "row is missing or not archived".to_string(),
        ));
    }
    warn!(table, id = %id, "row purged");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/admin",
        Router::new().route("/purge/{table}/{id}", delete(purge_row)),
    )
}
