//! Demo-mode fixture data. Seeding failures are logged and absorbed; a
//! half-seeded demo database is still usable.

use db::DBService;
use db::models::{
    academy::{CreateCourse, CreateStudent, Course, Student},
    account::{ADMIN_ROLE, CreateRole, CreateUser, Permission, Role, User, UserKind},
    client::{Client, CreateClient},
    inventory::{CreateInventoryItem, InventoryItem},
    personnel::{CreateEmployee, CreatePayrollRun, Employee, PayrollRun},
    purchasing::{CreatePurchaseOrder, CreateSupplier, PurchaseOrder, Supplier},
    settings::{
        BILLING_COUNTERS_ID, BillingCounters, COMPANY_PROFILE_ID, CompanyProfile, SettingsDoc,
        WIFI_ZONE_SETTINGS_ID, WifiZoneSettings,
    },
    shop::{CreateProduct, Product},
    wifi::{CreateWifiVoucher, WifiVoucher},
    line_item::LineItem,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::auth::hash_password;

pub const DEMO_ADMIN_EMAIL: &str = "admin@demo.local";
pub const DEMO_ADMIN_PASSWORD: &str = "admin";

/// Seed the demo dataset. Errors never propagate; each failed step is
/// logged and skipped.
pub async fn seed_demo_data(db: &DBService) {
    if let Err(e) = seed(db).await {
        warn!(error = %e, "demo seeding failed, continuing with partial data");
    }
}

async fn seed(db: &DBService) -> Result<(), sqlx::Error> {
    let pool = &db.pool;

    if User::find_by_email(pool, DEMO_ADMIN_EMAIL).await?.is_some() {
        info!("demo data already present, skipping seed");
        return Ok(());
    }

    let admin_role = Role::create(
        pool,
        &CreateRole {
            name: ADMIN_ROLE.to_string(),
            permissions: vec![],
        },
        Uuid::now_v7(),
    )
    .await?;
    let manager_role = Role::create(
        pool,
        &CreateRole {
            name: "manager".to_string(),
            permissions: vec![
                Permission::Clients,
                Permission::Academy,
                Permission::Studio,
                Permission::Decor,
                Permission::Shop,
                Permission::WifiZone,
                Permission::Purchasing,
                Permission::Finance,
                Permission::Personnel,
                Permission::Inventory,
                Permission::Billing,
            ],
        },
        Uuid::now_v7(),
    )
    .await?;

    User::create(
        pool,
        &CreateUser {
            email: DEMO_ADMIN_EMAIL.to_string(),
            password_hash: hash_password(DEMO_ADMIN_PASSWORD),
            kind: UserKind::Staff,
            role_id: Some(admin_role.id),
            client_id: None,
        },
        Uuid::now_v7(),
    )
    .await?;
    User::create(
        pool,
        &CreateUser {
            email: "manager@demo.local".to_string(),
            password_hash: hash_password("manager"),
            kind: UserKind::Staff,
            role_id: Some(manager_role.id),
            client_id: None,
        },
        Uuid::now_v7(),
    )
    .await?;

    let client = Client::create(
        pool,
        &CreateClient {
            name: "Amina Toko".to_string(),
            email: Some("amina@example.com".to_string()),
            phone: Some("+237677889900".to_string()),
            address: Some("Bonapriso, Douala".to_string()),
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await?;
    User::create(
        pool,
        &CreateUser {
            email: "amina@example.com".to_string(),
            password_hash: hash_password("portal"),
            kind: UserKind::Portal,
            role_id: None,
            client_id: Some(client.id),
        },
        Uuid::now_v7(),
    )
    .await?;

    let course = Course::create(
        pool,
        &CreateCourse {
            name: "Photography basics".to_string(),
            description: Some("Eight-week evening course".to_string()),
            fee_cents: 7_500_00,
            schedule: Some("Tue/Thu 18:00".to_string()),
        },
        Uuid::now_v7(),
    )
    .await?;
    Student::create(
        pool,
        &CreateStudent {
            name: "Boris Ndam".to_string(),
            email: Some("boris@example.com".to_string()),
            phone: None,
            course_id: Some(course.id),
        },
        Uuid::now_v7(),
    )
    .await?;

    let product = Product::create(
        pool,
        &CreateProduct {
            name: "Canvas print 40x60".to_string(),
            category: Some("prints".to_string()),
            price_cents: 1_500_00,
        },
        Uuid::now_v7(),
    )
    .await?;
    InventoryItem::create(
        pool,
        &CreateInventoryItem {
            product_id: product.id,
            location: "main".to_string(),
            quantity: 24,
            reorder_level: 5,
        },
        Uuid::now_v7(),
    )
    .await?;

    let supplier = Supplier::create(
        pool,
        &CreateSupplier {
            name: "Douala Print Supplies".to_string(),
            email: Some("sales@dps.example".to_string()),
            phone: None,
        },
        Uuid::now_v7(),
    )
    .await?;
    PurchaseOrder::create(
        pool,
        &CreatePurchaseOrder {
            supplier_id: supplier.id,
            reference: "PO-2026-001".to_string(),
            lines: vec![LineItem {
                description: "Canvas rolls".to_string(),
                quantity: 10,
                unit_price_cents: 45_00,
            }],
        },
        Uuid::now_v7(),
    )
    .await?;

    let employee = Employee::create(
        pool,
        &CreateEmployee {
            name: "Clarisse Mbia".to_string(),
            position: "Studio manager".to_string(),
            email: None,
            phone: None,
            salary_cents: 2_500_00,
        },
        Uuid::now_v7(),
    )
    .await?;
    PayrollRun::create(
        pool,
        &CreatePayrollRun {
            employee_id: employee.id,
            period: "2026-08".to_string(),
            gross_cents: 2_500_00,
            deductions_cents: 250_00,
        },
        Uuid::now_v7(),
    )
    .await?;

    WifiVoucher::create(
        pool,
        &CreateWifiVoucher {
            code: "WZ-DEMO-0001".to_string(),
            duration_minutes: 60,
            price_cents: 500,
        },
        Uuid::now_v7(),
    )
    .await?;

    let profile = CompanyProfile {
        name: "Comptoir Demo SARL".to_string(),
        address: Some("Akwa, Douala".to_string()),
        phone: Some("+237233424242".to_string()),
        email: Some("hello@comptoir.example".to_string()),
        tax_id: None,
    };
    SettingsDoc::put(
        pool,
        COMPANY_PROFILE_ID,
        &serde_json::to_string(&profile).unwrap_or_else(|_| "{}".to_string()),
    )
    .await?;
    SettingsDoc::put(
        pool,
        BILLING_COUNTERS_ID,
        &serde_json::to_string(&BillingCounters::default()).unwrap_or_else(|_| "{}".to_string()),
    )
    .await?;
    let wifi = WifiZoneSettings {
        ssid: "comptoir-wifi".to_string(),
        bandwidth_mbps: 20,
        rate_per_hour_cents: 500,
    };
    SettingsDoc::put(
        pool,
        WIFI_ZONE_SETTINGS_ID,
        &serde_json::to_string(&wifi).unwrap_or_else(|_| "{}".to_string()),
    )
    .await?;

    info!("demo data seeded");
    Ok(())
}
