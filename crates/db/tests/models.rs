use db::DBService;
use db::models::{
    client::{Client, CreateClient, UpdateClient},
    inventory::{CreateInventoryItem, InventoryItem},
    shop::{CreateProduct, Product},
    wifi::{CreateWifiVoucher, VoucherStatus, WifiVoucher},
};
use uuid::Uuid;

async fn test_db() -> DBService {
    DBService::new_in_memory()
        .await
        .expect("in-memory database")
}

#[tokio::test]
async fn client_lifecycle_create_update_archive_purge() {
    let db = test_db().await;
    let client = Client::create(
        &db.pool,
        &CreateClient {
            name: "First".to_string(),
            email: Some("first@example.com".to_string()),
            phone: None,
            address: None,
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("create");

    let updated = Client::update(
        &db.pool,
        client.id,
        &UpdateClient {
            name: "First, renamed".to_string(),
            email: Some("first@example.com".to_string()),
            phone: Some("+23767000000".to_string()),
            address: None,
            notes: Some("VIP".to_string()),
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.name, "First, renamed");
    assert!(updated.updated_at >= client.updated_at);

    // Archived rows fall out of the default listing but stay fetchable.
    Client::set_archived(&db.pool, client.id, true).await.expect("archive");
    assert!(Client::find_all(&db.pool, false).await.expect("list").is_empty());
    assert_eq!(Client::find_all(&db.pool, true).await.expect("list").len(), 1);

    Client::set_archived(&db.pool, client.id, false).await.expect("restore");
    assert_eq!(Client::purge(&db.pool, client.id).await.expect("purge"), 0);

    Client::set_archived(&db.pool, client.id, true).await.expect("archive");
    assert_eq!(Client::purge(&db.pool, client.id).await.expect("purge"), 1);
    assert!(Client::find_by_id(&db.pool, client.id).await.expect("get").is_none());
}

#[tokio::test]
async fn inventory_adjustment_is_relative() {
    let db = test_db().await;
    let product = Product::create(
        &db.pool,
        &CreateProduct {
            name: "Frame".to_string(),
            category: None,
            price_cents: 2_000,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("product");
    let item = InventoryItem::create(
        &db.pool,
        &CreateInventoryItem {
            product_id: product.id,
            location: "main".to_string(),
            quantity: 10,
            reorder_level: 4,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("item");
    assert!(!item.needs_reorder());

    let item = InventoryItem::adjust_quantity(&db.pool, item.id, -7)
        .await
        .expect("adjust");
    assert_eq!(item.quantity, 3);
    assert!(item.needs_reorder());

    let item = InventoryItem::adjust_quantity(&db.pool, item.id, 12)
        .await
        .expect("adjust");
    assert_eq!(item.quantity, 15);
}

#[tokio::test]
async fn vouchers_sell_once_then_refuse() {
    let db = test_db().await;
    let voucher = WifiVoucher::create(
        &db.pool,
        &CreateWifiVoucher {
            code: "WZ-42".to_string(),
            duration_minutes: 120,
            price_cents: 1_000,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("voucher");
    assert_eq!(voucher.status, VoucherStatus::Available);

    let sold = WifiVoucher::mark_sold(&db.pool, voucher.id, None)
        .await
        .expect("sell");
    assert_eq!(sold.status, VoucherStatus::Sold);
    assert!(sold.sold_at.is_some());

    // Already sold: the guarded update matches no row.
    let again = WifiVoucher::mark_sold(&db.pool, voucher.id, None).await;
    assert!(matches!(again, Err(sqlx::Error::RowNotFound)));
}
