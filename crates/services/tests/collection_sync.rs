use chrono::Utc;
use db::DBService;
use db::models::{
    client::{Client, CreateClient},
    wifi::{CreateWifiVoucher, VoucherStatus, WifiVoucher},
};
use services::services::sync::SyncService;
use uuid::Uuid;

async fn test_db() -> DBService {
    DBService::new_in_memory()
        .await
        .expect("in-memory database")
}

async fn seed_client(db: &DBService, name: &str) -> Client {
    Client::create(
        &db.pool,
        &CreateClient {
            name: name.to_string(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("client")
}

fn new_voucher(code: &str) -> WifiVoucher {
    WifiVoucher {
        id: Uuid::now_v7(),
        code: code.to_string(),
        duration_minutes: 30,
        price_cents: 250,
        status: VoucherStatus::Available,
        sold_at: None,
        client_id: None,
        is_archived: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn reconciles_upserts_deletes_and_inserts() {
    let db = test_db().await;
    let kept = seed_client(&db, "kept").await;
    let dropped = seed_client(&db, "dropped").await;

    let mut desired: Vec<Client> = SyncService::fetch_collection(&db.pool)
        .await
        .expect("fetch");
    assert_eq!(desired.len(), 2);

    desired.retain(|c| c.id != dropped.id);
    for row in &mut desired {
        if row.id == kept.id {
            row.name = "kept, renamed".to_string();
        }
    }
    let mut added = desired[0].clone();
    added.id = Uuid::now_v7();
    added.name = "brand new".to_string();
    desired.push(added);

    let outcome = SyncService::sync_collection(&db.pool, desired)
        .await
        .expect("sync");
    assert_eq!(outcome.upserted, 2);
    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.rows.len(), 2);

    let names: Vec<String> = outcome.rows.iter().map(|c| c.name.clone()).collect();
    assert!(names.contains(&"kept, renamed".to_string()));
    assert!(names.contains(&"brand new".to_string()));
    assert!(Client::find_by_id(&db.pool, dropped.id)
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn unchanged_submission_applies_nothing() {
    let db = test_db().await;
    seed_client(&db, "steady").await;

    let desired: Vec<Client> = SyncService::fetch_collection(&db.pool)
        .await
        .expect("fetch");
    let outcome = SyncService::sync_collection(&db.pool, desired)
        .await
        .expect("sync");
    assert_eq!(outcome.upserted, 0);
    assert_eq!(outcome.deleted, 0);
    assert_eq!(outcome.rows.len(), 1);
}

#[tokio::test]
async fn failing_row_reverts_the_whole_batch() {
    let db = test_db().await;
    let existing = WifiVoucher::create(
        &db.pool,
        &CreateWifiVoucher {
            code: "WZ-0001".to_string(),
            duration_minutes: 60,
            price_cents: 500,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("voucher");

    // Second new row violates the unique voucher code; the first new row
    // must not survive either.
    let desired = vec![
        existing.clone(),
        new_voucher("WZ-0002"),
        new_voucher("WZ-0002"),
    ];
    let result = SyncService::sync_collection(&db.pool, desired).await;
    assert!(result.is_err());

    let rows = WifiVoucher::find_all(&db.pool, true).await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, "WZ-0001");
}
