use chrono::Utc;
use db::DBService;
use db::models::{
    billing::{BillingDocument, CreateBillingDocument, DocumentKind, DocumentStatus},
    client::{Client, CreateClient},
    decor::{CreateDecorProject, DecorProject},
    finance::{Transaction, TransactionKind},
    line_item::LineItem,
    personnel::{CreateEmployee, CreatePayrollRun, Employee, PayrollRun, PayrollStatus},
    purchasing::{CreatePurchaseOrder, CreateSupplier, PurchaseOrder, Supplier},
    studio::{CreateStudioBooking, StudioBooking},
};
use services::services::{
    archive::{ArchiveError, ArchiveService},
    auth::AuthService,
    billing::{BillingError, BillingService},
    fixtures::{self, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD},
    payroll::{PayrollError, PayrollService},
};
use utils::jwt::SessionAudience;
use uuid::Uuid;

async fn test_db() -> DBService {
    DBService::new_in_memory()
        .await
        .expect("in-memory database")
}

fn lines(unit_price_cents: i64) -> Vec<LineItem> {
    vec![LineItem {
        description: "test line".to_string(),
        quantity: 2,
        unit_price_cents,
    }]
}

async fn seed_employee_with_run(db: &DBService) -> (Employee, PayrollRun) {
    let employee = Employee::create(
        &db.pool,
        &CreateEmployee {
            name: "Ada".to_string(),
            position: "Accountant".to_string(),
            email: None,
            phone: None,
            salary_cents: 300_000,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("employee");
    let run = PayrollRun::create(
        &db.pool,
        &CreatePayrollRun {
            employee_id: employee.id,
            period: "2026-08".to_string(),
            gross_cents: 300_000,
            deductions_cents: 30_000,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("payroll run");
    (employee, run)
}

#[tokio::test]
async fn confirming_payroll_books_exactly_one_expense() {
    let db = test_db().await;
    let (employee, run) = seed_employee_with_run(&db).await;

    let transaction = PayrollService::confirm(&db.pool, run.id).await.expect("confirm");
    assert_eq!(transaction.kind, TransactionKind::Expense);
    assert_eq!(transaction.amount_cents, 270_000);
    assert_eq!(transaction.source_ref, Some(run.id));
    assert!(transaction.label.contains(&employee.name));
    assert!(transaction.label.contains("2026-08"));

    let confirmed = PayrollRun::find_by_id(&db.pool, run.id)
        .await
        .expect("query")
        .expect("row");
    assert_eq!(confirmed.status, PayrollStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());

    let booked = Transaction::find_by_source_ref(&db.pool, run.id)
        .await
        .expect("query");
    assert_eq!(booked.len(), 1);
}

#[tokio::test]
async fn reconfirming_payroll_is_rejected_without_a_second_expense() {
    let db = test_db().await;
    let (_, run) = seed_employee_with_run(&db).await;

    PayrollService::confirm(&db.pool, run.id).await.expect("first confirm");
    let err = PayrollService::confirm(&db.pool, run.id).await.unwrap_err();
    assert!(matches!(err, PayrollError::AlreadyConfirmed));

    let booked = Transaction::find_by_source_ref(&db.pool, run.id)
        .await
        .expect("query");
    assert_eq!(booked.len(), 1);
}

#[tokio::test]
async fn supplier_with_open_orders_cannot_be_archived() {
    let db = test_db().await;
    let supplier = Supplier::create(
        &db.pool,
        &CreateSupplier {
            name: "Acme".to_string(),
            email: None,
            phone: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("supplier");
    let order = PurchaseOrder::create(
        &db.pool,
        &CreatePurchaseOrder {
            supplier_id: supplier.id,
            reference: "PO-1".to_string(),
            lines: lines(1_000),
        },
        Uuid::now_v7(),
    )
    .await
    .expect("order");

    let err = ArchiveService::archive_supplier(&db.pool, supplier.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::StillReferenced { entity: "supplier", .. }));

    PurchaseOrder::set_archived(&db.pool, order.id, true)
        .await
        .expect("archive order");
    ArchiveService::archive_supplier(&db.pool, supplier.id)
        .await
        .expect("archive supplier");
}

#[tokio::test]
async fn employee_with_draft_payroll_cannot_be_archived() {
    let db = test_db().await;
    let (employee, run) = seed_employee_with_run(&db).await;

    let err = ArchiveService::archive_employee(&db.pool, employee.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::StillReferenced { entity: "employee", .. }));

    PayrollService::confirm(&db.pool, run.id).await.expect("confirm");
    ArchiveService::archive_employee(&db.pool, employee.id)
        .await
        .expect("archive employee");
}

#[tokio::test]
async fn client_with_documents_cannot_be_archived() {
    let db = test_db().await;
    let client = Client::create(
        &db.pool,
        &CreateClient {
            name: "Nadia".to_string(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("client");
    BillingDocument::create(
        &db.pool,
        &CreateBillingDocument {
            kind: DocumentKind::Invoice,
            client_id: client.id,
            lines: lines(5_000),
        },
        Uuid::now_v7(),
    )
    .await
    .expect("document");

    let err = ArchiveService::archive_client(&db.pool, client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::StillReferenced { entity: "client", .. }));
}

#[tokio::test]
async fn client_with_bookings_or_projects_cannot_be_archived() {
    let db = test_db().await;
    let client = Client::create(
        &db.pool,
        &CreateClient {
            name: "Booked".to_string(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("client");

    let booking = StudioBooking::create(
        &db.pool,
        &CreateStudioBooking {
            client_id: Some(client.id),
            service: "portrait session".to_string(),
            scheduled_at: Utc::now(),
            duration_minutes: 60,
            price_cents: 15_000,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("booking");
    let err = ArchiveService::archive_client(&db.pool, client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::StillReferenced { entity: "client", .. }));
    StudioBooking::set_archived(&db.pool, booking.id, true)
        .await
        .expect("archive booking");

    let project = DecorProject::create(
        &db.pool,
        &CreateDecorProject {
            client_id: Some(client.id),
            title: "Lobby refresh".to_string(),
            description: None,
            budget_cents: 80_000,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("project");
    let err = ArchiveService::archive_client(&db.pool, client.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ArchiveError::StillReferenced { entity: "client", .. }));
    DecorProject::set_archived(&db.pool, project.id, true)
        .await
        .expect("archive project");

    ArchiveService::archive_client(&db.pool, client.id)
        .await
        .expect("archive client");
}

#[tokio::test]
async fn issuing_allocates_sequential_numbers_per_kind() {
    let db = test_db().await;
    let client = Client::create(
        &db.pool,
        &CreateClient {
            name: "Numbering".to_string(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("client");

    let create = |kind| CreateBillingDocument {
        kind,
        client_id: client.id,
        lines: lines(2_500),
    };
    let first = BillingDocument::create(&db.pool, &create(DocumentKind::Invoice), Uuid::now_v7())
        .await
        .expect("doc");
    let second = BillingDocument::create(&db.pool, &create(DocumentKind::Invoice), Uuid::now_v7())
        .await
        .expect("doc");
    let quote = BillingDocument::create(&db.pool, &create(DocumentKind::Quote), Uuid::now_v7())
        .await
        .expect("doc");

    let first = BillingService::issue(&db.pool, first.id).await.expect("issue");
    let second = BillingService::issue(&db.pool, second.id).await.expect("issue");
    let quote = BillingService::issue(&db.pool, quote.id).await.expect("issue");

    assert_eq!(first.number.as_deref(), Some("INV-0001"));
    assert_eq!(second.number.as_deref(), Some("INV-0002"));
    assert_eq!(quote.number.as_deref(), Some("QUO-0001"));
    assert_eq!(first.status, DocumentStatus::Issued);

    let err = BillingService::issue(&db.pool, first.id).await.unwrap_err();
    assert!(matches!(err, BillingError::NotDraft));
}

#[tokio::test]
async fn paying_an_issued_document_books_income() {
    let db = test_db().await;
    let client = Client::create(
        &db.pool,
        &CreateClient {
            name: "Payer".to_string(),
            email: None,
            phone: None,
            address: None,
            notes: None,
        },
        Uuid::now_v7(),
    )
    .await
    .expect("client");
    let document = BillingDocument::create(
        &db.pool,
        &CreateBillingDocument {
            kind: DocumentKind::Invoice,
            client_id: client.id,
            lines: lines(10_000),
        },
        Uuid::now_v7(),
    )
    .await
    .expect("doc");

    // Drafts cannot be paid.
    let err = BillingService::pay(&db.pool, document.id).await.unwrap_err();
    assert!(matches!(err, BillingError::NotIssued));

    BillingService::issue(&db.pool, document.id).await.expect("issue");
    let paid = BillingService::pay(&db.pool, document.id).await.expect("pay");
    assert_eq!(paid.status, DocumentStatus::Paid);

    let booked = Transaction::find_by_source_ref(&db.pool, document.id)
        .await
        .expect("query");
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].kind, TransactionKind::Income);
    assert_eq!(booked[0].amount_cents, 20_000);

    let err = BillingService::pay(&db.pool, document.id).await.unwrap_err();
    assert!(matches!(err, BillingError::NotIssued));
}

#[tokio::test]
async fn demo_seed_supports_both_logins() {
    let db = test_db().await;
    fixtures::seed_demo_data(&db).await;

    let (admin, token) = AuthService::login(
        &db.pool,
        "secret",
        DEMO_ADMIN_EMAIL,
        DEMO_ADMIN_PASSWORD,
        SessionAudience::Dashboard,
    )
    .await
    .expect("admin login");
    assert!(!token.is_empty());

    let resolved =
        AuthService::resolve_session(&db.pool, "secret", &token, SessionAudience::Dashboard)
            .await
            .expect("resolve");
    assert_eq!(resolved.id, admin.id);

    // Wrong password and wrong audience both fail closed.
    assert!(
        AuthService::login(
            &db.pool,
            "secret",
            DEMO_ADMIN_EMAIL,
            "nope",
            SessionAudience::Dashboard,
        )
        .await
        .is_err()
    );
    assert!(
        AuthService::login(
            &db.pool,
            "secret",
            DEMO_ADMIN_EMAIL,
            DEMO_ADMIN_PASSWORD,
            SessionAudience::Portal,
        )
        .await
        .is_err()
    );

    // The portal account seeded next to the demo client works on its side.
    let (portal_user, _) = AuthService::login(
        &db.pool,
        "secret",
        "amina@example.com",
        "portal",
        SessionAudience::Portal,
    )
    .await
    .expect("portal login");
    assert!(portal_user.client_id.is_some());

    // Seeding twice is a no-op.
    fixtures::seed_demo_data(&db).await;
    let clients = Client::find_all(&db.pool, true).await.expect("clients");
    assert_eq!(clients.len(), 1);
}
