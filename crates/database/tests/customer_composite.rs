//! Live-database tests for the compound customer + details operations:
//! create/update/delete atomicity, the details upsert, and the joined bulk
//! view.
//!
//! Run with `cargo test -- --ignored` against a reachable PostgreSQL
//! instance (see `common`).

mod common;

use core_types::{Customer, CustomerDetails, CustomerFullView};
use database::{CustomerService, DbError};

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn create_stores_both_rows_and_feeds_the_joined_view() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 205).await;
    let service = CustomerService::new(pool.clone());

    let customer = Customer {
        id: 205,
        name: "Ana".to_string(),
        email: "ana@x".to_string(),
    };
    let details = CustomerDetails::new(
        205,
        Some("C/Mayor 1".to_string()),
        Some("600".to_string()),
        Some("VIP".to_string()),
    );

    service
        .create_customer_with_details(&customer, &details)
        .await
        .unwrap();

    assert_eq!(
        service.customers().find_by_id(205).await.unwrap(),
        Some(customer.clone())
    );
    assert_eq!(
        service.details().find_by_id(205).await.unwrap(),
        Some(details.clone())
    );

    let full: Vec<CustomerFullView> = service
        .list_customers_full()
        .await
        .unwrap()
        .into_iter()
        .filter(|view| view.id == 205)
        .collect();
    assert_eq!(full, vec![CustomerFullView::from_parts(&customer, &details)]);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn customers_without_details_stay_out_of_the_joined_view() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 206).await;
    let service = CustomerService::new(pool.clone());

    service
        .customers()
        .insert(&Customer {
            id: 206,
            name: "Itziar".to_string(),
            email: "itziar@x".to_string(),
        })
        .await
        .unwrap();

    let full = service.list_customers_full().await.unwrap();
    assert!(full.iter().all(|view| view.id != 206));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn create_rolls_back_the_customer_when_the_details_insert_collides() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 250).await;
    common::purge_customer(&pool, 251).await;
    let service = CustomerService::new(pool.clone());

    // Preload a customer that already owns a details row.
    service
        .create_customer_with_details(
            &Customer {
                id: 250,
                name: "Uxue".to_string(),
                email: "uxue@x".to_string(),
            },
            &CustomerDetails::new(250, Some("Pza Berria 2".to_string()), None, None),
        )
        .await
        .unwrap();

    // The second insert collides on the preloaded details row, so the whole
    // call must roll back.
    let err = service
        .create_customer_with_details(
            &Customer {
                id: 251,
                name: "Oier".to_string(),
                email: "oier@x".to_string(),
            },
            &CustomerDetails::new(250, Some("otra".to_string()), None, None),
        )
        .await
        .unwrap_err();

    match err {
        DbError::Persistence { source } => {
            assert!(matches!(*source, DbError::DuplicateKey(_)), "got {source:?}")
        }
        other => panic!("expected a rolled-back transaction, got {other:?}"),
    }
    assert_eq!(service.customers().find_by_id(251).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn create_rolls_back_the_customer_when_the_details_point_elsewhere() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 252).await;
    common::purge_customer(&pool, 253).await;
    let service = CustomerService::new(pool.clone());

    let err = service
        .create_customer_with_details(
            &Customer {
                id: 252,
                name: "Nerea".to_string(),
                email: "nerea@x".to_string(),
            },
            &CustomerDetails::new(253, None, None, None),
        )
        .await
        .unwrap_err();

    match err {
        DbError::Persistence { source } => {
            assert!(matches!(*source, DbError::Referential(_)), "got {source:?}")
        }
        other => panic!("expected a rolled-back transaction, got {other:?}"),
    }
    assert_eq!(service.customers().find_by_id(252).await.unwrap(), None);
    assert_eq!(service.details().find_by_id(253).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn update_inserts_the_details_row_on_first_edit() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 210).await;
    let service = CustomerService::new(pool.clone());

    // A customer that has never had details.
    service
        .customers()
        .insert(&Customer {
            id: 210,
            name: "Luis".to_string(),
            email: "l@x".to_string(),
        })
        .await
        .unwrap();

    service
        .update_customer_with_details(
            &Customer {
                id: 210,
                name: "Luis M".to_string(),
                email: "l@x".to_string(),
            },
            &CustomerDetails::new(210, Some("Av 2".to_string()), None, None),
        )
        .await
        .unwrap();

    let customer = service.customers().find_by_id(210).await.unwrap().unwrap();
    assert_eq!(customer.name, "Luis M");

    let details = service.details().find_by_id(210).await.unwrap().unwrap();
    assert_eq!(details.address.as_deref(), Some("Av 2"));
    assert_eq!(details.phone, None);
    assert_eq!(details.notes, None);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn update_overwrites_an_existing_details_row() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 211).await;
    let service = CustomerService::new(pool.clone());

    service
        .create_customer_with_details(
            &Customer {
                id: 211,
                name: "Olatz".to_string(),
                email: "olatz@x".to_string(),
            },
            &CustomerDetails::new(211, Some("vieja".to_string()), Some("600".to_string()), None),
        )
        .await
        .unwrap();

    service
        .update_customer_with_details(
            &Customer {
                id: 211,
                name: "Olatz".to_string(),
                email: "olatz@x".to_string(),
            },
            &CustomerDetails::new(211, Some("nueva".to_string()), None, Some("mudada".to_string())),
        )
        .await
        .unwrap();

    let details = service.details().find_by_id(211).await.unwrap().unwrap();
    assert_eq!(details.address.as_deref(), Some("nueva"));
    assert_eq!(details.phone, None);
    assert_eq!(details.notes.as_deref(), Some("mudada"));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn update_of_a_missing_customer_fails_on_the_details_not_the_customer() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 260).await;
    let service = CustomerService::new(pool.clone());

    // The customer update affects zero rows, which is not an error for this
    // operation; the failure must come from the details insert instead.
    let err = service
        .update_customer_with_details(
            &Customer {
                id: 260,
                name: "Fantasma".to_string(),
                email: "f@x".to_string(),
            },
            &CustomerDetails::new(260, Some("ninguna".to_string()), None, None),
        )
        .await
        .unwrap_err();

    match err {
        DbError::Persistence { source } => {
            assert!(matches!(*source, DbError::Referential(_)), "got {source:?}")
        }
        other => panic!("expected a rolled-back transaction, got {other:?}"),
    }
    assert_eq!(service.customers().find_by_id(260).await.unwrap(), None);
    assert_eq!(service.details().find_by_id(260).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn a_failed_update_leaves_the_original_customer_untouched() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 212).await;
    common::purge_customer(&pool, 213).await;
    let service = CustomerService::new(pool.clone());

    service
        .customers()
        .insert(&Customer {
            id: 212,
            name: "Marta".to_string(),
            email: "marta@x".to_string(),
        })
        .await
        .unwrap();

    // The details carry an id with no customer behind it, so the second step
    // fails and the already-applied rename must be rolled back.
    let err = service
        .update_customer_with_details(
            &Customer {
                id: 212,
                name: "Marta X".to_string(),
                email: "marta@x".to_string(),
            },
            &CustomerDetails::new(213, None, None, None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Persistence { .. }), "got {err:?}");

    let customer = service.customers().find_by_id(212).await.unwrap().unwrap();
    assert_eq!(customer.name, "Marta");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn delete_removes_both_rows_and_reports_the_customer_count() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 240).await;
    let service = CustomerService::new(pool.clone());

    service
        .create_customer_with_details(
            &Customer {
                id: 240,
                name: "Josu".to_string(),
                email: "josu@x".to_string(),
            },
            &CustomerDetails::new(240, Some("C/Luna 4".to_string()), None, None),
        )
        .await
        .unwrap();

    assert_eq!(service.delete_customer_and_details(240).await.unwrap(), 1);
    assert_eq!(service.customers().find_by_id(240).await.unwrap(), None);
    assert_eq!(service.details().find_by_id(240).await.unwrap(), None);

    // A second delete finds nothing and changes nothing.
    assert_eq!(service.delete_customer_and_details(240).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn delete_of_a_customer_without_details_still_reports_one() {
    let pool = common::pool().await;
    common::purge_customer(&pool, 241).await;
    let service = CustomerService::new(pool.clone());

    service
        .customers()
        .insert(&Customer {
            id: 241,
            name: "Aitor".to_string(),
            email: "aitor@x".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(service.delete_customer_and_details(241).await.unwrap(), 1);
    assert_eq!(service.customers().find_by_id(241).await.unwrap(), None);
}
