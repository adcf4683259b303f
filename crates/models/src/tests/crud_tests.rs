use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait};
use uuid::Uuid;

use super::{setup_test_db, unique_phone};
use crate::errors::ModelError;
use crate::{bike, customer, expense, insurance_policy, loyalty_account, service_job, spare_part, user, vehicle_registration};

#[tokio::test]
async fn test_customer_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let created = customer::create(&db, customer::NewCustomer {
        name: "Anil Kumar".into(),
        phone: unique_phone(),
        email: Some("ANIL@example.com".into()),
        address: None,
    })
    .await?;
    assert_eq!(created.email.as_deref(), Some("anil@example.com"));

    let mut am: customer::ActiveModel = created.clone().into();
    customer::CustomerPatch { address: Some("12 MG Road".into()), ..Default::default() }.apply(&mut am)?;
    let updated = am.update(&db).await?;
    assert_eq!(updated.address.as_deref(), Some("12 MG Road"));

    customer::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(!customer::exists(&db, created.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_user_email_unique() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = format!("staff_{}@example.com", Uuid::new_v4());
    let u = user::create(&db, &email, "Staff", user::Role::Staff).await?;
    let dup = user::create(&db, &email, "Other", user::Role::Staff).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    assert!(user::hard_delete(&db, u.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_stock_movements() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let b = bike::create(&db, bike::NewBike {
        brand: "Hero".into(),
        model_name: "Splendor".into(),
        category: "motorcycle".into(),
        color: None,
        engine_cc: 100,
        price_cents: 7_500_000,
        stock: 2,
    })
    .await?;
    let b = bike::take_stock(&db, b.id, 2).await?;
    assert_eq!(b.stock, 0);
    assert!(matches!(bike::take_stock(&db, b.id, 1).await, Err(ModelError::Validation(_))));
    bike::Entity::delete_by_id(b.id).exec(&db).await?;

    let part_number = format!("T-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let p = spare_part::create(&db, spare_part::NewSparePart {
        name: "Chain".into(),
        part_number: part_number.clone(),
        quantity: 3,
        unit_price_cents: 90_000,
        reorder_level: 5,
    })
    .await?;
    assert!(p.needs_reorder());
    let p = spare_part::adjust_quantity(&db, p.id, 10).await?;
    assert_eq!(p.quantity, 13);
    assert!(spare_part::adjust_quantity(&db, p.id, -14).await.is_err());

    let dup = spare_part::create(&db, spare_part::NewSparePart {
        name: "Chain again".into(),
        part_number,
        quantity: 0,
        unit_price_cents: 1,
        reorder_level: 0,
    })
    .await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    spare_part::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_customer_dependents() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let c = customer::create(&db, customer::NewCustomer {
        name: "Deps".into(),
        phone: unique_phone(),
        email: None,
        address: None,
    })
    .await?;

    let job = service_job::create(&db, service_job::NewServiceJob {
        customer_id: c.id,
        vehicle_number: "ka01 ab 1".into(),
        description: "Brake check".into(),
        labour_cents: 30_000,
        parts_cents: 0,
    })
    .await?;
    let job = service_job::transition(job, service_job::JobStatus::InProgress)?.update(&db).await?;
    assert_eq!(job.status, service_job::JobStatus::InProgress);

    let missing = service_job::create(&db, service_job::NewServiceJob {
        customer_id: Uuid::new_v4(),
        vehicle_number: "KA01".into(),
        description: "x".into(),
        labour_cents: 0,
        parts_cents: 0,
    })
    .await;
    assert!(matches!(missing, Err(ModelError::Validation(_))));

    let today = Utc::now().date_naive();
    let policy = insurance_policy::create(&db, insurance_policy::NewInsurancePolicy {
        customer_id: c.id,
        vehicle_number: "KA01AB1".into(),
        provider: "Acme Insurance".into(),
        policy_number: format!("pol-{}", Uuid::new_v4()),
        premium_cents: 250_000,
        start_date: today,
        end_date: today + Duration::days(365),
    })
    .await?;
    assert!(policy.policy_number.starts_with("POL-"));

    let reg = vehicle_registration::create(&db, vehicle_registration::NewRegistration {
        customer_id: c.id,
        bike_id: None,
        vehicle_number: format!("TS{}", &Uuid::new_v4().simple().to_string()[..8]),
        chassis_number: "ch1".into(),
        engine_number: "en1".into(),
        registered_on: today,
    })
    .await?;
    let dup = vehicle_registration::create(&db, vehicle_registration::NewRegistration {
        customer_id: c.id,
        bike_id: None,
        vehicle_number: reg.vehicle_number.clone(),
        chassis_number: "ch2".into(),
        engine_number: "en2".into(),
        registered_on: today,
    })
    .await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    let acc = loyalty_account::earn(&db, c.id, 120).await?;
    assert_eq!(acc.tier(), loyalty_account::Tier::Silver);
    let acc = loyalty_account::redeem(&db, c.id, 20).await?;
    assert_eq!((acc.points, acc.lifetime_points), (100, 120));
    assert!(loyalty_account::redeem(&db, c.id, 101).await.is_err());

    service_job::Entity::delete_by_id(job.id).exec(&db).await?;
    customer::Entity::delete_by_id(c.id).exec(&db).await?;
    assert!(insurance_policy::Entity::find_by_id(policy.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_expense_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let e = expense::create(&db, expense::NewExpense {
        category: "Utilities".into(),
        description: Some("Electricity".into()),
        amount_cents: 420_000,
        spent_on: Utc::now().date_naive(),
    })
    .await?;
    assert_eq!(e.category, "utilities");
    let res = expense::Entity::delete_by_id(e.id).exec(&db).await?;
    assert_eq!(res.rows_affected, 1);
    Ok(())
}
