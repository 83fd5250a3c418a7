// DbContext identity map and unit of work

use movie_models::genre;
use moviedb::{ApiError, DbContext};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, QueryOrder};

mod common;
use common::{ids, setup_seeded_db};

async fn rename_genre(db: &sea_orm::DatabaseConnection, id: i32, name: &str) {
    genre::ActiveModel {
        id: ActiveValue::Unchanged(id),
        name: ActiveValue::Set(name.to_string()),
    }
    .update(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_tracked_rows_are_served_from_the_identity_map() {
    let db = setup_seeded_db().await.unwrap();
    let mut ctx = DbContext::new(db.clone());

    let action = ctx.get::<genre::Entity>(ids::ACTION).await.unwrap().unwrap();
    assert_eq!(action.name, "Action");
    assert!(ctx.is_tracked::<genre::Entity>(ids::ACTION));
    assert!(!ctx.is_tracked::<genre::Entity>(ids::DRAMA));

    // changed behind the context's back
    rename_genre(&db, ids::ACTION, "Adventure").await;

    let again = ctx.get::<genre::Entity>(ids::ACTION).await.unwrap().unwrap();
    assert_eq!(again.name, "Action");

    let tracked = ctx
        .query_tracking(genre::Entity::find().order_by_asc(genre::Column::Id))
        .await
        .unwrap();
    assert_eq!(tracked[0].name, "Action");
    assert_eq!(ctx.tracked_count(), 5);

    let untracked = ctx
        .query(genre::Entity::find().order_by_asc(genre::Column::Id))
        .await
        .unwrap();
    assert_eq!(untracked[0].name, "Adventure");
}

#[tokio::test]
async fn test_missing_row_is_none_and_not_tracked() {
    let db = setup_seeded_db().await.unwrap();
    let mut ctx = DbContext::new(db);

    assert!(ctx.get::<genre::Entity>(999).await.unwrap().is_none());
    assert_eq!(ctx.tracked_count(), 0);
}

#[tokio::test]
async fn test_save_commits_and_clears_tracking() {
    let db = setup_seeded_db().await.unwrap();
    let mut ctx = DbContext::new(db.clone());

    ctx.get::<genre::Entity>(ids::COMEDY).await.unwrap();
    assert_eq!(ctx.tracked_count(), 1);

    let created = ctx
        .save(|txn| {
            Box::pin(async move {
                genre::ActiveModel {
                    name: ActiveValue::Set("Western".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await
            })
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Western");
    assert_eq!(ctx.tracked_count(), 0);

    let stored = genre::Entity::find_by_id(created.id).one(&db).await.unwrap();
    assert_eq!(stored.map(|g| g.name).as_deref(), Some("Western"));
}

#[tokio::test]
async fn test_failed_save_rolls_back_and_classifies_the_error() {
    let db = setup_seeded_db().await.unwrap();
    let mut ctx = DbContext::new(db.clone());
    ctx.get::<genre::Entity>(ids::COMEDY).await.unwrap();

    let err = ctx
        .save(|txn| {
            Box::pin(async move {
                genre::ActiveModel {
                    name: ActiveValue::Set("Noir".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                genre::ActiveModel {
                    name: ActiveValue::Set("Action".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Conflict { .. }), "{err:?}");
    assert_eq!(ctx.tracked_count(), 0);

    let genres = genre::Entity::find().all(&db).await.unwrap();
    assert_eq!(genres.len(), 5);
    assert!(genres.iter().all(|g| g.name != "Noir"));
}
