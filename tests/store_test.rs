//! Runs against a real Postgres: `DATABASE_URL=... cargo test -- --ignored`.

use std::env;

use chrono::{Duration, Utc};
use kanban_backend::{
    dto::webhook_dto::{CreateWebhookPayload, UpdateWebhookPayload},
    error::Error,
    models::{activity::ActivityType, webhook::WebhookEvent},
    services::{
        activity_service::ActivityService, webhook_dispatcher::WebhookEndpointStore,
        webhook_service::WebhookService,
    },
    utils::token::generate_public_id,
};
use sqlx::PgPool;

async fn setup_pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set for store tests");
    let pool = PgPool::connect(&url).await.expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

fn workspace_id() -> i64 {
    i64::from(rand::random::<u32>())
}

fn create_payload(url: &str, events: Vec<WebhookEvent>) -> CreateWebhookPayload {
    CreateWebhookPayload {
        name: "Deploy bot".into(),
        url: url.into(),
        secret: Some("whsec_abc".into()),
        events,
        active: None,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn webhook_crud_round_trip() {
    let service = WebhookService::new(setup_pool().await);
    let workspace = workspace_id();

    let created = service
        .create(
            workspace,
            create_payload(
                "https://example.com/hook",
                vec![WebhookEvent::CardCreated, WebhookEvent::CardCreated, WebhookEvent::CardMoved],
            ),
        )
        .await
        .expect("create");
    assert_eq!(created.public_id.len(), 12);
    assert!(created.active);
    assert_eq!(created.events, vec![WebhookEvent::CardCreated, WebhookEvent::CardMoved]);
    assert_eq!(created.secret.as_deref(), Some("whsec_abc"));

    let listed = service.list(workspace).await.expect("list");
    assert_eq!(listed.len(), 1);

    let updated = service
        .update(
            workspace,
            &created.public_id,
            UpdateWebhookPayload {
                secret: Some(String::new()),
                active: Some(false),
                ..UpdateWebhookPayload::default()
            },
        )
        .await
        .expect("update");
    assert!(updated.secret.is_none());
    assert!(!updated.active);
    assert_eq!(updated.url, "https://example.com/hook");
    assert!(updated.updated_at.is_some());

    service
        .delete(workspace, &created.public_id)
        .await
        .expect("delete");
    assert!(matches!(
        service.get(workspace, &created.public_id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        service.delete(workspace, &created.public_id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn store_returns_only_active_subscribers() {
    let service = WebhookService::new(setup_pool().await);
    let workspace = workspace_id();

    let created_only = service
        .create(workspace, create_payload("https://a.example.com/hook", vec![WebhookEvent::CardCreated]))
        .await
        .expect("create");
    service
        .create(workspace, create_payload("https://b.example.com/hook", vec![WebhookEvent::CardDeleted]))
        .await
        .expect("create");
    let paused = service
        .create(workspace, create_payload("https://c.example.com/hook", vec![WebhookEvent::CardCreated]))
        .await
        .expect("create");
    service
        .update(
            workspace,
            &paused.public_id,
            UpdateWebhookPayload {
                active: Some(false),
                ..UpdateWebhookPayload::default()
            },
        )
        .await
        .expect("pause");

    let matching = service
        .find_active_for_event(workspace, WebhookEvent::CardCreated)
        .await
        .expect("query");
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].public_id, created_only.public_id);

    let other_workspace = service
        .find_active_for_event(workspace + 1, WebhookEvent::CardCreated)
        .await
        .expect("query");
    assert!(other_workspace.iter().all(|e| e.workspace_id != workspace));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn activity_feed_merges_description_bursts() {
    let pool = setup_pool().await;
    let card = generate_public_id();
    let base = Utc::now() - Duration::hours(1);

    for (offset_secs, activity_type, to_description) in [
        (0, "card.updated.description", Some("v1")),
        (60, "card.updated.description", Some("v2")),
        (120, "card.updated.description", Some("v3")),
        (900, "card.updated.title", None),
    ] {
        sqlx::query(
            r#"
            INSERT INTO card_activities
                (public_id, card_public_id, activity_type, actor_public_id, actor_name,
                 from_description, to_description, created_at)
            VALUES ($1, $2, $3, 'user00000001', 'Ada', NULL, $4, $5)
            "#,
        )
        .bind(generate_public_id())
        .bind(&card)
        .bind(activity_type)
        .bind(to_description)
        .bind(base + Duration::seconds(offset_secs))
        .execute(&pool)
        .await
        .expect("insert activity");
    }

    let service = ActivityService::new(pool);
    assert_eq!(service.list_for_card(&card).await.expect("list").len(), 4);

    let feed = service.feed_for_card(&card).await.expect("feed");
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].activity_type, ActivityType::DescriptionUpdated);
    assert_eq!(feed[0].merge_count, Some(3));
    assert_eq!(feed[0].to_description.as_deref(), Some("v3"));
    assert_eq!(feed[1].merge_count, None);
}
