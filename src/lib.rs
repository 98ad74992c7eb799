pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    activity_service::ActivityService, webhook_delivery_service::WebhookDeliveryService,
    webhook_dispatcher::WebhookDispatcher, webhook_service::WebhookService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub webhook_service: WebhookService,
    pub activity_service: ActivityService,
    pub delivery_service: WebhookDeliveryService,
    pub dispatcher: WebhookDispatcher,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Result<Self> {
        let delivery_service =
            WebhookDeliveryService::with_reqwest(config.webhook_timeout(), &config.webhook_user_agent)?;
        Ok(Self::with_delivery(pool, delivery_service))
    }

    pub fn with_delivery(pool: PgPool, delivery_service: WebhookDeliveryService) -> Self {
        let webhook_service = WebhookService::new(pool.clone());
        let activity_service = ActivityService::new(pool.clone());
        let dispatcher =
            WebhookDispatcher::new(Arc::new(webhook_service.clone()), delivery_service.clone());

        Self {
            pool,
            webhook_service,
            activity_service,
            delivery_service,
            dispatcher,
        }
    }
}
