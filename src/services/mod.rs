pub mod activity_merge;
pub mod activity_service;
pub mod webhook_delivery_service;
pub mod webhook_dispatcher;
pub mod webhook_service;
