pub mod activity;
pub mod card_events;
pub mod health;
pub mod webhook;
