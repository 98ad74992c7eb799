pub mod activity;
pub mod webhook;
