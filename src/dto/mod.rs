pub mod webhook_dto;
pub mod webhook_payload;
