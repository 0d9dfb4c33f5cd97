#![allow(async_fn_in_trait)]

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infra;
pub mod outbox;
pub mod router;
pub mod state;
pub mod usecase;
pub mod validate;
