pub mod reconcile;
pub mod record;
pub mod user;
