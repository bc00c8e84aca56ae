pub mod auth;
pub mod plans;
pub mod subscriptions;
pub mod teams;
