pub mod plans;
pub mod subscriptions;
pub mod teams;
pub mod users;
