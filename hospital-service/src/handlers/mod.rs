pub mod auth;
pub mod hospital;
pub mod patient;
pub mod record;
pub mod staff;
