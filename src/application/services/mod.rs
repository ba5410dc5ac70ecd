pub mod alerting;
pub mod assessment;
pub mod monitor;
