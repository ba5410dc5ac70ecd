pub mod alert;
pub mod alerts;
pub mod assess;
pub mod daemon;
pub mod history;
pub mod zone;
