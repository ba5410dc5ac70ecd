pub mod alert_fmt;
pub mod assessment_fmt;
pub mod table_fmt;
