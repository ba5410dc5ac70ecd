#![allow(clippy::expect_used)]

mod assessment_test;
mod common;
mod monitor_test;
mod scoring_test;
mod store_test;
