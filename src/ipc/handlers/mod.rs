pub mod assessments;
pub mod core;
pub mod curriculum;
pub mod remarks;
pub mod reports;
pub mod roster;
pub mod scoring;
pub mod setup;
