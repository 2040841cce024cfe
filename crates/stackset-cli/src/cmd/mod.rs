pub mod accounts;
pub mod actions;
pub mod instances;
pub mod report;
pub mod serve;
