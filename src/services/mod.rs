pub mod catalog;
pub mod ledger;
pub mod notes;
pub mod reports;
