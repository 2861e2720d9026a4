pub mod account;
pub mod amount;
pub mod budget;
pub mod category;
pub mod ledger;
pub mod month;
pub mod monthly;
pub mod recurring;
pub mod report;
pub mod settings;
