pub mod chat;
pub mod report;
pub mod reset;
pub mod speech;
pub mod structure;
