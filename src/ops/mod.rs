pub mod check;
pub mod search;
pub mod store;
