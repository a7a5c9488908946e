pub mod event;
pub mod mask;
pub mod order;
pub mod quote;
pub mod restore;
pub mod session;
pub mod store;
pub mod totals;
