pub mod cart_repository;
pub mod context;
pub mod order_repository;
pub mod quote_id_mask;
pub mod session_storage;
