pub mod checkout_session;
pub mod totals_information;
