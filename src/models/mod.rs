pub mod account_model;
