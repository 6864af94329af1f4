pub mod validator_utils;
