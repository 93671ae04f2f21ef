pub mod link;
pub mod login;
pub mod second_factor;
pub mod token;
