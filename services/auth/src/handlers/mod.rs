pub mod external;
pub mod login;
pub mod session;
