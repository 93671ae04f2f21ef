pub mod challenge;
pub mod db;
pub mod mailer;
