pub mod analytics;
pub mod checkin;
pub mod issuance;
pub mod mailer;
