pub mod edital;
pub mod project;
pub mod user;
