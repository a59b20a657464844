pub mod health;
pub mod schedules;
pub mod users;
