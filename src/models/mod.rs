pub mod date_range;
pub mod event;
pub mod location;
pub mod order;
pub mod reservation;
pub mod user;
pub mod vehicle;
