pub mod bookings;
pub mod off_season;
pub mod promotion;
pub mod schedule;
