pub mod force_model;
pub mod handle_race;
pub mod race;
pub mod vehicle;
