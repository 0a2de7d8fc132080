pub mod read_roster;
pub mod sim_opts;
