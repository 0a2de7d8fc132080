use crate::core::race::RacePars;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "dragsim",
    about = "A time-discrete quarter-mile drag race simulator"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing (only for non-live mode)
    #[clap(short, long)]
    pub debug: bool,

    /// Activate live mode - race will be simulated in real-time with console updates
    #[clap(short, long)]
    pub live: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Name of the first vehicle (as listed in the roster)
    #[clap(long)]
    pub vehicle1: String,

    /// Name of the second vehicle (as listed in the roster)
    #[clap(long)]
    pub vehicle2: String,

    /// Set path to the vehicle roster CSV file
    #[clap(short = 'r', long, default_value = "input/vehicles.csv")]
    pub roster_path: PathBuf,

    /// Set path to the race parameter JSON file (OPTIONAL: defaults are used if not set)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set real-time factor (only relevant in live mode)
    #[clap(long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 1.0]
    /// (overrides the parameter file if set, 0.075 otherwise)
    #[clap(short, long)]
    pub timestep_size: Option<f64>,
}

impl SimOpts {
    /// merge_race_pars applies the command line overrides on top of the race parameters
    /// read from a file (or the defaults). Options the user did not set explicitly leave
    /// the parameters untouched.
    pub fn merge_race_pars(&self, mut race_pars: RacePars) -> RacePars {
        if let Some(timestep_size) = self.timestep_size {
            race_pars.timestep_size = timestep_size;
        }
        race_pars
    }
}
