use anyhow::Context;
use clap::Parser;
use dragsim::core::handle_race::handle_race;
use dragsim::core::race::RacePars;
use dragsim::core::vehicle::{VehicleStats, MPH_TO_MPS};
use dragsim::interfaces::live_interface::LiveState;
use dragsim::pre::read_roster::{read_race_pars, read_roster};
use dragsim::pre::sim_opts::SimOpts;
use std::thread;
use std::time::{Duration, Instant};

/// find_vehicle resolves a vehicle name against the roster (case-insensitive).
fn find_vehicle<'a>(roster: &'a [VehicleStats], name: &str) -> anyhow::Result<&'a VehicleStats> {
    roster
        .iter()
        .find(|stats| stats.name.eq_ignore_ascii_case(name))
        .with_context(|| format!("Vehicle {:?} not found in the roster!", name))
}

fn print_live_state(live_state: &LiveState) {
    let mut line = format!("INFO: t={:6.2}s", live_state.racetime);
    for vs in live_state.vehicle_states.iter() {
        line.push_str(&format!(
            " | {}: {:6.1}m {:5.1}mph",
            vs.name,
            vs.position,
            vs.velocity / MPH_TO_MPS
        ));
    }
    println!("{}", line);
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    // get race parameters (defaults unless a parameter file was inserted), then apply
    // explicit command line overrides on top
    let race_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        println!("INFO: Reading race parameters from {:?}", parfile_path);
        read_race_pars(parfile_path)?
    } else {
        RacePars::default()
    };
    let race_pars = sim_opts.merge_race_pars(race_pars);

    // load the roster and resolve the two vehicles
    let roster = read_roster(&sim_opts.roster_path)?;
    println!(
        "INFO: Loaded {} vehicles from {:?}",
        roster.len(),
        sim_opts.roster_path
    );

    let stats1 = find_vehicle(&roster, &sim_opts.vehicle1)?.to_owned();
    let stats2 = find_vehicle(&roster, &sim_opts.vehicle2)?.to_owned();

    println!(
        "INFO: Simulating {} vs {} over the quarter mile with a time step size of {:.3}s",
        stats1.name, stats2.name, race_pars.timestep_size
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.live {
        // NON-LIVE CASE - run the race as fast as possible and print the result
        let t_start = Instant::now();

        let race_result = handle_race(&stats1, &stats2, &race_pars, sim_opts.debug, None, 1.0)?;

        println!("INFO: Execution time: {}ms", t_start.elapsed().as_millis());
        race_result.print_summary();
    } else {
        // LIVE CASE - real-time simulation streaming samples to the console
        let (tx, rx) = flume::unbounded();

        let race_pars_thread = race_pars.clone();
        let stats1_thread = stats1.clone();
        let stats2_thread = stats2.clone();
        let realtime_factor = sim_opts.realtime_factor;

        // start countdown before the lights go green
        for count in ["3", "2", "1", "GO!"].iter() {
            println!("INFO: {}", count);
            thread::sleep(Duration::from_millis(500));
        }

        let sim_handle = thread::spawn(move || {
            handle_race(
                &stats1_thread,
                &stats2_thread,
                &race_pars_thread,
                false,
                Some(&tx),
                realtime_factor,
            )
        });

        // consume live states until the final result arrives
        for live_state in rx.iter() {
            match live_state.final_result {
                Some(result) => {
                    result.print_summary();
                    break;
                }
                None => print_live_state(&live_state),
            }
        }

        sim_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))??;
    }

    Ok(())
}
