use crate::core::force_model::{step_vehicle, V_FLOOR_DEFAULT};
use crate::core::vehicle::{VehicleParameters, VehicleState};
use crate::post::race_result::{resolve, RaceResult, VehicleResult};
use serde::Deserialize;

/// (m) Quarter mile.
pub const TRACK_LENGTH: f64 = 402.336;

/// * `timestep_size` - (s) Fixed physics timestep
/// * `sample_interval` - (-) Number of timesteps between two emitted samples; purely a
/// presentation cadence, the physics always advances at `timestep_size`
/// * `max_racetime` - (s) Safety cap that forces termination even if neither vehicle
/// reaches the finish line (possible with degenerate zero-power inputs)
/// * `v_floor` - (m/s) Velocity floor used when dividing wheel power by speed
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RacePars {
    pub timestep_size: f64,
    pub sample_interval: u32,
    pub max_racetime: f64,
    pub v_floor: f64,
}

impl Default for RacePars {
    fn default() -> Self {
        RacePars {
            timestep_size: 0.075,
            sample_interval: 4,
            max_racetime: 30.0,
            v_floor: V_FLOOR_DEFAULT,
        }
    }
}

/// RaceStatus is the state machine of a race: it starts Running and transitions to
/// Finished exactly once, either at the finish line or at the safety cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceStatus {
    Running,
    Finished,
}

/// RaceSample is a snapshot taken on the sample cadence: the shared race clock plus
/// position and velocity of both vehicles. Samples are append-only and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RaceSample {
    pub racetime: f64,
    pub positions: [f64; 2],
    pub velocities: [f64; 2],
}

/// Race owns the simulation state of a head-to-head quarter-mile run: the immutable
/// parameter records of both vehicles, their mutable states, the shared clock, and the
/// emitted sample sequence. It is a step function driven by a caller-controlled loop and
/// performs no pacing or I/O of its own.
#[derive(Debug)]
pub struct Race {
    pub timestep_size: f64,
    pub cur_racetime: f64,
    pub track_length: f64,
    pub status: RaceStatus,
    pub pars: [VehicleParameters; 2],
    pub states: [VehicleState; 2],
    pub samples: Vec<RaceSample>,
    sample_interval: u32,
    max_racetime: f64,
    v_floor: f64,
    step_count: u64,
}

impl Race {
    pub fn new(pars1: VehicleParameters, pars2: VehicleParameters, race_pars: &RacePars) -> Race {
        Race {
            timestep_size: race_pars.timestep_size,
            cur_racetime: 0.0,
            track_length: TRACK_LENGTH,
            status: RaceStatus::Running,
            pars: [pars1, pars2],
            states: [VehicleState::default(), VehicleState::default()],
            samples: Vec::new(),
            sample_interval: race_pars.sample_interval.max(1),
            max_racetime: race_pars.max_racetime,
            v_floor: race_pars.v_floor,
            step_count: 0,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// simulate_timestep advances both vehicles by one fixed timestep, emits a sample on
    /// the sample cadence, and checks the termination conditions. Calling it on a
    /// finished race is a no-op.
    pub fn simulate_timestep(&mut self) {
        if self.status == RaceStatus::Finished {
            return;
        }

        // increment discretization variables
        self.cur_racetime += self.timestep_size;
        self.step_count += 1;

        // advance both vehicles in lockstep, velocities capped at each top speed
        for i in 0..2 {
            let (v_new, pos_new, _) = step_vehicle(
                &self.pars[i],
                self.states[i].velocity,
                self.states[i].position,
                self.timestep_size,
                self.v_floor,
            );
            self.states[i].velocity = v_new.min(self.pars[i].top_speed);
            self.states[i].position = pos_new;
        }

        // termination is evaluated every tick, not just on sample ticks
        let finish_line_reached = self.states.iter().any(|s| s.position >= self.track_length);
        let cap_reached = self.cur_racetime >= self.max_racetime;

        if finish_line_reached || cap_reached {
            self.status = RaceStatus::Finished;
            self.push_sample();
        } else if self.step_count % self.sample_interval as u64 == 0 {
            self.push_sample();
        }
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (HELPERS) ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn push_sample(&mut self) {
        self.samples.push(RaceSample {
            racetime: self.cur_racetime,
            positions: [self.states[0].position, self.states[1].position],
            velocities: [self.states[0].velocity, self.states[1].velocity],
        });
    }

    pub fn get_finished(&self) -> bool {
        self.status == RaceStatus::Finished
    }

    /// get_race_result resolves the winner from the terminal states. Meaningful once the
    /// race is finished; calling it earlier resolves the standings so far.
    pub fn get_race_result(&self) -> RaceResult {
        let [final1, final2] = [0, 1].map(|i| VehicleResult {
            name: self.pars[i].name.to_owned(),
            position: self.states[i].position,
            velocity: self.states[i].velocity,
            finished: false, // derived by the resolver from the track length
        });

        resolve(final1, final2, self.track_length, self.cur_racetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vehicle::{VehicleStats, MPH_TO_MPS};
    use crate::post::race_result::RaceOutcome;

    fn stats(name: &str, hp: f64, weight_lbs: f64, top_speed_mph: f64, zero_to_60: f64) -> VehicleStats {
        VehicleStats {
            name: name.to_string(),
            horsepower: hp,
            weight_lbs,
            top_speed_mph,
            zero_to_60,
        }
    }

    fn run_race(stats1: &VehicleStats, stats2: &VehicleStats) -> Race {
        let mut race = Race::new(
            VehicleParameters::estimate(stats1),
            VehicleParameters::estimate(stats2),
            &RacePars::default(),
        );
        while !race.get_finished() {
            race.simulate_timestep();
        }
        race
    }

    #[test]
    fn test_faster_car_wins_quarter_mile() {
        // worked scenario: Car A clearly outruns Car B
        let race = run_race(
            &stats("Car A", 500.0, 3000.0, 200.0, 3.0),
            &stats("Car B", 300.0, 3500.0, 150.0, 5.0),
        );
        let result = race.get_race_result();

        assert_eq!(result.outcome, RaceOutcome::Winner(0));
        assert_eq!(result.winner_name(), Some("Car A"));
        assert!(result.vehicle_results[0].finished);
        assert!(result.vehicle_results[0].position >= TRACK_LENGTH);
        assert!(result.racetime < 30.0);

        // final velocities stay within each published top speed
        assert!(result.vehicle_results[0].velocity <= 200.0 * MPH_TO_MPS);
        assert!(result.vehicle_results[1].velocity <= 150.0 * MPH_TO_MPS);
    }

    #[test]
    fn test_positions_monotone_and_velocity_capped() {
        let race = run_race(
            &stats("Car A", 500.0, 3000.0, 200.0, 3.0),
            &stats("Car B", 300.0, 3500.0, 150.0, 5.0),
        );
        let top_speeds = [race.pars[0].top_speed, race.pars[1].top_speed];

        for i in 0..2 {
            let mut prev_pos = 0.0;
            for sample in race.samples.iter() {
                assert!(sample.positions[i] >= prev_pos);
                assert!(sample.velocities[i] <= top_speeds[i] + 1e-12);
                prev_pos = sample.positions[i];
            }
        }
    }

    #[test]
    fn test_sample_cadence_does_not_affect_physics() {
        let stats1 = stats("Car A", 500.0, 3000.0, 200.0, 3.0);
        let stats2 = stats("Car B", 300.0, 3500.0, 150.0, 5.0);

        let mut pars_dense = RacePars::default();
        pars_dense.sample_interval = 1;
        let mut race_dense = Race::new(
            VehicleParameters::estimate(&stats1),
            VehicleParameters::estimate(&stats2),
            &pars_dense,
        );
        while !race_dense.get_finished() {
            race_dense.simulate_timestep();
        }

        let race_sparse = run_race(&stats1, &stats2);
        assert_eq!(race_dense.get_race_result(), race_sparse.get_race_result());
    }

    #[test]
    fn test_symmetric_inputs_are_a_dead_heat() {
        let stats1 = stats("Twin 1", 450.0, 3100.0, 190.0, 3.5);
        let stats2 = stats("Twin 2", 450.0, 3100.0, 190.0, 3.5);
        let race = run_race(&stats1, &stats2);

        for sample in race.samples.iter() {
            assert_eq!(sample.positions[0], sample.positions[1]);
            assert_eq!(sample.velocities[0], sample.velocities[1]);
        }
        assert_eq!(race.get_race_result().outcome, RaceOutcome::DeadHeat);
    }

    #[test]
    fn test_zero_power_race_terminates_at_safety_cap() {
        let race = run_race(
            &stats("Brick 1", 0.0, 4000.0, 0.0, 0.0),
            &stats("Brick 2", 0.0, 4500.0, 0.0, 0.0),
        );
        let result = race.get_race_result();
        assert!(race.get_finished());
        assert!(result.racetime >= 30.0 - 1e-9);
        assert!(!result.vehicle_results[0].finished);
        assert!(!result.vehicle_results[1].finished);
    }

    #[test]
    fn test_rerun_yields_identical_result() {
        let stats1 = stats("Car A", 500.0, 3000.0, 200.0, 3.0);
        let stats2 = stats("Car B", 300.0, 3500.0, 150.0, 5.0);
        let result_a = run_race(&stats1, &stats2).get_race_result();
        let result_b = run_race(&stats1, &stats2).get_race_result();
        assert_eq!(result_a, result_b);
    }

    #[test]
    fn test_finished_race_ignores_further_steps() {
        let mut race = run_race(
            &stats("Car A", 500.0, 3000.0, 200.0, 3.0),
            &stats("Car B", 300.0, 3500.0, 150.0, 5.0),
        );
        let result = race.get_race_result();
        race.simulate_timestep();
        assert_eq!(race.get_race_result(), result);
    }

    #[test]
    fn test_sample_spacing_matches_interval() {
        let race = run_race(
            &stats("Car A", 500.0, 3000.0, 200.0, 3.0),
            &stats("Car B", 300.0, 3500.0, 150.0, 5.0),
        );
        let dt = race.timestep_size;
        // all but the terminal sample sit on the 4-tick cadence
        for pair in race.samples.windows(2).rev().skip(1) {
            approx::assert_relative_eq!(pair[1].racetime - pair[0].racetime, 4.0 * dt, epsilon = 1e-9);
        }
    }
}
