use serde::{Deserialize, Serialize};

use crate::core::vehicle::MPH_TO_MPS;

/// RaceOutcome distinguishes a decided race from a dead heat. A dead heat is surfaced
/// explicitly instead of silently picking one side.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum RaceOutcome {
    /// Index (0 or 1) of the winning vehicle.
    Winner(usize),
    DeadHeat,
}

/// * `name` - Vehicle name
/// * `position` - (m) Final position along the track
/// * `velocity` - (m/s) Final velocity
/// * `finished` - True if the vehicle reached or passed the finish line
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VehicleResult {
    pub name: String,
    pub position: f64,
    pub velocity: f64,
    pub finished: bool,
}

/// RaceResult contains all race information that is required for post-processing the
/// results. Produced exactly once per race, at termination.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RaceResult {
    pub outcome: RaceOutcome,
    pub racetime: f64,
    pub vehicle_results: [VehicleResult; 2],
}

/// resolve implements the finish-line decision rules on the terminal states of both
/// vehicles, separated from the integrator so they can be unit-tested without running a
/// full simulation. Strictly greater position wins; a position tie is broken by the
/// strictly greater velocity; if both are equal the race is a dead heat. The same rule
/// covers a simultaneous finish and a safety-cap timeout, since in both cases "farther
/// down the track" is the only meaningful distinction left. The finished flags are
/// derived here from the track length, so callers cannot disagree with the line.
pub fn resolve(
    mut state1: VehicleResult,
    mut state2: VehicleResult,
    track_length: f64,
    racetime: f64,
) -> RaceResult {
    state1.finished = state1.position >= track_length;
    state2.finished = state2.position >= track_length;

    let outcome = if state1.position > state2.position {
        RaceOutcome::Winner(0)
    } else if state2.position > state1.position {
        RaceOutcome::Winner(1)
    } else if state1.velocity > state2.velocity {
        RaceOutcome::Winner(0)
    } else if state2.velocity > state1.velocity {
        RaceOutcome::Winner(1)
    } else {
        RaceOutcome::DeadHeat
    };

    RaceResult {
        outcome,
        racetime,
        vehicle_results: [state1, state2],
    }
}

impl RaceResult {
    /// winner_name returns the name of the winning vehicle, or None for a dead heat.
    pub fn winner_name(&self) -> Option<&str> {
        match self.outcome {
            RaceOutcome::Winner(idx) => Some(&self.vehicle_results[idx].name),
            RaceOutcome::DeadHeat => None,
        }
    }

    /// print_summary prints the final race information to the console output.
    pub fn print_summary(&self) {
        match self.winner_name() {
            Some(name) => println!(
                "RESULT: Winner: {} - elapsed: {:.2}s",
                name, self.racetime
            ),
            None => println!(
                "RESULT: Dead heat - no distinguishable winner after {:.2}s",
                self.racetime
            ),
        }

        let [res1, res2] = &self.vehicle_results;
        println!(
            "RESULT: Final distances - {}: {:.1}m, {}: {:.1}m",
            res1.name, res1.position, res2.name, res2.position
        );
        println!(
            "RESULT: Final speeds - {}: {:.1}mph, {}: {:.1}mph",
            res1.name,
            res1.velocity / MPH_TO_MPS,
            res2.name,
            res2.velocity / MPH_TO_MPS
        );

        for res in self.vehicle_results.iter() {
            if !res.finished {
                println!(
                    "RESULT: {} did not reach the finish line ({:.1}m covered)",
                    res.name, res.position
                );
            }
        }
    }
}
