use crate::core::race::{Race, RacePars};
use crate::core::vehicle::{VehicleParameters, VehicleStats};
use crate::interfaces::live_interface::{LiveState, VehicleLiveState, MAX_LIVE_UPDATE_FREQUENCY};
use crate::post::race_result::RaceResult;
use anyhow::Context;
use flume::Sender;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// handle_race estimates the vehicle parameters, creates and simulates a race, and
/// returns the result for post-processing. If a sender is inserted, the race is run in
/// real-time (scaled by `realtime_factor`) and every emitted sample is streamed to the
/// presentation consumer, followed by one final message carrying the result. Pacing is
/// purely a presentation concern: the physics advances at the fixed timestep either way.
pub fn handle_race(
    stats1: &VehicleStats,
    stats2: &VehicleStats,
    race_pars: &RacePars,
    print_debug: bool,
    tx: Option<&Sender<LiveState>>,
    realtime_factor: f64,
) -> anyhow::Result<RaceResult> {
    let mut race = Race::new(
        VehicleParameters::estimate(stats1),
        VehicleParameters::estimate(stats2),
        race_pars,
    );

    if print_debug {
        for pars in race.pars.iter() {
            println!(
                "DEBUG: {} - mass {:.1}kg, wheel power {:.0}W, frontal area {:.2}m2, mu {:.3}",
                pars.name, pars.mass, pars.p_wheel, pars.frontal_area, pars.mu
            );
        }
    }

    // check if sender was inserted -> in that case simulate in real-time
    let sim_realtime = tx.is_some();
    if !sim_realtime {
        let mut t_race_update_print = 0.0;
        while !race.get_finished() {
            race.simulate_timestep();
            if print_debug && race.cur_racetime > t_race_update_print + 0.9999 {
                println!(
                    "INFO: Simulating... current race time is {:.3}s, leader at {:.1}m",
                    race.cur_racetime,
                    race.states[0].position.max(race.states[1].position)
                );
                t_race_update_print = race.cur_racetime;
            }
        }
    } else {
        let tx = tx.unwrap();
        let mut no_sent_samples = 0;
        let mut t_race_update_live = f64::NEG_INFINITY;

        while !race.get_finished() {
            let t_start = Instant::now();
            race.simulate_timestep();

            // forward newly emitted samples to the consumer, throttled so that a very
            // small timestep cannot flood the channel
            while no_sent_samples < race.samples.len() {
                let sample = &race.samples[no_sent_samples];
                no_sent_samples += 1;
                if sample.racetime < t_race_update_live + 1.0 / MAX_LIVE_UPDATE_FREQUENCY - 0.001
                    && !race.get_finished()
                {
                    continue;
                }
                t_race_update_live = sample.racetime;
                let live_state = LiveState {
                    racetime: sample.racetime,
                    track_length: race.track_length,
                    vehicle_states: race
                        .pars
                        .iter()
                        .enumerate()
                        .map(|(i, pars)| VehicleLiveState {
                            name: pars.name.to_owned(),
                            position: sample.positions[i],
                            velocity: sample.velocities[i],
                        })
                        .collect(),
                    final_result: None,
                };
                tx.send(live_state)
                    .context("Failed to send live race state!")?;
            }

            // sleep until the timestep is finished in real-time as well (calculation in ms)
            let t_sleep = (race.timestep_size * 1000.0 / realtime_factor) as i64
                - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else {
                println!("WARNING: Could not keep up with real-time!")
            }
        }

        // after the real-time loop finishes, send the final result once
        let result = race.get_race_result();
        let final_msg = LiveState {
            racetime: result.racetime,
            track_length: race.track_length,
            vehicle_states: Vec::new(),
            final_result: Some(result),
        };
        tx.send(final_msg)
            .context("Failed to send final race result!")?;
    }

    // return race result
    Ok(race.get_race_result())
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_batch_mode_returns_result() {
        let result = handle_race(
            &stats("Car A", 500.0, 3000.0, 200.0, 3.0),
            &stats("Car B", 300.0, 3500.0, 150.0, 5.0),
            &RacePars::default(),
            false,
            None,
            1.0,
        )
        .unwrap();
        assert_eq!(result.outcome, RaceOutcome::Winner(0));
    }

    #[test]
    fn test_realtime_mode_streams_samples_and_final_result() {
        let (tx, rx) = flume::unbounded();
        // large factor so the test does not actually wait out the race
        let result = handle_race(
            &stats("Car A", 500.0, 3000.0, 200.0, 3.0),
            &stats("Car B", 300.0, 3500.0, 150.0, 5.0),
            &RacePars::default(),
            false,
            Some(&tx),
            1000.0,
        )
        .unwrap();
        drop(tx);

        let messages: Vec<_> = rx.into_iter().collect();
        assert!(messages.len() > 2);

        // all but the last message are samples with both vehicles present
        for msg in &messages[..messages.len() - 1] {
            assert!(msg.final_result.is_none());
            assert_eq!(msg.vehicle_states.len(), 2);
        }
        let final_msg = messages.last().unwrap();
        assert_eq!(final_msg.final_result.as_ref(), Some(&result));
    }
}
