use crate::post::race_result::RaceResult;

/// (Hz) Ceiling for how often live updates are pushed to the presentation consumer.
pub const MAX_LIVE_UPDATE_FREQUENCY: f64 = 20.0;

#[derive(Debug, Clone, Default)]
pub struct VehicleLiveState {
    pub name: String,
    pub position: f64,
    pub velocity: f64,
}

/// LiveState is the message streamed to the presentation consumer while a race is
/// running. The final message carries the race result exactly once.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    pub racetime: f64,
    pub track_length: f64,
    pub vehicle_states: Vec<VehicleLiveState>,

    // final results payload (sent once when the race finishes)
    pub final_result: Option<RaceResult>,
}
