use serde::{Deserialize, Deserializer};

// unit conversions
pub const LBS_TO_KG: f64 = 0.45359237;
pub const MPH_TO_MPS: f64 = 0.44704;
pub const W_PER_HP: f64 = 745.699872;

// fixed drivetrain and chassis approximations (coarse estimates, not measured values)
pub const DRIVETRAIN_EFF: f64 = 0.85;
pub const C_DRAG: f64 = 0.33;
pub const C_ROLL: f64 = 0.015;

const MU_MIN: f64 = 0.6;
const MU_MAX: f64 = 1.4;
const FRONTAL_AREA_MIN: f64 = 1.6;
const FRONTAL_AREA_MAX: f64 = 2.6;

// peak launch acceleration typically exceeds the 0-60 average by roughly this factor
const LAUNCH_PEAK_FACTOR: f64 = 1.15;

/// stat_or_zero deserializes a published stat that may arrive as a number, as free text
/// (e.g. "N/A" in a roster CSV), or not at all. Anything non-numeric is coerced to 0.0 so
/// that a single bad cell never aborts a race.
fn stat_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawStat {
        Num(f64),
        Text(String),
        Missing,
    }

    Ok(match RawStat::deserialize(deserializer)? {
        RawStat::Num(x) => x,
        RawStat::Text(s) => s.trim().parse().unwrap_or(0.0),
        RawStat::Missing => 0.0,
    })
}

/// * `name` - Vehicle name (unique within a roster)
/// * `horsepower` - (hp) Published engine power
/// * `weight_lbs` - (lbs) Curb weight
/// * `top_speed_mph` - (mph) Published top speed
/// * `zero_to_60` - (s) Published 0-60mph time, <= 0.0 if unknown
#[derive(Debug, Deserialize, Clone)]
pub struct VehicleStats {
    pub name: String,
    #[serde(default, deserialize_with = "stat_or_zero")]
    pub horsepower: f64,
    #[serde(default, deserialize_with = "stat_or_zero")]
    pub weight_lbs: f64,
    #[serde(default, deserialize_with = "stat_or_zero")]
    pub top_speed_mph: f64,
    #[serde(default, deserialize_with = "stat_or_zero", rename = "acceleration_0_60")]
    pub zero_to_60: f64,
}

/// * `name` - Vehicle name
/// * `mass` - (kg) Vehicle mass
/// * `top_speed` - (m/s) Top speed, used to cap the velocity after every timestep
/// * `p_wheel` - (W) Power available at the wheels after drivetrain losses
/// * `c_drag` - (-) Aerodynamic drag coefficient
/// * `frontal_area` - (m2) Frontal area estimated from the weight heuristic
/// * `c_roll` - (-) Rolling resistance coefficient
/// * `mu` - (-) Tire/road friction coefficient estimated from the 0-60 time
#[derive(Debug, Clone)]
pub struct VehicleParameters {
    pub name: String,
    pub mass: f64,
    pub top_speed: f64,
    pub p_wheel: f64,
    pub c_drag: f64,
    pub frontal_area: f64,
    pub c_roll: f64,
    pub mu: f64,
}

impl VehicleParameters {
    /// estimate derives the physical parameters of the longitudinal dynamics model from the
    /// four published stats of a vehicle. It is total: degenerate inputs are clamped or
    /// defaulted, never rejected.
    pub fn estimate(stats: &VehicleStats) -> VehicleParameters {
        let mass = stats.weight_lbs * LBS_TO_KG;
        let top_speed = stats.top_speed_mph * MPH_TO_MPS;
        let p_wheel = stats.horsepower.max(1.0) * W_PER_HP * DRIVETRAIN_EFF;

        // frontal area from the weight heuristic (rough linear approximation)
        let frontal_area = (2.0 + (stats.weight_lbs - 3000.0) / 2500.0)
            .clamp(FRONTAL_AREA_MIN, FRONTAL_AREA_MAX);

        // estimate peak launch friction from the average acceleration required to reach
        // 60mph in the published time
        let mu = if stats.zero_to_60 > 0.0 {
            let a_avg = 60.0 * MPH_TO_MPS / stats.zero_to_60;
            (a_avg * LAUNCH_PEAK_FACTOR / crate::core::force_model::G_ACCEL)
                .clamp(MU_MIN, MU_MAX)
        } else {
            1.0
        };

        VehicleParameters {
            name: stats.name.to_owned(),
            mass,
            top_speed,
            p_wheel,
            c_drag: C_DRAG,
            frontal_area,
            c_roll: C_ROLL,
            mu,
        }
    }
}

/// VehicleState holds the mutable per-vehicle race state. The elapsed-time clock is shared
/// by both vehicles and lives on the race itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleState {
    pub velocity: f64,
    pub position: f64,
}
