use crate::core::vehicle::VehicleParameters;

pub const RHO_AIR: f64 = 1.225; // (kg/m3) air density at sea level
pub const G_ACCEL: f64 = 9.81; // (m/s2) gravitational acceleration

/// Default velocity floor used when dividing wheel power by speed. This is a tuning
/// constant standing in for launch behavior, not a physical law, and is therefore
/// exposed as a race parameter.
pub const V_FLOOR_DEFAULT: f64 = 0.5;

/// * `accel` - (m/s2) Net longitudinal acceleration during the step
/// * `f_tractive` - (N) Forward force delivered to the road, min of power and traction limit
/// * `f_drag` - (N) Aerodynamic drag
/// * `f_roll` - (N) Rolling resistance
#[derive(Debug, Clone, Copy)]
pub struct ForceBreakdown {
    pub accel: f64,
    pub f_tractive: f64,
    pub f_drag: f64,
    pub f_roll: f64,
}

/// step_vehicle advances one vehicle by a single timestep and returns the new velocity,
/// the new position, and the force breakdown. Deterministic and side-effect free.
///
/// Force balance (all in N):
///   F_drag = 0.5 * rho * Cd * A * v^2
///   F_roll = Crr * m * g
///   F_power = P_wheel / max(v, v_floor)
///   F_traction_limit = mu * m * g
///   F_tractive = min(F_power, F_traction_limit)
///
/// The vehicle is traction-limited at low speed and power-limited at high speed. The
/// velocity update is floored at zero (no reverse motion), and the position update uses
/// the already-updated velocity (semi-implicit Euler). The caller is responsible for
/// capping the new velocity at the vehicle's top speed.
pub fn step_vehicle(
    pars: &VehicleParameters,
    velocity: f64,
    position: f64,
    dt: f64,
    v_floor: f64,
) -> (f64, f64, ForceBreakdown) {
    let f_drag = 0.5 * RHO_AIR * pars.c_drag * pars.frontal_area * velocity * velocity;
    let f_roll = pars.c_roll * pars.mass * G_ACCEL;

    // near standstill P/v blows up, but the traction limit caps the result
    let f_power = pars.p_wheel / velocity.max(v_floor);
    let f_traction_limit = pars.mu * pars.mass * G_ACCEL;
    let f_tractive = f_power.min(f_traction_limit);

    let f_net = f_tractive - f_drag - f_roll;
    let accel = f_net / pars.mass;

    let v_new = (velocity + accel * dt).max(0.0);
    let pos_new = position + v_new * dt;

    (
        v_new,
        pos_new,
        ForceBreakdown {
            accel,
            f_tractive,
            f_drag,
            f_roll,
        },
    )
}
