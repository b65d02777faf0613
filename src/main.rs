use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nalgebra::Vector3;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_dynamics::sim::{self, FlatWorld, RigidBody, Sample, Throttle};
use vehicle_dynamics::{Config, VehicleController, VehicleType};

#[derive(Parser)]
#[command(name = "vehicle-dynamics")]
#[command(about = "Run a scripted vehicle on a flat test world", long_about = None)]
struct Cli {
    /// Vehicle type: none, sled, car, boat, airplane, balloon
    #[arg(short, long, default_value = "car")]
    vehicle: VehicleType,

    /// Forward linear motor command (m/s, body X)
    #[arg(long, default_value_t = 10.0)]
    throttle: f64,

    /// Yaw angular motor command (rad/s)
    #[arg(long, default_value_t = 0.0)]
    turn: f64,

    /// Physics tick (s); overrides the config file
    #[arg(long)]
    dt: Option<f64>,

    /// Simulated duration (s); overrides the config file
    #[arg(long)]
    time: Option<f64>,

    /// TOML file with [controller] and [sim] tables
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    if let Some(dt) = cli.dt {
        config.sim.dt = dt;
    }
    if let Some(time) = cli.time {
        config.sim.max_time = time;
    }
    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let world = FlatWorld::from(&config.sim);
    let mut body = RigidBody::at(Vector3::new(0.0, 0.0, start_height(cli.vehicle, &world)));
    let mut controller = VehicleController::with_type(cli.vehicle, config.controller.clone());
    let mut driver = Throttle::forward(cli.throttle, cli.turn);

    let trajectory = sim::simulate_with(&mut controller, &mut body, &world, &config.sim, &mut driver);
    let Some(final_state) = trajectory.last() else {
        tracing::error!("simulation produced no samples");
        return ExitCode::FAILURE;
    };

    // -----------------------------------------------------------------------
    // Analyze trajectory
    // -----------------------------------------------------------------------
    let top_speed = trajectory.iter().map(Sample::forward_speed).fold(0.0_f64, f64::max);
    let max_yaw_rate = trajectory.iter().map(|s| s.omega.z.abs()).fold(0.0_f64, f64::max);
    let min_alt = trajectory.iter().map(|s| s.pos.z).fold(f64::INFINITY, f64::min);
    let max_alt = trajectory.iter().map(|s| s.pos.z).fold(f64::NEG_INFINITY, f64::max);
    let distance: f64 = trajectory
        .windows(2)
        .map(|pair| (pair[1].pos - pair[0].pos).xy().norm())
        .sum();

    let params = controller.params();
    let flags = controller.flags();

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  VEHICLE DYNAMICS RUN: {}", controller.vehicle_type().name().to_uppercase());
    println!("====================================================================");
    println!();
    println!("  Controller");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Linear motor ts: {:>7.2} s     decay:        {:>8.2} s",
        params.linear.motor_timescale, params.linear.motor_decay_timescale
    );
    println!(
        "  Angular motor ts:{:>7.2} s     decay:        {:>8.2} s",
        params.angular.motor_timescale, params.angular.motor_decay_timescale
    );
    println!(
        "  Hover height:    {:>7.2} m     timescale:    {:>8.2} s",
        params.hover.height, params.hover.timescale
    );
    println!(
        "  Buoyancy:        {:>7.2}       attractor ts: {:>8.2} s",
        params.linear.buoyancy, params.attractor.timescale
    );
    println!(
        "  Hover flags:   {:#07x}         behavior flags: {:#07x}",
        flags.hover.bits(),
        flags.behavior.bits()
    );
    println!(
        "  Command:         {:>7.2} m/s   turn:         {:>8.2} rad/s",
        cli.throttle, cli.turn
    );
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Top forward speed: {:>8.2} m/s", top_speed);
    println!("  Max yaw rate:      {:>8.3} rad/s", max_yaw_rate);
    println!("  Ground distance:   {:>8.1} m", distance);
    println!("  Altitude range:    {:>8.2} .. {:.2} m", min_alt, max_alt);
    println!(
        "  Final heading:     {:>8.1} deg",
        final_state.yaw().to_degrees()
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>7}  {:>8}  {:>8}  {:>8}",
        "t (s)", "x (m)", "y (m)", "z (m)", "fwd(m/s)", "yaw(deg)", "wz(r/s)"
    );
    println!("  {}", "─".repeat(66));

    let sample_interval = (trajectory.len() / 30).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>8.2}  {:>8.2}  {:>7.2}  {:>8.2}  {:>8.1}  {:>8.3}",
            s.time,
            s.pos.x,
            s.pos.y,
            s.pos.z,
            s.forward_speed(),
            s.yaw().to_degrees(),
            s.omega.z
        );
    }

    println!();
    println!(
        "  Simulation: {} steps, dt={} s, {} controller ticks",
        trajectory.len() - 1,
        config.sim.dt,
        controller.tick()
    );
    println!("====================================================================");
    println!();

    ExitCode::SUCCESS
}

/// Start boats on the water, balloons and airplanes in the air, the rest on the ground.
fn start_height(vehicle: VehicleType, world: &FlatWorld) -> f64 {
    match vehicle {
        VehicleType::Boat => world.water_level,
        VehicleType::Airplane | VehicleType::Balloon => world.terrain_height + 10.0,
        _ => world.terrain_height,
    }
}
