use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use nalgebra::Vector3;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_dynamics::sim::{self, FlatWorld, RigidBody, Sample, Throttle};
use vehicle_dynamics::{ControllerConfig, SimConfig, VehicleController, VehicleType};

fn main() -> eframe::Result {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Demo run: a car looping at constant throttle and yaw command.
    let config = SimConfig { dt: 0.05, max_time: 30.0, ..Default::default() };
    let world = FlatWorld::from(&config);
    let mut controller = VehicleController::with_type(VehicleType::Car, ControllerConfig::default());
    let mut body = RigidBody::at(Vector3::new(0.0, 0.0, world.terrain_height));
    let mut driver = Throttle::forward(12.0, 0.6);
    let trajectory = sim::simulate_with(&mut controller, &mut body, &world, &config, &mut driver);

    let app = VehicleViz { trajectory, vehicle: controller.vehicle_type() };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Vehicle Dynamics", options, Box::new(|_| Ok(Box::new(app))))
}

struct VehicleViz {
    trajectory: Vec<Sample>,
    vehicle: VehicleType,
}

impl eframe::App for VehicleViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.trajectory.len() / 2000).max(1);
        let sampled: Vec<&Sample> = self.trajectory.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Vehicle: {}", self.vehicle));
            let top_speed = self.trajectory.iter().map(Sample::forward_speed).fold(0.0_f64, f64::max);
            let max_rate = self.trajectory.iter().map(|s| s.omega.z.abs()).fold(0.0_f64, f64::max);
            ui.label(format!(
                "Top speed: {:.1} m/s  |  Max yaw rate: {:.2} rad/s  |  Run: {:.0} s",
                top_speed,
                max_rate,
                self.trajectory.last().map_or(0.0, |s| s.time),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude (m)");
                    let points: PlotPoints = sampled.iter().map(|s| [s.time, s.pos.z]).collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Forward Speed (m/s)");
                    let points: PlotPoints =
                        sampled.iter().map(|s| [s.time, s.forward_speed()]).collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Yaw Rate (rad/s)");
                    let points: PlotPoints = sampled.iter().map(|s| [s.time, s.omega.z]).collect();
                    Plot::new("yaw_rate")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Yaw rate", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Ground Track (m)");
                    let points: PlotPoints = sampled.iter().map(|s| [s.pos.x, s.pos.y]).collect();
                    Plot::new("track")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("X (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Track", points));
                        });
                });
            });
        });
    }
}
