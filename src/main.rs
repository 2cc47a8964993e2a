#![warn(clippy::all)]

//! arcmap inspector - prints the layout computed for a set of connections.
//!
//! Usage: `arcmap [connections.json] [settings.json]`
//!
//! Without arguments a built-in set of Asia-Pacific connections is used. The
//! output lists the background frame, every projected marker, resolved labels,
//! arc paths and the animation schedule, which makes it easy to check that
//! overlay points land where the dotted background draws them.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    native::run(std::env::args().skip(1).collect())
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use arcmap::{BackgroundFrame, Connection, GeoPoint, MapSettings, Theme, WorldMap};
    use std::error::Error;
    use std::fs;

    /// Connections shown when no file is given.
    fn sample_connections() -> Vec<Connection> {
        let singapore = GeoPoint::labeled(1.3521, 103.8198, "Singapore");
        vec![
            Connection::new(
                singapore.clone(),
                GeoPoint::labeled(-6.2088, 106.8456, "Jakarta"),
            ),
            Connection::new(
                singapore.clone(),
                GeoPoint::labeled(3.139, 101.6869, "Kuala Lumpur"),
            ),
            Connection::new(
                singapore,
                GeoPoint::labeled(13.7563, 100.5018, "Bangkok"),
            ),
            Connection::new(
                GeoPoint::labeled(14.5995, 120.9842, "Manila"),
                GeoPoint::labeled(35.6762, 139.6503, "Tokyo"),
            ),
            Connection::new(
                GeoPoint::labeled(19.076, 72.8777, "Mumbai"),
                GeoPoint::labeled(-27.4698, 153.0251, "Brisbane"),
            ),
        ]
    }

    pub fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
        let connections = match args.first() {
            Some(path) => {
                log::info!("Reading connections from {}", path);
                serde_json::from_str::<Vec<Connection>>(&fs::read_to_string(path)?)?
            }
            None => sample_connections(),
        };

        let settings = match args.get(1) {
            Some(path) => {
                log::info!("Reading settings from {}", path);
                MapSettings::from_json(&fs::read_to_string(path)?)?
            }
            None => MapSettings::default(),
        };

        let background = BackgroundFrame::for_theme(Theme::Dark);
        println!("=== Frame ===");
        println!("viewBox: {}", settings.canvas.view_box());
        if !background.matches(&settings.canvas) {
            log::warn!(
                "Canvas {}x{} differs from the background frame {}; markers will drift",
                settings.canvas.width,
                settings.canvas.height,
                background.canvas().view_box()
            );
        }

        let map = WorldMap::new(connections, settings);

        println!("\n=== Markers ===");
        for (conn, proj) in map.connections().iter().zip(map.projected()) {
            for (point, pos) in [(&conn.start, proj.start), (&conn.end, proj.end)] {
                println!(
                    "{:<14} ({:>8.4}, {:>9.4}) -> x={:.2}, y={:.2}",
                    point.display_label().unwrap_or("-"),
                    point.lat,
                    point.lng,
                    pos.x,
                    pos.y
                );
            }
        }

        println!("\n=== Labels ===");
        for label in map.labels() {
            println!(
                "{:<14} at ({:.2}, {:.2}){}",
                label.text,
                label.x,
                label.y,
                if label.needs_leader_line {
                    "  [leader line]"
                } else {
                    ""
                }
            );
        }

        let schedule = map.schedule();
        println!("\n=== Arcs ===");
        println!(
            "total {:.2}s, cycle {:.2}s",
            schedule.total_animation_time, schedule.full_cycle_duration
        );
        for (path, timing) in map.paths().iter().zip(&schedule.timings) {
            println!(
                "#{} {}  times={:.3?}",
                timing.index,
                path.to_svg_path(),
                timing.keyframe_times()
            );
        }

        Ok(())
    }
}
