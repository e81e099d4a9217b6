//! Example: run the ship headless and watch the engines cycle
//!
//! Usage: cargo run -p nacelle-core --example status_cycle -- [assets-dir]
//! Set RUST_LOG=debug to see every status request.
use nacelle_core::{Ship, ShipAssets, Status};
use std::env;

const STEP: f64 = 1.0 / 30.0;

fn main() -> nacelle_core::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    let mut ship = Ship::load(&ShipAssets::from_dir(&dir), Status::Off)?;

    let mut t = 0.0;
    for _ in 0..2 {
        ship.request_status_change();
        let start = t;
        while ship.status().is_transitioning() {
            t += STEP;
            ship.tick(t, STEP);
        }
        let right = ship.node(ship.nacelle_right());
        println!(
            "engines {} after {:.2}s, right nacelle bank {:.3} rad",
            ship.status(),
            t - start,
            right.bank()
        );
    }

    let front = ship.node(ship.front_left());
    println!("front nacelle bank at t={:.2}s: {:.3} rad", t, front.bank());
    Ok(())
}
