//! Climatesim CLI - coupled-field planetary climate simulator.
//!
//! Run the four-subsystem simulation on a generated or supplied elevation
//! field, on the CPU or the GPU compute backend, and export snapshots.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use climatesim::engine::{latitude_banded_temperature, Backend, PlanetConfig, RunConfig, Simulation};
use climatesim::export::write_scalar_png;
use climatesim::gpu::{ClimateGpu, GpuContext};
use climatesim::grid::{GridSize, ScalarField};
use climatesim::params::constants::OMEGA;
use climatesim::System;

/// Coupled-field planetary climate simulator.
#[derive(Parser)]
#[command(name = "climatesim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation on a seeded demo elevation field.
    Run {
        /// Grid width in cells (longitude direction).
        #[arg(long, default_value = "64")]
        width: usize,

        /// Grid height in cells (latitude direction).
        #[arg(long, default_value = "32")]
        height: usize,

        /// Total number of time steps.
        #[arg(short, long, default_value = "2880")]
        steps: u64,

        /// Steps between snapshots (0 disables snapshots).
        #[arg(long, default_value = "120")]
        snapshot_interval: u64,

        /// Time step in seconds. The explicit scheme needs roughly 40 s or
        /// less to keep the air-surface exchange stable.
        #[arg(long, default_value = "30")]
        dt: f32,

        /// Evaluator backend.
        #[arg(short, long, default_value = "auto")]
        backend: BackendArg,

        /// Random seed for the demo elevation field.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of continents in the demo elevation field.
        #[arg(long, default_value = "5")]
        continents: usize,

        /// Planet circumference in kilometers.
        #[arg(long, default_value = "40075")]
        circumference_km: f32,

        /// Axial tilt in degrees.
        #[arg(long, default_value = "23.44")]
        axial_tilt_deg: f32,

        /// Orbital year length in days (0 disables the seasonal cycle).
        #[arg(long, default_value = "365.25")]
        orbit_period_days: f32,

        /// Start from a latitude-banded temperature profile this many kelvin
        /// warmer at the equator than at the poles (0 keeps the isothermal
        /// initial state).
        #[arg(long, default_value = "0")]
        equator_warming: f32,

        /// Output directory for exported snapshot maps.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Export temperature and wind-speed maps for each snapshot.
        #[arg(long)]
        export_snapshots: bool,
    },

    /// Print the derived configuration for a grid without simulating.
    Info {
        /// Grid width in cells.
        #[arg(long, default_value = "64")]
        width: usize,

        /// Grid height in cells.
        #[arg(long, default_value = "32")]
        height: usize,

        /// Planet circumference in kilometers.
        #[arg(long, default_value = "40075")]
        circumference_km: f32,
    },

    /// Generate and export a demo elevation field without simulating.
    DemoElevation {
        /// Grid width in cells.
        #[arg(long, default_value = "64")]
        width: usize,

        /// Grid height in cells.
        #[arg(long, default_value = "32")]
        height: usize,

        /// Random seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of continents.
        #[arg(long, default_value = "5")]
        continents: usize,

        /// Output PNG path.
        #[arg(short, long, default_value = "./elevation.png")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Prefer GPU, fall back to CPU.
    Auto,
    /// Require the GPU backend.
    Gpu,
    /// Force the sequential CPU evaluator.
    Cpu,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => Backend::Auto,
            BackendArg::Gpu => Backend::GpuOnly,
            BackendArg::Cpu => Backend::CpuOnly,
        }
    }
}

/// Seeded demo terrain: cosine-falloff continents scattered on the torus,
/// over a deep-ocean baseline.
fn demo_elevation(width: usize, height: usize, continents: usize, seed: u64) -> ScalarField {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let size = GridSize::new(width, height);
    let mut field = ScalarField::filled(size, -4000.0);

    for _ in 0..continents {
        let cx = rng.gen_range(0..width) as f32;
        let cy = rng.gen_range(0..height) as f32;
        let radius = rng.gen_range(0.12..0.3) * width.min(height) as f32;
        let amplitude = rng.gen_range(4500.0..7000.0);

        for (x, y) in size.cells() {
            // x distance wraps around the torus; y does not.
            let dx_raw = (x as f32 - cx).abs();
            let dx = dx_raw.min(width as f32 - dx_raw);
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d < radius {
                let t = (std::f32::consts::FRAC_PI_2 * d / radius).cos();
                let bump = amplitude * t * t;
                field.set(x, y, field.get(x, y) + bump);
            }
        }
    }

    field
}

#[allow(clippy::too_many_arguments)]
fn run_simulation(
    width: usize,
    height: usize,
    steps: u64,
    snapshot_interval: u64,
    dt: f32,
    backend: Backend,
    seed: u64,
    continents: usize,
    equator_warming: f32,
    planet: PlanetConfig,
    output: PathBuf,
    export_snapshots: bool,
) {
    println!("Climatesim - coupled-field climate simulator");
    println!("============================================");
    println!("Grid: {}x{} cells", width, height);
    println!("Steps: {} x {}s", steps, dt);
    println!("Seed: {}", seed);

    let elevation = demo_elevation(width, height, continents, seed);
    let land_cells = elevation.iter().filter(|&&h| h > 0.0).count();
    println!(
        "Demo elevation: {} continents, {:.1}% land",
        continents,
        100.0 * land_cells as f32 / elevation.as_slice().len() as f32
    );

    let system = match System::new(elevation, planet) {
        Ok(system) => system,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let system = if equator_warming > 0.0 {
        use climatesim::params::constants::T0;
        let profile = latitude_banded_temperature(system.size, T0 - equator_warming / 2.0, equator_warming);
        match system.with_temperature_profile(&profile) {
            Ok(system) => system,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        system
    };

    let config = RunConfig {
        total_steps: steps,
        snapshot_interval,
        dt,
    };
    let cancel = AtomicBool::new(false);

    if export_snapshots {
        if let Err(e) = std::fs::create_dir_all(&output) {
            eprintln!("Error creating output directory: {}", e);
            std::process::exit(1);
        }
    }

    let mut observe = |iteration: u64, snapshot: System| {
        let (min_t, max_t) = snapshot.fields.atmosphere.temperature.value_range();
        println!(
            "  step {:>6}: air temperature range [{:.2}, {:.2}] K",
            iteration, min_t, max_t
        );
        if export_snapshots {
            let air = output.join(format!("air_temperature_{:06}.png", iteration));
            let ocean = output.join(format!("ocean_temperature_{:06}.png", iteration));
            if let Err(e) = write_scalar_png(&snapshot.fields.atmosphere.temperature, &air)
                .and_then(|_| write_scalar_png(&snapshot.fields.ocean.temperature, &ocean))
            {
                eprintln!("Error exporting snapshot: {}", e);
            }
            // A calm uniform wind field has no range to normalize; skip it.
            let speed = snapshot.fields.atmosphere.velocity.speed();
            let (lo, hi) = speed.value_range();
            if lo < hi {
                let wind = output.join(format!("wind_speed_{:06}.png", iteration));
                if let Err(e) = write_scalar_png(&speed, &wind) {
                    eprintln!("Error exporting wind map: {}", e);
                }
            }
        }
    };

    let start = Instant::now();

    let (final_system, outcome) = match backend {
        Backend::CpuOnly => {
            println!("Backend: sequential CPU evaluator");
            Simulation::new(system, config).run(&cancel, &mut observe)
        }
        Backend::GpuOnly => match pollster::block_on(GpuContext::new()) {
            Ok(ctx) => {
                println!("Backend: GPU compute kernels");
                ClimateGpu::new(ctx).run(&system, &config, &cancel, &mut observe)
            }
            Err(e) => {
                eprintln!("Error: GPU backend unavailable: {}", e);
                std::process::exit(1);
            }
        },
        Backend::Auto => match pollster::block_on(GpuContext::new()) {
            Ok(ctx) => {
                println!("Backend: GPU compute kernels");
                ClimateGpu::new(ctx).run(&system, &config, &cancel, &mut observe)
            }
            Err(_) => {
                println!("Backend: sequential CPU evaluator (no GPU adapter)");
                Simulation::new(system, config).run(&cancel, &mut observe)
            }
        },
    };

    println!("Run {:?} in {:.2?}", outcome, start.elapsed());
    let (min_t, max_t) = final_system.fields.atmosphere.temperature.value_range();
    println!("Final air temperature range: [{:.2}, {:.2}] K", min_t, max_t);

    if export_snapshots {
        let path = output.join("elevation.png");
        match write_scalar_png(&final_system.fields.elevation, &path) {
            Ok(()) => println!("Exported elevation map: {}", path.display()),
            Err(e) => eprintln!("Error exporting elevation map: {}", e),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            width,
            height,
            steps,
            snapshot_interval,
            dt,
            backend,
            seed,
            continents,
            circumference_km,
            axial_tilt_deg,
            orbit_period_days,
            equator_warming,
            output,
            export_snapshots,
        } => {
            if width < 2 || height < 2 {
                eprintln!("Error: grid dimensions must be at least 2x2");
                std::process::exit(1);
            }
            if dt <= 0.0 {
                eprintln!("Error: time step must be positive");
                std::process::exit(1);
            }
            let planet = PlanetConfig {
                circumference_m: circumference_km * 1000.0,
                axial_tilt_rad: axial_tilt_deg.to_radians(),
                rotation_speed_rad_s: OMEGA,
                orbit_period_days,
                day_of_year: 0.0,
            };
            let seed = seed.unwrap_or_else(rand::random);
            run_simulation(
                width,
                height,
                steps,
                snapshot_interval,
                dt,
                backend.into(),
                seed,
                continents,
                equator_warming,
                planet,
                output,
                export_snapshots,
            );
        }

        Commands::Info {
            width,
            height,
            circumference_km,
        } => {
            use climatesim::params::{latitude_deg, solar_flux};

            if width < 2 || height < 2 {
                eprintln!("Error: grid dimensions must be at least 2x2");
                std::process::exit(1);
            }
            println!("Climatesim configuration");
            println!("========================");
            println!("Grid: {}x{} cells ({} total)", width, height, width * height);
            println!(
                "Cell size: {:.1} x {:.1} km",
                circumference_km / width as f32,
                circumference_km / height as f32
            );
            println!("Latitude rows:");
            for y in 0..height {
                let lat = latitude_deg(y, height);
                let noon = solar_flux(lat, 0.0, 0.0);
                println!("  y={:>3}: {:>6.1} deg, noon flux {:>7.1} W/m^2", y, lat, noon);
            }
        }

        Commands::DemoElevation {
            width,
            height,
            seed,
            continents,
            output,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            println!("Generating {}x{} elevation field (seed {})", width, height, seed);
            let field = demo_elevation(width, height, continents, seed);
            match write_scalar_png(&field, &output) {
                Ok(()) => println!("Exported: {}", output.display()),
                Err(e) => {
                    eprintln!("Error exporting elevation: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
