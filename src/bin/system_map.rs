use std::path::{Path, PathBuf};

use clap::Parser;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_wander::consts::START_TIME;
use space_wander::gui::texture_color;
use space_wander::model::SolarSystem;

/// Draws a top-down map of a system, as it stands at some point in time.
#[derive(Debug, Parser)]
struct Args {
    /// Map a randomly generated system from this seed instead of the canonical one
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated time to place the bodies at
    #[arg(long, default_value_t = START_TIME)]
    time: f64,
    #[arg(long, default_value = "plots/system-map.png")]
    output: PathBuf,
    /// Image width and height, in pixels
    #[arg(long, default_value_t = 800)]
    size: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut system = match args.seed {
        Some(seed) => SolarSystem::random(&mut StdRng::seed_from_u64(seed)),
        None => SolarSystem::canonical(),
    };
    system.calculate_positions(args.time);

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    draw_map(&args.output, &system, args.size)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn draw_map(
    path: &Path,
    system: &SolarSystem,
    size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let bodies = system.render_bodies();
    let extent = 1.1
        * bodies
            .iter()
            .map(|b| b.position.coords.xy().norm() + b.radius)
            .fold(1.0f32, f32::max);

    let root = BitMapBackend::new(path, (size, size)).into_drawing_area();
    root.fill(&BLACK)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart
        .configure_mesh()
        .light_line_style(&RGBColor(30, 30, 30))
        .bold_line_style(&RGBColor(60, 60, 60))
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .axis_style(&WHITE)
        .draw()?;

    for orbit in system.orbit_paths() {
        chart.draw_series(LineSeries::new(
            orbit.iter().map(|p| (p.x, p.y)),
            &RGBColor(90, 90, 115),
        ))?;
    }

    // Radius in pixels; tiny bodies still get a dot
    let pixels_per_unit = size as f32 / (2.0 * extent);
    chart.draw_series(bodies.iter().map(|body| {
        let [r, g, b] = texture_color(body.texture);
        let color = RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8);
        let radius = ((body.radius * pixels_per_unit) as i32).max(2);
        Circle::new((body.position.x, body.position.y), radius, color.filled())
    }))?;

    // Light sources get a halo
    chart.draw_series(bodies.iter().filter(|b| b.emissive).map(|body| {
        let radius = ((body.radius * pixels_per_unit) as i32).max(2) + 4;
        Circle::new((body.position.x, body.position.y), radius, &YELLOW)
    }))?;

    root.present()?;
    Ok(())
}
