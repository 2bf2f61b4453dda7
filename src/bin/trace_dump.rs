use clap::Parser;
use glam::DVec3;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use voxdoom::{
    Settings,
    engine::{FrameRenderer, HitSide},
    world::{Camera, Grid},
};

/// Cast one frame without a window and print it as text.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Text columns; one ray each.
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Text rows.
    #[arg(long, default_value_t = 24)]
    height: usize,
    /// Side of the square walled room, tiles.
    #[arg(long, default_value_t = 8)]
    room: usize,
    /// Camera position on the map plane, tiles.
    #[arg(long, num_args = 2, default_values_t = [1.5, 1.5])]
    pos: Vec<f64>,
    /// Camera yaw in degrees.
    #[arg(long, default_value_t = 45.0)]
    yaw: f64,
    #[arg(long, default_value_t = 800)]
    max_steps: u32,
    /// Also print the per-column hit table.
    #[arg(long)]
    table: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn shade(side: HitSide) -> char {
    match side {
        HitSide::Vertical => '#',
        HitSide::Horizontal => '=',
        HitSide::None => ' ',
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings {
        width: args.width,
        height: args.height,
        column_width: 1,
        max_steps: args.max_steps,
        ..Settings::default()
    }
    .validate()?;

    let grid = Grid::walled_room(args.room, 1, args.room)?;
    let &[x, z] = args.pos.as_slice() else {
        anyhow::bail!("--pos takes two values");
    };
    let cam = Camera::new(
        DVec3::new(x, settings.eye_height, z) * settings.tile_size,
        args.yaw.to_radians(),
        0.0,
        settings.fov,
    );
    info!(?cam, "casting");

    let mut frame = FrameRenderer::new(&settings);
    let cols = frame.cast(&cam, &grid);
    debug!(columns = cols.len(), "cast done");

    let mut rows = vec![vec!['.'; args.width]; args.height];
    for c in cols {
        let (y0, y1) = (c.top.round() as usize, c.bottom.round() as usize);
        for row in rows.iter_mut().take(y1.min(args.height)).skip(y0) {
            row[c.x] = shade(c.side);
        }
    }
    for row in &rows {
        println!("{}", row.iter().collect::<String>());
    }

    if args.table {
        println!("{:>4} {:>9} {:>10} {:>12} {:>6}", "col", "distance", "side", "cell", "frac");
        for c in cols {
            println!(
                "{:>4} {:>9.3} {:>10} {:>12} {:>6.3}",
                c.x,
                c.distance,
                format!("{:?}", c.side),
                format!("{},{},{}", c.cell.x, c.cell.y, c.cell.z),
                c.hit_fraction
            );
        }
    }
    Ok(())
}
