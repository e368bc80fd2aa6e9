//! Generate a synthetic star catalog and print statistics about it.

use anyhow::Result;
use clap::Parser;
use starfield::catalogs::StarCatalog;
use starfield::{CatalogGenerator, DEFAULT_STAR_COUNT};

#[derive(Parser, Debug)]
#[command(
    name = "catalog_stats",
    about = "Generate a synthetic star catalog and print its census",
    long_about = "Generates a procedural star catalog and prints the spectral census, \
the apparent magnitude distribution and the declination bands it covers. \
Pass --seed to make the output reproducible."
)]
struct Args {
    /// Number of stars to generate
    #[arg(long, default_value_t = DEFAULT_STAR_COUNT)]
    stars: usize,

    /// Seed for reproducible catalogs (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Star Catalog Statistics Tool");
    println!("===========================");

    let catalog = match args.seed {
        Some(seed) => CatalogGenerator::with_seed(seed).generate_catalog(args.stars)?,
        None => CatalogGenerator::from_entropy().generate_catalog(args.stars)?,
    };

    println!("Total stars: {}", catalog.len());
    println!("\nSpectral census:");
    println!("{}", catalog.census());

    let mag_ranges = [
        (f64::NEG_INFINITY, 0.0, "Very bright stars (mag < 0)"),
        (0.0, 3.0, "Bright stars (mag 0 to 3)"),
        (3.0, 6.0, "Naked eye visible stars (mag 3 to 6)"),
        (6.0, 10.0, "Binocular visible stars (mag 6 to 10)"),
        (10.0, 15.0, "Telescope visible stars (mag 10 to 15)"),
        (15.0, f64::INFINITY, "Faint stars (mag > 15)"),
    ];

    println!("\nMagnitude Distribution:");
    for (min, max, desc) in mag_ranges {
        let count = catalog
            .filter(|star| star.apparent_magnitude >= min && star.apparent_magnitude < max)
            .len();
        let percentage = count as f64 / catalog.len() as f64 * 100.0;
        println!("  {}: {} stars ({:.1}%)", desc, count, percentage);
    }

    let dec_bands = [
        (-90.0, -60.0, "South polar region (dec -90° to -60°)"),
        (-60.0, -30.0, "South temperate (dec -60° to -30°)"),
        (-30.0, 0.0, "South tropical (dec -30° to 0°)"),
        (0.0, 30.0, "North tropical (dec 0° to 30°)"),
        (30.0, 60.0, "North temperate (dec 30° to 60°)"),
        (60.0, 90.1, "North polar region (dec 60° to 90°)"),
    ];

    println!("\nSpatial distribution by declination:");
    for (min, max, desc) in dec_bands {
        let count = catalog
            .filter(|star| star.dec >= min && star.dec < max)
            .len();
        let percentage = count as f64 / catalog.len() as f64 * 100.0;
        println!("  {}: {} stars ({:.1}%)", desc, count, percentage);
    }

    Ok(())
}
