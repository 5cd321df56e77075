use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use promshape::classify;
use promshape::table;

/// Classify promoter regions as Sharp or Broad from the Shannon entropy of
/// the TSS positions falling inside them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the tab-separated promoters file (seqnames, start, end)
    promoters: PathBuf,

    /// Path to the tab-separated TSS positions file (seqnames, pos)
    tss: PathBuf,

    /// Path to write the tab-separated result table
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (promoters, tss) = table::read_tables(&args.promoters, &args.tss)?;
    let shapes = classify::classify_promoters(&promoters, &tss);

    let mut result = table::results_frame(&promoters, &shapes)?;
    table::write_results(&mut result, &args.output)?;

    println!("{:?}", result);

    Ok(())
}
