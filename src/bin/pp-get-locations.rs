use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pp_barcelos::{locations::Location, SiteData};

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'd', long)]
    data: Option<PathBuf>,
    #[arg(short = 'f', long, help = "Only featured locations")]
    featured: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let data = match args.data {
        Some(path) => SiteData::load(path).await?,
        None => SiteData::embedded()?,
    };
    let locations = if args.featured {
        data.locations().featured()
    } else {
        data.locations().active()
    };
    println!("{}", serde_json::to_string::<Vec<&Location>>(&locations)?);
    Ok(())
}
