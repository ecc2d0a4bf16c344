use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cbir_knn_rs::logger;
use cbir_knn_rs::retrieval::{
    DatabaseKind, Denominator, FeatureType, RetrievalConfig, RetrievalPipeline, TiffCompression,
    TiffMeanImageWriter, write_category_means,
};

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cbir")]
#[command(about = "Mean color / mean image retrieval and k-NN classification", long_about = None)]
struct Cli {
    /// Directory of category_xxx.{jpg,jpeg,png} images
    dataset: PathBuf,

    /// Feature used for ranking ("Mean Color" or "Mean Image")
    #[arg(short, long, default_value = "Mean Color")]
    feature: FeatureType,

    /// Database to rank against ("All Images" or "Categories")
    #[arg(short, long, default_value = "All Images")]
    database: DatabaseKind,

    /// Number of nearest neighbours voting on a category
    #[arg(short, default_value_t = 1)]
    k: usize,

    /// Evaluation worker threads (defaults to one per CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Divide correct predictions by "queries" or "database"
    #[arg(long, default_value = "queries")]
    denominator: Denominator,

    /// Skip records that fail instead of aborting the evaluation
    #[arg(long)]
    skip_failed: bool,

    /// Image file name to search for
    #[arg(short, long)]
    query: Option<String>,

    /// Write category mean images as TIFF into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    let config = RetrievalConfig::builder()
        .feature_type(cli.feature)
        .database(cli.database)
        .k(cli.k)
        .workers(cli.workers)
        .denominator(cli.denominator)
        .skip_failed(cli.skip_failed)
        .build();
    let pipeline = RetrievalPipeline::new(config);

    info!("Feature: {}", pipeline.config().feature_type);
    info!("Database: {}", pipeline.config().database);

    let store = pipeline
        .load_directory(&cli.dataset)
        .with_context(|| format!("loading {}", cli.dataset.display()))?;

    for record in store.categories().iter().chain(store.all()) {
        let c = record.mean_color;
        println!("{:<20} mean color ({:>3}, {:>3}, {:>3})", record.name, c.r, c.g, c.b);
    }

    if let Some(query) = &cli.query {
        match pipeline.search(&store, query) {
            Ok(outcome) => {
                for (rank, hit) in outcome.hits.iter().enumerate() {
                    println!("{:>4}. {:<30} {:<15} {}", rank + 1, hit.name, hit.category, hit.distance);
                }
                println!("Prediction: {}", outcome.predicted);
            }
            Err(e) => error!("Search failed: {}", e),
        }
    }

    let report = pipeline.evaluate(&store).context("evaluation failed")?;
    println!("{}", report);

    if let Some(dir) = &cli.export_dir {
        let writer = TiffMeanImageWriter::new(TiffCompression::DeflateBalanced);
        let written = write_category_means(&writer, &store, dir)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        info!("Wrote {} mean images", written.len());
    }

    Ok(())
}
