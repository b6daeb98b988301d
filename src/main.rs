//! serial-ocr CLI
//!
//! Thin driver over the library: synthesize labeled images, run recognition
//! over the generated folder, and inspect or move the dataset around.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use serial_ocr::config::{load_config, PipelineConfig};
use serial_ocr::{DatasetStore, ImageSynthesizer};

/// Serial number image synthesis and OCR dataset builder
#[derive(Parser, Debug)]
#[command(name = "serial-ocr")]
#[command(about = "Generate serial number training images and build an OCR dataset")]
struct Args {
    /// Path to a TOML pipeline configuration; defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for deterministic image synthesis
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate randomized training images for a serial number
    Generate {
        /// The serial number text to render
        text: String,
        /// How many images to generate
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// Recognize all new images in the output folder and update the dataset
    Process,
    /// Write the dataset to an arbitrary path
    Export { path: PathBuf },
    /// Replace the dataset with one read from an arbitrary path
    Import { path: PathBuf },
    /// Print dataset summary
    Stats,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    match args.command {
        Command::Generate { text, count } => {
            let mut synthesizer = match args.seed {
                Some(seed) => ImageSynthesizer::with_seed(config.synth, seed)?,
                None => ImageSynthesizer::new(config.synth)?,
            };
            let written = synthesizer.generate(&text, count)?;
            let folder = written
                .first()
                .and_then(|p| p.parent())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string());
            println!("Generated {} images in {}", written.len(), folder);
        }
        Command::Process => {
            process(&config)?;
        }
        Command::Export { path } => {
            let store = DatasetStore::new(&config.dataset.dataset_path);
            let dataset = store.load()?;
            store.export(&dataset, &path)?;
            println!(
                "Exported {} records to {}",
                dataset.records.len(),
                path.display()
            );
        }
        Command::Import { path } => {
            let store = DatasetStore::new(&config.dataset.dataset_path);
            let mut dataset = store.import(&path)?;
            store.save(&mut dataset)?;
            println!(
                "Imported {} records from {}",
                dataset.records.len(),
                path.display()
            );
        }
        Command::Stats => {
            let store = DatasetStore::new(&config.dataset.dataset_path);
            let dataset = store.load()?;
            println!("Records:      {}", dataset.records.len());
            println!("Last updated: {}", dataset.last_updated);
            for record in &dataset.records {
                println!(
                    "  {:<20} conf {:.2}  {}",
                    record.text, record.confidence, record.image_path
                );
            }
        }
    }

    Ok(())
}

#[cfg(feature = "tesseract")]
fn process(config: &PipelineConfig) -> Result<()> {
    use serial_ocr::ocr::TesseractEngine;
    use serial_ocr::OcrSession;

    let engine = TesseractEngine::new(&config.ocr)?;
    let mut session = OcrSession::open(engine, config)?;
    let appended = session.process_generated_images()?;
    session.save()?;
    println!(
        "Appended {} records ({} total)",
        appended,
        session.dataset().records.len()
    );
    session.shutdown();
    Ok(())
}

#[cfg(not(feature = "tesseract"))]
fn process(_config: &PipelineConfig) -> Result<()> {
    anyhow::bail!(
        "recognition requires the `tesseract` feature (rebuild with --features tesseract)"
    )
}
