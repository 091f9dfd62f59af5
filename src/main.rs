// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BBMaker - Bounding Box Maker
//!
//! A desktop tool for drawing normalized bounding boxes over a folder of
//! images, plus a command that asks a vision model for boxes and renders
//! them back onto the image.

mod app;
mod config;
mod inference;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{bail, Result};
use app::BBMakerApp;
use clap::{Parser, Subcommand};
use config::{InferenceConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use inference::client::{InferenceOutcome, PromptClient};
use inference::parser::ResponseParser;
use io::serialization::{AnnotationFormat, BoxStore};
use std::path::PathBuf;
use util::render::Renderer;

#[derive(Parser)]
#[command(name = "bbmaker", version, about = "Draw and generate normalized bounding boxes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the annotation window
    Annotate {
        /// Image folder to open; a folder picker is shown when omitted
        dir: Option<PathBuf>,

        /// Annotation file format
        #[arg(long, value_enum, default_value_t = AnnotationFormat::Json)]
        format: AnnotationFormat,
    },
    /// Ask a vision model for bounding boxes in one image
    Detect {
        /// Text file whose first line is the api key
        #[arg(long)]
        key_file: PathBuf,

        /// Image to analyse
        #[arg(long)]
        image: PathBuf,

        /// Extra context appended to the prompt
        #[arg(long)]
        hint: Option<String>,

        /// Write the image with the boxes drawn on it
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
        api_base: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        None => run_annotator(None, AnnotationFormat::default()),
        Some(Command::Annotate { dir, format }) => run_annotator(dir, format),
        Some(Command::Detect {
            key_file,
            image,
            hint,
            output,
            model,
            api_base,
        }) => {
            let config = InferenceConfig::from_key_file(&key_file, &model, &api_base)?;
            run_detect(config, image, hint, output)
        }
    }
}

fn run_annotator(dir: Option<PathBuf>, format: AnnotationFormat) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("BBMaker - Bounding Box Maker"),
        ..Default::default()
    };

    let store = BoxStore::new(format);
    eframe::run_native(
        "BBMaker",
        options,
        Box::new(move |_cc| Ok(Box::new(BBMakerApp::new(store, dir)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

fn run_detect(
    config: InferenceConfig,
    image_path: PathBuf,
    hint: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let parser = ResponseParser::new()?;
    let client = PromptClient::new(config)?;
    let mut image = io::media::load_image(&image_path)?;

    let boxes = match client.extract_bounding_boxes(&image, hint.as_deref()) {
        InferenceOutcome::Success(text) => parser.parse(&text),
        InferenceOutcome::Failure(reason) => {
            bail!("No result from the inference service: {}", reason)
        }
    };
    log::info!("Model returned {} boxes", boxes.len());

    let rows: Vec<[f64; 4]> = boxes.iter().map(|b| b.to_array()).collect();
    println!("{}", serde_json::to_string(&rows)?);

    if let Some(output) = output {
        Renderer::default().draw(&mut image, &boxes)?;
        image.save(&output)?;
        log::info!("Wrote {}", output.display());
    }

    Ok(())
}
