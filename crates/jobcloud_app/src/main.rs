mod cli;
mod logging;
mod report;
mod settings;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::engine_info;
use jobcloud_core::{PipelineOptions, PipelineResult};
use jobcloud_engine::{
    BatchScraper, ChromeRenderer, LogProgressSink, Orchestrator, Renderer, StaticRenderer,
};

use crate::cli::{Args, RendererKind};
use crate::settings::SettingsFile;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::initialize(args.verbose, args.log_file.as_deref());

    match run(&args) {
        Ok(result) if result.success => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<PipelineResult> {
    let settings = match &args.settings {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let options = args.pipeline_options()?;
    let urls = args.collect_urls()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = match args.renderer {
        RendererKind::Chrome => runtime.block_on(scrape(
            ChromeRenderer::new(settings.render_settings()),
            &settings,
            urls,
            options,
        )),
        RendererKind::Static => runtime.block_on(scrape(
            StaticRenderer::new(settings.fetch_settings()),
            &settings,
            urls,
            options,
        )),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        print!("{}", report::render(&result, &generated_at));
    }
    Ok(result)
}

async fn scrape<R: Renderer>(
    renderer: R,
    settings: &SettingsFile,
    urls: Vec<String>,
    options: PipelineOptions,
) -> PipelineResult {
    engine_info!(
        "Starting run: {} input(s), n={}, min frequency={}",
        urls.len(),
        options.n_gram_size(),
        options.min_frequency()
    );
    let scraper = BatchScraper::new(renderer).with_settings(settings.batch_settings());
    Orchestrator::new(scraper)
        .run(urls, options, &LogProgressSink)
        .await
}
