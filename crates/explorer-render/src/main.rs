/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render a block explorer template from the command line
 */

mod context_file;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use explorer_template::loader::DEFAULT_EXTENSION;
use explorer_template::{
    FileSystemLoader, RenderOptions, TemplateContext, TemplateRenderer, TemplateStore,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "explorer-render")]
#[command(about = "Render an explorer template with a JSON render context")]
struct Args {
    /// Template name, resolved as <TEMPLATES>/<NAME>.<EXTENSION>
    #[arg(value_name = "NAME")]
    name: String,

    /// Directory containing the templates
    #[arg(short, long, value_name = "DIR", default_value = "templates")]
    templates: PathBuf,

    /// Template file extension
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// JSON file holding the render context (an object)
    #[arg(short, long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// Fail on unresolved placeholders and report errors instead of
    /// printing the fallback page
    #[arg(long)]
    strict: bool,

    /// Only substitute variables; leave extends, block and for markup alone
    #[arg(long)]
    direct: bool,

    /// Verbose logging on stderr (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let output = run(&args)?;
    print!("{output}");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "explorer_template=debug,explorer_render=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<String> {
    if !args.templates.is_dir() {
        anyhow::bail!("Template directory does not exist: {:?}", args.templates);
    }

    let context = match &args.context {
        Some(path) => context_file::load(path)?,
        None => TemplateContext::new(),
    };

    let loader = FileSystemLoader::new(&args.templates).with_extension(&args.extension);
    let renderer = TemplateRenderer::new(TemplateStore::new(loader))
        .with_options(RenderOptions::new().with_strict(args.strict));

    info!(
        template = %args.name,
        templates = %args.templates.display(),
        variables = context.len(),
        "Rendering template"
    );

    if !args.strict {
        return Ok(if args.direct {
            renderer.render_direct(&args.name, &context)
        } else {
            renderer.render(&args.name, &context)
        });
    }

    let rendered = if args.direct {
        renderer.try_render_direct(&args.name, &context)
    } else {
        renderer.try_render(&args.name, &context)
    };
    rendered.context(format!("Failed to render template: {}", args.name))
}
