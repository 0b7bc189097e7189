//! Document processing handlers: transform, anonymize, prepare

use crate::cli::{AnonymizeArgs, IoArgs, PrepareArgs, TransformArgs};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use propclean_core::{AnonymizeOptions, Node, PrepareOptions, TransformOptions};
use tracing::{debug, info, instrument};

use super::utils::read_document;

/// Handle the transform command
#[instrument(skip_all, fields(input = ?args.io.input))]
pub fn handle_transform(args: TransformArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let options = transform_options(config, args.delimiter, args.max_depth);
    debug!(?options, "Transform options resolved");

    let document = load(&args.io, output)?;
    let result = {
        let _timer = Timer::with_details("transform", &describe(&args.io));
        propclean_core::transform_with(&document, &options)?
    };

    emit(&args.io, &result, output)
}

/// Handle the anonymize command
#[instrument(skip_all, fields(input = ?args.io.input))]
pub fn handle_anonymize(args: AnonymizeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let options = anonymize_options(config, args.style.map(Into::into), args.max_depth);
    debug!(?options, "Anonymize options resolved");

    let document = load(&args.io, output)?;
    let result = {
        let _timer = Timer::with_details("anonymize", &describe(&args.io));
        propclean_core::anonymize_with(&document, &options)?
    };

    emit(&args.io, &result, output)
}

/// Handle the prepare command
#[instrument(skip_all, fields(input = ?args.io.input))]
pub fn handle_prepare(args: PrepareArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let options = PrepareOptions {
        transform: transform_options(config, args.delimiter, args.max_depth),
        anonymize: anonymize_options(config, args.style.map(Into::into), args.max_depth),
    };
    debug!(?options, "Prepare options resolved");

    let document = load(&args.io, output)?;
    let result = {
        let _timer = Timer::with_details("prepare", &describe(&args.io));
        propclean_core::prepare_with(&document, &options)?
    };

    emit(&args.io, &result, output)
}

fn transform_options(
    config: &Config,
    delimiter: Option<String>,
    max_depth: Option<usize>,
) -> TransformOptions {
    let mut options = config.transform.clone();
    if let Some(delimiter) = delimiter {
        options.delimiter = delimiter;
    }
    if let Some(max_depth) = max_depth {
        options.max_depth = Some(max_depth);
    }
    options
}

fn anonymize_options(
    config: &Config,
    style: Option<propclean_core::PathStyle>,
    max_depth: Option<usize>,
) -> AnonymizeOptions {
    let mut options = config.anonymize;
    if let Some(style) = style {
        options.style = style;
    }
    if let Some(max_depth) = max_depth {
        options.max_depth = Some(max_depth);
    }
    options
}

fn describe(io: &IoArgs) -> String {
    io.input_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}

fn load(io: &IoArgs, output: &mut OutputWriter) -> Result<Node> {
    output.info(&format!("Reading {}", describe(io)))?;
    let document = read_document(io.input_path())?;
    debug!(depth = document.depth(), "Document loaded");
    Ok(document)
}

fn emit(io: &IoArgs, result: &Node, output: &mut OutputWriter) -> Result<()> {
    if let Some(path) = &io.save_to {
        output.redirect_to_file(path)?;
        output.data(result)?;
        info!(path = %path.display(), "Result saved");
        output.success(&format!("✓ Saved result to {}", path.display()))?;
    } else {
        output.data(result)?;
    }
    Ok(())
}
