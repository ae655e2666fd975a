//! stemplate's main application entry point.
//! Handles command-line argument parsing and wires the dictionary builder,
//! the projector and the tree renderer together.

use std::sync::Arc;

use stemplate::{
    cli::{get_args, Args},
    dictionary::Dictionary,
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::Processor,
    projector::{ProjectionMode, Projector, SourceKind},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the invocation
/// 2. Builds the dictionary from the selected sources
/// 3. Classifies the source and prepares the output
/// 4. Renders or copies every walked entry
fn run(args: Args) -> Result<()> {
    args.validate()?;

    let dictionary = Arc::new(Dictionary::build(&args.sources())?);
    let engine = MiniJinjaRenderer::new(Arc::clone(&dictionary));

    let source = SourceKind::classify(&args.template);
    let mode = ProjectionMode::prepare(source, args.output.as_deref())?;
    log::debug!("Source is {:?}, projecting as {:?}", source, mode);

    let projector = Projector::new(mode, args.render_options());
    let processor = Processor::new(&engine, &dictionary, &projector);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    processor.run(&args.template, &mut out)
}
