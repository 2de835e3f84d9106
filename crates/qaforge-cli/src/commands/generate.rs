//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use qaforge_extractor::Pipeline;
use qaforge_llm::ChatCompletionsProvider;
use qaforge_store::JsonlSink;
use tracing::{info, warn};

/// Execute the generate command.
///
/// All configuration is checked, and the metadata file loaded, before the
/// output file is opened.
pub async fn execute_generate(
    args: GenerateArgs,
    mut config: AppConfig,
    formatter: &Formatter,
) -> Result<String> {
    args.apply_to(&mut config);
    config.validate()?;

    let pipeline_config = config.pipeline_config();
    let provider =
        ChatCompletionsProvider::new(config.model.endpoint.clone(), config.model.request_timeout())?;
    info!(
        "Model {} at {} (temperature {}, max_tokens {})",
        config.model.model,
        provider.endpoint(),
        config.model.temperature,
        config.model.max_tokens
    );

    let pipeline = Pipeline::from_config(
        provider,
        config.segmentation.clone(),
        config.model.clone(),
        pipeline_config.clone(),
    )?;

    let mut sink =
        JsonlSink::open(pipeline_config.output_path.clone())?.with_fsync(pipeline_config.fsync);
    let report = pipeline.run(&mut sink).await?;

    if report.all_failed() {
        warn!("Every segment failed; check that the model endpoint is reachable");
    }

    formatter.format_report(&report, sink.path())
}
