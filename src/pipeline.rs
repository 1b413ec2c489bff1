use std::io::Read;

use crate::config::{InputSource, RunConfig};
use crate::error::ValidateError;
use crate::fetch::Fetcher;
use crate::records::extract_records;
use crate::report::ResultSet;
use crate::runner;
use crate::schema;

/// Run one validation: fetch both schemas, link them, then validate the
/// input row by row.
///
/// Any fatal error aborts the run; no partial [`ResultSet`] is returned.
pub async fn run(config: &RunConfig) -> Result<ResultSet, ValidateError> {
    let fetcher = Fetcher::new(config.fetch_timeout)?;

    tracing::info!(topic = %config.topic_url, shared = %config.shared_url, "fetching schemas");
    let schemas = fetcher
        .fetch_schemas(&config.topic_url, &config.shared_url)
        .await?;

    let registry = schema::build_registry(schemas.topic, schemas.shared)?;

    let source = open_input(&fetcher, &config.input).await?;
    let input = config.input.to_string();
    let delimiter = config.delimiter;
    let coercion = config.coercion;

    // csv and jsonschema are synchronous, and a remote input blocks on the
    // runtime while streaming; keep both off the runtime thread.
    let task = tokio::task::spawn_blocking(move || {
        let records = extract_records(input, source, delimiter)?;
        runner::validate(records, &registry, coercion)
    });

    task.await
        .map_err(|e| ValidateError::Internal(format!("validation task failed: {e}")))?
}

async fn open_input(
    fetcher: &Fetcher,
    input: &InputSource,
) -> Result<Box<dyn Read + Send>, ValidateError> {
    match input {
        InputSource::Path(path) => {
            let file = std::fs::File::open(path).map_err(|e| {
                ValidateError::input_unreadable(path.display().to_string(), e.to_string())
            })?;
            Ok(Box::new(file))
        }
        InputSource::Url(url) => fetcher.fetch_input(url).await,
    }
}
