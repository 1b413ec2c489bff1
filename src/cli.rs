use std::time::Duration;

use clap::Parser;

use crate::config::{
    self, Coercion, InputSource, RunConfig, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SCHEMA_BASE,
    DEFAULT_SHARED_SCHEMA,
};
use crate::error::ValidateError;

/// Validate a delimited data file row by row against a remote JSON Schema.
///
/// Fetches a topic-specific schema and a shared-definitions schema from the
/// schema store, links them, and prints every violation as a JSON array of
/// `{line, path, message}` objects.
#[derive(Parser, Debug)]
#[command(name = "elter-validate", version, about)]
pub struct Cli {
    /// Path or http(s) URL of the delimited file to validate
    pub input: String,

    /// Base URL of the remote schema store
    #[arg(short = 'u', long, env = "ELTER_SCHEMA_BASE", default_value = DEFAULT_SCHEMA_BASE)]
    pub schema_base: String,

    /// Topic schema: name ("station"), file name ("station.json") or full URL
    #[arg(short = 't', long, short_alias = 'r', alias = "rules")]
    pub schema_topic: String,

    /// Schema holding definitions shared by topic schemas
    #[arg(short = 's', long, alias = "shared-rules", default_value = DEFAULT_SHARED_SCHEMA)]
    pub schema_shared: String,

    /// Column separator (a single character, `\t` for tab)
    #[arg(short = 'd', long, alias = "delim", default_value = ";")]
    pub delimiter: String,

    /// Convert numeric-looking fields to JSON numbers before validation
    #[arg(long, value_enum, default_value_t = Coercion::None)]
    pub coerce: Coercion,

    /// Seconds to wait for each remote retrieval
    #[arg(long, env = "ELTER_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Pretty-print the result array
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Resolve raw arguments into a [`RunConfig`].
    pub fn into_config(self) -> Result<RunConfig, ValidateError> {
        if self.timeout_secs == 0 {
            return Err(ValidateError::Config(
                "timeout must be a positive number of seconds".into(),
            ));
        }

        if config::is_unknown_topic(&self.schema_topic) {
            tracing::warn!(
                topic = %self.schema_topic,
                known = ?config::KNOWN_TOPICS,
                "topic is not a known eLTER schema"
            );
        }

        let base = config::parse_schema_base(&self.schema_base)?;
        let topic_url = config::expand_schema_url(&base, &self.schema_topic)?;
        let shared_url = config::expand_schema_url(&base, &self.schema_shared)?;

        Ok(RunConfig {
            input: InputSource::parse(&self.input),
            topic_url,
            shared_url,
            delimiter: config::parse_delimiter(&self.delimiter)?,
            coercion: self.coerce,
            fetch_timeout: Duration::from_secs(self.timeout_secs),
            pretty: self.pretty,
        })
    }
}
