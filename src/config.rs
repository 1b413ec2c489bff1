use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ValidateError;

/// Default remote schema store.
pub const DEFAULT_SCHEMA_BASE: &str =
    "https://raw.githubusercontent.com/eLTER-RI/elter-ci-schemas/main/schemas/";

/// Default name of the schema holding shared definitions.
pub const DEFAULT_SHARED_SCHEMA: &str = "shared";

pub const DEFAULT_DELIMITER: u8 = b';';

/// Default wait per schema retrieval (5 seconds).
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Topic schemas published in the eLTER schema store.
pub const KNOWN_TOPICS: &[&str] = &[
    "data_mapping",
    "data_observation",
    "event",
    "license",
    "mapping",
    "method",
    "reference",
    "sample",
    "station",
];

/// How raw field text is turned into JSON before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Coercion {
    /// Every field stays a JSON string.
    #[default]
    None,
    /// Integer- and float-looking fields become JSON numbers.
    Numbers,
}

/// Where the delimited data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Path(PathBuf),
    Url(Url),
}

impl InputSource {
    /// `http`/`https` URLs are fetched remotely, anything else is a local path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::Path(PathBuf::from(raw)),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{u}"),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    pub topic_url: Url,
    pub shared_url: Url,
    pub delimiter: u8,
    pub coercion: Coercion,
    pub fetch_timeout: Duration,
    pub pretty: bool,
}

/// Parse the schema store base URL, treating it as a directory.
pub fn parse_schema_base(raw: &str) -> Result<Url, ValidateError> {
    let mut base = Url::parse(raw)
        .map_err(|e| ValidateError::Config(format!("invalid schema base URL \"{raw}\": {e}")))?;

    if base.cannot_be_a_base() {
        return Err(ValidateError::Config(format!(
            "schema base URL \"{raw}\" cannot be used as a base"
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok(base)
}

/// Expand a schema identifier to the URL of its JSON document.
///
/// `station`, `station.json`, `station.json.json` and
/// `https://host/schemas/station.json` all name the same document. The
/// identifier is percent-encoded first, keeping `:` `.` `/` `_` `-`
/// unescaped, then joined against `base` unless it is already absolute.
pub fn expand_schema_url(base: &Url, identifier: &str) -> Result<Url, ValidateError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ValidateError::Config("schema identifier is empty".into()));
    }

    let encoded = urlencoding::encode(identifier)
        .replace("%3A", ":")
        .replace("%2F", "/");

    let mut stem = encoded.as_str();
    while let Some(stripped) = stem.strip_suffix(".json") {
        stem = stripped;
    }

    base.join(&format!("{stem}.json")).map_err(|e| {
        ValidateError::Config(format!("cannot resolve schema \"{identifier}\" against {base}: {e}"))
    })
}

/// Parse a delimiter argument into a single byte. Accepts `\t` for tab.
pub fn parse_delimiter(raw: &str) -> Result<u8, ValidateError> {
    let candidate = if raw == "\\t" { "\t" } else { raw };
    match candidate.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(ValidateError::Config(format!(
            "delimiter must be a single ASCII character, got \"{raw}\""
        ))),
    }
}

/// True for a bare topic name that is not one of [`KNOWN_TOPICS`].
pub fn is_unknown_topic(identifier: &str) -> bool {
    let mut stem = identifier.trim();
    while let Some(stripped) = stem.strip_suffix(".json") {
        stem = stripped;
    }
    !stem.contains('/') && !KNOWN_TOPICS.contains(&stem)
}
