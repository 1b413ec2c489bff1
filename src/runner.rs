use jsonschema::Validator;

use crate::config::Coercion;
use crate::error::ValidateError;
use crate::records::Record;
use crate::report::{ResultSet, Violation};
use crate::schema::SchemaRegistry;

/// Validate every record against the registry's topic schema.
///
/// Records are checked one at a time, in order, collecting every violation;
/// an invalid record never stops the run. Only a record that cannot be read
/// is fatal.
pub fn validate<I>(
    records: I,
    registry: &SchemaRegistry,
    coercion: Coercion,
) -> Result<ResultSet, ValidateError>
where
    I: IntoIterator<Item = Result<Record, ValidateError>>,
{
    let validator = registry.validator();
    let mut results = ResultSet::new();
    let mut rows = 0usize;

    for record in records {
        let record = record?;
        let before = results.len();
        results.extend(record_violations(&record, validator, coercion));
        rows += 1;

        let found = results.len() - before;
        if found > 0 {
            tracing::debug!(line = record.line, violations = found, "row invalid");
        }
    }

    tracing::info!(rows, violations = results.len(), "validation finished");
    Ok(results)
}

/// All violations of a single record, in the engine's reporting order.
pub fn record_violations(
    record: &Record,
    validator: &Validator,
    coercion: Coercion,
) -> Vec<Violation> {
    let instance = record.to_instance(coercion);
    validator
        .iter_errors(&instance)
        .map(|error| Violation {
            line: record.line,
            path: join_pointer(&error.instance_path().to_string()),
            message: error.to_string(),
        })
        .collect()
}

/// Render a JSON Pointer (`/a/0/b~1c`) as comma-joined segments (`a,0,b/c`).
pub fn join_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        return String::new();
    }

    pointer
        .strip_prefix('/')
        .unwrap_or(pointer)
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(",")
}
