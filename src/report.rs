use serde::Serialize;

/// One schema rule failure of one data row.
///
/// Field order is the serialized key order: `line`, `path`, `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub line: usize,
    pub path: String,
    pub message: String,
}

/// Violations in discovery order: rows in file order, engine order within a
/// row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    violations: Vec<Violation>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl FromIterator<Violation> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl Extend<Violation> for ResultSet {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

/// Serialize as a compact JSON array. An empty set is `[]`.
pub fn report(results: &ResultSet) -> Result<String, serde_json::Error> {
    serde_json::to_string(results)
}

/// Serialize as an indented JSON array.
pub fn report_pretty(results: &ResultSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}
