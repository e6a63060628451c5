use std::fmt::{self, Display};

use itertools::Itertools;
use xmin_core::model::poi::CategoryRule;

/// one tag request clause of an Overpass filter query, see
/// <https://wiki.openstreetmap.org/wiki/Overpass_API/Language_Guide#Tag_request_clauses_(or_%22tag_filters%22)>
///
/// a single allowed value renders as the equality form `["key"="value"]`;
/// several values render as the anchored-regex form `["key"~"^(a|b)$"]` with
/// the values sorted so the query text is stable for a given rule set.
#[derive(Debug, Clone)]
pub struct TagFilter {
    key: String,
    values: Vec<String>,
}

impl TagFilter {
    pub fn new(key: &str, values: &[String]) -> TagFilter {
        TagFilter {
            key: String::from(key),
            values: values.to_vec(),
        }
    }
}

impl From<&CategoryRule> for TagFilter {
    fn from(rule: &CategoryRule) -> Self {
        TagFilter::new(&rule.key, &rule.values)
    }
}

impl Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.values.as_slice() {
            [single] => write!(f, "[\"{}\"=\"{}\"]", self.key, single),
            values => {
                let pattern = values.iter().sorted().join("|");
                write!(f, "[\"{}\"~\"^({})$\"]", self.key, pattern)
            }
        }
    }
}
