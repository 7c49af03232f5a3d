use serde::{Deserialize, Serialize};

/// Name filter applied to every fetched place. With both lists empty every
/// place is accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring terms.
    pub contains: Vec<String>,
    /// Case-insensitive exact terms.
    pub matches: Vec<String>,
}

impl FilterSpec {
    pub fn new<C, M>(contains: C, matches: M) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Self {
            contains: normalize_terms(contains),
            matches: normalize_terms(matches),
        }
    }

    /// Parses comma-separated term lists, as accepted on the command line
    /// and in query strings. Blank entries are dropped.
    pub fn from_comma_lists(contains: Option<&str>, matches: Option<&str>) -> Self {
        Self::new(split_terms(contains), split_terms(matches))
    }

    pub fn is_empty(&self) -> bool {
        self.contains.is_empty() && self.matches.is_empty()
    }

    pub fn accepts(&self, name: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let name = name.to_lowercase();

        self.contains
            .iter()
            .any(|term| name.contains(&term.trim().to_lowercase()))
            || self
                .matches
                .iter()
                .any(|term| name == term.trim().to_lowercase())
    }
}

fn normalize_terms<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .collect()
}

pub fn split_terms(list: Option<&str>) -> Vec<&str> {
    list.map(|l| {
        l.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
