use std::collections::HashSet;

use crate::feature::{raw_file_stem, FeatureMap};
use crate::metadata::SampleSheet;

/// File identifiers designated as blanks.
///
/// Identifiers are compared by raw-file stem, so `blank1`, `blank1.mzML` and
/// `/data/blank1.mzML` all name the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankSet {
    stems: HashSet<String>,
}

impl BlankSet {
    /// Build from any list of file identifiers
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers.into_iter().collect()
    }

    /// Blanks listed in a sample sheet
    pub fn from_sample_sheet(sheet: &SampleSheet) -> Self {
        Self::new(sheet.blanks())
    }

    /// Whether the file identified by `name` is a blank
    pub fn contains(&self, name: &str) -> bool {
        self.stems.contains(raw_file_stem(name))
    }

    /// Add another identifier
    pub fn insert(&mut self, name: &str) {
        self.stems.insert(raw_file_stem(name).to_string());
    }

    /// Number of distinct blanks
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    /// True when no blanks are designated
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Blank stems, sorted, that name none of `maps`
    pub fn unmatched(&self, maps: &[FeatureMap]) -> Vec<&str> {
        self.stems()
            .into_iter()
            .filter(|stem| !maps.iter().any(|m| m.stem() == *stem))
            .collect()
    }

    /// Blank stems in sorted order
    pub fn stems(&self) -> Vec<&str> {
        let mut stems: Vec<&str> = self.stems.iter().map(String::as_str).collect();
        stems.sort_unstable();
        stems
    }
}

impl<S: AsRef<str>> FromIterator<S> for BlankSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = BlankSet::default();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}
