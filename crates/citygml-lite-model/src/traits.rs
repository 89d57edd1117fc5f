// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feature producer traits
//!
//! The geometry pipeline never sees markup. A front end walks its document
//! and yields typed records on demand.

use crate::{FeatureRecord, Result};
use std::collections::VecDeque;

/// Pull-based producer of feature records
///
/// # Example
///
/// ```ignore
/// use citygml_lite_model::FeatureSource;
///
/// fn count_polygons(source: &mut dyn FeatureSource) -> usize {
///     let mut total = 0;
///     while let Some(Ok(record)) = source.next_feature() {
///         total += record.polygon_count();
///     }
///     total
/// }
/// ```
pub trait FeatureSource {
    /// Get the next record
    ///
    /// # Returns
    /// `None` once the source is exhausted, `Some(Err(_))` if the front end
    /// failed to produce the record
    fn next_feature(&mut self) -> Option<Result<FeatureRecord>>;

    /// Number of records left, if known
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<S: FeatureSource + ?Sized> FeatureSource for &mut S {
    fn next_feature(&mut self) -> Option<Result<FeatureRecord>> {
        (**self).next_feature()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

/// In-memory feature source
#[derive(Clone, Debug, Default)]
pub struct VecFeatureSource {
    records: VecDeque<FeatureRecord>,
}

impl VecFeatureSource {
    /// Create a source over already decoded records
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Queue another record
    pub fn push(&mut self, record: FeatureRecord) {
        self.records.push_back(record);
    }
}

impl FeatureSource for VecFeatureSource {
    fn next_feature(&mut self) -> Option<Result<FeatureRecord>> {
        self.records.pop_front().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.records.len(), Some(self.records.len()))
    }
}

impl FromIterator<FeatureRecord> for VecFeatureSource {
    fn from_iter<I: IntoIterator<Item = FeatureRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
