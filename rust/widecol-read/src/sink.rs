//! Consumers of decoded samples.

use widecol_common::{Error, Result};
use widecol_store::Tags;

use crate::sample::Sample;

/// Receives decoded samples grouped into sample sets.
///
/// Every non-empty batch of columns read for a row is delivered as
/// `begin_sample_set`, one `add_sample` per column, then `end_sample_set`. A row that
/// needed continuation requests therefore opens several sets with the same type and
/// tags; consumers must be prepared to merge them.
///
/// An error returned by any method aborts the fetch and is surfaced to its caller.
pub trait SampleSink {
    /// Opens a sample set for the given sample type and tag set.
    fn begin_sample_set(&mut self, data_type: &str, tags: &Tags) -> Result<()>;

    /// Adds a sample to the currently open set.
    fn add_sample(&mut self, sample: Sample) -> Result<()>;

    /// Closes the currently open set.
    fn end_sample_set(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn begin_sample_set(&mut self, data_type: &str, tags: &Tags) -> Result<()> {
        (**self).begin_sample_set(data_type, tags)
    }

    fn add_sample(&mut self, sample: Sample) -> Result<()> {
        (**self).add_sample(sample)
    }

    fn end_sample_set(&mut self) -> Result<()> {
        (**self).end_sample_set()
    }
}

/// Samples sharing one sample type and tag set.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub data_type: String,
    pub tags: Tags,
    pub samples: Vec<Sample>,
}

/// A sink that keeps every sample set in memory, in delivery order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    sets: Vec<SampleSet>,
    open: bool,
}

impl CollectingSink {
    pub fn new() -> CollectingSink {
        Default::default()
    }

    /// Sample sets in the order they were opened, one per delivered batch.
    pub fn sets(&self) -> &[SampleSet] {
        &self.sets
    }

    pub fn into_sets(self) -> Vec<SampleSet> {
        self.sets
    }

    pub fn sample_count(&self) -> usize {
        self.sets.iter().map(|set| set.samples.len()).sum()
    }

    /// Merges repeated openings of the same `(data_type, tags)` key.
    ///
    /// Keys appear in the order of their first opening; the samples of each key keep
    /// their delivery order.
    pub fn merged(&self) -> Vec<SampleSet> {
        let mut index = ahash::HashMap::<(&str, &Tags), usize>::default();
        let mut merged: Vec<SampleSet> = Vec::new();
        for set in &self.sets {
            match index.get(&(set.data_type.as_str(), &set.tags)) {
                Some(&pos) => merged[pos].samples.extend_from_slice(&set.samples),
                None => {
                    index.insert((set.data_type.as_str(), &set.tags), merged.len());
                    merged.push(set.clone());
                }
            }
        }
        merged
    }
}

impl SampleSink for CollectingSink {
    fn begin_sample_set(&mut self, data_type: &str, tags: &Tags) -> Result<()> {
        self.sets.push(SampleSet {
            data_type: data_type.to_string(),
            tags: tags.clone(),
            samples: Vec::new(),
        });
        self.open = true;
        Ok(())
    }

    fn add_sample(&mut self, sample: Sample) -> Result<()> {
        match self.sets.last_mut() {
            Some(set) if self.open => {
                set.samples.push(sample);
                Ok(())
            }
            _ => Err(Error::sink("add_sample", "no open sample set")),
        }
    }

    fn end_sample_set(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
