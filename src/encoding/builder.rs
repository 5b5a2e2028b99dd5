// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Vector and label assembly.
//!
//! An [`EventDataBuilder`] holds an ordered registry of features and
//! labellers. Vectors are the concatenation of every feature's subvector
//! in registration order; consumers decode them by fixed offsets.

use super::feature::Feature;
use super::label::{LabelValue, Labeller};
use super::EncodeArgs;
use crate::error::{Error, Result};
use crate::sequencer::EventView;

/// Builds vectors and label tuples from events
#[derive(Debug, Default)]
pub struct EventDataBuilder {
    features: Vec<Box<dyn Feature>>,
    labels: Vec<Box<dyn Labeller>>,
    dim: usize,
}

impl EventDataBuilder {
    /// Create a builder with no encoders
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature after those already present
    pub fn with_feature(mut self, feature: impl Feature + 'static) -> Self {
        self.push_feature(Box::new(feature));
        self
    }

    /// Register a labeller after those already present
    pub fn with_label(mut self, labeller: impl Labeller + 'static) -> Self {
        self.push_label(Box::new(labeller));
        self
    }

    pub fn push_feature(&mut self, feature: Box<dyn Feature>) {
        self.dim += feature.dim();
        self.features.push(feature);
    }

    pub fn push_label(&mut self, labeller: Box<dyn Labeller>) {
        self.labels.push(labeller);
    }

    /// Length of every vector: the sum of feature dimensions
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn num_labellers(&self) -> usize {
        self.labels.len()
    }

    /// Labeller identifiers in registration order
    pub fn label_identifiers(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.identifier()).collect()
    }

    /// Concatenated feature subvectors for `event`
    pub fn make_vector(&self, event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f64>> {
        let mut vec = Vec::with_capacity(self.dim);
        for feature in &self.features {
            let sub = feature.make_subvector(event, args)?;
            if sub.len() != feature.dim() {
                return Err(Error::invariant(format!(
                    "{:?} produced {} values, declared {}",
                    feature,
                    sub.len(),
                    feature.dim()
                )));
            }
            vec.extend(sub);
        }
        Ok(vec)
    }

    /// Single-precision form of [`EventDataBuilder::make_vector`]
    pub fn make_vector_f32(&self, event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f32>> {
        Ok(self
            .make_vector(event, args)?
            .into_iter()
            .map(|x| x as f32)
            .collect())
    }

    /// One label per labeller, in registration order
    pub fn make_labels(
        &self,
        event: &dyn EventView,
        args: &EncodeArgs,
    ) -> Result<Vec<Option<usize>>> {
        self.labels
            .iter()
            .map(|labeller| labeller.get_event_label(event, args))
            .collect()
    }

    /// Decode `label` with the labeller named `identifier`.
    ///
    /// Fails if no labeller or more than one has that identifier.
    pub fn label_value(&self, identifier: &str, label: usize) -> Result<LabelValue> {
        let mut matching = self.labels.iter().filter(|l| l.identifier() == identifier);
        let labeller = matching.next().ok_or_else(|| {
            Error::lookup(format!("labeller '{}' not found in builder", identifier))
        })?;
        let extra = matching.count();
        if extra > 0 {
            return Err(Error::lookup(format!(
                "ambiguous label identifier; {} labellers found for '{}'",
                extra + 1,
                identifier
            )));
        }
        labeller.get_value_of(label)
    }
}
