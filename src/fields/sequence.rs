//! Sequences of field data, e.g. the time steps of a simulation.

use super::FieldData;
use crate::compare_error::FieldCompareError;

/// A cursor over the steps of a field data sequence.
pub trait FieldDataSequenceSource {
    type Data: FieldData;

    /// Move back to the first step.
    fn reset(&mut self);

    /// Advance to the next step; `false` if there is none.
    fn step(&mut self) -> bool;

    /// The field data of the current step.
    fn get(&self) -> Result<Self::Data, FieldCompareError>;

    fn number_of_steps(&self) -> usize;
}

/// Iterable view over a [`FieldDataSequenceSource`].
#[derive(Debug)]
pub struct FieldDataSequence<S> {
    source: S,
}

impl<S: FieldDataSequenceSource> FieldDataSequence<S> {
    pub fn new(source: S) -> Self {
        FieldDataSequence { source }
    }

    pub fn number_of_steps(&self) -> usize {
        self.source.number_of_steps()
    }

    /// Iterate over all steps, starting from the first one.
    pub fn iter(&mut self) -> Steps<'_, S> {
        Steps {
            source: &mut self.source,
            started: false,
            done: false,
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Iterator over the steps of a [`FieldDataSequence`].
pub struct Steps<'a, S> {
    source: &'a mut S,
    started: bool,
    done: bool,
}

impl<S: FieldDataSequenceSource> Iterator for Steps<'_, S> {
    type Item = Result<S::Data, FieldCompareError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.source.reset();
            if self.source.number_of_steps() == 0 {
                self.done = true;
                return None;
            }
        } else if !self.source.step() {
            self.done = true;
            return None;
        }
        Some(self.source.get())
    }
}

/// A sequence whose steps are held in memory.
#[derive(Clone, Debug)]
pub struct InMemorySequence<D> {
    steps: Vec<D>,
    current: usize,
}

impl<D> InMemorySequence<D> {
    pub fn new(steps: Vec<D>) -> Self {
        InMemorySequence { steps, current: 0 }
    }
}

impl<D: FieldData + Clone> FieldDataSequenceSource for InMemorySequence<D> {
    type Data = D;

    fn reset(&mut self) {
        self.current = 0;
    }

    fn step(&mut self) -> bool {
        if self.current + 1 < self.steps.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn get(&self) -> Result<D, FieldCompareError> {
        self.steps.get(self.current).cloned().ok_or_else(|| {
            FieldCompareError::Sequence(format!("no step with index {}", self.current))
        })
    }

    fn number_of_steps(&self) -> usize {
        self.steps.len()
    }
}
