//! Caller-controlled memoization of pipeline runs.
//!
//! Entries are keyed by the input digest (sha256 of canonical inputs + options).
//! A digest hit is only reused when the stored inputs compare equal, so the key
//! is effectively the exact inputs.
//!
//! The memo is bounded: past `capacity` entries the oldest insertion is evicted.

use std::collections::{BTreeMap, VecDeque};

use log::debug;

use crate::{build_result, run, PipelineError, PipelineInputs, PipelineOutputs, RunOptions};

struct Entry {
    inputs: PipelineInputs,
    options: RunOptions,
    outputs: PipelineOutputs,
}

/// Entries kept by `Memo::new`.
pub const DEFAULT_MEMO_CAPACITY: usize = 64;

pub struct Memo {
    entries: BTreeMap<String, Entry>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for Memo {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMO_CAPACITY)
    }
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memo holding at most `capacity` runs (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached outputs for these exact inputs, running the pipeline on a miss.
    /// Errors are not cached.
    pub fn get_or_run(
        &mut self,
        inputs: &PipelineInputs,
        opts: &RunOptions,
    ) -> Result<&PipelineOutputs, PipelineError> {
        let key = build_result::input_digest(inputs, opts)?.as_hex().to_string();
        let hit = matches!(
            self.entries.get(&key),
            Some(e) if e.inputs == *inputs && e.options == *opts
        );
        if hit {
            self.hits += 1;
            debug!("memo: hit {key}");
        } else {
            self.misses += 1;
            debug!("memo: miss {key}");
            let outputs = run(inputs, opts)?;
            let entry = Entry { inputs: inputs.clone(), options: opts.clone(), outputs };
            if self.entries.insert(key.clone(), entry).is_none() {
                self.order.push_back(key.clone());
                self.evict_over_capacity();
            }
        }
        self.entries
            .get(&key)
            .map(|e| &e.outputs)
            .ok_or_else(|| PipelineError::Build(format!("memo entry {key} missing after insert")))
    }

    fn evict_over_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    debug!("memo: evict {old}");
                    self.entries.remove(&old);
                }
                None => break,
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
