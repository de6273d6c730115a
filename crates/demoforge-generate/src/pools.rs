use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::{Map, Value};
use tracing::debug;

use demoforge_core::{FieldSpec, TopicConfig};

use crate::errors::GenerationError;

/// Pools are cached per (file, field, uniqueness) so unique and shared
/// requests against the same source never interfere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    file: String,
    field: String,
    unique: bool,
}

/// One loaded pool. The backing entries are never mutated; unique draws walk
/// a shuffled index arena where `cursor` separates drawn from undrawn
/// indices, making exhaustion and ordering observable without list surgery.
#[derive(Debug)]
struct Pool {
    entries: Vec<Map<String, Value>>,
    draw_order: Vec<usize>,
    cursor: usize,
}

impl Pool {
    fn remaining(&self) -> usize {
        self.draw_order.len() - self.cursor
    }
}

/// Lazily-loaded named value pools serving `reference`-typed fields.
#[derive(Debug, Default)]
pub struct ReferencePools {
    base_dir: PathBuf,
    pools: HashMap<PoolKey, Pool>,
}

impl ReferencePools {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            pools: HashMap::new(),
        }
    }

    /// Load every pool the config references so all I/O happens before bulk
    /// generation begins.
    pub fn warm(&mut self, config: &TopicConfig, rng: &mut dyn RngCore) -> Result<(), GenerationError> {
        for field in &config.fields {
            self.warm_spec(&field.spec, rng)?;
        }
        Ok(())
    }

    fn warm_spec(&mut self, spec: &FieldSpec, rng: &mut dyn RngCore) -> Result<(), GenerationError> {
        match spec {
            FieldSpec::Reference(reference) => {
                self.pool_for(
                    &reference.reference_file,
                    &reference.reference_field,
                    reference.unique,
                    rng,
                )?;
            }
            FieldSpec::String(pattern) => {
                for component in pattern.components.values() {
                    self.warm_spec(component, rng)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Draw the named attribute of one pool entry. Unique pools consume one
    /// undrawn index per call and fail with an exhaustion error once drained;
    /// shared pools sample independently with implicit replacement.
    pub fn draw(
        &mut self,
        file: &str,
        field: &str,
        unique: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Value, GenerationError> {
        let pool = self.pool_entry(file, field, unique, rng)?;

        let index = if unique {
            if pool.remaining() == 0 {
                return Err(GenerationError::PoolExhausted {
                    file: file.to_string(),
                    field: field.to_string(),
                });
            }
            let index = pool.draw_order[pool.cursor];
            pool.cursor += 1;
            index
        } else {
            rng.random_range(0..pool.entries.len())
        };

        let entry = &pool.entries[index];
        entry.get(field).cloned().ok_or_else(|| {
            GenerationError::InvalidConfig(format!(
                "reference_field '{field}' not found in entry {index} of {file}"
            ))
        })
    }

    fn pool_for(
        &mut self,
        file: &str,
        field: &str,
        unique: bool,
        rng: &mut dyn RngCore,
    ) -> Result<(), GenerationError> {
        self.pool_entry(file, field, unique, rng)?;
        Ok(())
    }

    fn pool_entry(
        &mut self,
        file: &str,
        field: &str,
        unique: bool,
        rng: &mut dyn RngCore,
    ) -> Result<&mut Pool, GenerationError> {
        let key = PoolKey {
            file: file.to_string(),
            field: field.to_string(),
            unique,
        };
        let pool = match self.pools.entry(key) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let pool = load_pool(&self.base_dir, file, unique, rng)?;
                debug!(file, field, unique, entries = pool.entries.len(), "reference pool loaded");
                vacant.insert(pool)
            }
        };

        if pool.entries.is_empty() {
            return Err(GenerationError::InvalidConfig(format!(
                "reference pool is empty: {file}"
            )));
        }
        Ok(pool)
    }
}

fn load_pool(
    base_dir: &Path,
    file: &str,
    unique: bool,
    rng: &mut dyn RngCore,
) -> Result<Pool, GenerationError> {
    let path = base_dir.join(file);
    if !path.exists() {
        return Err(GenerationError::MissingReference(
            path.display().to_string(),
        ));
    }

    let contents = std::fs::read_to_string(&path)?;
    let entries: Vec<Map<String, Value>> = serde_json::from_str(&contents).map_err(|err| {
        GenerationError::InvalidConfig(format!(
            "reference file {} is not a JSON array of objects: {err}",
            path.display()
        ))
    })?;

    let mut draw_order: Vec<usize> = (0..entries.len()).collect();
    if unique {
        draw_order.shuffle(rng);
    }

    Ok(Pool {
        entries,
        draw_order,
        cursor: 0,
    })
}
