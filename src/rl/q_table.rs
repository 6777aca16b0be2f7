//! The value table: per-state action values

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ops::{Index, IndexMut};

use super::perception::State;
use crate::game::Direction;

/// Values of the four actions in one state, indexed by [`Direction`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionValues([f64; 4]);

impl ActionValues {
    pub fn new(values: [f64; 4]) -> Self {
        Self(values)
    }

    /// Largest value over all four actions
    pub fn max_value(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        Direction::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// All actions from `candidates` that share the maximum value
    pub fn best_among(&self, candidates: &[Direction]) -> Vec<Direction> {
        let best = candidates
            .iter()
            .map(|d| self[*d])
            .fold(f64::NEG_INFINITY, f64::max);

        candidates
            .iter()
            .copied()
            .filter(|d| self[*d] == best)
            .collect()
    }
}

impl Index<Direction> for ActionValues {
    type Output = f64;

    fn index(&self, direction: Direction) -> &f64 {
        &self.0[direction.index()]
    }
}

impl IndexMut<Direction> for ActionValues {
    fn index_mut(&mut self, direction: Direction) -> &mut f64 {
        &mut self.0[direction.index()]
    }
}

/// Mapping from state to action values, filled lazily with zero rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<State, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &State) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    /// Row for `state`, inserting a zero row on first access
    pub fn row_mut(&mut self, state: State) -> &mut ActionValues {
        self.rows.entry(state).or_default()
    }

    /// Ensure a row exists and return a copy of it
    pub fn row(&mut self, state: State) -> ActionValues {
        *self.row_mut(state)
    }

    /// Insert or replace a whole row; returns true if the state was new
    pub fn insert(&mut self, state: State, values: ActionValues) -> bool {
        match self.rows.entry(state) {
            Entry::Occupied(mut e) => {
                e.insert(values);
                false
            }
            Entry::Vacant(e) => {
                e.insert(values);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &ActionValues)> {
        self.rows.iter()
    }
}
