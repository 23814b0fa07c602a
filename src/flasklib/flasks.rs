use itertools::Itertools;

use crate::bstack::BoundedStack;
use crate::chemical::Chemical;
use crate::error::{MoveError, TransferError};

/// How many matching units it takes to seal a flask.
pub const UNITS_PER_CHEMICAL: usize = 3;
pub const DEFAULT_CAPACITY: usize = 4;

pub type Flask = BoundedStack<Chemical>;

/// A flask is sealed when it holds exactly `UNITS_PER_CHEMICAL` identical units. A full
/// flask of four matching units is not sealed.
pub fn is_sealed<T: PartialEq>(flask: &BoundedStack<T>) -> bool {
    let units = flask.elements();
    units.len() == UNITS_PER_CHEMICAL && units.iter().all_equal()
}

pub fn can_pour_from<T: PartialEq>(flask: &BoundedStack<T>) -> bool {
    !flask.is_empty() && !is_sealed(flask)
}

/// Any unit may go into any flask that has room and is not sealed; the top unit of the
/// destination does not have to match.
pub fn can_pour_into<T: PartialEq>(flask: &BoundedStack<T>) -> bool {
    !flask.is_full() && !is_sealed(flask)
}

/// The full set of flasks in play. Every public index is 1-based, the way the player
/// numbers them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flasks {
    flasks: Vec<Flask>,
}

impl Flasks {
    pub fn new(count: usize, capacity: usize) -> Self {
        Self {
            flasks: (0..count).map(|_| Flask::new(capacity)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Flask> {
        index.checked_sub(1).and_then(|i| self.flasks.get(i))
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Flask> {
        index.checked_sub(1).and_then(|i| self.flasks.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flask> {
        self.flasks.iter()
    }

    fn lookup(&self, index: usize) -> Result<&Flask, MoveError> {
        self.get(index).ok_or(MoveError::NoSuchFlask { index })
    }

    pub fn is_legal_move(&self, source: usize, dest: usize) -> Result<(), MoveError> {
        let source_flask = self.lookup(source)?;
        let dest_flask = self.lookup(dest)?;
        if source == dest {
            return Err(MoveError::SameFlask);
        }
        // A flask that cannot take a unit is reported before an unusable source.
        if !can_pour_into(dest_flask) {
            return Err(MoveError::DestinationInvalid { index: dest });
        }
        if !can_pour_from(source_flask) {
            return Err(MoveError::SourceInvalid { index: source });
        }
        Ok(())
    }

    /// Moves the top unit of `source` onto `dest` and returns it. Nothing changes unless
    /// the move is legal.
    pub fn transfer(&mut self, source: usize, dest: usize) -> Result<Chemical, TransferError> {
        self.is_legal_move(source, dest)?;
        let unit = self.flasks[source - 1].pop()?;
        if let Err(e) = self.flasks[dest - 1].push(unit.clone()) {
            self.flasks[source - 1].push(unit)?;
            return Err(e.into());
        }
        log::info!("poured {} from flask {} into flask {}", unit, source, dest);
        Ok(unit)
    }

    pub fn is_solved(&self) -> bool {
        self.flasks
            .iter()
            .all(|flask| flask.is_empty() || is_sealed(flask))
    }
}

impl From<Vec<Flask>> for Flasks {
    fn from(flasks: Vec<Flask>) -> Self {
        Self { flasks }
    }
}
