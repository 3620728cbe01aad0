use std::fmt::Display;

use crate::containers::StorageKey;

/// A propositional variable, identified by its 0-based index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    index: u32,
}

impl Variable {
    pub fn new(index: u32) -> Variable {
        Variable { index }
    }

    pub fn get_index(&self) -> u32 {
        self.index
    }
}

impl StorageKey for Variable {
    fn index(&self) -> usize {
        self.index as usize
    }

    fn create_from_index(index: usize) -> Self {
        Variable::new(index as u32)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.index + 1)
    }
}
