//! Ordered collection of level definitions.

use samurai_tower_core::{LevelDefinition, TowerDefinition};

/// Named sequence of levels, numbered from one.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    name: String,
    levels: Vec<LevelDefinition>,
}

impl Tower {
    /// Creates a tower from its levels in play order.
    #[must_use]
    pub fn new(name: impl Into<String>, levels: Vec<LevelDefinition>) -> Self {
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Tower name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level `number`, counting from one.
    #[must_use]
    pub fn level(&self, number: u32) -> Option<&LevelDefinition> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.levels.get(index)
    }

    /// Reports whether level `number` exists.
    #[must_use]
    pub fn has_level(&self, number: u32) -> bool {
        self.level(number).is_some()
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// Reports whether the tower has no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl From<TowerDefinition> for Tower {
    fn from(definition: TowerDefinition) -> Self {
        Self::new(definition.name, definition.levels)
    }
}
