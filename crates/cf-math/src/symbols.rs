//! Symbol definitions for the cluster grid

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Symbol type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SymbolKind {
    /// Regular paying symbol, forms clusters
    Pay = 0,
    /// Scatter - triggers free spins by count anywhere on the grid
    Scatter = 1,
    /// Multiplier - carries a value, never clusters
    Multiplier = 2,
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: u32,
    /// Symbol name (e.g., "HEART", "LOLLIPOP", "BOMB")
    pub name: String,
    /// Symbol type
    pub kind: SymbolKind,
}

impl Symbol {
    /// Create a paying symbol
    pub fn pay(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: SymbolKind::Pay,
        }
    }

    /// Create the scatter symbol
    pub fn scatter(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: SymbolKind::Scatter,
        }
    }

    /// Create the multiplier symbol
    pub fn multiplier(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: SymbolKind::Multiplier,
        }
    }

    /// Scatter and multiplier symbols never join clusters
    pub fn is_special(&self) -> bool {
        self.kind != SymbolKind::Pay
    }
}

/// Closed set of symbols a grid may hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSet {
    pub symbols: Vec<Symbol>,
}

/// Standard candy set ids
pub const SCATTER_ID: u32 = 10;
pub const MULTIPLIER_ID: u32 = 11;

impl SymbolSet {
    /// Nine pay symbols (1 = highest), one scatter, one multiplier
    pub fn standard() -> Self {
        Self {
            symbols: vec![
                Symbol::pay(1, "HEART"),
                Symbol::pay(2, "SQUARE"),
                Symbol::pay(3, "PENTAGON"),
                Symbol::pay(4, "OVAL"),
                Symbol::pay(5, "APPLE"),
                Symbol::pay(6, "PLUM"),
                Symbol::pay(7, "WATERMELON"),
                Symbol::pay(8, "GRAPES"),
                Symbol::pay(9, "BANANA"),
                Symbol::scatter(SCATTER_ID, "LOLLIPOP"),
                Symbol::multiplier(MULTIPLIER_ID, "BOMB"),
            ],
        }
    }

    /// Check ids are unique and exactly one scatter and one multiplier exist
    pub fn validate(&self) -> MathResult<()> {
        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if !seen.insert(symbol.id) {
                return Err(MathError::InvalidSymbolSet(format!(
                    "duplicate symbol id {}",
                    symbol.id
                )));
            }
        }

        let count = |kind: SymbolKind| self.symbols.iter().filter(|s| s.kind == kind).count();
        if count(SymbolKind::Pay) == 0 {
            return Err(MathError::InvalidSymbolSet("no pay symbols".into()));
        }
        if count(SymbolKind::Scatter) != 1 {
            return Err(MathError::InvalidSymbolSet(
                "exactly one scatter symbol required".into(),
            ));
        }
        if count(SymbolKind::Multiplier) != 1 {
            return Err(MathError::InvalidSymbolSet(
                "exactly one multiplier symbol required".into(),
            ));
        }
        Ok(())
    }

    /// Get symbol by ID
    pub fn get(&self, id: u32) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// True only for known pay symbols
    pub fn is_pay(&self, id: u32) -> bool {
        self.get(id).is_some_and(|s| s.kind == SymbolKind::Pay)
    }

    /// Get all pay symbol IDs
    pub fn pay_ids(&self) -> Vec<u32> {
        self.symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Pay)
            .map(|s| s.id)
            .collect()
    }

    /// Get scatter symbol ID
    pub fn scatter_id(&self) -> Option<u32> {
        self.symbols
            .iter()
            .find(|s| s.kind == SymbolKind::Scatter)
            .map(|s| s.id)
    }

    /// Get multiplier symbol ID
    pub fn multiplier_id(&self) -> Option<u32> {
        self.symbols
            .iter()
            .find(|s| s.kind == SymbolKind::Multiplier)
            .map(|s| s.id)
    }

    pub fn name_of(&self, id: u32) -> &str {
        self.get(id).map(|s| s.name.as_str()).unwrap_or("?")
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_symbol_set() {
        let set = SymbolSet::standard();
        assert!(set.validate().is_ok());
        assert_eq!(set.scatter_id(), Some(SCATTER_ID));
        assert_eq!(set.multiplier_id(), Some(MULTIPLIER_ID));
        assert_eq!(set.pay_ids().len(), 9);
    }

    #[test]
    fn test_special_symbols_are_not_pay() {
        let set = SymbolSet::standard();
        assert!(set.is_pay(1));
        assert!(!set.is_pay(SCATTER_ID));
        assert!(!set.is_pay(MULTIPLIER_ID));
        assert!(!set.is_pay(99));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut set = SymbolSet::standard();
        set.symbols.push(Symbol::pay(1, "DUPLICATE"));
        assert!(matches!(set.validate(), Err(MathError::InvalidSymbolSet(_))));
    }

    #[test]
    fn test_second_scatter_rejected() {
        let mut set = SymbolSet::standard();
        set.symbols.push(Symbol::scatter(42, "EXTRA"));
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SymbolKind::Multiplier).unwrap();
        assert_eq!(json, "\"multiplier\"");
    }
}
