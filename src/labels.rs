use std::collections::HashMap;

use itertools::Itertools;

/// Labels and the addresses assigned to them. The first definition wins;
/// pass 1 reports later definitions and drops them.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn add(&mut self, name: String, address: u32) {
        self.symbols.entry(name).or_insert(address);
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Entries sorted by name, for stable display.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.symbols
            .iter()
            .map(|(name, address)| (name.as_str(), *address))
            .sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_definition_wins() {
        let mut symbols = SymbolTable::new();
        symbols.add("ALPHA".to_owned(), 0x1000);
        symbols.add("ALPHA".to_owned(), 0x2000);
        assert_eq!(symbols.get("ALPHA"), Some(0x1000));
        assert_eq!(symbols.get("BETA"), None);
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn sorted_iteration() {
        let mut symbols = SymbolTable::new();
        symbols.add("GAMMA".to_owned(), 3);
        symbols.add("ALPHA".to_owned(), 1);
        symbols.add("BETA".to_owned(), 2);
        let names: Vec<_> = symbols.iter_sorted().map(|(name, _)| name).collect();
        assert_eq!(names, ["ALPHA", "BETA", "GAMMA"]);
    }
}
