use bimap::BiMap;
use tracing::debug;

/// Flat variable namespace. Addresses are handed out in first-use order
/// starting at 0 and never reused.
#[derive(Debug, Default, Clone)]
pub struct Symbols(BiMap<String, usize>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(BiMap::new())
    }

    /// Address of `name`, allocating the next free cell on first use.
    pub fn address(&mut self, name: &str) -> usize {
        if let Some(&addr) = self.0.get_by_left(name) {
            return addr;
        }
        let addr = self.0.len();
        self.0.insert(name.to_string(), addr);
        debug!(name, addr, "allocate variable");
        addr
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get_by_left(name).copied()
    }

    pub fn name(&self, addr: usize) -> Option<&str> {
        self.0.get_by_right(&addr).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(name, address)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        (0..self.0.len()).filter_map(|addr| self.name(addr).map(|name| (name, addr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_use_order() {
        let mut symbols = Symbols::new();
        assert_eq!(symbols.address("x"), 0);
        assert_eq!(symbols.address("y"), 1);
        assert_eq!(symbols.address("x"), 0);
        assert_eq!(symbols.address("z"), 2);
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn bijection() {
        let mut symbols = Symbols::new();
        for name in ["a", "b", "a", "c", "b"] {
            symbols.address(name);
        }
        for (name, addr) in symbols.iter() {
            assert_eq!(symbols.get(name), Some(addr));
            assert_eq!(symbols.name(addr), Some(name));
        }
        assert_eq!(
            symbols.iter().collect::<Vec<_>>(),
            vec![("a", 0), ("b", 1), ("c", 2)]
        );
        assert_eq!(symbols.get("d"), None);
    }
}
