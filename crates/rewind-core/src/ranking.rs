use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence counter that remembers first-seen order.
///
/// Ties between equal counts always resolve to whichever key was seen first,
/// so the same input order always produces the same ranking.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    order: Vec<(K, u32)>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash> Tally<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.order[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.order.len());
                self.order.push((key, 1));
            }
        }
    }

    pub fn count(&self, key: &K) -> u32 {
        self.index.get(key).map(|&i| self.order[i].1).unwrap_or(0)
    }

    /// Highest count; earliest key wins a tie
    pub fn top(&self) -> Option<(&K, u32)> {
        let mut best: Option<(&K, u32)> = None;
        for (key, count) in &self.order {
            if best.map_or(true, |(_, c)| *count > c) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// Up to `n` keys by descending count, first-seen order within equal counts
    pub fn top_n(&self, n: usize) -> Vec<(K, u32)> {
        let mut ranked = self.order.clone();
        // sort_by is stable: equal counts keep insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u32)> {
        self.order.iter().map(|(k, c)| (k, *c))
    }
}

impl<K: Clone + Eq + Hash> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}
