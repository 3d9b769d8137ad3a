/// Single-slot cache: recomputes only when the key changes.
#[derive(Debug)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    hits: u64,
    misses: u64,
}

/// Cache counters, exposed for tests and debug overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let hit = matches!(&self.entry, Some((cached, _)) if *cached == key);
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        value
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_on_key_change() {
        let mut memo = Memo::new();
        let mut calls = 0;
        for key in [1, 1, 2, 2, 1] {
            memo.get_or_compute(key, || {
                calls += 1;
                key * 10
            });
        }
        assert_eq!(calls, 3);
        assert_eq!(memo.stats(), MemoStats { hits: 2, misses: 3 });
        assert_eq!(*memo.get_or_compute(1, || 0), 10);

        memo.invalidate();
        assert_eq!(*memo.get_or_compute(1, || 7), 7);
    }
}
