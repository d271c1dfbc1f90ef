/// Set of record positions backed by a bitset.
///
/// Positions index into a `Collection` (see `Collection::position`), so a
/// set built against one store is meaningless against another.
///
/// Ordering contract:
/// - Iteration yields positions in ascending order, i.e. collection source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionSet {
    words: Vec<u64>,
    len: usize,
}

impl PositionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, position: usize) -> bool {
        let (word, bit) = word_bit(position);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        PositionIter {
            words: &self.words,
            word_index: 0,
            current_word: 0,
            base: 0,
        }
    }
}

impl FromIterator<usize> for PositionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut out = PositionSet::new();
        for p in iter {
            out.insert(p);
        }
        out
    }
}

fn word_bit(position: usize) -> (usize, u32) {
    (position / 64, (position % 64) as u32)
}

struct PositionIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current_word: u64,
    base: usize,
}

impl Iterator for PositionIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let tz = self.current_word.trailing_zeros();
                self.current_word &= !(1u64 << tz);
                return Some(self.base + tz as usize);
            }

            let w = *self.words.get(self.word_index)?;
            self.current_word = w;
            self.base = self.word_index * 64;
            self.word_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PositionSet;

    #[test]
    fn insert_dedups() {
        let mut s = PositionSet::new();
        assert!(s.is_empty());
        assert!(s.insert(3));
        assert!(!s.insert(3));
        assert_eq!(s.len(), 1);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn iter_is_ascending_across_words() {
        let s: PositionSet = [70, 2, 10, 2].into_iter().collect();
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 10, 70]);
        assert_eq!(s.len(), 3);
    }
}
