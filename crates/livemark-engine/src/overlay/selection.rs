/// Sorted, duplicate-free indices of the selected blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedBlockSet {
    indices: Vec<usize>,
}

impl SelectedBlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// Replaces the selection with a single block.
    pub fn select_single(&mut self, index: usize) {
        self.indices.clear();
        self.indices.push(index);
    }

    pub fn replace(&mut self, indices: impl IntoIterator<Item = usize>) {
        *self = Self::from_indices(indices);
    }

    /// Clears the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let had = !self.indices.is_empty();
        self.indices.clear();
        had
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_sorted_and_unique() {
        let set = SelectedBlockSet::from_indices([4, 1, 4, 2]);
        assert_eq!(set.as_slice(), &[1, 2, 4]);
        assert!(set.contains(2));
        assert!(!set.contains(3));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut set = SelectedBlockSet::from_indices([0]);
        assert!(set.clear());
        assert!(!set.clear());
        assert!(set.is_empty());
    }

    #[test]
    fn select_single_replaces() {
        let mut set = SelectedBlockSet::from_indices([0, 3]);
        set.select_single(2);
        assert_eq!(set.as_slice(), &[2]);
    }
}
