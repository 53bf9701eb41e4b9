//! A prefix trie keyed by characters, used to reserve the longest operator.
//!
//! When `+`, `++` and `+++` are all operators, the input `+++x` must produce
//! `+++`. Walking the trie over the upcoming characters and remembering the
//! last node that carries a value gives exactly that.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Node<V> {
    value: Option<V>,
    children: BTreeMap<char, Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }
}

/// Maps strings to values and answers longest-prefix queries.
///
/// # Examples
///
/// ```rust
/// use plait::trie::OperatorTrie;
/// let mut trie = OperatorTrie::new();
/// trie.insert("+", 1);
/// trie.insert("+++", 3);
/// assert_eq!(trie.longest_match("++x".chars()), Some((1, &1)));
/// assert_eq!(trie.longest_match("+++x".chars()), Some((3, &3)));
/// ```
#[derive(Debug, Clone)]
pub struct OperatorTrie<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Default for OperatorTrie<V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<V> OperatorTrie<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key`, returning the value it replaced.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }
        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = &self.root;
        for c in key.chars() {
            node = node.children.get(&c)?;
        }
        node.value.as_ref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The longest key that is a prefix of `input`, as its length in chars
    /// and its value.
    pub fn longest_match(&self, input: impl IntoIterator<Item = char>) -> Option<(usize, &V)> {
        let mut node = &self.root;
        let mut best = None;
        for (consumed, c) in input.into_iter().enumerate() {
            match node.children.get(&c) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(value) = &node.value {
                best = Some((consumed + 1, value));
            }
        }
        best
    }

    /// Whether some key starts with `prefix`. The empty prefix matches any
    /// non-empty trie.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let mut node = &self.root;
        for c in prefix.chars() {
            match node.children.get(&c) {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.value.is_some() || !node.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_prefers_longest_key() {
        let mut trie = OperatorTrie::new();
        for op in ["+", "++", "+++", "-"] {
            trie.insert(op, op.len());
        }
        assert_eq!(trie.longest_match("+++++".chars()), Some((3, &3)));
        assert_eq!(trie.longest_match("++-".chars()), Some((2, &2)));
        assert_eq!(trie.longest_match("*".chars()), None);
        assert_eq!(trie.len(), 4);
    }

    #[test]
    fn inner_nodes_without_values_do_not_match() {
        let mut trie = OperatorTrie::new();
        trie.insert("<=>", ());
        assert_eq!(trie.longest_match("<=".chars()), None);
        assert!(trie.has_prefix("<="));
        assert!(!trie.contains("<="));
    }

    #[test]
    fn insert_replaces_and_reports() {
        let mut trie = OperatorTrie::new();
        assert_eq!(trie.insert("and", 1), None);
        assert_eq!(trie.insert("and", 2), Some(1));
        assert_eq!(trie.get("and"), Some(&2));
        assert_eq!(trie.len(), 1);
    }
}
