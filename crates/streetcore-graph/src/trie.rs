//! Case-insensitive prefix trie over street names, for
//! `find_street_ids_from_partial_street_name`.
//!
//! Nodes live in a flat arena (`Vec<TrieNode>`) rather than behind
//! `Box`/`Rc` pointers — the whole trie is built once at load time and never
//! mutated afterwards, so there is no reason to pay heap-allocation and
//! indirection costs per character.  Children are looked up by linear scan
//! over a small `Vec<(char, u32)>`; street-name alphabets are small enough
//! (a few dozen distinct lowercase letters, digits, spaces, punctuation)
//! that this beats a `HashMap` in practice and keeps the arena trivially
//! `Send`/`Sync`.

use streetcore_core::StreetId;

const ROOT: u32 = 0;

struct TrieNode {
    children: Vec<(char, u32)>,
    /// Streets whose name's lowercased form ends exactly at this node.
    /// Most nodes have zero; a handful of duplicate street names share one.
    streets: Vec<StreetId>,
}

impl TrieNode {
    fn empty() -> Self {
        Self {
            children: Vec::new(),
            streets: Vec::new(),
        }
    }

    fn child(&self, c: char) -> Option<u32> {
        self.children.iter().find(|(ch, _)| *ch == c).map(|(_, idx)| *idx)
    }
}

/// A case-insensitive prefix index over every street name in the map.
pub struct NameTrie {
    nodes: Vec<TrieNode>,
}

impl NameTrie {
    /// Build the trie from the map's street-name table (`street_name[i]` is
    /// the name of `StreetId(i)`), lowercasing for case-insensitive lookup.
    pub fn build(street_names: &[String]) -> Self {
        let mut trie = Self {
            nodes: vec![TrieNode::empty()],
        };
        for (i, name) in street_names.iter().enumerate() {
            trie.insert(name, StreetId(i as u32));
        }
        trie
    }

    fn insert(&mut self, name: &str, id: StreetId) {
        let mut cur = ROOT;
        for c in name.to_lowercase().chars() {
            cur = match self.nodes[cur as usize].child(c) {
                Some(next) => next,
                None => {
                    let idx = self.nodes.len() as u32;
                    self.nodes.push(TrieNode::empty());
                    self.nodes[cur as usize].children.push((c, idx));
                    idx
                }
            };
        }
        self.nodes[cur as usize].streets.push(id);
    }

    /// Every `StreetId` whose lowercased name starts with `prefix`
    /// (case-insensitive), in the order first encountered during the
    /// depth-first collection below — callers that need a specific order
    /// (e.g. alphabetical) should sort the result themselves.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<StreetId> {
        let mut cur = ROOT;
        for c in prefix.to_lowercase().chars() {
            match self.nodes[cur as usize].child(c) {
                Some(next) => cur = next,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        self.collect(cur, &mut out);
        out
    }

    fn collect(&self, node: u32, out: &mut Vec<StreetId>) {
        let n = &self.nodes[node as usize];
        out.extend_from_slice(&n.streets);
        for &(_, child) in &n.children {
            self.collect(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["King St".into(), "King St West".into(), "Queen St".into()]
    }

    #[test]
    fn prefix_matches_multiple_streets() {
        let trie = NameTrie::build(&names());
        let mut ids = trie.find_by_prefix("king");
        ids.sort();
        assert_eq!(ids, vec![StreetId(0), StreetId(1)]);
    }

    #[test]
    fn prefix_is_case_insensitive() {
        let trie = NameTrie::build(&names());
        assert_eq!(trie.find_by_prefix("QUEEN"), vec![StreetId(2)]);
    }

    #[test]
    fn unknown_prefix_returns_empty() {
        let trie = NameTrie::build(&names());
        assert!(trie.find_by_prefix("zz").is_empty());
    }

    #[test]
    fn empty_prefix_returns_every_street() {
        let trie = NameTrie::build(&names());
        let mut ids = trie.find_by_prefix("");
        ids.sort();
        assert_eq!(ids, vec![StreetId(0), StreetId(1), StreetId(2)]);
    }
}
