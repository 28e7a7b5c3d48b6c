//! Union-find over the vertices of the current even blossoms (C2).
//!
//! Same path-compression + union-by-size shape as `UnionFindGeneric` in
//! `yuewuo-fusion-blossom/src/union_find.rs`, specialized to the one payload this crate needs (the
//! top-level even blossom currently owning each class) instead of a generic `UnionNodeTrait`.

use crate::util::{BlossomIndex, VertexIndex};

#[derive(Debug, Clone)]
pub struct EvenUnionFind {
    link_parent: Vec<VertexIndex>,
    size: Vec<usize>,
    /// payload of the class, valid only at the class's root
    payload: Vec<Option<BlossomIndex>>,
    find_scratch: Vec<VertexIndex>,
}

impl EvenUnionFind {
    /// `n` singleton classes, vertex `v`'s class initially carries no payload
    pub fn new(n: usize) -> Self {
        Self {
            link_parent: (0..n).collect(),
            size: vec![1; n],
            payload: vec![None; n],
            find_scratch: Vec::new(),
        }
    }

    /// reset every vertex back to its own singleton class with no payload (search begin)
    pub fn reset(&mut self) {
        for (i, p) in self.link_parent.iter_mut().enumerate() {
            *p = i;
        }
        self.size.fill(1);
        self.payload.fill(None);
    }

    /// re-singleton only the given vertices, leaving the rest of the structure untouched; used
    /// after an expand event produces fresh even sub-blossoms
    pub fn make_singleton(&mut self, v: VertexIndex) {
        self.link_parent[v] = v;
        self.size[v] = 1;
        self.payload[v] = None;
    }

    pub fn find(&mut self, key: VertexIndex) -> VertexIndex {
        let mut k = key;
        let mut p = self.link_parent[k];
        while p != k {
            self.find_scratch.push(k);
            k = p;
            p = self.link_parent[p];
        }
        let root = k;
        for k in self.find_scratch.drain(..) {
            self.link_parent[k] = root;
        }
        root
    }

    /// union the classes of `a` and `b`, then (re-)assign `payload` to the resulting class's root
    pub fn union_with_payload(&mut self, a: VertexIndex, b: VertexIndex, payload: BlossomIndex) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            self.payload[ra] = Some(payload);
            return;
        }
        let (parent, child) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.link_parent[child] = parent;
        self.size[parent] += self.size[child];
        self.payload[parent] = Some(payload);
    }

    /// the top-even-blossom currently owning `v`'s class; `None` if `v` was never unioned this
    /// search (caller bug to query an odd/out vertex)
    pub fn find_blossom(&mut self, v: VertexIndex) -> Option<BlossomIndex> {
        let root = self.find(v);
        self.payload[root]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_assigns_payload_to_whole_class() {
        let mut uf = EvenUnionFind::new(5);
        uf.union_with_payload(0, 1, 42);
        uf.union_with_payload(1, 2, 42);
        assert_eq!(uf.find_blossom(0), Some(42));
        assert_eq!(uf.find_blossom(1), Some(42));
        assert_eq!(uf.find_blossom(2), Some(42));
        assert_eq!(uf.find_blossom(3), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut uf = EvenUnionFind::new(3);
        uf.union_with_payload(0, 1, 7);
        uf.reset();
        assert_eq!(uf.find_blossom(0), None);
        assert_eq!(uf.find(0), 0);
        assert_eq!(uf.find(1), 1);
    }

    #[test]
    fn make_singleton_is_local() {
        let mut uf = EvenUnionFind::new(4);
        uf.union_with_payload(0, 1, 1);
        uf.union_with_payload(1, 2, 1);
        uf.make_singleton(1);
        assert_eq!(uf.find(1), 1);
        assert_eq!(uf.payload[1], None);
    }
}
