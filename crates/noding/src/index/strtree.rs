//! Packed sort-tile-recursive R-tree (static, bulk loaded).
//!
//! Construction sorts entries into vertical slices by centre x, then each slice
//! by centre y, and groups runs of `node_capacity` into nodes; the same packing
//! is repeated on the node envelopes until one root remains.

use std::ops::Range;

use crate::geom::Envelope;

#[derive(Clone, Debug)]
struct Node {
    env: Envelope,
    /// Range into `items` (level 0) or into the level below.
    children: Range<usize>,
}

/// Static R-tree over `(Envelope, T)` entries.
#[derive(Clone, Debug)]
pub struct StrTree<T> {
    items: Vec<(Envelope, T)>,
    /// `levels[0]` are leaves over `items`; the last level holds the root.
    levels: Vec<Vec<Node>>,
}

impl<T> StrTree<T> {
    /// Bulk load. Entries with an empty envelope are discarded.
    pub fn new(entries: Vec<(Envelope, T)>, node_capacity: usize) -> Self {
        let cap = node_capacity.max(2);
        let entries: Vec<(Envelope, T)> = entries.into_iter().filter(|(e, _)| !e.is_empty()).collect();
        if entries.is_empty() {
            return Self {
                items: Vec::new(),
                levels: Vec::new(),
            };
        }

        let envs: Vec<Envelope> = entries.iter().map(|(e, _)| *e).collect();
        let groups = str_groups(&envs, cap);
        let mut slots: Vec<Option<(Envelope, T)>> = entries.into_iter().map(Some).collect();
        let mut items = Vec::with_capacity(slots.len());
        let mut leaves = Vec::with_capacity(groups.len());
        for group in groups {
            let start = items.len();
            let mut env = Envelope::empty();
            for i in group {
                if let Some(entry) = slots[i].take() {
                    env.expand_to_include_env(&entry.0);
                    items.push(entry);
                }
            }
            leaves.push(Node {
                env,
                children: start..items.len(),
            });
        }

        let mut levels = vec![leaves];
        while levels.last().is_some_and(|l| l.len() > 1) {
            let below = levels.pop().unwrap_or_default();
            let envs: Vec<Envelope> = below.iter().map(|n| n.env).collect();
            let groups = str_groups(&envs, cap);
            let mut slots: Vec<Option<Node>> = below.into_iter().map(Some).collect();
            let mut reordered = Vec::with_capacity(slots.len());
            let mut parents = Vec::with_capacity(groups.len());
            for group in groups {
                let start = reordered.len();
                let mut env = Envelope::empty();
                for i in group {
                    if let Some(node) = slots[i].take() {
                        env.expand_to_include_env(&node.env);
                        reordered.push(node);
                    }
                }
                parents.push(Node {
                    env,
                    children: start..reordered.len(),
                });
            }
            levels.push(reordered);
            levels.push(parents);
        }
        Self { items, levels }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overall bounds (empty for an empty tree).
    pub fn envelope(&self) -> Envelope {
        self.levels
            .last()
            .and_then(|root| root.first())
            .map(|n| n.env)
            .unwrap_or_default()
    }

    /// Visit every item whose envelope intersects `search`, in tree order.
    pub fn query(&self, search: &Envelope, mut visit: impl FnMut(&Envelope, &T)) {
        let Some(top) = self.levels.len().checked_sub(1) else {
            return;
        };
        let mut stack: Vec<(usize, usize)> = (0..self.levels[top].len()).rev().map(|i| (top, i)).collect();
        while let Some((level, idx)) = stack.pop() {
            let node = &self.levels[level][idx];
            if !node.env.intersects(search) {
                continue;
            }
            if level == 0 {
                for (env, item) in &self.items[node.children.clone()] {
                    if env.intersects(search) {
                        visit(env, item);
                    }
                }
            } else {
                stack.extend(node.children.clone().rev().map(|i| (level - 1, i)));
            }
        }
    }

    /// Items intersecting `search`, collected.
    pub fn query_items(&self, search: &Envelope) -> Vec<&T> {
        let mut out = Vec::new();
        let Some(top) = self.levels.len().checked_sub(1) else {
            return out;
        };
        let mut stack: Vec<(usize, usize)> = (0..self.levels[top].len()).rev().map(|i| (top, i)).collect();
        while let Some((level, idx)) = stack.pop() {
            let node = &self.levels[level][idx];
            if !node.env.intersects(search) {
                continue;
            }
            if level == 0 {
                out.extend(
                    self.items[node.children.clone()]
                        .iter()
                        .filter(|(env, _)| env.intersects(search))
                        .map(|(_, item)| item),
                );
            } else {
                stack.extend(node.children.clone().rev().map(|i| (level - 1, i)));
            }
        }
        out
    }

    /// Tree height (0 for an empty tree).
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}

/// Sort-tile-recursive grouping of `envs` into runs of at most `cap` indices.
fn str_groups(envs: &[Envelope], cap: usize) -> Vec<Vec<usize>> {
    let centre = |i: usize| envs[i].centre().unwrap_or_default();
    let n = envs.len();
    let node_count = n.div_ceil(cap);
    let slice_count = (node_count as f64).sqrt().ceil().max(1.0) as usize;
    let slice_len = cap * node_count.div_ceil(slice_count);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| centre(a).x.total_cmp(&centre(b).x).then(a.cmp(&b)));

    let mut groups = Vec::with_capacity(node_count);
    for slice in order.chunks_mut(slice_len) {
        slice.sort_by(|&a, &b| centre(a).y.total_cmp(&centre(b).y).then(a.cmp(&b)));
        groups.extend(slice.chunks(cap).map(<[usize]>::to_vec));
    }
    groups
}
