//! The primal-dual search driver (C7): grows alternating trees from every exposed vertex,
//! contracts blossoms, expands them again as their dual weight is exhausted, and augments the
//! matching by one edge per successful phase.
//!
//! Each call to [`run_phase`] is one "search": a sequence of delta-steps (grow, blossom/augment,
//! expand) that ends either in an augmentation or in a stuck forest with no further candidate
//! event, at which point the whole computation is done. Dual variables (`y` per vertex, `z0` per
//! nontrivial blossom) persist across phases; only the even/odd labeling, tree shape, and the four
//! accelerators (`evens`, `odds`, `grow_events`, `expand_events`, `smf`) are reset at the start of
//! each one.
//!
//! Event selection never rescans the whole edge set or blossom arena: a vertex's top-level blossom
//! is resolved through `evens`/`odds` (C2/C3) rather than by climbing arena parent pointers, grow
//! and expand candidates come from the two [`EventHeap`](crate::event_heap::EventHeap)s (C5), and
//! blossom/augment candidates come from the subtree-merge-find-min structure (C4). The only O(n)
//! work left per delta-step is refreshing the per-vertex top-blossom/root cache the accelerator
//! queries need and applying the dual update itself, both proportional to the live vertex count
//! rather than the edge count. See DESIGN.md.

use crate::blossom::BlossomForest;
use crate::graph::DirectedView;
use crate::util::{BlossomIndex, EdgeEvent, HalfEdgeIndex, VertexIndex, Weight, EPSILON};

/// outcome of one phase
pub struct PhaseOutcome {
    pub augmented: bool,
}

enum Event {
    Grow(HalfEdgeIndex),
    Blossom(HalfEdgeIndex),
    Augment(HalfEdgeIndex),
    Expand(BlossomIndex),
}

/// top-level blossom containing `v`, found by climbing arena parent pointers directly. Used only
/// for structural walks (`lca_in_search_tree`, ring/base manipulation) that spec §4.6 itself
/// defines via tree-parent-edge climbing; event selection instead resolves vertices through
/// `find_top`, backed by the real C2/C3 accelerators.
fn top_of(forest: &BlossomForest, v: VertexIndex) -> BlossomIndex {
    forest.top_of(v)
}

/// the direct child of top-level blossom `top` whose descendants include `v`
fn child_of(forest: &BlossomForest, top: BlossomIndex, v: VertexIndex) -> BlossomIndex {
    let mut cur = v;
    while forest.blossoms[cur].parent != Some(top) {
        cur = forest.blossoms[cur].parent.expect("v must be a descendant of top");
    }
    cur
}

/// total dual value assigned to vertex `v`: its own `y` plus every enclosing blossom's `z0`
fn dual_value(forest: &BlossomForest, y: &[Weight], v: VertexIndex) -> Weight {
    let mut total = y[v];
    let mut cur = v;
    while let Some(p) = forest.blossoms[cur].parent {
        total += forest.blossoms[p].z0;
        cur = p;
    }
    total
}

fn is_matched_edge(mate: &[Option<HalfEdgeIndex>], view: &DirectedView, e: HalfEdgeIndex) -> bool {
    let u = view.source(e);
    let v = view.target(e);
    mate[u] == Some(e) || mate[v] == Some(view.twin(e))
}

/// assigns every vertex a slot in the odd/out split-find-min range `[0, n)`, one contiguous block
/// per top-level blossom that exists at search begin. Every vertex that will ever need a slot this
/// search already belongs to one of those blossoms (growing relabels a blossom's state, never its
/// descendant set; expanding only subdivides a block that was already contiguous), so this
/// assignment is built once and never revisited mid-search.
struct SlotMap {
    slot_of: Vec<usize>,
}

impl SlotMap {
    /// build the map and the per-top-level-blossom ranges (in slot order) in one pass
    fn build(forest: &BlossomForest, n: usize) -> (Self, Vec<(BlossomIndex, usize, usize)>) {
        let mut slot_of = vec![0; n];
        let mut ranges = Vec::new();
        let mut cursor = 0usize;
        for b in 0..forest.blossoms.len() {
            if forest.blossoms[b].parent.is_some() {
                continue;
            }
            let members = forest.vertices_of(b);
            let begin = cursor;
            for v in members {
                slot_of[v] = cursor;
                cursor += 1;
            }
            ranges.push((b, begin, cursor));
        }
        (Self { slot_of }, ranges)
    }
}

/// the top-level blossom currently containing `v`, resolved through the even union-find (C2) if
/// `v` is even, otherwise through the odd/out split-find-min (C3)
fn find_top(forest: &mut BlossomForest, slots: &SlotMap, v: VertexIndex) -> BlossomIndex {
    match forest.evens.find_blossom(v) {
        Some(b) => b,
        None => forest.odds.find_blossom(slots.slot_of[v]),
    }
}

/// union every member of newly-even top-level blossom `b` together in the even union-find (C2),
/// stamping the class's payload with `b`, and merge them into the single subtree-merge-find-min
/// group (C4) that all even vertices share for the rest of this search
fn make_even_blossom(forest: &mut BlossomForest, b: BlossomIndex) {
    let members = forest.vertices_of(b);
    if let Some((&first, rest)) = members.split_first() {
        forest.evens.union_with_payload(first, first, b);
        let mut acc = first;
        for &v in rest {
            forest.evens.union_with_payload(acc, v, b);
            acc = v;
        }
    }
    let virtual_root = forest.smf.virtual_root();
    for &v in &members {
        forest.smf.activate_vertex(v);
        forest.smf.merge_sub_trees(v, virtual_root);
    }
}

/// record edge `e_even_to_other`, directed from even vertex `even_v` to `other_w`, against
/// whichever accelerator its far endpoint's state calls for: C4 if `other_w` is also even, C3 (and
/// through it C5's grow heap) if `other_w` is still out. An already-odd `other_w` needs no event:
/// it is already part of a tree and can never again become a grow target.
fn register_from_even(
    view: &DirectedView,
    forest: &mut BlossomForest,
    slots: &SlotMap,
    y: &[Weight],
    total_delta: Weight,
    even_v: VertexIndex,
    other_w: VertexIndex,
    e_even_to_other: HalfEdgeIndex,
) {
    let b_other = find_top(forest, slots, other_w);
    let slack = dual_value(forest, y, even_v) + dual_value(forest, y, other_w) - view.weight(e_even_to_other);
    if forest.blossoms[b_other].is_even {
        // slack between two even vertices shrinks by 2*delta per step, so slack/2 plus the delta
        // already spent is invariant under future steps
        forest.smf.add_non_tree_edge(even_v, other_w, slack / 2.0 + total_delta, e_even_to_other as u64);
    } else if forest.blossoms[b_other].root.is_none() {
        // slack between an even and an out vertex shrinks by exactly delta per step (only the even
        // side moves), so slack plus delta-so-far is invariant
        let slot = slots.slot_of[other_w];
        let candidate = EdgeEvent { edge: e_even_to_other, slack_bar: slack + total_delta };
        if forest.odds.decrease_key(slot, candidate) {
            if let Some(best) = forest.odds.find_min(slot) {
                forest.grow_events.insert_or_decrease(b_other, best.slack_bar);
            }
        }
    }
}

/// given any edge incident to a vertex whose state just changed, register it against the
/// accelerators if (and only if) exactly one endpoint is even
fn register_edge(
    view: &DirectedView,
    forest: &mut BlossomForest,
    slots: &SlotMap,
    y: &[Weight],
    total_delta: Weight,
    e: HalfEdgeIndex,
) {
    let u = view.source(e);
    let w = view.target(e);
    let bu = find_top(forest, slots, u);
    let bw = find_top(forest, slots, w);
    if bu == bw {
        return;
    }
    if forest.blossoms[bu].is_even {
        register_from_even(view, forest, slots, y, total_delta, u, w, e);
    } else if forest.blossoms[bw].is_even {
        register_from_even(view, forest, slots, y, total_delta, w, u, view.twin(e));
    }
}

/// mark top-level blossom `b` even in C2/C4 and register every incident edge of its members
/// against the accelerators
fn transition_to_even(
    view: &DirectedView,
    forest: &mut BlossomForest,
    slots: &SlotMap,
    total_delta: Weight,
    y: &[Weight],
    b: BlossomIndex,
) {
    make_even_blossom(forest, b);
    for v in forest.vertices_of(b) {
        for &e in view.out_edges(v) {
            register_edge(view, forest, slots, y, total_delta, e);
        }
    }
}

/// give every ring child not already absorbed into the continuing tree (i.e. every child left out
/// or odd-but-untouched after an expand) its own C3 slot range, carved out of the dissolved
/// parent's range, and seed C5's grow heap from whatever minimum that range already carries
fn finalize_out_children(forest: &mut BlossomForest, slots: &SlotMap, ring: &[BlossomIndex], labeled: &[BlossomIndex]) {
    for &child in ring {
        if labeled.contains(&child) {
            continue;
        }
        let members = forest.vertices_of(child);
        let begin = members.iter().map(|&v| slots.slot_of[v]).min().expect("non-empty blossom");
        let end = begin + members.len();
        forest.odds.split(child, begin, end);
        let base = forest.blossoms[child].base;
        if let Some(best) = forest.odds.find_min(slots.slot_of[base]) {
            forest.grow_events.insert_or_decrease(child, best.slack_bar);
        }
    }
}

fn apply_delta_step(forest: &mut BlossomForest, y: &mut [Weight], delta: Weight) {
    for v in 0..y.len() {
        let b = top_of(forest, v);
        if forest.blossoms[b].root.is_some() {
            if forest.blossoms[b].is_even {
                y[v] -= delta;
            } else {
                y[v] += delta;
            }
        }
    }
    for b in 0..forest.blossoms.len() {
        let blossom = &forest.blossoms[b];
        if blossom.parent.is_none() && blossom.root.is_some() && !blossom.is_trivial() {
            if blossom.is_even {
                forest.blossoms[b].z0 += 2.0 * delta;
            } else {
                forest.blossoms[b].z0 -= 2.0 * delta;
            }
        }
    }
}

/// fold a new candidate into the running best, preferring strictly smaller delta, then (within
/// `EPSILON`) the lower-ranked category: grow < blossom/augment < expand
fn consider(best: Option<(Weight, u8, Event)>, delta: Weight, rank: u8, event: Event) -> Option<(Weight, u8, Event)> {
    match best {
        None => Some((delta, rank, event)),
        Some((bd, _, _)) if delta + EPSILON < bd => Some((delta, rank, event)),
        Some((bd, br, _)) if (delta - bd).abs() <= EPSILON && rank < br => Some((delta, rank, event)),
        Some(existing) => Some(existing),
    }
}

/// run one phase of the search; returns whether an augmenting path was found and applied
pub fn run_phase(
    view: &mut DirectedView,
    forest: &mut BlossomForest,
    mate: &mut [Option<HalfEdgeIndex>],
    y: &mut [Weight],
    delta1_threshold: &mut Weight,
    perfect: bool,
) -> PhaseOutcome {
    let n = view.vertex_num();

    for b in 0..forest.blossoms.len() {
        if forest.blossoms[b].parent.is_none() {
            forest.blossoms[b].is_even = false;
            forest.blossoms[b].root = None;
            forest.blossoms[b].tree_parent_edge = None;
        }
    }

    forest.evens.reset();
    forest.odds.reset();
    forest.grow_events.clear();
    forest.expand_events.clear();
    forest.smf.reset_for_vertices(n);

    let (slots, ranges) = SlotMap::build(forest, n);
    if let Some(&(first_b, _, _)) = ranges.first() {
        forest.odds.set_root_payload(first_b);
        for &(b, begin, end) in &ranges[1..] {
            forest.odds.split(b, begin, end);
        }
    }

    let mut total_delta: Weight = 0.0;

    for v in 0..n {
        if mate[v].is_none() {
            let b = top_of(forest, v);
            if forest.blossoms[b].root.is_none() {
                forest.blossoms[b].is_even = true;
                forest.blossoms[b].root = Some(v);
                transition_to_even(view, forest, &slots, total_delta, y, b);
            }
        }
    }

    loop {
        let mut top_of_cache = vec![0usize; n];
        let mut root_of_cache: Vec<Option<VertexIndex>> = vec![None; n];
        for v in 0..n {
            let t = find_top(forest, &slots, v);
            top_of_cache[v] = t;
            root_of_cache[v] = forest.blossoms[t].root;
        }

        let grow_candidate = forest.grow_events.peek_min();
        let expand_candidate = forest.expand_events.peek_min();
        let smf_candidate = forest.smf.find_min_non_tree_edge_select(
            |a, b| top_of_cache[a] == top_of_cache[b],
            |a1, b1, a2, b2| {
                let cross1 = root_of_cache[a1] != root_of_cache[b1];
                let cross2 = root_of_cache[a2] != root_of_cache[b2];
                cross1 && !cross2
            },
        );

        let mut best: Option<(Weight, u8, Event)> = None;

        if let Some((bw, key)) = grow_candidate {
            let base_v = forest.blossoms[bw].base;
            let edge_event = forest
                .odds
                .find_min(slots.slot_of[base_v])
                .expect("grow_events entry implies a recorded edge in its range");
            best = consider(best, key - total_delta, 0, Event::Grow(edge_event.edge));
        }

        if let Some(candidate) = smf_candidate {
            let e = candidate.data as usize;
            let same_tree = root_of_cache[candidate.a].is_some() && root_of_cache[candidate.a] == root_of_cache[candidate.b];
            let ev = if same_tree { Event::Blossom(e) } else { Event::Augment(e) };
            best = consider(best, candidate.key - total_delta, 1, ev);
        }

        if let Some((b, key)) = expand_candidate {
            best = consider(best, key - total_delta, 2, Event::Expand(b));
        }

        let other_min = best.as_ref().map(|(d, _, _)| *d);
        let delta1_remaining = if perfect {
            None
        } else {
            let d = *delta1_threshold - total_delta;
            if d.is_finite() {
                Some(d)
            } else {
                None
            }
        };

        let delta1_wins = match (delta1_remaining, other_min) {
            (Some(d1), Some(od)) => d1 + EPSILON < od,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if delta1_wins {
            let delta = delta1_remaining.expect("delta1_wins implies delta1_remaining is Some");
            assert!(delta >= -EPSILON, "numeric infeasibility: negative delta step ({delta})");
            let delta = delta.max(0.0);
            apply_delta_step(forest, y, delta);
            total_delta += delta;
            *delta1_threshold -= total_delta;
            return PhaseOutcome { augmented: false };
        }

        let (delta, _, event) = match best {
            Some(b) => b,
            None => {
                *delta1_threshold -= total_delta;
                return PhaseOutcome { augmented: false };
            }
        };

        assert!(delta >= -EPSILON, "numeric infeasibility: negative delta step ({delta})");
        let delta = delta.max(0.0);
        apply_delta_step(forest, y, delta);
        total_delta += delta;

        match event {
            Event::Grow(e) => grow_step(view, forest, mate, &slots, total_delta, y, e),
            Event::Blossom(e) => blossom_step(view, forest, &slots, total_delta, y, e),
            Event::Augment(e) => {
                augment_step(view, forest, mate, e);
                *delta1_threshold -= total_delta;
                return PhaseOutcome { augmented: true };
            }
            Event::Expand(b) => expand_step(view, forest, mate, &slots, total_delta, y, b),
        }
    }
}

/// grow the tree across a tight edge `e = u -> w` from even `u` into an untouched blossom at `w`,
/// labeling `w`'s blossom odd and, through its mate, the next blossom even
fn grow_step(
    view: &DirectedView,
    forest: &mut BlossomForest,
    mate: &[Option<HalfEdgeIndex>],
    slots: &SlotMap,
    total_delta: Weight,
    y: &[Weight],
    e: HalfEdgeIndex,
) {
    let u = view.source(e);
    let w = view.target(e);
    let bu = top_of(forest, u);
    let bw = top_of(forest, w);
    let root = forest.blossoms[bu].root;

    forest.grow_events.remove(bw);
    forest.blossoms[bw].is_even = false;
    forest.blossoms[bw].root = root;
    forest.blossoms[bw].tree_parent_edge = Some(view.twin(e));
    if !forest.blossoms[bw].is_trivial() {
        let key = forest.blossoms[bw].z0 / 2.0 + total_delta;
        forest.expand_events.insert_or_decrease(bw, key);
    }

    let w_mate_edge = mate[w].expect("a grow target must already be matched");
    let x = view.target(w_mate_edge);
    let bx = top_of(forest, x);
    forest.blossoms[bx].is_even = true;
    forest.blossoms[bx].root = root;
    forest.blossoms[bx].tree_parent_edge = Some(view.twin(w_mate_edge));
    transition_to_even(view, forest, slots, total_delta, y, bx);
}

/// contract the cycle formed by tight edge `e = u -> w` between two even blossoms of the same
/// tree into one new even blossom rooted at their lowest common ancestor
fn blossom_step(
    view: &mut DirectedView,
    forest: &mut BlossomForest,
    slots: &SlotMap,
    total_delta: Weight,
    y: &[Weight],
    e: HalfEdgeIndex,
) {
    let u = view.source(e);
    let w = view.target(e);
    let bu0 = top_of(forest, u);
    let bw0 = top_of(forest, w);
    let lca = forest.lca_in_search_tree(view, bu0, bw0);

    let mut left_chain = Vec::new();
    let mut cur = bu0;
    while cur != lca {
        let pe = forest.blossoms[cur].tree_parent_edge.expect("non-root has a tree parent edge");
        left_chain.push((cur, pe));
        cur = top_of(forest, view.target(pe));
    }
    let mut right_chain = Vec::new();
    cur = bw0;
    while cur != lca {
        let pe = forest.blossoms[cur].tree_parent_edge.expect("non-root has a tree parent edge");
        right_chain.push((cur, pe));
        cur = top_of(forest, view.target(pe));
    }

    for &(b, _) in left_chain.iter().chain(right_chain.iter()) {
        forest.expand_events.remove(b);
    }

    for i in 0..left_chain.len() {
        let (b, pe) = left_chain[i];
        let left_node = if i + 1 < left_chain.len() { left_chain[i + 1].0 } else { lca };
        let down_edge = view.twin(pe);
        forest.connect(view, left_node, b, down_edge);
    }
    forest.connect(view, bu0, bw0, e);
    for i in 0..right_chain.len() {
        let (b, pe) = right_chain[i];
        let right_node = if i + 1 < right_chain.len() { right_chain[i + 1].0 } else { lca };
        forest.connect(view, b, right_node, pe);
    }

    let mut members = vec![lca];
    members.extend(left_chain.iter().map(|&(b, _)| b));
    members.extend(right_chain.iter().map(|&(b, _)| b));

    let new_base = forest.blossoms[lca].base;
    let root = forest.blossoms[lca].root;
    let tree_parent_edge = forest.blossoms[lca].tree_parent_edge;
    let new_blossom = crate::blossom::Blossom {
        base: new_base,
        parent: None,
        child: Some(lca),
        left: None,
        right: None,
        to_left_edge: None,
        to_right_edge: None,
        root,
        tree_parent_edge,
        is_even: true,
        z0: 0.0,
        last_visit_idx: 0,
    };
    let new_id = forest.allocate(new_blossom);
    for b in members {
        forest.blossoms[b].parent = Some(new_id);
    }
    transition_to_even(view, forest, slots, total_delta, y, new_id);
}

/// collect the ring of direct children of a top-level blossom, starting at `start`
fn ring_from(forest: &BlossomForest, start: BlossomIndex) -> Vec<BlossomIndex> {
    let mut ring = vec![start];
    let mut cur = start;
    loop {
        let next = forest.blossoms[cur].right.expect("blossom ring must be circular");
        if next == start {
            break;
        }
        ring.push(next);
        cur = next;
    }
    ring
}

/// walk the ring of `b` from `stem` to `base_child`, alternating via matched/unmatched ring edges
/// (the arc a correctly-formed blossom always admits exactly one direction for), returning the
/// sequence of ring edges crossed in order
fn alternating_arc(
    forest: &BlossomForest,
    view: &DirectedView,
    mate: &[Option<HalfEdgeIndex>],
    stem: BlossomIndex,
    base_child: BlossomIndex,
) -> Vec<HalfEdgeIndex> {
    let ring = ring_from(forest, stem);
    let idx_of = |x: BlossomIndex| ring.iter().position(|&y| y == x).expect("ring membership");
    let base_idx = idx_of(base_child);

    // try walking "right" first (toward increasing ring index, wrapping), requiring the very
    // first edge crossed to be the matched one out of `stem`
    let right_first = forest.blossoms[stem].to_right_edge;
    let left_first = forest.blossoms[stem].to_left_edge;
    let forward = match (right_first, left_first) {
        (Some(re), _) if is_matched_edge(mate, view, re) => true,
        (_, Some(_le)) => false,
        _ => unreachable!("blossom of size > 1 has at least one ring edge"),
    };

    let mut edges = Vec::new();
    if forward {
        for i in 0..base_idx {
            let node = ring[i];
            edges.push(forest.blossoms[node].to_right_edge.expect("ring edge"));
        }
    } else {
        let len = ring.len();
        let mut i = 0usize;
        loop {
            let node = ring[(len - i) % len];
            if node == base_child {
                break;
            }
            let into_node = forest.blossoms[node].to_left_edge.expect("ring edge");
            edges.push(view.twin(into_node));
            i += 1;
        }
    }
    edges
}

/// dissolve the odd top-level blossom `b` back into its children, relabeling the unique
/// alternating arc from the tree-entry vertex to the base as the continuation of the tree and
/// leaving every other ring vertex as an ordinary out blossom (its existing matching is already
/// consistent and untouched)
fn expand_step(
    view: &DirectedView,
    forest: &mut BlossomForest,
    mate: &[Option<HalfEdgeIndex>],
    slots: &SlotMap,
    total_delta: Weight,
    y: &[Weight],
    b: BlossomIndex,
) {
    forest.expand_events.remove(b);
    let parent_edge = forest.blossoms[b].tree_parent_edge.expect("expand candidates always have a tree parent");
    let entry_vertex = view.source(parent_edge);
    let stem = child_of(forest, b, entry_vertex);
    let base_child = child_of(forest, b, forest.blossoms[b].base);
    let root = forest.blossoms[b].root;
    let ring = ring_from(forest, stem);

    for &child in &ring {
        forest.blossoms[child].parent = None;
        forest.blossoms[child].is_even = false;
        forest.blossoms[child].root = None;
        forest.blossoms[child].tree_parent_edge = None;
    }

    if stem == base_child {
        forest.blossoms[stem].is_even = true;
        forest.blossoms[stem].root = root;
        forest.blossoms[stem].tree_parent_edge = Some(parent_edge);
        transition_to_even(view, forest, slots, total_delta, y, stem);
        finalize_out_children(forest, slots, &ring, &[stem]);
        return;
    }

    forest.blossoms[stem].is_even = false;
    forest.blossoms[stem].root = root;
    forest.blossoms[stem].tree_parent_edge = Some(parent_edge);
    if !forest.blossoms[stem].is_trivial() {
        let key = forest.blossoms[stem].z0 / 2.0 + total_delta;
        forest.expand_events.insert_or_decrease(stem, key);
    }

    let mut labeled = vec![stem];
    for (step, &edge) in alternating_arc(forest, view, mate, stem, base_child).iter().enumerate() {
        let target = view.target(edge);
        let tb = top_of(forest, target);
        let is_even = step % 2 == 0;
        forest.blossoms[tb].is_even = is_even;
        forest.blossoms[tb].root = root;
        forest.blossoms[tb].tree_parent_edge = Some(view.twin(edge));
        if is_even {
            transition_to_even(view, forest, slots, total_delta, y, tb);
        } else if !forest.blossoms[tb].is_trivial() {
            let key = forest.blossoms[tb].z0 / 2.0 + total_delta;
            forest.expand_events.insert_or_decrease(tb, key);
        }
        labeled.push(tb);
    }
    finalize_out_children(forest, slots, &ring, &labeled);
}

/// rotate blossom `b`'s internal matching so that `new_free` becomes its base, toggling the
/// matched/unmatched status of every ring edge on the unique alternating arc between them
fn rotate_base_to(
    view: &DirectedView,
    forest: &mut BlossomForest,
    mate: &mut [Option<HalfEdgeIndex>],
    b: BlossomIndex,
    new_free: VertexIndex,
) {
    if forest.blossoms[b].is_trivial() || forest.blossoms[b].base == new_free {
        forest.blossoms[b].base = new_free;
        return;
    }
    let stem = child_of(forest, b, new_free);
    let base_child = child_of(forest, b, forest.blossoms[b].base);
    let arc = alternating_arc(forest, view, mate, stem, base_child);

    for &edge in &arc {
        let twin = view.twin(edge);
        let a = view.source(edge);
        let c = view.target(edge);
        if is_matched_edge(mate, view, edge) {
            mate[a] = None;
            mate[c] = None;
        } else {
            mate[a] = Some(edge);
            mate[c] = Some(twin);
        }
    }
    forest.blossoms[b].base = new_free;

    for &edge in &arc {
        let a = view.source(edge);
        let c = view.target(edge);
        let ba = child_of(forest, b, a);
        let bc = child_of(forest, b, c);
        if !forest.blossoms[ba].is_trivial() {
            rotate_base_to(view, forest, mate, ba, a);
        }
        if !forest.blossoms[bc].is_trivial() {
            rotate_base_to(view, forest, mate, bc, c);
        }
    }
}

/// augment the matching across tight edge `e = u -> w` connecting the roots of two different
/// trees via `u` and `w`
fn augment_step(view: &mut DirectedView, forest: &mut BlossomForest, mate: &mut [Option<HalfEdgeIndex>], e: HalfEdgeIndex) {
    let u = view.source(e);
    let w = view.target(e);

    flip_path_up(view, forest, mate, u);
    flip_path_up(view, forest, mate, w);

    let bu = top_of(forest, u);
    let bw = top_of(forest, w);
    rotate_base_to(view, forest, mate, bu, u);
    rotate_base_to(view, forest, mate, bw, w);
    mate[u] = Some(e);
    mate[w] = Some(view.twin(e));
}

/// flip the matched/unmatched status of every tree edge from `start` up to its tree's exposed
/// root, without touching `start`'s own eventual mate (the caller sets that once both sides of
/// the augmenting edge are ready)
fn flip_path_up(view: &DirectedView, forest: &mut BlossomForest, mate: &mut [Option<HalfEdgeIndex>], start: VertexIndex) {
    let mut v = start;
    loop {
        let b = top_of(forest, v);
        let pe = match forest.blossoms[b].tree_parent_edge {
            Some(pe) => pe,
            None => break,
        };
        let parent_vertex = view.target(pe);
        let bp = top_of(forest, parent_vertex);
        rotate_base_to(view, forest, mate, b, v);
        rotate_base_to(view, forest, mate, bp, parent_vertex);
        mate[v] = Some(pe);
        mate[parent_vertex] = Some(view.twin(pe));
        v = parent_vertex;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn fresh(n: usize, edges: Vec<(usize, usize, f64)>) -> (DirectedView, BlossomForest, Vec<Option<HalfEdgeIndex>>, Vec<Weight>, Weight) {
        let graph = Graph::new(n, edges).unwrap();
        let initial_y = graph.edges().iter().map(|&(_, _, w)| w / 2.0).fold(0.0, |acc: Weight, w| acc.max(w));
        let view = DirectedView::from_graph(&graph);
        let forest = BlossomForest::new(n);
        let mate = vec![None; n];
        let y = vec![initial_y; n];
        (view, forest, mate, y, initial_y)
    }

    #[test]
    fn single_edge_augments_immediately() {
        let (mut view, mut forest, mut mate, mut y, mut delta1_threshold) = fresh(2, vec![(0, 1, 3.0)]);
        let outcome = run_phase(&mut view, &mut forest, &mut mate, &mut y, &mut delta1_threshold, true);
        assert!(outcome.augmented);
        assert!(mate[0].is_some());
        assert!(mate[1].is_some());
    }

    #[test]
    fn triangle_leaves_one_vertex_exposed_when_perfect_impossible() {
        let (mut view, mut forest, mut mate, mut y, mut delta1_threshold) =
            fresh(3, vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        let outcome = run_phase(&mut view, &mut forest, &mut mate, &mut y, &mut delta1_threshold, false);
        assert!(outcome.augmented);
        let matched_count = mate.iter().filter(|m| m.is_some()).count();
        assert_eq!(matched_count, 2);
    }

    #[test]
    fn no_edge_between_two_isolated_vertices_does_not_augment() {
        let (mut view, mut forest, mut mate, mut y, mut delta1_threshold) = fresh(2, vec![]);
        let outcome = run_phase(&mut view, &mut forest, &mut mate, &mut y, &mut delta1_threshold, false);
        assert!(!outcome.augmented);
    }
}
