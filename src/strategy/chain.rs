//! Longest-chain search used to lay a player's opening train.
//!
//! Tiles are edges between the values on their ends. A chain is a simple
//! path over values starting at the required one: no value is entered twice,
//! except that the double of a value is laid on arrival and brings the walk
//! straight back to it. Results are memoised per (current value, visited
//! values).

use crate::game::tile::Tile;
use std::collections::HashMap;

/// Chain of tiles from `start` whose total pips is the largest among all
/// chains the hand can form, oriented for laying. The first chain found
/// wins ties. Empty if no tile touches `start`.
pub fn longest_chain(hand: &[Tile], start: i32) -> Vec<Tile> {
    let graph = ChainGraph::new(hand);
    let Some(&origin) = graph.slots.get(&start) else {
        return Vec::new();
    };

    let mut search = ChainSearch::new(&graph);
    let mut visited = ValueSet::new(graph.values.len()).with(origin);
    search.best(origin, &visited);

    let mut chain: Vec<Tile> = graph.doubles[origin].into_iter().collect();
    let mut slot = origin;
    while let Some(&(_, Some(edge))) = search.memo[slot].get(&visited) {
        let (next, tile) = graph.edges[slot][edge];
        chain.push(tile);
        chain.extend(graph.doubles[next]);
        visited = visited.with(next);
        slot = next;
    }
    chain
}

struct ChainGraph {
    /// slot -> value
    values: Vec<i32>,
    slots: HashMap<i32, usize>,
    /// the double of each value, if held
    doubles: Vec<Option<Tile>>,
    /// slot -> (neighbour slot, tile oriented away from this value), in hand order
    edges: Vec<Vec<(usize, Tile)>>,
}

impl ChainGraph {
    fn new(hand: &[Tile]) -> Self {
        let mut graph = ChainGraph {
            values: Vec::new(),
            slots: HashMap::new(),
            doubles: Vec::new(),
            edges: Vec::new(),
        };
        for tile in hand.iter().filter(|t| !t.is_empty()) {
            let a = graph.slot(tile.0);
            let b = graph.slot(tile.1);
            if tile.is_double() {
                graph.doubles[a].get_or_insert(*tile);
            } else {
                graph.edges[a].push((b, *tile));
                graph.edges[b].push((a, tile.flipped()));
            }
        }
        graph
    }

    fn slot(&mut self, value: i32) -> usize {
        if let Some(&slot) = self.slots.get(&value) {
            return slot;
        }
        let slot = self.values.len();
        self.values.push(value);
        self.slots.insert(value, slot);
        self.doubles.push(None);
        self.edges.push(Vec::new());
        slot
    }

    fn double_pips(&self, slot: usize) -> u32 {
        self.doubles[slot].map_or(0, |d| d.pips())
    }
}

/// Bitset of value slots already on the chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ValueSet(Vec<u64>);

impl ValueSet {
    fn new(slots: usize) -> Self {
        ValueSet(vec![0; (slots + 63) / 64])
    }

    fn contains(&self, slot: usize) -> bool {
        self.0[slot / 64] & (1u64 << (slot % 64)) != 0
    }

    fn with(&self, slot: usize) -> Self {
        let mut next = self.clone();
        next.0[slot / 64] |= 1u64 << (slot % 64);
        next
    }
}

struct ChainSearch<'a> {
    graph: &'a ChainGraph,
    /// slot -> visited set -> (best onward pips, edge taken)
    memo: Vec<HashMap<ValueSet, (u32, Option<usize>)>>,
}

impl<'a> ChainSearch<'a> {
    fn new(graph: &'a ChainGraph) -> Self {
        ChainSearch {
            graph,
            memo: vec![HashMap::new(); graph.values.len()],
        }
    }

    /// Best pips reachable from `slot` once its double (if any) is down
    fn best(&mut self, slot: usize, visited: &ValueSet) -> u32 {
        if let Some(&(pips, _)) = self.memo[slot].get(visited) {
            return pips;
        }

        let graph = self.graph;
        let mut top: (u32, Option<usize>) = (0, None);
        for (edge, &(next, tile)) in graph.edges[slot].iter().enumerate() {
            if visited.contains(next) {
                continue;
            }
            let onward = visited.with(next);
            let pips = tile.pips() + graph.double_pips(next) + self.best(next, &onward);
            if top.1.is_none() || pips > top.0 {
                top = (pips, Some(edge));
            }
        }

        self.memo[slot].insert(visited.clone(), top);
        top.0
    }
}
