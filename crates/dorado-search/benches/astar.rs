use std::convert::Infallible;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dorado_search::{AStar, ActionId, Edge, SearchSpace};

/// Set `bits` flags one at a time; the goal is all flags set.
struct Bits {
    bits: u32,
}

impl SearchSpace for Bits {
    type State = u64;
    type Id = u64;
    type Error = Infallible;

    fn id(&self, state: &u64) -> u64 {
        *state
    }

    fn is_goal(&mut self, state: &u64) -> Result<bool, Infallible> {
        Ok(state.count_ones() == self.bits)
    }

    fn heuristic(&mut self, state: &u64) -> Result<u32, Infallible> {
        Ok(self.bits - state.count_ones())
    }

    fn successors(&mut self, state: &u64) -> Result<Vec<Edge<u64>>, Infallible> {
        Ok((0..self.bits)
            .filter(|bit| state & (1 << bit) == 0)
            .map(|bit| Edge::new(state | (1 << bit), 1, ActionId(bit + 1)))
            .collect())
    }
}

fn bench_astar(c: &mut Criterion) {
    let search = AStar::new();

    c.bench_function("dorado-search/astar(bits=12)", |b| {
        b.iter(|| {
            let mut space = Bits { bits: 12 };
            let path = search.search(&mut space, 0).unwrap_or_default();
            black_box(path.len());
        })
    });

    c.bench_function("dorado-search/astar(bits=8)", |b| {
        b.iter(|| {
            let mut space = Bits { bits: 8 };
            let path = search.search(&mut space, 0).unwrap_or_default();
            black_box(path.len());
        })
    });
}

criterion_group!(benches, bench_astar);
criterion_main!(benches);
