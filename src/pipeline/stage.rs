//! Stage validity tracking.
//!
//! Each stage is `Unset`, `Stale` or `Fresh`. Edges are declared once in [`EDGES`]; setting a stage
//! makes every transitive dependent stale and invalidating a stage does the same to itself. Adding
//! a derived stage only requires a new [`StageId`] and its edges.

/// Pipeline stages, in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    /// Source image.
    Image,
    /// Ranked canvas-space segments.
    Segments,
    /// Composited clip.
    Video,
}

impl StageId {
    /// Every stage, upstream first.
    pub const ALL: [StageId; 3] = [StageId::Image, StageId::Segments, StageId::Video];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Cache validity of one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StageState {
    /// Never produced.
    #[default]
    Unset,
    /// Produced once, but an input changed since.
    Stale,
    /// Up to date.
    Fresh,
}

/// `(upstream, downstream)` dependency edges.
pub const EDGES: &[(StageId, StageId)] = &[
    (StageId::Image, StageId::Segments),
    (StageId::Image, StageId::Video),
    (StageId::Segments, StageId::Video),
];

const N: usize = StageId::ALL.len();

/// State machine over the stage DAG.
#[derive(Clone, Debug)]
pub struct StageGraph {
    states: [StageState; N],
    upstream: [Vec<StageId>; N],
    dependents: [Vec<StageId>; N],
}

impl Default for StageGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StageGraph {
    /// All stages unset.
    pub fn new() -> Self {
        let mut upstream: [Vec<StageId>; N] = Default::default();
        let mut dependents: [Vec<StageId>; N] = Default::default();
        for &(up, down) in EDGES {
            upstream[down.index()].push(up);
            dependents[up.index()].push(down);
        }
        Self {
            states: [StageState::Unset; N],
            upstream,
            dependents,
        }
    }

    /// Current state of `id`.
    pub fn state(&self, id: StageId) -> StageState {
        self.states[id.index()]
    }

    /// Direct inputs of `id`.
    pub fn upstream(&self, id: StageId) -> &[StageId] {
        &self.upstream[id.index()]
    }

    /// `id` received a new value from outside: it becomes fresh and every transitive dependent
    /// stale.
    pub fn mark_set(&mut self, id: StageId) {
        self.states[id.index()] = StageState::Fresh;
        for d in self.downstream_of(id) {
            self.states[d.index()] = StageState::Stale;
        }
    }

    /// `id` was recomputed from fresh inputs. Dependents are untouched.
    pub fn mark_computed(&mut self, id: StageId) {
        self.states[id.index()] = StageState::Fresh;
    }

    /// Mark `id` and its transitive dependents stale. Unset stages stay unset.
    ///
    /// Returns the stages whose state changed.
    pub fn invalidate(&mut self, id: StageId) -> Vec<StageId> {
        let mut changed = Vec::new();
        for s in std::iter::once(id).chain(self.downstream_of(id)) {
            let st = &mut self.states[s.index()];
            if *st == StageState::Fresh {
                *st = StageState::Stale;
                changed.push(s);
            }
        }
        changed
    }

    /// Transitive dependents of `id`, each once, in stage order.
    fn downstream_of(&self, id: StageId) -> Vec<StageId> {
        let mut seen = [false; N];
        let mut stack = self.dependents[id.index()].clone();
        while let Some(s) = stack.pop() {
            if !std::mem::replace(&mut seen[s.index()], true) {
                stack.extend_from_slice(&self.dependents[s.index()]);
            }
        }
        StageId::ALL
            .into_iter()
            .filter(|s| seen[s.index()])
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/stage.rs"]
mod tests;
