//! Iterative minimax over an explicit search tree
//!
//! Nodes live in an arena and are scored with a LIFO work stack instead of
//! call-stack recursion. An unexpanded node is pushed back under its new
//! children, so every child subtree is scored before the parent is revisited.

use crate::board::Cell;
use crate::game::GameState;
use crate::minimax::{select_index, terminal_outcome, Outcome};

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the search tree
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub state: GameState,
    /// Value for the player to move in `state`, once scored
    pub score: Option<Outcome>,
    /// One child per legal move, in move order
    pub children: Vec<NodeId>,
}

impl SearchNode {
    fn new(state: GameState) -> Self {
        Self {
            state,
            score: None,
            children: Vec::new(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }
}

// ============================================================================
// SEARCH TREE
// ============================================================================

/// Search tree with arena allocation
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new(root_state: GameState) -> Self {
        Self {
            nodes: vec![SearchNode::new(root_state)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add one child per legal move of `id`, returning the new ids
    fn expand(&mut self, id: NodeId) -> Vec<NodeId> {
        let state = self.nodes[id.0].state;
        let first = self.nodes.len();
        self.nodes.extend(
            state
                .legal_moves()
                .into_iter()
                .map(|mv| SearchNode::new(state.apply_move(mv))),
        );
        let children: Vec<NodeId> = (first..self.nodes.len()).map(NodeId).collect();
        self.nodes[id.0].children.clone_from(&children);
        children
    }

    /// Score the whole tree and return the root's value
    pub fn solve(&mut self) -> Outcome {
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            let state = self.nodes[id.0].state;
            if state.is_over() {
                self.nodes[id.0].score = Some(terminal_outcome(&state));
            } else if !self.nodes[id.0].is_expanded() {
                let children = self.expand(id);
                if children.is_empty() {
                    // Not over yet nothing to play: unreachable by legal moves
                    self.nodes[id.0].score = Some(Outcome::Draw);
                    continue;
                }
                stack.push(id);
                stack.extend(children);
            } else {
                let score = self.nodes[id.0]
                    .children
                    .iter()
                    .filter_map(|child| self.nodes[child.0].score)
                    .map(|s| -s)
                    .max()
                    .unwrap_or(Outcome::Draw);
                self.nodes[id.0].score = Some(score);
            }
        }

        self.nodes[NodeId::ROOT.0].score.unwrap_or(Outcome::Draw)
    }

    /// Root children values from the root player's perspective
    pub fn root_values(&self) -> Vec<Outcome> {
        self.get(self.root())
            .children
            .iter()
            .map(|child| -self.get(*child).score.unwrap_or(Outcome::Draw))
            .collect()
    }
}

/// Best move by iterative minimax; `None` when the game is already over.
///
/// The chosen child is mapped back to a move by replaying each legal move and
/// comparing the resulting state with the child's.
pub fn best_move_iterative(state: &GameState) -> Option<Cell> {
    if state.is_over() {
        return None;
    }

    let mut tree = SearchTree::new(*state);
    let root_score = tree.solve();
    let values = tree.root_values();
    let root = tree.get(tree.root());
    let child = root.children.get(select_index(&values)?)?;
    let target = tree.get(*child).state;

    tracing::debug!(nodes = tree.len(), ?root_score, "iterative minimax finished");

    state
        .legal_moves()
        .into_iter()
        .find(|mv| state.apply_move(*mv) == target)
}
