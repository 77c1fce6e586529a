use crate::reference::Ref;

/// A decision node: `variable ? high : low`.
///
/// The terminal node has variable zero. In a canonical node, `high` is never complemented.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub(crate) const TERMINAL: Node = Node {
        variable: 0,
        low: Ref::ONE,
        high: Ref::ONE,
    };

    pub fn is_terminal(&self) -> bool {
        self.variable == 0
    }
}
