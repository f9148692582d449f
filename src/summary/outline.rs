//! Indented tree outline of a path listing.
//!
//! The outline is an explicit arena: one node per distinct path prefix,
//! children kept in first-encounter order. That order is the rendering
//! contract; the outline lists entries the way the listing introduced
//! them, not alphabetically.

/// One node of the outline arena.
#[derive(Debug)]
struct Node {
    name: String,
    depth: usize,
    children: Vec<usize>,
}

/// An arena-backed tree over every segment of a path listing.
#[derive(Debug)]
pub struct Outline {
    nodes: Vec<Node>,
    roots: Vec<usize>,
}

impl Outline {
    /// Build the outline from `/`-separated paths.
    ///
    /// Each distinct segment under a given parent becomes exactly one
    /// node, no matter how many paths traverse it.
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut nodes: Vec<Node> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();

        for path in paths {
            let mut parent: Option<usize> = None;
            let mut depth = 0;

            for segment in path.split('/').filter(|s| !s.is_empty()) {
                let existing = match parent {
                    Some(p) => nodes[p]
                        .children
                        .iter()
                        .copied()
                        .find(|&i| nodes[i].name == segment),
                    None => roots.iter().copied().find(|&i| nodes[i].name == segment),
                };

                let idx = match existing {
                    Some(idx) => idx,
                    None => {
                        let idx = nodes.len();
                        nodes.push(Node { name: segment.to_string(), depth, children: Vec::new() });
                        match parent {
                            Some(p) => nodes[p].children.push(idx),
                            None => roots.push(idx),
                        }
                        idx
                    }
                };

                parent = Some(idx);
                depth += 1;
            }
        }

        Self { nodes, roots }
    }

    /// Render depth-first, one line per node, two spaces per depth level.
    ///
    /// Traversal uses an explicit stack; children are pushed in reverse so
    /// they pop in first-encounter order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            out.push_str(&"  ".repeat(node.depth));
            out.push_str(&node.name);
            out.push('\n');
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
