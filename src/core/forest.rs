//! # Hierarchy Builder
//!
//! Derives a display forest from the flat list and the `next_books` edges.
//!
//! Nodes live in an arena indexed by list position; children are indices,
//! so a book referenced by several parents is shared rather than copied and
//! reference cycles cannot make construction recurse. Every book is a node,
//! and `roots()` yields all of them in list order.

use std::collections::{HashMap, HashSet};

use crate::core::book::Book;

#[derive(Debug, Clone)]
pub struct BookNode {
    pub book: Book,
    /// Arena indices of the books this one lists in `next_books`.
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<BookNode>,
    index: HashMap<String, usize>,
}

/// Build the forest for `books`. Ids in `next_books` that resolve to no book
/// are skipped.
pub fn build_forest(books: &[Book]) -> Forest {
    let index: HashMap<String, usize> = books
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id.clone(), i))
        .collect();

    let nodes = books
        .iter()
        .map(|book| BookNode {
            book: book.clone(),
            children: book
                .next_books
                .iter()
                .filter_map(|id| index.get(id).copied())
                .collect(),
        })
        .collect();

    Forest { nodes, index }
}

impl Forest {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in list order.
    pub fn roots(&self) -> impl Iterator<Item = &BookNode> {
        self.nodes.iter()
    }

    pub fn get(&self, id: &str) -> Option<&BookNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Books listed as "read next" by `id`, in `next_books` order.
    pub fn children(&self, id: &str) -> Vec<&Book> {
        self.get(id)
            .map(|node| node.children.iter().map(|&i| &self.nodes[i].book).collect())
            .unwrap_or_default()
    }

    /// Books that list `id` as "read next", in list order.
    pub fn parents(&self, id: &str) -> Vec<&Book> {
        let Some(&target) = self.index.get(id) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|node| node.children.contains(&target))
            .map(|node| &node.book)
            .collect()
    }

    /// Depth-first walk below `id`, as `(depth, book)` with depth 1 for
    /// direct children. Each book is visited at most once.
    pub fn descendants(&self, id: &str) -> Vec<(usize, &Book)> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut stack: Vec<(usize, usize)> = self.nodes[start]
            .children
            .iter()
            .rev()
            .map(|&child| (child, 1))
            .collect();

        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            out.push((depth, &self.nodes[node].book));
            stack.extend(
                self.nodes[node]
                    .children
                    .iter()
                    .rev()
                    .map(|&child| (child, depth + 1)),
            );
        }

        out
    }
}
