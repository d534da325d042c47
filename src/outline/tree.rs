//! Level-based nesting of a flat heading list
//!
//! A heading of level N becomes a child of the nearest preceding heading
//! with a level below N. Headings without such a predecessor are roots.

use super::Heading;

/// A node in the nested outline, pointing back into the flat heading list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingNode {
    /// Index into the flat heading slice the tree was built from
    pub index: usize,
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    /// Whether this node has children (can be expanded/collapsed)
    pub fn is_collapsible(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Build the nested outline from headings in document order
pub fn build_heading_tree(headings: &[Heading]) -> Vec<HeadingNode> {
    let mut roots: Vec<HeadingNode> = Vec::new();
    let mut stack: Vec<(u8, HeadingNode)> = Vec::new();

    for (index, heading) in headings.iter().enumerate() {
        let level = heading.level;

        // Pop everything at same level or deeper
        while stack.last().is_some_and(|(top_level, _)| *top_level >= level) {
            if let Some((_, finished)) = stack.pop() {
                attach(&mut stack, &mut roots, finished);
            }
        }

        stack.push((
            level,
            HeadingNode {
                index,
                children: Vec::new(),
            },
        ));
    }

    // Flush remaining stack
    while let Some((_, finished)) = stack.pop() {
        attach(&mut stack, &mut roots, finished);
    }

    roots
}

/// Whether the heading at `index` has descendants in the nested outline
pub fn has_children(headings: &[Heading], index: usize) -> bool {
    match (headings.get(index), headings.get(index + 1)) {
        (Some(heading), Some(next)) => next.level > heading.level,
        _ => false,
    }
}

/// A heading that is shown, with its nesting depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleHeading {
    pub index: usize,
    pub depth: usize,
    pub has_children: bool,
}

/// Flatten the outline in document order, skipping descendants of
/// collapsed headings
pub fn visible_headings(headings: &[Heading]) -> Vec<VisibleHeading> {
    fn walk(
        nodes: &[HeadingNode],
        headings: &[Heading],
        depth: usize,
        out: &mut Vec<VisibleHeading>,
    ) {
        for node in nodes {
            out.push(VisibleHeading {
                index: node.index,
                depth,
                has_children: node.is_collapsible(),
            });
            if !headings[node.index].collapsed {
                walk(&node.children, headings, depth + 1, out);
            }
        }
    }

    let mut out = Vec::with_capacity(headings.len());
    walk(&build_heading_tree(headings), headings, 0, &mut out);
    out
}

fn attach(stack: &mut [(u8, HeadingNode)], roots: &mut Vec<HeadingNode>, node: HeadingNode) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(node),
        None => roots.push(node),
    }
}
