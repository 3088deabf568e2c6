//! Per-object grouping for SVG output.
//!
//! Every object id gets its own `<g>` element. Groups are painted in the
//! order they were opened, so later objects cover earlier ones; inside a
//! group, nodes keep the order they were added in.
//!
//! # Example
//!
//! ```text
//! let mut output = GroupedOutput::new();
//! output.add_to_group("sky", Box::new(Rectangle::new()));
//! output.add_to_group("sun", Box::new(Circle::new()));
//! let groups = output.render(); // <g id="sky">…</g><g id="sun">…</g>
//! ```

use indexmap::IndexMap;
use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// SVG nodes collected per object id, in group creation order.
#[derive(Debug, Default)]
pub struct GroupedOutput {
    groups: IndexMap<String, Vec<SvgNode>>,
}

impl GroupedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the group for `object_id` if it does not exist yet.
    ///
    /// Opening fixes the group's paint order even while it is still empty.
    pub fn open_group(&mut self, object_id: &str) {
        if !self.groups.contains_key(object_id) {
            self.groups.insert(object_id.to_string(), Vec::new());
        }
    }

    /// Appends a node to the group for `object_id`, opening it if needed.
    pub fn add_to_group(&mut self, object_id: &str, node: SvgNode) {
        self.open_group(object_id);
        if let Some(nodes) = self.groups.get_mut(object_id) {
            nodes.push(node);
        }
    }

    /// Renders every group, empty ones included, to an SVG `<g>` element
    /// carrying the object id.
    ///
    /// Nodes are cloned so the output can keep growing after a save.
    pub fn render(&self) -> Vec<SvgNode> {
        self.groups
            .iter()
            .map(|(object_id, nodes)| {
                let group = nodes
                    .iter()
                    .cloned()
                    .fold(svg_element::Group::new().set("id", object_id.as_str()), |group, node| {
                        group.add(node)
                    });
                Box::new(group) as SvgNode
            })
            .collect()
    }
}
