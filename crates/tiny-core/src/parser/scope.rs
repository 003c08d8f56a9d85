//! Scope stack — currently open ancestors keyed by indentation depth
//!
//! Frames address nodes by index path into the owned class list. Entities
//! are never removed once appended, so a path stays valid for the whole
//! parse.

use super::ast::Class;

/// An open node, addressed by its position in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeNode {
    Class { class: usize },
    Field { class: usize, field: usize },
    Method { class: usize, method: usize },
    Parameter { class: usize, method: usize, parameter: usize },
    LocalVariable { class: usize, method: usize, local: usize },
}

impl ScopeNode {
    /// Comment list of the addressed node
    pub fn comments_mut<'a>(&self, classes: &'a mut [Class]) -> Option<&'a mut Vec<String>> {
        match *self {
            ScopeNode::Class { class } => classes.get_mut(class).map(|c| &mut c.comments),
            ScopeNode::Field { class, field } => classes
                .get_mut(class)?
                .fields
                .get_mut(field)
                .map(|f| &mut f.comments),
            ScopeNode::Method { class, method } => classes
                .get_mut(class)?
                .methods
                .get_mut(method)
                .map(|m| &mut m.comments),
            ScopeNode::Parameter {
                class,
                method,
                parameter,
            } => classes
                .get_mut(class)?
                .methods
                .get_mut(method)?
                .parameters
                .get_mut(parameter)
                .map(|p| &mut p.comments),
            ScopeNode::LocalVariable {
                class,
                method,
                local,
            } => classes
                .get_mut(class)?
                .methods
                .get_mut(method)?
                .local_vars
                .get_mut(local)
                .map(|v| &mut v.comments),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ScopeNode::Class { .. } => "class",
            ScopeNode::Field { .. } => "field",
            ScopeNode::Method { .. } => "method",
            ScopeNode::Parameter { .. } => "parameter",
            ScopeNode::LocalVariable { .. } => "local variable",
        }
    }
}

/// One open scope: the node and the depth of the line that opened it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub depth: usize,
    pub node: ScopeNode,
}

/// Open scopes ordered from root to innermost
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close every scope at `depth` or deeper
    pub fn close_from(&mut self, depth: usize) {
        while self.frames.last().is_some_and(|f| f.depth >= depth) {
            self.frames.pop();
        }
    }

    pub fn push(&mut self, depth: usize, node: ScopeNode) {
        tracing::trace!(depth, node = node.kind_name(), "scope opened");
        self.frames.push(Frame { depth, node });
    }

    pub fn innermost(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Innermost open frame at exactly `depth`
    pub fn find_at_depth(&self, depth: usize) -> Option<&Frame> {
        self.frames.iter().rev().find(|f| f.depth == depth)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Field, Method, Parameter};

    fn stack_of(depths: &[usize]) -> ScopeStack {
        let mut stack = ScopeStack::new();
        for (i, depth) in depths.iter().enumerate() {
            stack.push(*depth, ScopeNode::Class { class: i });
        }
        stack
    }

    #[test]
    fn test_close_from_pops_equal_and_deeper() {
        let mut stack = stack_of(&[0, 1, 2]);
        stack.close_from(1);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.innermost().map(|f| f.depth), Some(0));
    }

    #[test]
    fn test_close_from_root_empties() {
        let mut stack = stack_of(&[0, 1, 2]);
        stack.close_from(0);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_close_from_deeper_keeps_all() {
        let mut stack = stack_of(&[0, 1]);
        stack.close_from(3);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_find_at_depth() {
        let stack = stack_of(&[0, 1, 2]);
        assert_eq!(stack.find_at_depth(1).map(|f| f.node), Some(ScopeNode::Class { class: 1 }));
        assert!(stack.find_at_depth(5).is_none());
    }

    #[test]
    fn test_comments_mut_reaches_every_kind() {
        let mut classes = vec![Class {
            fields: vec![Field::default()],
            methods: vec![Method {
                parameters: vec![Parameter::default()],
                local_vars: vec![Default::default()],
                ..Method::default()
            }],
            ..Class::default()
        }];

        let nodes = [
            ScopeNode::Class { class: 0 },
            ScopeNode::Field { class: 0, field: 0 },
            ScopeNode::Method { class: 0, method: 0 },
            ScopeNode::Parameter { class: 0, method: 0, parameter: 0 },
            ScopeNode::LocalVariable { class: 0, method: 0, local: 0 },
        ];
        for node in nodes {
            node.comments_mut(&mut classes)
                .expect("node should resolve")
                .push(node.kind_name().to_string());
        }

        let class = &classes[0];
        assert_eq!(class.comments, vec!["class"]);
        assert_eq!(class.fields[0].comments, vec!["field"]);
        assert_eq!(class.methods[0].comments, vec!["method"]);
        assert_eq!(class.methods[0].parameters[0].comments, vec!["parameter"]);
        assert_eq!(class.methods[0].local_vars[0].comments, vec!["local variable"]);
    }

    #[test]
    fn test_comments_mut_out_of_range() {
        let mut classes: Vec<Class> = Vec::new();
        assert!(ScopeNode::Class { class: 0 }.comments_mut(&mut classes).is_none());
    }
}
