//! DQL rendering for read and delete helpers.

use std::collections::HashMap;
use std::fmt::Write;

/// Default name of the result block.
pub(crate) const DEFAULT_BLOCK: &str = "data";

/// Name of the count block rendered by `nodes_and_count`.
pub(crate) const COUNT_BLOCK: &str = "count";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "orderasc",
            Order::Desc => "orderdesc",
        }
    }
}

/// What to select inside the result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    /// `uid` plus `expand(_all_)`, nested `depth` times.
    Expand { depth: usize },
    /// `uid` only.
    Uids,
    /// Caller-supplied block body.
    Custom(String),
}

/// Everything needed to render one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryBlock {
    pub type_name: String,
    pub name: String,
    pub uid: Option<String>,
    pub filter: Option<String>,
    pub first: Option<i64>,
    pub offset: Option<i64>,
    pub after: Option<String>,
    pub order: Vec<(Order, String)>,
    /// `query` header, e.g. `byName($name: string)`.
    pub func_def: Option<String>,
    pub vars: HashMap<String, String>,
    pub selection: Selection,
}

impl QueryBlock {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: DEFAULT_BLOCK.to_string(),
            uid: None,
            filter: None,
            first: None,
            offset: None,
            after: None,
            order: Vec::new(),
            func_def: None,
            vars: HashMap::new(),
            selection: Selection::Expand { depth: 0 },
        }
    }

    /// Root function plus the effective filter.
    fn root(&self) -> (String, Option<String>) {
        match &self.uid {
            Some(uid) => {
                let type_filter = format!("type({})", self.type_name);
                let filter = match &self.filter {
                    Some(f) => format!("{} AND ({})", type_filter, f),
                    None => type_filter,
                };
                (format!("uid({})", uid), Some(filter))
            }
            None => (format!("type({})", self.type_name), self.filter.clone()),
        }
    }

    fn header(&self) -> String {
        match &self.func_def {
            Some(def) => format!("query {} {{\n", def),
            None => "{\n".to_string(),
        }
    }

    /// Render the read.
    pub fn render(&self) -> String {
        let mut out = self.header();
        self.render_block(&mut out);
        out.push_str("}\n");
        out
    }

    /// Render the read plus a count block sharing its root and filter.
    pub fn render_with_count(&self) -> String {
        let mut out = self.header();
        self.render_block(&mut out);

        let (func, filter) = self.root();
        let _ = write!(out, "\t{}(func: {})", COUNT_BLOCK, func);
        if let Some(filter) = filter {
            let _ = write!(out, " @filter({})", filter);
        }
        out.push_str(" {\n\t\ttotal: count(uid)\n\t}\n}\n");
        out
    }

    fn render_block(&self, out: &mut String) {
        let (func, filter) = self.root();
        let _ = write!(out, "\t{}(func: {}", self.name, func);
        if let Some(first) = self.first {
            let _ = write!(out, ", first: {}", first);
        }
        if let Some(offset) = self.offset {
            let _ = write!(out, ", offset: {}", offset);
        }
        if let Some(after) = &self.after {
            let _ = write!(out, ", after: {}", after);
        }
        for (order, pred) in &self.order {
            let _ = write!(out, ", {}: {}", order.keyword(), pred);
        }
        out.push(')');
        if let Some(filter) = filter {
            let _ = write!(out, " @filter({})", filter);
        }
        out.push_str(" {\n");

        match &self.selection {
            Selection::Expand { depth } => expand(out, *depth, 2),
            Selection::Uids => out.push_str("\t\tuid\n"),
            Selection::Custom(body) => {
                for line in body.trim().lines() {
                    let _ = writeln!(out, "\t\t{}", line.trim());
                }
            }
        }
        out.push_str("\t}\n");
    }
}

fn expand(out: &mut String, depth: usize, indent: usize) {
    let pad = "\t".repeat(indent);
    let _ = writeln!(out, "{}uid", pad);
    if depth == 0 {
        let _ = writeln!(out, "{}expand(_all_)", pad);
    } else {
        let _ = writeln!(out, "{}expand(_all_) {{", pad);
        expand(out, depth - 1, indent + 1);
        let _ = writeln!(out, "{}}}", pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render() {
        let block = QueryBlock::new("User");
        assert_eq!(
            block.render(),
            "{\n\tdata(func: type(User)) {\n\t\tuid\n\t\texpand(_all_)\n\t}\n}\n"
        );
    }

    #[test]
    fn test_uid_root_keeps_type_filter() {
        let mut block = QueryBlock::new("User");
        block.uid = Some("0x1".into());
        block.filter = Some("eq(name, \"Alice\")".into());
        let dql = block.render();
        assert!(dql.contains("data(func: uid(0x1)) @filter(type(User) AND (eq(name, \"Alice\")))"));
    }

    #[test]
    fn test_paging_and_order() {
        let mut block = QueryBlock::new("User");
        block.first = Some(10);
        block.offset = Some(20);
        block.after = Some("0x5".into());
        block.order.push((Order::Asc, "name".into()));
        block.order.push((Order::Desc, "age".into()));
        assert!(block
            .render()
            .contains("data(func: type(User), first: 10, offset: 20, after: 0x5, orderasc: name, orderdesc: age) {"));
    }

    #[test]
    fn test_nested_expand() {
        let mut block = QueryBlock::new("User");
        block.selection = Selection::Expand { depth: 1 };
        assert!(block
            .render()
            .contains("\t\tuid\n\t\texpand(_all_) {\n\t\t\tuid\n\t\t\texpand(_all_)\n\t\t}\n"));
    }

    #[test]
    fn test_vars_header_and_custom_body() {
        let mut block = QueryBlock::new("User");
        block.func_def = Some("byName($name: string)".into());
        block.filter = Some("eq(name, $name)".into());
        block.selection = Selection::Custom("uid\n  name\n".into());
        assert_eq!(
            block.render(),
            "query byName($name: string) {\n\tdata(func: type(User)) @filter(eq(name, $name)) {\n\t\tuid\n\t\tname\n\t}\n}\n"
        );
    }

    #[test]
    fn test_count_block() {
        let mut block = QueryBlock::new("User");
        block.first = Some(2);
        block.filter = Some("has(email)".into());
        let dql = block.render_with_count();
        assert!(dql.contains("\tcount(func: type(User)) @filter(has(email)) {\n\t\ttotal: count(uid)\n\t}\n}\n"));
        assert!(dql.contains("data(func: type(User), first: 2) @filter(has(email))"));
    }
}
