use std::fmt::{Debug, Write};

use crate::{augment::Augment, node::Handle, tree::Tree};

/// Render `t` in graphviz DOT format, labelling each node with its key,
/// height and augmentation summary. Routing nodes are drawn dashed.
pub(crate) fn print_dot<K, V, C, B, S, A>(t: &Tree<K, V, C, B, S, A>) -> String
where
    K: Debug,
    A: Augment<K, V>,
    A::Data: Debug,
{
    let mut buf = String::new();

    writeln!(buf, "digraph {{").unwrap();
    writeln!(buf, r#"node [shape = record; fontcolor = orange4;];"#).unwrap();
    if let Some(root) = t.root {
        recurse(t, root, &mut buf);
    }
    writeln!(buf, "}}").unwrap();

    buf
}

fn recurse<K, V, C, B, S, A, W>(t: &Tree<K, V, C, B, S, A>, h: Handle, buf: &mut W)
where
    K: Debug,
    A: Augment<K, V>,
    A::Data: Debug,
    W: Write,
{
    let n = &t.nodes[h];
    let id = node_id(h);
    let style = if n.is_routing() { "dashed" } else { "solid" };

    writeln!(
        buf,
        r#"{id} [label="{:?} | {{ h={} | {:?} }}"; style = {style};];"#,
        n.key, n.height, n.data,
    )
    .unwrap();

    for v in [n.left, n.right] {
        match v {
            Some(v) => {
                writeln!(buf, "{id} -> {};", node_id(v)).unwrap();
                recurse(t, v, buf);
            }
            None => {
                writeln!(buf, "null_{id} [shape=point,style=invis];").unwrap();
                writeln!(buf, "{id} -> null_{id} [style=invis];").unwrap();
            }
        };
    }
}

fn node_id(h: Handle) -> String {
    use slotmap::Key;
    format!("n{}", h.data().as_ffi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{augment::tests::Count, balance::Avl, compare::Natural, storage::Leaf};

    #[test]
    fn test_print_dot() {
        let mut t = Tree::<u32, u32, Natural, Avl, Leaf, Count>::default();
        for v in [2, 1, 3] {
            t.insert(v, v).unwrap();
        }

        let got = print_dot(&t);

        assert!(got.starts_with("digraph {"));
        assert!(got.trim_end().ends_with('}'));

        // Three leaves, two routing nodes, each linked from its parent.
        assert_eq!(got.matches("style = solid").count(), 3);
        assert_eq!(got.matches("style = dashed").count(), 2);
        let edges = got
            .lines()
            .filter(|l| l.contains(" -> ") && !l.contains("null_"))
            .count();
        assert_eq!(edges, 4);

        // Each of the three leaves has two invisible placeholder children.
        assert_eq!(got.matches("style=invis];").count(), 12);
    }
}
