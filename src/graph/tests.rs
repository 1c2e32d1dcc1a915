//! Test suite for the work graph model.

use super::*;
use crate::work::WorkUnit;

fn wu(id: &str) -> WorkUnit {
    WorkUnit::new(id, format!("work {id}"))
}

/// a → b → d, a → c → d
fn diamond() -> WorkGraph {
    work_graph_from_edges(
        ["a", "b", "c", "d"].map(wu),
        &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    )
    .unwrap()
}

#[cfg(test)]
mod building {
    use super::*;

    #[test]
    fn sentinels_wrap_sources_and_sinks() {
        let g = diamond();
        assert_eq!(g.len(), 6);
        assert!(g.has_edge(g.start_id(), "a"));
        assert!(g.has_edge("d", g.finish_id()));
        assert!(!g.has_edge(g.start_id(), "b"));
        assert!(g.start().is_service_unit());
        assert!(g.finish().is_service_unit());
        g.validate().unwrap();
    }

    #[test]
    fn empty_graph_links_start_to_finish() {
        let g = WorkGraphBuilder::new().build().unwrap();
        assert_eq!(g.len(), 2);
        assert!(g.has_edge(g.start_id(), g.finish_id()));
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut b = WorkGraphBuilder::new();
        b.add_unit(wu("a")).unwrap();
        assert_eq!(
            b.add_unit(wu("a")).unwrap_err(),
            GraphError::DuplicateId("a".into())
        );
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut b = WorkGraphBuilder::new();
        b.add_unit(wu("a")).unwrap();
        assert_eq!(
            b.add_dependency("a", "ghost").unwrap_err(),
            GraphError::NodeNotFound("ghost".into())
        );
    }

    #[test]
    fn cycle_rejected() {
        let mut b = WorkGraphBuilder::new();
        b.add_unit(wu("a")).unwrap();
        b.add_unit(wu("b")).unwrap();
        b.add_unit(wu("c")).unwrap();
        b.add_dependency("a", "b").unwrap();
        b.add_dependency("b", "c").unwrap();
        assert!(matches!(
            b.add_dependency("c", "a"),
            Err(GraphError::CycleDetected { .. })
        ));
        assert!(matches!(
            b.add_dependency("a", "a"),
            Err(GraphError::CycleDetected { .. })
        ));
    }

    #[test]
    fn duplicate_edge_is_kept_once() {
        let mut b = WorkGraphBuilder::new();
        b.add_unit(wu("a")).unwrap();
        b.add_unit(wu("b")).unwrap();
        b.add_edge("a", "b", GraphEdge::new(2.0, EdgeType::StartStart))
            .unwrap();
        b.add_dependency("a", "b").unwrap();
        let g = b.build().unwrap();
        assert_eq!(
            g.edge("a", "b"),
            Some(GraphEdge::new(2.0, EdgeType::StartStart))
        );
    }

    #[test]
    fn forked_chain_rejected() {
        let mut b = WorkGraphBuilder::new();
        for id in ["a", "b", "c"] {
            b.add_unit(wu(id)).unwrap();
        }
        b.add_chain(&["a", "b"]).unwrap();
        b.add_edge("a", "c", GraphEdge::inseparable()).unwrap();
        assert_eq!(b.build().unwrap_err(), GraphError::InvalidChain("a".into()));
    }

    #[test]
    fn explicit_sentinels_must_be_clean() {
        let mut b = WorkGraphBuilder::new();
        for id in ["s", "x", "f"] {
            b.add_unit(wu(id)).unwrap();
        }
        b.add_dependency("x", "s").unwrap();
        assert_eq!(
            b.build_with_sentinels("s", "f").unwrap_err(),
            GraphError::SentinelViolation("s".into())
        );
    }
}

#[cfg(test)]
mod navigation {
    use super::*;

    #[test]
    fn parents_and_children() {
        let g = diamond();
        let parents: Vec<&str> = g.parents("d").unwrap().into_iter().map(|(p, _)| p).collect();
        assert_eq!(parents, vec!["b", "c"]);
        let children: Vec<&str> = g.children("a").unwrap().into_iter().map(|(c, _)| c).collect();
        assert_eq!(children, vec!["b", "c"]);
        assert!(g.parents("zzz").is_err());
    }

    #[test]
    fn topo_order_respects_edges() {
        let g = diamond();
        let order = g.topo_order().unwrap();
        let pos = |id: &str| order.iter().position(|x| *x == id).unwrap();
        for (from, to, _) in g.edges() {
            assert!(pos(from) < pos(to));
        }
    }

    #[test]
    fn chain_walks_from_any_member() {
        let mut b = WorkGraphBuilder::new();
        for id in ["x", "y", "z", "w"] {
            b.add_unit(wu(id)).unwrap();
        }
        b.add_chain(&["x", "y", "z"]).unwrap();
        b.add_dependency("w", "x").unwrap();
        let g = b.build().unwrap();

        assert_eq!(g.chain("y").unwrap(), vec!["x", "y", "z"]);
        assert_eq!(g.chain_head("z").unwrap(), "x");
        assert_eq!(g.inseparable_parent("y"), Some("x"));
        assert_eq!(g.inseparable_child("z"), None);
        assert!(g.is_inseparable_son("z"));
        assert!(!g.is_inseparable_son("x"));
        assert_eq!(g.chain("w").unwrap(), vec!["w"]);
    }
}

#[cfg(test)]
mod head_nodes {
    use super::*;

    #[test]
    fn chains_collapse_onto_heads() {
        // p → x ⇒ y ⇒ z → q, and r → y
        let mut b = WorkGraphBuilder::new();
        for id in ["p", "x", "y", "z", "q", "r"] {
            b.add_unit(wu(id)).unwrap();
        }
        b.add_chain(&["x", "y", "z"]).unwrap();
        b.add_dependency("p", "x").unwrap();
        b.add_dependency("z", "q").unwrap();
        b.add_dependency("r", "y").unwrap();
        let g = b.build().unwrap();

        let heads = g.head_nodes_with_connections().unwrap();
        assert_eq!(heads.len(), 6);
        assert!(!heads.order.iter().any(|h| h == "y" || h == "z"));
        assert_eq!(heads.chain("x"), ["x", "y", "z"]);

        let px: Vec<&str> = heads.parents["x"].iter().map(String::as_str).collect();
        assert_eq!(px, vec!["p", "r"]);
        let cx: Vec<&str> = heads.children["x"].iter().map(String::as_str).collect();
        assert_eq!(cx, vec!["q"]);
        assert!(!heads.parents["x"].contains("x"));
    }

    #[test]
    fn order_is_topological_and_id_sorted_per_level() {
        let g = work_graph_from_edges(
            ["m", "k", "b", "z"].map(wu),
            &[("m", "z"), ("k", "z"), ("b", "z")],
        )
        .unwrap();
        let heads = g.head_nodes_with_connections().unwrap();
        let inner: Vec<&str> = heads
            .order
            .iter()
            .map(String::as_str)
            .filter(|id| !g.is_sentinel(id))
            .collect();
        assert_eq!(inner, vec!["b", "k", "m", "z"]);
        assert_eq!(heads.order.first().map(String::as_str), Some(g.start_id()));
        assert_eq!(heads.order.last().map(String::as_str), Some(g.finish_id()));
    }

    #[test]
    fn order_is_reproducible() {
        let g = diamond();
        let a = g.head_nodes_with_connections().unwrap();
        let b = g.clone().head_nodes_with_connections().unwrap();
        assert_eq!(a.order, b.order);
    }
}
