//! Tests for graph edits: every result must be a valid work graph.

use std::collections::{BTreeSet, HashSet};

use super::*;
use crate::graph::{Dependency, EdgeType, GraphError, WorkGraph, WorkGraphBuilder};
use crate::work::WorkUnit;

fn wu(id: &str) -> WorkUnit {
    WorkUnit::new(id, format!("work {id}"))
}

/// p1, p2 → x ⇒ y ⇒ z → c1, c2; p1 → c3; p2 → s → c2
fn chained() -> WorkGraph {
    let mut b = WorkGraphBuilder::new();
    for id in ["p1", "p2", "x", "y", "z", "c1", "c2", "c3", "s"] {
        b.add_unit(wu(id)).unwrap();
    }
    b.add_chain(&["x", "y", "z"]).unwrap();
    for (from, to) in [
        ("p1", "x"),
        ("p2", "x"),
        ("z", "c1"),
        ("z", "c2"),
        ("p1", "c3"),
        ("p2", "s"),
        ("s", "c2"),
    ] {
        b.add_dependency(from, to).unwrap();
    }
    b.build().unwrap()
}

/// Ordered pairs (a, b) such that b is reachable from a, over works only.
fn closure(g: &WorkGraph) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for from in g.ids().filter(|id| !g.is_sentinel(id)) {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(cur) = stack.pop() {
            for (child, _) in g.children(cur).unwrap() {
                if seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        for to in seen {
            if !g.is_sentinel(to) {
                pairs.insert((from.to_string(), to.to_string()));
            }
        }
    }
    pairs
}

fn assert_graph_invariants(g: &WorkGraph) {
    g.validate().unwrap();
    let parentless: Vec<&str> = g
        .ids()
        .filter(|id| g.parents(id).unwrap().is_empty())
        .collect();
    let childless: Vec<&str> = g
        .ids()
        .filter(|id| g.children(id).unwrap().is_empty())
        .collect();
    assert_eq!(parentless, vec![g.start_id()]);
    assert_eq!(childless, vec![g.finish_id()]);
    assert_eq!(g.topo_order().unwrap().len(), g.len());
}

#[cfg(test)]
mod copying {
    use super::*;

    #[test]
    fn fresh_ids_are_all_new() {
        let g = chained();
        let copy = prepare_copy(&g, &[], IdStrategy::Fresh).unwrap();
        assert_graph_invariants(&copy.graph);
        assert_eq!(copy.graph.len(), g.len());
        assert_eq!(copy.graph.edge_count(), g.edge_count());
        for (old, new) in &copy.old_to_new {
            assert_ne!(old, new);
            assert!(copy.graph.contains(new));
        }
    }

    #[test]
    fn copy_preserves_edges_through_the_map() {
        let g = chained();
        let copy = prepare_copy(&g, &[], IdStrategy::Fresh).unwrap();
        for (from, to, edge) in g.edges() {
            let (a, b) = (&copy.old_to_new[from], &copy.old_to_new[to]);
            assert_eq!(copy.graph.edge(a, b), Some(edge));
        }
        let y = &copy.old_to_new["y"];
        assert_eq!(copy.graph.chain(y).unwrap().len(), 3);
    }

    #[test]
    fn original_is_untouched() {
        let g = chained();
        let before = closure(&g);
        let _ = delete_node(&g, "y", IdStrategy::Keep).unwrap();
        assert_eq!(closure(&g), before);
        assert!(g.contains("y"));
    }

    #[test]
    fn excluded_works_are_dropped() {
        let g = chained();
        let copy = prepare_copy(&g, &["c3"], IdStrategy::Keep).unwrap();
        assert_graph_invariants(&copy.graph);
        assert!(!copy.graph.contains("c3"));
        assert!(!copy.old_to_new.contains_key("c3"));
    }

    #[test]
    fn sentinels_cannot_be_excluded() {
        let g = chained();
        let start = g.start_id().to_string();
        assert_eq!(
            prepare_copy(&g, &[start.as_str()], IdStrategy::Keep).unwrap_err(),
            GraphError::SentinelViolation(start)
        );
    }

    #[test]
    fn simplified_ids_are_sequential_from_offset() {
        let g = chained();
        let copy = simplify_ids(&g, 100).unwrap();
        assert_graph_invariants(&copy.graph);
        let mut ids: Vec<usize> = copy
            .graph
            .ids()
            .map(|id| id.parse::<usize>().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (100..100 + g.len()).collect::<Vec<_>>());
    }
}

#[cfg(test)]
mod deletion {
    use super::*;

    #[test]
    fn deleting_a_chain_member_removes_the_whole_chain() {
        let g = chained();
        let out = delete_node(&g, "y", IdStrategy::Keep).unwrap();
        assert_graph_invariants(&out.graph);
        for id in ["x", "y", "z"] {
            assert!(!out.graph.contains(id), "{id} should be gone");
        }
        assert_eq!(out.graph.len(), g.len() - 3);
    }

    #[test]
    fn parents_become_direct_parents_of_children() {
        let g = chained();
        let out = delete_node(&g, "z", IdStrategy::Keep).unwrap();
        for p in ["p1", "p2"] {
            for c in ["c1", "c2"] {
                let edge = out.graph.edge(p, c).unwrap();
                assert_eq!(edge.kind, EdgeType::FinishStart);
                assert_eq!(edge.lag, 0.0);
            }
        }
    }

    #[test]
    fn transitive_precedence_is_preserved_exactly() {
        let g = chained();
        let removed: HashSet<&str> = ["x", "y", "z"].into_iter().collect();
        let expected: BTreeSet<(String, String)> = closure(&g)
            .into_iter()
            .filter(|(a, b)| !removed.contains(a.as_str()) && !removed.contains(b.as_str()))
            .collect();

        for target in ["x", "y", "z"] {
            let out = delete_node(&g, target, IdStrategy::Keep).unwrap();
            assert_eq!(closure(&out.graph), expected);
        }
    }

    #[test]
    fn every_single_deletion_keeps_invariants() {
        let g = chained();
        for id in g.ids().filter(|id| !g.is_sentinel(id)) {
            let out = delete_node(&g, id, IdStrategy::Fresh).unwrap();
            assert_graph_invariants(&out.graph);
        }
    }

    #[test]
    fn unknown_and_sentinel_ids_fail() {
        let g = chained();
        assert_eq!(
            delete_node(&g, "nope", IdStrategy::Keep).unwrap_err(),
            GraphError::NodeNotFound("nope".into())
        );
        assert!(matches!(
            delete_node(&g, g.finish_id(), IdStrategy::Keep),
            Err(GraphError::SentinelViolation(_))
        ));
    }
}

#[cfg(test)]
mod insertion {
    use super::*;

    #[test]
    fn insert_between_existing_works() {
        let g = chained();
        let out = insert_work_unit(
            &g,
            wu("new"),
            &[Dependency::from("p1")],
            &[Dependency::new("c3", 1.5, EdgeType::StartStart)],
            IdStrategy::Keep,
        )
        .unwrap();
        assert_graph_invariants(&out.graph);
        assert!(out.graph.has_edge("p1", "new"));
        assert_eq!(
            out.graph.edge("new", "c3").map(|e| (e.lag, e.kind)),
            Some((1.5, EdgeType::StartStart))
        );
    }

    #[test]
    fn insert_with_fresh_ids_maps_parents() {
        let g = chained();
        let out = insert_work_unit(
            &g,
            wu("new"),
            &[Dependency::from("s")],
            &[],
            IdStrategy::Fresh,
        )
        .unwrap();
        assert_graph_invariants(&out.graph);
        let s = &out.old_to_new["s"];
        assert!(out.graph.has_edge(s, "new"));
        assert!(out.graph.has_edge("new", out.graph.finish_id()));
    }

    #[test]
    fn orphan_insert_hangs_between_sentinels() {
        let g = chained();
        let out = insert_work_unit(&g, wu("lonely"), &[], &[], IdStrategy::Keep).unwrap();
        assert!(out.graph.has_edge(out.graph.start_id(), "lonely"));
        assert!(out.graph.has_edge("lonely", out.graph.finish_id()));
    }

    #[test]
    fn insert_rejects_duplicate_and_unknown_ids() {
        let g = chained();
        assert_eq!(
            insert_work_unit(&g, wu("s"), &[], &[], IdStrategy::Keep).unwrap_err(),
            GraphError::DuplicateId("s".into())
        );
        assert_eq!(
            insert_work_unit(&g, wu("n"), &[Dependency::from("ghost")], &[], IdStrategy::Keep)
                .unwrap_err(),
            GraphError::NodeNotFound("ghost".into())
        );
    }

    #[test]
    fn graph_in_graph() {
        let master = chained();
        let mut b = WorkGraphBuilder::new();
        for id in ["m1", "m2", "m3"] {
            b.add_unit(wu(id)).unwrap();
        }
        b.add_dependency("m1", "m3").unwrap();
        b.add_dependency("m2", "m3").unwrap();
        let slave = b.build().unwrap();

        let out = insert_graph(&master, "p1", "c1", &slave, IdStrategy::Fresh).unwrap();
        assert_graph_invariants(&out.graph);
        assert_eq!(out.graph.len(), master.len() + 3);

        let p1 = &out.master_ids["p1"];
        let c1 = &out.master_ids["c1"];
        assert!(out.graph.has_edge(p1, &out.slave_ids["m1"]));
        assert!(out.graph.has_edge(p1, &out.slave_ids["m2"]));
        assert!(out.graph.has_edge(&out.slave_ids["m3"], c1));
        assert!(out.graph.has_edge(&out.slave_ids["m1"], &out.slave_ids["m3"]));
        assert!(!out.slave_ids.contains_key(slave.start_id()));
    }

    #[test]
    fn graph_in_graph_rejects_backward_anchor() {
        let master = chained();
        let mut slave = WorkGraphBuilder::new();
        slave.add_unit(wu("only")).unwrap();
        let slave = slave.build().unwrap();
        assert!(matches!(
            insert_graph(&master, "c1", "p1", &slave, IdStrategy::Fresh),
            Err(GraphError::CycleDetected { .. })
        ));
    }

    #[test]
    fn graph_in_graph_with_simplified_ids_does_not_collide() {
        let master = chained();
        let slave = crate::graph::work_graph_from_edges([wu("a"), wu("b")], &[("a", "b")]).unwrap();
        let out = insert_graph(
            &master,
            master.start_id(),
            master.finish_id(),
            &slave,
            IdStrategy::Simplified { offset: 0 },
        )
        .unwrap();
        assert_graph_invariants(&out.graph);
        assert_eq!(out.graph.len(), master.len() + 2);
    }
}

mod restructuring {
    use super::*;
    use crate::graph::GraphEdge;
    use crate::work::{MaterialReq, WorkerReq, ZoneReq};

    fn sized(id: &str, volume: f64) -> WorkUnit {
        wu(id)
            .with_requirement(WorkerReq::new("mason", volume, 1, 4).unwrap())
            .with_volume(volume)
            .unwrap()
    }

    fn pair(kind: EdgeType, lag: f64) -> WorkGraph {
        let mut b = WorkGraphBuilder::new();
        b.add_unit(sized("u", 10.0)).unwrap();
        b.add_unit(sized("v", 10.0)).unwrap();
        b.add_edge("u", "v", GraphEdge::new(lag, kind)).unwrap();
        b.build().unwrap()
    }

    fn volume(g: &WorkGraph, id: &str) -> f64 {
        g.unit(id).unwrap().volume()
    }

    fn assert_finish_start_only(g: &WorkGraph) {
        for (from, to, edge) in g.edges() {
            assert!(
                matches!(
                    edge.kind,
                    EdgeType::FinishStart | EdgeType::InseparableFinishStart
                ),
                "{from} -> {to} is {:?}",
                edge.kind
            );
        }
    }

    #[test]
    fn start_start_waits_for_the_empty_head_stage() {
        let g = pair(EdgeType::StartStart, 3.0);
        let r = restructure(&g, false).unwrap();
        assert_graph_invariants(&r);
        assert_finish_start_only(&r);

        let head = stage_id("u", 0);
        assert_eq!(volume(&r, &head), 0.0);
        assert_eq!(volume(&r, "u"), 10.0);
        assert_eq!(r.edge(&head, "u"), Some(GraphEdge::inseparable()));
        assert_eq!(r.parents("v").unwrap(), vec![(head.as_str(), GraphEdge::finish_start())]);
        assert_eq!(r.unit(&head).unwrap().name(), "work u_stage_0");
        assert_eq!(r.unit("u").unwrap().name(), "work u");
    }

    #[test]
    fn finish_finish_holds_the_tail_stage() {
        let g = pair(EdgeType::FinishFinish, 0.0);
        let r = restructure(&g, false).unwrap();
        assert_graph_invariants(&r);
        assert_finish_start_only(&r);

        let body = stage_id("v", 0);
        assert_eq!(volume(&r, &body), 10.0);
        assert_eq!(volume(&r, "v"), 0.0);
        assert_eq!(r.edge("u", "v"), Some(GraphEdge::finish_start()));
        assert_eq!(r.edge(&body, "v"), Some(GraphEdge::inseparable()));
        assert!(!r.has_edge("u", &body));
    }

    #[test]
    fn lagged_finish_start_splits_both_works_by_the_lag() {
        let g = pair(EdgeType::LagFinishStart, 4.0);
        let r = restructure(&g, true).unwrap();
        assert_graph_invariants(&r);
        assert_finish_start_only(&r);

        let (u0, v0) = (stage_id("u", 0), stage_id("v", 0));
        assert!((volume(&r, &u0) - 4.0).abs() < 1e-9);
        assert!((volume(&r, "u") - 6.0).abs() < 1e-9);
        assert!((volume(&r, &v0) - 6.0).abs() < 1e-9);
        assert!((volume(&r, "v") - 4.0).abs() < 1e-9);

        let workers = r.unit(&u0).unwrap().worker_reqs().next().unwrap().volume();
        assert!((workers - 4.0).abs() < 1e-9);

        assert_eq!(r.edge(&u0, &v0), Some(GraphEdge::finish_start()));
        assert_eq!(r.edge("u", "v"), Some(GraphEdge::finish_start()));
        assert_eq!(r.len(), g.len() + 2);
    }

    #[test]
    fn lagged_finish_start_without_optimization_keeps_the_lag() {
        let g = pair(EdgeType::LagFinishStart, 4.0);
        let r = restructure(&g, false).unwrap();
        assert_graph_invariants(&r);
        assert_eq!(r.len(), g.len());
        assert_eq!(
            r.edge("u", "v"),
            Some(GraphEdge::new(4.0, EdgeType::FinishStart))
        );
    }

    #[test]
    fn materials_stay_on_the_last_stage() {
        let mut b = WorkGraphBuilder::new();
        b.add_unit(
            sized("u", 10.0)
                .with_requirement(MaterialReq {
                    kind: "brick".into(),
                    count: 300,
                })
                .with_requirement(ZoneReq::new("yard", 1)),
        )
        .unwrap();
        b.add_unit(sized("v", 10.0)).unwrap();
        b.add_edge("u", "v", GraphEdge::new(0.0, EdgeType::StartStart))
            .unwrap();
        let r = restructure(&b.build().unwrap(), false).unwrap();

        let head = r.unit(&stage_id("u", 0)).unwrap();
        let last = r.unit("u").unwrap();
        assert_eq!(head.material_reqs().count(), 0);
        assert_eq!(last.need_materials().len(), 1);
        assert_eq!(head.zone_reqs().count(), 1);
        assert_eq!(last.zone_reqs().count(), 1);
    }

    #[test]
    fn lag_beyond_the_volume_is_clamped() {
        let g = pair(EdgeType::StartStart, 25.0);
        let r = restructure(&g, true).unwrap();
        assert_graph_invariants(&r);
        assert_eq!(volume(&r, &stage_id("u", 0)), 10.0);
        assert_eq!(volume(&r, "u"), 0.0);
    }

    #[test]
    fn plain_graph_is_rebuilt_unchanged() {
        let g = chained();
        let r = restructure(&g, true).unwrap();
        assert_graph_invariants(&r);
        assert_eq!(r.start_id(), g.start_id());
        assert_eq!(r.finish_id(), g.finish_id());
        assert_eq!(closure(&r), closure(&g));
        assert_eq!(r.chain("x").unwrap(), vec!["x", "y", "z"]);
    }

    #[test]
    fn mixed_relations_keep_the_sentinels_and_precedence() {
        let mut b = WorkGraphBuilder::new();
        for (id, vol) in [("a", 10.0), ("b", 5.0), ("c", 8.0), ("d", 2.0)] {
            b.add_unit(sized(id, vol)).unwrap();
        }
        b.add_edge("a", "b", GraphEdge::new(2.0, EdgeType::StartStart))
            .unwrap();
        b.add_edge("a", "c", GraphEdge::new(0.0, EdgeType::FinishFinish))
            .unwrap();
        b.add_edge("b", "d", GraphEdge::new(1.0, EdgeType::LagFinishStart))
            .unwrap();
        b.add_dependency("c", "d").unwrap();
        let g = b.build().unwrap();

        for use_lag in [false, true] {
            let r = restructure(&g, use_lag).unwrap();
            assert_graph_invariants(&r);
            assert_finish_start_only(&r);
            assert_eq!(r.start_id(), g.start_id());
            assert_eq!(r.finish_id(), g.finish_id());
            for id in ["a", "b", "c", "d"] {
                assert!(r.contains(id), "{id} lost its last stage");
            }
            let total: f64 = r
                .units()
                .filter(|u| u.id() == "a" || u.id().starts_with("a_stage_"))
                .map(WorkUnit::volume)
                .sum();
            assert!((total - 10.0).abs() < 1e-9);
            // the last stage of a still precedes the last stage of c
            assert!(closure(&r).contains(&("a".to_string(), "c".to_string())));
        }
    }
}
