use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::graph::{EdgeType, GraphEdge, GraphError, WorkGraph, WorkGraphBuilder};
use crate::work::{Requirement, WorkUnit};
use crate::Id;

/// Separator between a work id and its stage number.
pub const STAGE_SEP: &str = "_stage_";

/// Id of stage `stage` of work `id`. The last stage keeps `id` itself.
pub fn stage_id(id: &str, stage: usize) -> Id {
    format!("{id}{STAGE_SEP}{stage}")
}

/// A relation cutting a work at `at`, a fraction of its volume.
#[derive(Debug, Clone, Copy)]
struct Cut<'a> {
    at: f64,
    other: &'a str,
    /// The work is the successor of the relation.
    incoming: bool,
}

/// Stage ids a relation is rewired to once both works are cut.
#[derive(Debug, Default)]
struct Anchors {
    first: HashMap<Id, Id>,
    /// Edge `(u, v)` → stage of `u` that must finish first.
    tails: HashMap<(Id, Id), Id>,
    /// Edge `(u, v)` → stage of `v` that waits.
    heads: HashMap<(Id, Id), Id>,
}

impl Anchors {
    fn first<'a>(&'a self, id: &'a str) -> &'a str {
        self.first.get(id).map_or(id, String::as_str)
    }

    fn tail<'a>(&'a self, from: &'a str, to: &str) -> &'a str {
        self.tails
            .get(&(from.to_string(), to.to_string()))
            .map_or_else(|| self.first(from), String::as_str)
    }

    fn head<'a>(&'a self, from: &str, to: &'a str) -> &'a str {
        self.heads
            .get(&(from.to_string(), to.to_string()))
            .map_or(to, String::as_str)
    }
}

/// Share of `volume` covered by `lag`, within `[0, 1]`.
fn lag_share(lag: f64, volume: f64) -> f64 {
    if volume > 0.0 {
        (lag / volume).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn cuts_of<'a>(
    wg: &'a WorkGraph,
    id: &str,
    use_lag: bool,
) -> Result<Vec<Cut<'a>>, GraphError> {
    let volume_of = |id: &str| wg.unit(id).map_or(0.0, WorkUnit::volume);
    let own = volume_of(id);
    let mut cuts = Vec::new();

    for (child, edge) in wg.children(id)? {
        let at = match edge.kind {
            EdgeType::StartStart if use_lag => lag_share(edge.lag, own),
            EdgeType::StartStart => 0.0,
            EdgeType::LagFinishStart if use_lag => lag_share(edge.lag, own),
            _ => continue,
        };
        cuts.push(Cut {
            at,
            other: child,
            incoming: false,
        });
    }
    for (parent, edge) in wg.parents(id)? {
        let at = match edge.kind {
            EdgeType::FinishFinish if use_lag => 1.0 - lag_share(edge.lag, volume_of(parent)),
            EdgeType::FinishFinish => 1.0,
            EdgeType::LagFinishStart if use_lag => 1.0 - lag_share(edge.lag, volume_of(parent)),
            _ => continue,
        };
        cuts.push(Cut {
            at,
            other: parent,
            incoming: true,
        });
    }

    cuts.sort_by(|a, b| {
        a.at.total_cmp(&b.at)
            .then(a.incoming.cmp(&b.incoming))
            .then_with(|| a.other.cmp(b.other))
    });
    Ok(cuts)
}

/// Stage `stage` of `unit` carrying `share` of its volume.
///
/// Worker volumes scale with the share while team bounds are kept. Equipment
/// and zones are needed by every stage; materials and construction objects
/// stay on the last stage only.
fn stage_unit(
    unit: &WorkUnit,
    id: Id,
    stage: usize,
    share: f64,
    last: bool,
) -> Result<WorkUnit, GraphError> {
    let mut requirements = Vec::with_capacity(unit.requirements().len());
    for req in unit.requirements() {
        match req {
            Requirement::Worker(w) => requirements.push(Requirement::Worker(w.scale_volume(share)?)),
            Requirement::Equipment(_) | Requirement::Zone(_) => requirements.push(req.clone()),
            Requirement::Material(_) | Requirement::ConstructionObject(_) if last => {
                requirements.push(req.clone())
            }
            Requirement::Material(_) | Requirement::ConstructionObject(_) => {}
        }
    }
    let name = if last {
        unit.name().to_string()
    } else {
        format!("{}{STAGE_SEP}{stage}", unit.name())
    };
    let staged = WorkUnit::new(id, name)
        .with_display_name(unit.display_name())
        .with_description(unit.description())
        .with_group(unit.group())
        .with_priority(unit.priority())
        .with_volume_type(unit.volume_type())
        .with_requirements(requirements)
        .with_volume(unit.volume() * share)?;
    Ok(staged)
}

/// Cuts `unit` into inseparable stages at every distinct cut point and
/// records where each cutting relation attaches.
fn cut_into_stages(
    unit: &WorkUnit,
    cuts: &[Cut<'_>],
    builder: &mut WorkGraphBuilder,
    anchors: &mut Anchors,
) -> Result<(), GraphError> {
    let id = unit.id();
    let mut points: Vec<f64> = Vec::new();
    let mut boundaries = Vec::with_capacity(cuts.len());
    for cut in cuts {
        if points
            .last()
            .map_or(true, |p| p.total_cmp(&cut.at) != Ordering::Equal)
        {
            points.push(cut.at);
        }
        boundaries.push(points.len() - 1);
    }

    let stage_ids: Vec<Id> = (0..points.len())
        .map(|i| stage_id(id, i))
        .chain(std::iter::once(id.to_string()))
        .collect();
    let mut from = 0.0;
    for (i, sid) in stage_ids.iter().enumerate() {
        let last = i == points.len();
        let to = if last { 1.0 } else { points[i] };
        builder.add_unit(stage_unit(unit, sid.clone(), i, to - from, last)?)?;
        if i > 0 {
            builder.add_edge(&stage_ids[i - 1], sid, GraphEdge::inseparable())?;
        }
        from = to;
    }
    anchors.first.insert(id.to_string(), stage_ids[0].clone());

    for (cut, &boundary) in cuts.iter().zip(&boundaries) {
        if cut.incoming {
            let key = (cut.other.to_string(), id.to_string());
            anchors.heads.insert(key, stage_ids[boundary + 1].clone());
        } else {
            let key = (id.to_string(), cut.other.to_string());
            anchors.tails.insert(key, stage_ids[boundary].clone());
        }
    }
    debug!(work = id, stages = stage_ids.len(), "Cut work into stages");
    Ok(())
}

/// Finish-start (or start-finish) edges replacing `parent` → `child`.
fn rewire<'a>(
    anchors: &'a Anchors,
    parent: &'a str,
    child: &'a str,
    edge: GraphEdge,
    use_lag: bool,
) -> Vec<(&'a str, &'a str, GraphEdge)> {
    let fs = GraphEdge::finish_start();
    match edge.kind {
        EdgeType::FinishStart | EdgeType::InseparableFinishStart => {
            vec![(parent, anchors.first(child), edge)]
        }
        EdgeType::LagFinishStart if use_lag => vec![
            (anchors.tail(parent, child), anchors.first(child), fs),
            (parent, anchors.head(parent, child), fs),
        ],
        EdgeType::LagFinishStart => vec![(
            parent,
            anchors.first(child),
            GraphEdge::new(edge.lag, EdgeType::FinishStart),
        )],
        EdgeType::StartStart => vec![(anchors.tail(parent, child), anchors.first(child), fs)],
        EdgeType::FinishFinish => vec![(parent, anchors.head(parent, child), fs)],
        EdgeType::StartFinish => vec![(anchors.first(parent), child, edge)],
    }
}

/// Rebuilds `wg` so that every relation is a finish-start edge.
///
/// A work touched by start-start or finish-finish relations (and, with
/// `use_lag_optimization`, lagged finish-start ones) is cut into stages
/// linked by inseparable edges. Stage `i` is named `<id>_stage_<i>` and the
/// last stage keeps the original id, so untouched relations still point at
/// the right work. Stage volumes split the work's volume:
///
/// - without lag optimization, start-start cuts at 0 and finish-finish at 1,
///   so the successor waits for the start or the finish of the predecessor
/// - with it, a lag `l` cuts at `l / volume` of the predecessor, letting the
///   successor overlap the remainder
///
/// Start-finish edges are kept between the first stage of the predecessor
/// and the last stage of the successor.
///
/// # Errors
///
/// Any structural error of the rebuilt graph, or a stage requirement that
/// cannot be scaled.
pub fn restructure(wg: &WorkGraph, use_lag_optimization: bool) -> Result<WorkGraph, GraphError> {
    let mut builder = WorkGraphBuilder::new();
    let mut anchors = Anchors::default();
    let mut cut_works = 0;

    for id in wg.topo_order()? {
        let unit = wg
            .unit(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let cuts = if unit.is_service_unit() {
            Vec::new()
        } else {
            cuts_of(wg, id, use_lag_optimization)?
        };
        if cuts.is_empty() {
            builder.add_unit(unit.clone())?;
        } else {
            cut_into_stages(unit, &cuts, &mut builder, &mut anchors)?;
            cut_works += 1;
        }

        for (parent, edge) in wg.parents(id)? {
            for (from, to, e) in rewire(&anchors, parent, id, edge, use_lag_optimization) {
                builder.add_edge(from, to, e)?;
            }
        }
    }

    debug!(
        works = wg.len(),
        cut_works,
        use_lag_optimization,
        "Restructured work graph"
    );
    builder.build_with_sentinels(wg.start_id(), wg.finish_id())
}
