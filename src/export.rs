//! Snapshot export: hand graph and walker state to a renderer.
//!
//! Two formats:
//!
//! ```text
//! DynamicGraph → snapshot() → GraphSnapshot → export_json()        → JSON document
//!              → export_cypher_dump()                              → CREATE/MATCH statements
//! ```
//!
//! The Cypher script can be pasted into Neo4j Browser to inspect one frame
//! of a simulation with a real graph tool.

use std::io::Write;

use crate::graph::DynamicGraph;
use crate::model::{GraphSnapshot, NodeSnapshot, WalkerSnapshot};
use crate::walker::BiasedWalker;
use crate::Result;

/// Label given to every exported node.
pub const NODE_LABEL: &str = "Node";

/// Relationship type given to every exported edge.
pub const EDGE_TYPE: &str = "LINKED";

/// Copy the graph's current state into a serializable record.
pub fn snapshot(graph: &DynamicGraph) -> GraphSnapshot {
    let partition = graph.components();
    let nodes = graph
        .nodes()
        .map(|(id, data)| NodeSnapshot {
            id,
            activity: data.activity,
            birth_step: data.birth_step,
            degree: graph.degree(id),
            component: partition.component_of(id).unwrap_or_default(),
        })
        .collect();
    GraphSnapshot {
        time_step: graph.time_step(),
        strategy: graph.strategy_kind().to_string(),
        nodes,
        edges: graph.edges(),
        component_sizes: partition.sizes(),
    }
}

pub fn walker_snapshot(walker: &BiasedWalker) -> WalkerSnapshot {
    WalkerSnapshot {
        current: walker.current(),
        history: walker.history().collect(),
        visit_counts: walker.visit_counts(),
    }
}

/// Write the graph snapshot as pretty-printed JSON.
pub fn export_json<W: Write>(graph: &DynamicGraph, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &snapshot(graph))?;
    Ok(())
}

/// Export the graph as a Cypher DUMP script.
///
/// Nodes become `CREATE` statements carrying `_id`, `activity` and
/// `birth_step`; each undirected edge is written once, lower id first.
pub fn export_cypher_dump(graph: &DynamicGraph, writer: &mut dyn Write) -> Result<()> {
    // Header
    writeln!(writer, "// dynamic-walker Cypher DUMP")?;
    writeln!(writer, "// Strategy: {}", graph.strategy_kind())?;
    writeln!(writer, "// Time step: {}", graph.time_step())?;
    writeln!(writer, "// Nodes: {}", graph.node_count())?;
    writeln!(writer, "// Edges: {}", graph.edge_count())?;
    writeln!(writer)?;

    for (id, data) in graph.nodes() {
        writeln!(
            writer,
            "CREATE (:{} {{_id: {}, activity: {}, birth_step: {}}});",
            NODE_LABEL,
            id,
            format_float(data.activity),
            data.birth_step,
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Edges")?;

    for edge in graph.edges() {
        writeln!(
            writer,
            "MATCH (a {{_id: {}}}), (b {{_id: {}}}) CREATE (a)-[:{} {{weight: {}}}]->(b);",
            edge.u,
            edge.v,
            EDGE_TYPE,
            format_float(edge.weight),
        )?;
    }
    Ok(())
}

/// Cypher float literal; always carries a decimal point.
fn format_float(value: f64) -> String {
    format!("{value:?}")
}
