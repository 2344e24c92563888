use dsviz_api_core::{
    parse_response, EdgeSemantics, EngineReply, EngineResponse, EntityStatus, GraphEdge, Metric,
    Outcome, Snapshot, StepRecord, StructureKind,
};

fn ok(name: &str) -> EngineResponse {
    let text = dsviz_test_fixtures::responses::text(name).expect("fixture text");
    match parse_response(&text).expect("fixture parses") {
        EngineReply::Ok(response) => response,
        EngineReply::Error { reason, .. } => panic!("{name}: unexpected error reply: {reason}"),
    }
}

#[test]
fn every_recorded_response_parses() {
    for key in dsviz_test_fixtures::responses::keys() {
        let text = dsviz_test_fixtures::responses::text(&key).unwrap();
        parse_response(&text).unwrap_or_else(|e| panic!("{key}: {e}"));
    }
}

#[test]
fn avl_rotation_response_keeps_narrative_steps() {
    let r = ok("avl-insert-rotation");
    assert_eq!(r.kind, StructureKind::Tree);
    assert_eq!(r.value, Some(30));
    let Snapshot::Tree(tree) = &r.snapshot else {
        panic!("expected tree snapshot");
    };
    assert_eq!(tree.in_order_keys(), vec![10, 20, 30]);
    assert_eq!(tree.root.as_ref().map(|n| n.key), Some(20));
    assert_eq!(r.steps.len(), 3);
    assert_eq!(
        r.steps[2].text(),
        Some("Unbalance at 10. RR Case: Left Rotation.")
    );
}

#[test]
fn legacy_null_tree_marker_is_empty_tree() {
    let r = ok("avl-delete-to-empty");
    assert!(r.snapshot.is_empty());
}

#[test]
fn bfs_interleaves_text_and_records() {
    let r = ok("graph-bfs");
    assert!(r.vertex_count_inferred);
    let Snapshot::Graph(graph) = &r.snapshot else {
        panic!("expected graph snapshot");
    };
    assert_eq!(graph.vertex_count, 4);
    assert!(matches!(r.steps[0], StepRecord::Note { .. }));
    assert!(matches!(r.steps[1], StepRecord::VisitStart { vertex: 0, .. }));
    let enqueued: Vec<(u32, u32)> = r
        .steps
        .iter()
        .filter_map(|s| match s {
            StepRecord::Enqueue { edge, .. } => *edge,
            _ => None,
        })
        .collect();
    assert_eq!(enqueued, vec![(0, 2), (0, 1), (1, 3)]);
}

#[test]
fn dfs_status_key_alias_is_accepted() {
    let r = ok("graph-dfs");
    let marks: Vec<EntityStatus> = r
        .steps
        .iter()
        .flat_map(|s| s.marks().iter().map(|m| m.status))
        .collect();
    assert!(marks.contains(&EntityStatus::Pending));
    assert!(marks.contains(&EntityStatus::Finalized));
    assert!(matches!(r.steps.last(), Some(StepRecord::Pop { vertex: 0, .. })));
}

#[test]
fn dijkstra_final_result_is_terminal() {
    let r = ok("graph-dijkstra");
    let last = r.steps.last().unwrap();
    assert!(last.is_terminal());
    let StepRecord::FinalResult(result) = last else {
        unreachable!()
    };
    assert_eq!(
        result.final_dist.as_deref(),
        Some(&[Metric::Finite(0), Metric::Finite(3), Metric::Finite(1), Metric::Finite(8)][..])
    );
    let (edges, semantics) = result.edges().unwrap();
    assert_eq!(semantics, EdgeSemantics::Directed);
    assert!(edges.contains(&GraphEdge::new(2, 1, 2)));
    let first = r.steps[1].metrics().unwrap();
    assert_eq!(first[1], Metric::Infinite);
}

#[test]
fn prims_reports_cost_and_vertex_count() {
    let r = ok("graph-prims");
    assert!(!r.vertex_count_inferred);
    let StepRecord::FinalResult(result) = r.steps.last().unwrap() else {
        panic!("expected final_result");
    };
    assert_eq!(result.final_cost, Some(2));
    assert_eq!(result.edges().map(|(_, s)| s), Some(EdgeSemantics::Undirected));
}

#[test]
fn hash_outcome_is_structured_when_present() {
    assert_eq!(ok("hash-search-found").outcome, Some(Outcome::Found));
    assert_eq!(ok("hash-search-missing").outcome, None);
    let probes = ok("hash-search-found")
        .steps
        .iter()
        .filter(|s| matches!(s, StepRecord::Probe { .. }))
        .count();
    assert_eq!(probes, 2);
}

#[test]
fn error_replies_carry_reason() {
    let text = dsviz_test_fixtures::responses::text("heap-full").unwrap();
    assert_eq!(
        parse_response(&text).unwrap(),
        EngineReply::Error {
            kind: Some(StructureKind::Heap),
            reason: "Error: Heap is full.".into()
        }
    );
    let text = dsviz_test_fixtures::responses::text("graph-invalid-start").unwrap();
    assert!(matches!(
        parse_response(&text).unwrap(),
        EngineReply::Error { reason, .. } if reason.contains("Invalid start vertex")
    ));
}
