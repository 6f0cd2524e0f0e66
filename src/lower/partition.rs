//! Stage partitioning: ordered node list → four ordered stage buckets.

use std::collections::BTreeMap;

use crate::parse::types::{PipelineNode, Stage};

/// Nodes grouped by effective stage. Always holds all four stages.
pub type StageBuckets<'a> = BTreeMap<Stage, Vec<&'a PipelineNode>>;

/// Group nodes by stage, preserving input order within each bucket.
/// Stage numbers outside 1..=4 are placed in stage 1.
pub fn partition(nodes: &[PipelineNode]) -> StageBuckets<'_> {
    let mut buckets: StageBuckets<'_> = Stage::ALL.iter().map(|&s| (s, Vec::new())).collect();

    for node in nodes {
        let stage = node.effective_stage();
        if Stage::from_number(node.stage).is_none() {
            tracing::warn!(
                node_id = %node.id,
                declared = node.stage,
                "stage out of range, running node in stage 1"
            );
        }
        buckets.entry(stage).or_default().push(node);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, stage: i64) -> PipelineNode {
        serde_json::from_value(serde_json::json!({ "id": id, "name": id, "stage": stage }))
            .unwrap()
    }

    #[test]
    fn empty_input_has_all_buckets() {
        let buckets = partition(&[]);
        assert_eq!(buckets.len(), 4);
        assert!(buckets.values().all(|b| b.is_empty()));
    }

    #[test]
    fn out_of_range_goes_to_stage_one() {
        let nodes = vec![node("a", 0), node("b", 7), node("c", 1)];
        let buckets = partition(&nodes);
        let ids: Vec<&str> = buckets[&Stage::Preprocessing]
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn order_preserved_within_bucket() {
        let nodes = vec![node("x", 3), node("a", 2), node("y", 3), node("b", 2)];
        let buckets = partition(&nodes);
        let stage2: Vec<&str> = buckets[&Stage::FeatureEngineering]
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        let stage3: Vec<&str> = buckets[&Stage::Training]
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(stage2, vec!["a", "b"]);
        assert_eq!(stage3, vec!["x", "y"]);
    }
}
