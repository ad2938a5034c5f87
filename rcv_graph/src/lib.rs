/*!
Round-by-round vote transfer graphs for ranked-choice elections.

The input is the round summary written by the usual tabulators (see
[manual]). It is loaded into a candidate registry and a list of round
events, then expanded into a [Graph]: one node per candidate still running
in a round, and links that carry the votes from one round to the next.

From a graph:
* [Graph::summarize] computes the per-round and per-candidate aggregates
* the [tabular] views present these aggregates for display
* [sankey::SankeyData] flattens the graph for a Sankey renderer

```
let doc = r#"{
  "config": {"contest": "Mayor"},
  "results": [
    {"round": 1, "tally": {"A": "100", "B": "80", "C": "20"},
     "tallyResults": [{"eliminated": "C", "transfers": {"A": "15", "B": "5"}}]},
    {"round": 2, "tally": {"A": "115", "B": "85"},
     "tallyResults": [{"elected": "A", "transfers": {}}]}
  ]
}"#;
let graph = rcv_graph::make_graph(doc)?;
assert_eq!(graph.nodes().len(), 5);
assert_eq!(graph.links().len(), 4);
# Ok::<(), rcv_graph::ResultsError>(())
```
*/

pub mod builder;
pub mod format;
pub mod graph;
pub mod loader;
pub mod manual;
pub mod model;
pub mod palette;
pub mod sankey;
pub mod summary;
pub mod tabular;

use log::debug;

pub use crate::graph::{ElectionRecord, Graph, Link, Node, NodeId};
pub use crate::model::*;
pub use crate::summary::{CandidateSummary, RoundSummary, Summary};

/// Loads a results document and builds its graph.
pub fn make_graph(contents: &str) -> ResultsResult<Graph> {
    debug!("make_graph: {} bytes", contents.len());
    let results = loader::parse_results(contents)?;
    Graph::build(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_from_text() {
        let doc = r#"{
            "config": {"contest": "Council"},
            "results": [
                {"tally": {"A": "6", "B": "4", "Z": "0"},
                 "tallyResults": [{"eliminated": "Z"}]},
                {"tally": {"A": "6", "B": "4"},
                 "tallyResults": [{"elected": "A"}]}
            ]
        }"#;
        let g = make_graph(doc).unwrap();
        assert_eq!(g.title(), "Council");
        assert_eq!(g.num_rounds(), 2);
        assert_eq!(g.nodes_in_round(1).len(), 2);
        assert_eq!(g.links().len(), 2);
    }

    #[test]
    fn errors_are_propagated() {
        assert!(matches!(
            make_graph(r#"{"config": {"contest": "x"}, "results": []}"#),
            Err(ResultsError::MissingRoundData { .. })
        ));
        assert!(matches!(
            make_graph("[1, 2"),
            Err(ResultsError::ParsingJson { .. })
        ));
    }
}
