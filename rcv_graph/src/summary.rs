use serde::Serialize;
use std::collections::BTreeMap;

use crate::graph::*;
use crate::model::*;

/// One round of the summary.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub round_i: RoundId,
    /// Names marked as elected in this round.
    pub winner_names: Vec<String>,
    /// Names eliminated at the end of this round.
    pub eliminated_names: Vec<String>,
    /// Sum of the counts of all the nodes of this round.
    pub total_active_votes: f64,
}

/// The votes of one candidate across the rounds in which it has a node.
///
/// The series stop at elimination, they are not padded.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub id: CandidateId,
    pub name: String,
    pub total_votes_per_round: Vec<f64>,
    /// The first value, then the difference with the previous round.
    pub votes_added_per_round: Vec<f64>,
}

/// Aggregates over all the rounds of a graph.
#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    pub rounds: Vec<RoundSummary>,
    /// In registry order.
    pub candidates: Vec<CandidateSummary>,
    pub links_by_target_node: BTreeMap<NodeId, Vec<Link>>,
}

impl Summary {
    pub fn candidate(&self, cid: CandidateId) -> &CandidateSummary {
        match self.candidates.iter().find(|c| c.id == cid) {
            Some(c) => c,
            None => panic!("candidate {:?} is not in the summary", cid),
        }
    }

    /// The links arriving at a node, in creation order. Empty for the first
    /// round.
    pub fn incoming_links(&self, nid: NodeId) -> &[Link] {
        self.links_by_target_node
            .get(&nid)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl Graph {
    /// Computes the summary of the graph.
    ///
    /// Nothing is cached: every call walks the rounds and the links again.
    pub fn summarize(&self) -> Summary {
        let results = self.results();

        let mut totals: Vec<Vec<f64>> = vec![Vec::new(); self.candidates().len()];
        let mut rounds: Vec<RoundSummary> = Vec::new();
        for round_i in 0..self.num_rounds() {
            let mut total_active_votes = 0.0;
            for (cid, nid) in self.nodes_in_round(round_i).iter() {
                let count = self.node(*nid).count;
                total_active_votes += count;
                totals[cid.index()].push(count);
            }
            let events = &results.rounds[round_i];
            rounds.push(RoundSummary {
                round_i,
                winner_names: names_of(self, events.winners.iter().cloned()),
                eliminated_names: names_of(self, events.eliminations.iter().map(|e| e.candidate)),
                total_active_votes,
            });
        }

        let candidates: Vec<CandidateSummary> = self
            .candidate_ids()
            .zip(totals)
            .filter(|(_, series)| !series.is_empty())
            .map(|(cid, series)| CandidateSummary {
                id: cid,
                name: self.candidate(cid).name.clone(),
                votes_added_per_round: first_differences(&series),
                total_votes_per_round: series,
            })
            .collect();

        let mut links_by_target_node: BTreeMap<NodeId, Vec<Link>> = BTreeMap::new();
        for link in self.links().iter() {
            links_by_target_node
                .entry(link.target)
                .or_default()
                .push(link.clone());
        }

        Summary {
            rounds,
            candidates,
            links_by_target_node,
        }
    }
}

fn names_of(graph: &Graph, cids: impl Iterator<Item = CandidateId>) -> Vec<String> {
    cids.map(|cid| graph.candidate(cid).name.clone()).collect()
}

fn first_differences(series: &[f64]) -> Vec<f64> {
    let mut res: Vec<f64> = Vec::with_capacity(series.len());
    let mut previous = 0.0;
    for value in series.iter() {
        res.push(value - previous);
        previous = *value;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ResultsBuilder;

    fn tally(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
        entries.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    // A: 40, B: 35, C: 25. C goes first, then B.
    fn three_rounds() -> Graph {
        let mut builder = ResultsBuilder::new("Council")
            .candidates(&tally(&[("A", 40.0), ("B", 35.0), ("C", 25.0)]))
            .unwrap();
        builder.add_round();
        builder
            .eliminate("C", &tally(&[("A", 10.0), ("B", 12.0), ("exhausted", 3.0)]))
            .unwrap();
        builder.add_round();
        builder
            .eliminate("B", &tally(&[("A", 30.5), ("exhausted", 16.5)]))
            .unwrap();
        builder.add_round();
        builder.elect("A").unwrap();
        Graph::build(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn rounds_list_winners_eliminated_and_totals() {
        let s = three_rounds().summarize();
        assert_eq!(s.rounds.len(), 3);
        assert_eq!(s.rounds[0].eliminated_names, vec!["C".to_string()]);
        assert_eq!(s.rounds[1].eliminated_names, vec!["B".to_string()]);
        assert!(s.rounds[1].winner_names.is_empty());
        assert_eq!(s.rounds[2].winner_names, vec!["A".to_string()]);
        assert_eq!(s.rounds[0].total_active_votes, 100.0);
        assert_eq!(s.rounds[1].total_active_votes, 97.0);
        assert_eq!(s.rounds[2].total_active_votes, 80.5);
    }

    #[test]
    fn candidate_series_stop_at_elimination() {
        let s = three_rounds().summarize();
        let names: Vec<&str> = s.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(s.candidates[0].total_votes_per_round, vec![40.0, 50.0, 80.5]);
        assert_eq!(s.candidates[0].votes_added_per_round, vec![40.0, 10.0, 30.5]);
        assert_eq!(s.candidates[1].total_votes_per_round, vec![35.0, 47.0]);
        assert_eq!(s.candidates[2].total_votes_per_round, vec![25.0]);
        assert_eq!(s.candidates[2].votes_added_per_round, vec![25.0]);
    }

    #[test]
    fn votes_added_are_first_differences() {
        let s = three_rounds().summarize();
        for c in s.candidates.iter() {
            assert_eq!(c.votes_added_per_round[0], c.total_votes_per_round[0]);
            for i in 1..c.total_votes_per_round.len() {
                assert_eq!(
                    c.votes_added_per_round[i],
                    c.total_votes_per_round[i] - c.total_votes_per_round[i - 1]
                );
            }
        }
    }

    #[test]
    fn incoming_links_are_indexed_by_target() {
        let g = three_rounds();
        let s = g.summarize();
        let a_round_1 = g.nodes_in_round(1).get(CandidateId(0)).unwrap();
        let sources: Vec<usize> = s
            .incoming_links(a_round_1)
            .iter()
            .map(|l| l.source.index())
            .collect();
        // The passthrough from A first, then the transfer from C.
        assert_eq!(sources, vec![0, 2]);
        let a_round_0 = g.nodes_in_round(0).get(CandidateId(0)).unwrap();
        assert!(s.incoming_links(a_round_0).is_empty());
    }

    #[test]
    fn summarize_is_idempotent() {
        let g = three_rounds();
        assert_eq!(g.summarize(), g.summarize());
    }
}
