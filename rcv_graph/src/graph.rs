use log::{debug, info, warn};
use serde::Serialize;
use snafu::prelude::*;
use std::collections::HashSet;

use crate::model::*;

/// The position of a node in the graph, assigned in creation order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The votes of one candidate in one round.
#[derive(PartialEq, Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub candidate: CandidateId,
    pub round: RoundId,
    pub count: f64,
}

/// Votes flowing from a node to a node of the next round.
///
/// A link between two nodes of the same candidate is a passthrough, any
/// other link is a transfer from an eliminated candidate.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
}

/// The nodes created for one round, in creation order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RoundNodes {
    nodes: Vec<(CandidateId, NodeId)>,
}

impl RoundNodes {
    pub fn get(&self, cid: CandidateId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(c, _)| *c == cid)
            .map(|(_, nid)| *nid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(CandidateId, NodeId)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, cid: CandidateId, nid: NodeId) {
        self.nodes.push((cid, nid));
    }
}

// Nodes and links only grow while the rounds are processed.
#[derive(PartialEq, Debug, Clone, Default)]
struct Flow {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Flow {
    fn add_node(&mut self, candidate: CandidateId, round: RoundId, count: f64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            candidate,
            round,
            count,
        });
        id
    }

    fn add_link(&mut self, source: NodeId, target: NodeId, value: f64) {
        self.links.push(Link {
            source,
            target,
            value,
        });
    }

    fn count(&self, nid: NodeId) -> f64 {
        self.nodes[nid.index()].count
    }
}

/// What gets stored next to an uploaded results file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ElectionRecord {
    pub title: String,
    pub num_rounds: usize,
    pub num_candidates: usize,
}

/// The flow of votes between candidates, round after round.
#[derive(PartialEq, Debug, Clone)]
pub struct Graph {
    results: LoadedResults,
    flow: Flow,
    nodes_per_round: Vec<RoundNodes>,
}

impl Graph {
    /// Builds all the rounds, in order.
    ///
    /// Round 0 has one node per candidate of the registry. Each following
    /// round is derived from the previous one and from the eliminations that
    /// closed it.
    pub fn build(results: LoadedResults) -> ResultsResult<Graph> {
        let mut flow = Flow::default();
        let mut nodes_per_round: Vec<RoundNodes> = vec![initial_round(&mut flow, &results)];

        for round in 1..results.num_rounds() {
            let next = run_step(
                &mut flow,
                &results,
                &nodes_per_round[round - 1],
                &results.rounds[round - 1].eliminations,
                round,
            )?;
            debug!("build: round {}: {} nodes", round, next.len());
            nodes_per_round.push(next);
        }

        if let Some(last) = results.rounds.last() {
            if !last.eliminations.is_empty() {
                warn!(
                    "build: {} eliminations in the final round have no following round",
                    last.eliminations.len()
                );
            }
        }

        info!(
            "build: {:?}: {} nodes, {} links over {} rounds",
            results.title,
            flow.nodes.len(),
            flow.links.len(),
            nodes_per_round.len()
        );
        Ok(Graph {
            results,
            flow,
            nodes_per_round,
        })
    }

    pub fn title(&self) -> &str {
        &self.results.title
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.results.candidates
    }

    pub fn candidate(&self, cid: CandidateId) -> &Candidate {
        self.results.candidate(cid)
    }

    pub fn candidate_ids(&self) -> impl Iterator<Item = CandidateId> + '_ {
        (0..self.results.candidates.len()).map(|idx| CandidateId(idx as u32))
    }

    pub fn results(&self) -> &LoadedResults {
        &self.results
    }

    /// All the nodes, in creation order. The position of a node is its id.
    pub fn nodes(&self) -> &[Node] {
        &self.flow.nodes
    }

    pub fn node(&self, nid: NodeId) -> &Node {
        &self.flow.nodes[nid.index()]
    }

    /// All the links, in creation order.
    pub fn links(&self) -> &[Link] {
        &self.flow.links
    }

    pub fn num_rounds(&self) -> usize {
        self.nodes_per_round.len()
    }

    pub fn nodes_in_round(&self, round: RoundId) -> &RoundNodes {
        &self.nodes_per_round[round]
    }

    /// Every candidate elected in any round, in the order of election.
    pub fn winners_so_far(&self) -> Vec<CandidateId> {
        let mut res: Vec<CandidateId> = Vec::new();
        for round in self.results.rounds.iter() {
            for cid in round.winners.iter() {
                if !res.contains(cid) {
                    res.push(*cid);
                }
            }
        }
        res
    }

    pub fn election_record(&self) -> ElectionRecord {
        let summary = self.summarize();
        ElectionRecord {
            title: self.title().to_string(),
            num_rounds: summary.rounds.len(),
            num_candidates: summary.candidates.len(),
        }
    }
}

fn initial_round(flow: &mut Flow, results: &LoadedResults) -> RoundNodes {
    let mut nodes = RoundNodes::default();
    for (idx, count) in results.initial_counts.iter().enumerate() {
        let cid = CandidateId(idx as u32);
        nodes.push(cid, flow.add_node(cid, 0, *count));
    }
    nodes
}

/// Creates the nodes of `round` from the nodes of the previous round and the
/// eliminations that closed it.
///
/// The passthrough link of a candidate carries its previous count only; the
/// votes it gains are carried by the transfer links.
fn run_step(
    flow: &mut Flow,
    results: &LoadedResults,
    previous: &RoundNodes,
    eliminations: &[Elimination],
    round: RoundId,
) -> ResultsResult<RoundNodes> {
    let mut eliminated: HashSet<CandidateId> = HashSet::new();
    for e in eliminations.iter() {
        let name = &results.candidate(e.candidate).name;
        ensure!(
            previous.get(e.candidate).is_some(),
            MissingRoundDataSnafu {
                round: round - 1,
                detail: format!("{:?} is eliminated but is not running anymore", name),
            }
        );
        ensure!(
            eliminated.insert(e.candidate),
            MissingRoundDataSnafu {
                round: round - 1,
                detail: format!("{:?} is eliminated twice", name),
            }
        );
    }

    let mut current = RoundNodes::default();
    for (cid, prev_nid) in previous.iter() {
        if eliminated.contains(cid) {
            continue;
        }
        let prev_count = flow.count(*prev_nid);
        let gained: f64 = eliminations.iter().map(|e| e.transferred_to(*cid)).sum();
        let nid = flow.add_node(*cid, round, prev_count + gained);
        flow.add_link(*prev_nid, nid, prev_count);
        current.push(*cid, nid);
    }

    for e in eliminations.iter() {
        let source = previous.get(e.candidate).context(MissingRoundDataSnafu {
            round: round - 1,
            detail: "eliminated candidate without a node",
        })?;
        if e.transfers.is_empty() {
            debug!(
                "run_step: round {}: {} leaves without transfers",
                round,
                results.candidate(e.candidate).name
            );
        }
        for (to, value) in e.transfers.iter() {
            let target = current.get(*to).context(MissingRoundDataSnafu {
                round: round - 1,
                detail: format!(
                    "transfer from {:?} to {:?}, who is not running in the next round",
                    results.candidate(e.candidate).name,
                    results.candidate(*to).name
                ),
            })?;
            flow.add_link(source, target, *value);
        }
    }
    Ok(current)
}
