// ********* Input data structures ***********

use serde::Serialize;
use snafu::prelude::*;

/// Index of a round, starting at 0. Displayed to users starting at 1.
pub type RoundId = usize;

/// The key of a candidate in the registry of an election.
///
/// Nodes, links and summaries only refer to candidates through this id. The
/// [Candidate] itself is looked up in the registry.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize)]
pub struct CandidateId(pub(crate) u32);

impl CandidateId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A candidate (or a pseudo-candidate such as the undeclared votes).
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct Candidate {
    pub name: String,
    /// Hex color used for charting, for example `#cc3333`.
    pub color: String,
}

/// A candidate removed at the end of a round, with the votes that went to
/// each of the remaining candidates.
///
/// The exhausted votes are not part of the transfers. An empty list of
/// transfers is valid: it happens for zero-vote eliminations.
#[derive(PartialEq, Debug, Clone)]
pub struct Elimination {
    pub candidate: CandidateId,
    pub transfers: Vec<(CandidateId, f64)>,
}

impl Elimination {
    /// The number of votes this elimination sends to the given candidate.
    pub fn transferred_to(&self, cid: CandidateId) -> f64 {
        self.transfers
            .iter()
            .filter(|(to, _)| *to == cid)
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn total_transferred(&self) -> f64 {
        self.transfers.iter().map(|(_, count)| *count).sum()
    }
}

/// What happened at the end of one round.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RoundEvents {
    pub eliminations: Vec<Elimination>,
    pub winners: Vec<CandidateId>,
}

/// The content of a results document, once checked.
///
/// Invariant: `candidates` and `initial_counts` have the same length and the
/// position in these vectors is the [CandidateId].
#[derive(PartialEq, Debug, Clone)]
pub struct LoadedResults {
    pub title: String,
    pub candidates: Vec<Candidate>,
    pub initial_counts: Vec<f64>,
    /// One entry per round, never empty.
    pub rounds: Vec<RoundEvents>,
}

impl LoadedResults {
    pub fn candidate(&self, cid: CandidateId) -> &Candidate {
        &self.candidates[cid.index()]
    }

    pub fn candidate_id(&self, name: &str) -> Option<CandidateId> {
        self.candidates
            .iter()
            .position(|c| c.name == name)
            .map(|idx| CandidateId(idx as u32))
    }

    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }
}

// ******** Errors *********

/// Errors that prevent a results document from being turned into a graph.
///
/// None of them is retried: the caller is expected to report them, for
/// instance by rejecting an upload.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResultsError {
    #[snafu(display("The results document is not valid JSON: {source}"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(display("Malformed results document: {detail}"))]
    MalformedInput { detail: String },

    #[snafu(display("Missing or inconsistent data in round {}: {detail}", round + 1))]
    MissingRoundData { round: RoundId, detail: String },
}

pub type ResultsResult<T> = Result<T, ResultsError>;
