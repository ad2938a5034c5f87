use log::debug;
use snafu::prelude::*;

pub use crate::model::*;
use crate::palette::{assign_palette, UNDECLARED_COLOR};

/// The name of the pseudo-candidate holding the undeclared votes.
pub const UNDECLARED: &str = "Undeclared";

/// The transfer target for ballots that have no choice left.
pub const EXHAUSTED: &str = "exhausted";

/// A builder for election results, round after round.
///
/// It applies the same checks as the JSON loader and is the simplest way to
/// produce results from another source.
///
/// ```
/// use rcv_graph::builder::ResultsBuilder;
/// # use rcv_graph::ResultsError;
///
/// let mut builder = ResultsBuilder::new("Mayor")
///     .candidates(&[("Anna".to_string(), 100.0), ("Bob".to_string(), 80.0), ("Clara".to_string(), 20.0)])?;
///
/// builder.add_round();
/// builder.eliminate("Clara", &[("Anna".to_string(), 15.0), ("Bob".to_string(), 5.0)])?;
/// builder.add_round();
/// builder.elect("Anna")?;
///
/// let results = builder.build()?;
/// assert_eq!(results.num_rounds(), 2);
/// # Ok::<(), ResultsError>(())
/// ```
pub struct ResultsBuilder {
    pub(crate) _title: String,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _initial_counts: Vec<f64>,
    pub(crate) _rounds: Vec<RoundEvents>,
}

impl ResultsBuilder {
    pub fn new(title: &str) -> ResultsBuilder {
        ResultsBuilder {
            _title: title.to_string(),
            _candidates: Vec::new(),
            _initial_counts: Vec::new(),
            _rounds: Vec::new(),
        }
    }

    /// Registers the candidates with their first-round tally, in order.
    ///
    /// Colors are assigned from the palette in the same order.
    pub fn candidates(self, tally: &[(String, f64)]) -> ResultsResult<ResultsBuilder> {
        let colors = assign_palette(tally.len());
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut initial_counts: Vec<f64> = Vec::new();
        for ((name, count), color) in tally.iter().zip(colors) {
            ensure!(
                !candidates.iter().any(|c: &Candidate| c.name == *name),
                MalformedInputSnafu {
                    detail: format!("candidate {:?} appears twice in the tally", name),
                }
            );
            ensure!(
                count.is_finite() && *count >= 0.0,
                MalformedInputSnafu {
                    detail: format!("invalid vote count {} for {:?}", count, name),
                }
            );
            candidates.push(Candidate {
                name: name.clone(),
                color,
            });
            initial_counts.push(*count);
        }
        Ok(ResultsBuilder {
            _title: self._title,
            _candidates: candidates,
            _initial_counts: initial_counts,
            _rounds: Vec::new(),
        })
    }

    /// Adds the pseudo-candidate for the undeclared votes.
    ///
    /// Nothing is added if a candidate already uses that name.
    pub fn undeclared(&mut self, count: f64) -> ResultsResult<()> {
        if self.find(UNDECLARED).is_some() {
            debug!("undeclared: already registered through the tally");
            return Ok(());
        }
        ensure!(
            count.is_finite() && count >= 0.0,
            MalformedInputSnafu {
                detail: format!("invalid undeclared vote count {}", count),
            }
        );
        self._candidates.push(Candidate {
            name: UNDECLARED.to_string(),
            color: UNDECLARED_COLOR.to_string(),
        });
        self._initial_counts.push(count);
        Ok(())
    }

    /// Starts a new round and returns its index.
    pub fn add_round(&mut self) -> RoundId {
        self._rounds.push(RoundEvents::default());
        self._rounds.len() - 1
    }

    /// Eliminates a candidate in the current round.
    ///
    /// Transfers to [EXHAUSTED] are dropped: exhausted ballots do not go to
    /// any candidate.
    pub fn eliminate(&mut self, name: &str, transfers: &[(String, f64)]) -> ResultsResult<()> {
        let round = self.current_round()?;
        let candidate = self.find(name).context(MissingRoundDataSnafu {
            round,
            detail: format!("eliminated candidate {:?} is not in the first-round tally", name),
        })?;
        let mut resolved: Vec<(CandidateId, f64)> = Vec::new();
        for (to_name, count) in transfers.iter() {
            if to_name == EXHAUSTED {
                debug!(
                    "eliminate: round {}: dropping {} exhausted votes from {}",
                    round, count, name
                );
                continue;
            }
            let to = self.find(to_name).context(MalformedInputSnafu {
                detail: format!(
                    "round {}: transfer from {:?} to unknown candidate {:?}",
                    round + 1,
                    name,
                    to_name
                ),
            })?;
            ensure!(
                count.is_finite() && *count >= 0.0,
                MalformedInputSnafu {
                    detail: format!(
                        "round {}: invalid transfer of {} votes from {:?} to {:?}",
                        round + 1,
                        count,
                        name,
                        to_name
                    ),
                }
            );
            resolved.push((to, *count));
        }
        self._rounds[round].eliminations.push(Elimination {
            candidate,
            transfers: resolved,
        });
        Ok(())
    }

    /// Marks a candidate as elected in the current round.
    pub fn elect(&mut self, name: &str) -> ResultsResult<()> {
        let round = self.current_round()?;
        let candidate = self.find(name).context(MissingRoundDataSnafu {
            round,
            detail: format!("elected candidate {:?} is not in the first-round tally", name),
        })?;
        let winners = &mut self._rounds[round].winners;
        if !winners.contains(&candidate) {
            winners.push(candidate);
        }
        Ok(())
    }

    pub fn build(self) -> ResultsResult<LoadedResults> {
        ensure!(
            !self._rounds.is_empty(),
            MissingRoundDataSnafu {
                round: 0_usize,
                detail: "the results contain no round",
            }
        );
        ensure!(
            !self._candidates.is_empty(),
            MalformedInputSnafu {
                detail: "the first-round tally has no candidate",
            }
        );
        Ok(LoadedResults {
            title: self._title,
            candidates: self._candidates,
            initial_counts: self._initial_counts,
            rounds: self._rounds,
        })
    }

    fn find(&self, name: &str) -> Option<CandidateId> {
        self._candidates
            .iter()
            .position(|c| c.name == name)
            .map(|idx| CandidateId(idx as u32))
    }

    fn current_round(&self) -> ResultsResult<RoundId> {
        ensure!(
            !self._rounds.is_empty(),
            MissingRoundDataSnafu {
                round: 0_usize,
                detail: "an event was added before the first round",
            }
        );
        Ok(self._rounds.len() - 1)
    }
}
