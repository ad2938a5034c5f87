// Read-only projections of a summary, ready for page templates.
//
// Field names are serialized the way the templates read them.

use serde::Serialize;
use std::collections::HashSet;

use crate::format::*;
use crate::graph::*;
use crate::model::*;
use crate::summary::*;

/// Separator between the names of a by-round row.
pub const NAME_SEPARATOR: &str = "<br/>";

/// Secondary label of a candidate who just lost all its votes.
pub const NO_CHOICES_LEFT: &str = "ballots with no choices left";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Standing {
    Active,
    Removed,
}

fn make_primary_secondary_labels(
    num_votes: f64,
    all_votes: f64,
    standing: Standing,
) -> (String, String) {
    match standing {
        Standing::Active => {
            let fraction = if all_votes > 0.0 {
                num_votes / all_votes
            } else {
                0.0
            };
            (percentify(fraction), votify(num_votes))
        }
        Standing::Removed => (intify(num_votes), NO_CHOICES_LEFT.to_string()),
    }
}

// ******** By round *********

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RoundRow {
    /// Starts at 1.
    pub round_i: usize,
    pub eliminated: String,
    pub winners: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct TabulateByRound {
    pub tabulation: Vec<RoundRow>,
}

impl TabulateByRound {
    pub fn new(graph: &Graph) -> TabulateByRound {
        let summary = graph.summarize();
        let tabulation = summary
            .rounds
            .iter()
            .map(|r| RoundRow {
                round_i: r.round_i + 1,
                eliminated: r.eliminated_names.join(NAME_SEPARATOR),
                winners: r.winner_names.join(NAME_SEPARATOR),
            })
            .collect();
        TabulateByRound { tabulation }
    }
}

// ******** By round, interactive *********

/// One candidate in one round of the interactive view.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveCell {
    pub name: String,
    pub change: String,
    pub primary_label: String,
    pub secondary_label: String,
    pub won_this_round: bool,
    pub eliminated_this_round: bool,
    /// Elected in this round or in any earlier round.
    pub is_winner: bool,
    /// Eliminated in this round or in the previous one.
    pub is_eliminated: bool,
}

/// Every candidate still in play, round by round.
///
/// A candidate eliminated in a round shows up once more in the next round,
/// losing all its votes.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct TabulateByRoundInteractive {
    pub rounds: Vec<Vec<InteractiveCell>>,
}

impl TabulateByRoundInteractive {
    pub fn new(graph: &Graph) -> TabulateByRoundInteractive {
        let summary = graph.summarize();
        let mut rounds: Vec<Vec<InteractiveCell>> = Vec::new();
        let mut last_round_eliminated: &[String] = &[];
        let mut all_previous_winners: HashSet<&str> = HashSet::new();

        for (i, r) in summary.rounds.iter().enumerate() {
            all_previous_winners.extend(r.winner_names.iter().map(|n| n.as_str()));
            let mut rnd: Vec<InteractiveCell> = Vec::new();
            for info in summary.candidates.iter() {
                let eliminated_last_round = last_round_eliminated.contains(&info.name);
                let (change, (primary_label, secondary_label)) =
                    if i < info.total_votes_per_round.len() {
                        (
                            votify_change(info.votes_added_per_round[i]),
                            make_primary_secondary_labels(
                                info.total_votes_per_round[i],
                                r.total_active_votes,
                                Standing::Active,
                            ),
                        )
                    } else if i == info.total_votes_per_round.len() && eliminated_last_round {
                        let last = info.total_votes_per_round[i - 1];
                        (
                            votify_change(-last),
                            make_primary_secondary_labels(
                                last,
                                r.total_active_votes,
                                Standing::Removed,
                            ),
                        )
                    } else {
                        continue;
                    };
                let eliminated_this_round = r.eliminated_names.contains(&info.name);
                rnd.push(InteractiveCell {
                    name: info.name.clone(),
                    change,
                    primary_label,
                    secondary_label,
                    won_this_round: r.winner_names.contains(&info.name),
                    eliminated_this_round,
                    is_winner: all_previous_winners.contains(info.name.as_str()),
                    is_eliminated: eliminated_last_round || eliminated_this_round,
                });
            }
            last_round_eliminated = &r.eliminated_names;
            rounds.push(rnd);
        }
        TabulateByRoundInteractive { rounds }
    }
}

// ******** By candidate *********

/// What the narrative of a round talks about.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum NarrativeMode {
    /// Only the events of the candidate: "Elected Gained 3 votes from C".
    #[default]
    RelevantToCandidate,
    /// All the events of the round: "A elected; C eliminated; Gained ...".
    Everything,
}

/// One round of one candidate.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTabulation {
    #[serde(rename = "round_i")]
    pub round_i: usize,
    pub primary_label: String,
    pub secondary_label: String,
    pub summary: String,
}

impl RoundTabulation {
    fn new(
        graph: &Graph,
        node: &Node,
        this_round: &RoundSummary,
        links_for_this_node: &[Link],
        mode: NarrativeMode,
    ) -> RoundTabulation {
        let (primary_label, secondary_label) = make_primary_secondary_labels(
            node.count,
            this_round.total_active_votes,
            Standing::Active,
        );

        let summary = if node.round == 0 {
            format!("{} first-round votes", intify(node.count))
        } else {
            narrative(graph, node, this_round, links_for_this_node, mode)
        };

        RoundTabulation {
            round_i: node.round + 1,
            primary_label,
            secondary_label,
            summary,
        }
    }
}

fn narrative(
    graph: &Graph,
    node: &Node,
    this_round: &RoundSummary,
    links_for_this_node: &[Link],
    mode: NarrativeMode,
) -> String {
    let transfers: Vec<String> = links_for_this_node
        .iter()
        .filter_map(|link| {
            let source = graph.node(link.source).candidate;
            // The passthrough is not a gain.
            if source == node.candidate {
                return None;
            }
            Some(format!(
                "{} {} from {}",
                intify(link.value),
                pluralize("vote", link.value),
                graph.candidate(source).name
            ))
        })
        .collect();
    let transfer_text = andify("Gained ", &transfers, "");

    match mode {
        NarrativeMode::RelevantToCandidate => {
            let name = &graph.candidate(node.candidate).name;
            let winner_text = if this_round.winner_names.contains(name) {
                "Elected "
            } else {
                ""
            };
            let eliminated_text = if this_round.eliminated_names.contains(name) {
                "Eliminated "
            } else {
                ""
            };
            format!("{}{}{}", winner_text, eliminated_text, transfer_text)
        }
        NarrativeMode::Everything => {
            let texts = [
                andify("", &this_round.winner_names, " elected"),
                andify("", &this_round.eliminated_names, " eliminated"),
                transfer_text,
            ];
            texts
                .iter()
                .filter(|t| !t.is_empty())
                .cloned()
                .collect::<Vec<String>>()
                .join("; ")
        }
    }
}

/// All the rounds of one candidate, until its elimination.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct CandidateTabulation {
    pub name: String,
    pub rounds: Vec<RoundTabulation>,
}

impl CandidateTabulation {
    fn new(
        graph: &Graph,
        summary: &Summary,
        cid: CandidateId,
        mode: NarrativeMode,
    ) -> CandidateTabulation {
        let info = summary.candidate(cid);
        let mut rounds: Vec<RoundTabulation> = Vec::new();
        for round_i in 0..info.votes_added_per_round.len() {
            let nid = match graph.nodes_in_round(round_i).get(cid) {
                Some(nid) => nid,
                None => panic!("{} has no node in round {}", info.name, round_i + 1),
            };
            rounds.push(RoundTabulation::new(
                graph,
                graph.node(nid),
                &summary.rounds[round_i],
                summary.incoming_links(nid),
                mode,
            ));
        }
        CandidateTabulation {
            name: info.name.clone(),
            rounds,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabulateByCandidate {
    pub tabulation: Vec<CandidateTabulation>,
    pub num_rounds: usize,
}

impl TabulateByCandidate {
    pub fn new(graph: &Graph, only_show_winners: bool) -> TabulateByCandidate {
        TabulateByCandidate::with_narrative(graph, only_show_winners, NarrativeMode::default())
    }

    pub fn with_narrative(
        graph: &Graph,
        only_show_winners: bool,
        mode: NarrativeMode,
    ) -> TabulateByCandidate {
        let summary = graph.summarize();
        let winners = graph.winners_so_far();
        let tabulation = summary
            .candidates
            .iter()
            .filter(|c| !only_show_winners || winners.contains(&c.id))
            .map(|c| CandidateTabulation::new(graph, &summary, c.id, mode))
            .collect();
        TabulateByCandidate {
            tabulation,
            num_rounds: summary.rounds.len(),
        }
    }
}

// ******** By candidate, by round *********

/// One candidate in one round of the grid.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRoundCell {
    pub primary_label: String,
    pub secondary_label: String,
    /// Elected in this round.
    pub is_winner: bool,
    /// Eliminated in this round.
    pub is_eliminated: bool,
}

/// A row of the grid: one cell per round, `None` after elimination.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTabulationByRound {
    pub name: String,
    pub each_round: Vec<Option<CandidateRoundCell>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularCandidateByRound {
    pub tabulation: Vec<CandidateTabulationByRound>,
    pub num_rounds: usize,
}

impl TabularCandidateByRound {
    pub fn new(graph: &Graph) -> TabularCandidateByRound {
        let summary = graph.summarize();
        let num_rounds = summary.rounds.len();
        let tabulation = summary
            .candidates
            .iter()
            .map(|info| {
                let each_round = (0..num_rounds)
                    .map(|i| {
                        let this_round = &summary.rounds[i];
                        info.total_votes_per_round.get(i).map(|&num_votes| {
                            let (primary_label, secondary_label) = make_primary_secondary_labels(
                                num_votes,
                                this_round.total_active_votes,
                                Standing::Active,
                            );
                            CandidateRoundCell {
                                primary_label,
                                secondary_label,
                                is_winner: this_round.winner_names.contains(&info.name),
                                is_eliminated: this_round.eliminated_names.contains(&info.name),
                            }
                        })
                    })
                    .collect();
                CandidateTabulationByRound {
                    name: info.name.clone(),
                    each_round,
                }
            })
            .collect();
        TabularCandidateByRound {
            tabulation,
            num_rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ResultsBuilder;
    use serde_json::json;

    fn tally(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
        entries.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    fn abc_graph() -> Graph {
        let mut builder = ResultsBuilder::new("Mayor")
            .candidates(&tally(&[("A", 100.0), ("B", 80.0), ("C", 20.0)]))
            .unwrap();
        builder.add_round();
        builder
            .eliminate("C", &tally(&[("A", 15.0), ("B", 5.0)]))
            .unwrap();
        builder.add_round();
        builder.elect("A").unwrap();
        Graph::build(builder.build().unwrap()).unwrap()
    }

    // Two candidates leave together, then D leaves and B wins.
    fn batch_graph() -> Graph {
        let mut builder = ResultsBuilder::new("Board")
            .candidates(&tally(&[
                ("A", 40.0),
                ("B", 38.0),
                ("C", 4.0),
                ("D", 10.0),
                ("E", 1.0),
            ]))
            .unwrap();
        builder.add_round();
        builder
            .eliminate("C", &tally(&[("A", 1.0), ("B", 2.0), ("D", 1.0)]))
            .unwrap();
        builder.eliminate("E", &tally(&[("A", 1.0)])).unwrap();
        builder.add_round();
        builder
            .eliminate("D", &tally(&[("B", 9.5), ("exhausted", 1.5)]))
            .unwrap();
        builder.add_round();
        builder.elect("B").unwrap();
        Graph::build(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn by_round_rows() {
        let t = TabulateByRound::new(&abc_graph());
        assert_eq!(
            t.tabulation,
            vec![
                RoundRow {
                    round_i: 1,
                    eliminated: "C".to_string(),
                    winners: "".to_string()
                },
                RoundRow {
                    round_i: 2,
                    eliminated: "".to_string(),
                    winners: "A".to_string()
                },
            ]
        );
        let batch = TabulateByRound::new(&batch_graph());
        assert_eq!(batch.tabulation[0].eliminated, "C<br/>E");
    }

    #[test]
    fn interactive_first_round() {
        let t = TabulateByRoundInteractive::new(&abc_graph());
        assert_eq!(t.rounds.len(), 2);
        assert_eq!(
            t.rounds[0][0],
            InteractiveCell {
                name: "A".to_string(),
                change: "+100 votes".to_string(),
                primary_label: "50.0%".to_string(),
                secondary_label: "100 votes".to_string(),
                won_this_round: false,
                eliminated_this_round: false,
                is_winner: false,
                is_eliminated: false,
            }
        );
        let c = &t.rounds[0][2];
        assert_eq!(c.primary_label, "10.0%");
        assert!(c.eliminated_this_round);
        assert!(c.is_eliminated);
    }

    #[test]
    fn interactive_shows_eliminated_one_more_round() {
        let t = TabulateByRoundInteractive::new(&abc_graph());
        let names: Vec<&str> = t.rounds[1].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        let c = &t.rounds[1][2];
        assert_eq!(c.change, "-20 votes");
        assert_eq!(c.primary_label, "20");
        assert_eq!(c.secondary_label, NO_CHOICES_LEFT);
        assert!(!c.eliminated_this_round);
        assert!(c.is_eliminated);

        let a = &t.rounds[1][0];
        assert_eq!(a.change, "+15 votes");
        assert_eq!(a.primary_label, "57.5%");
        assert!(a.won_this_round);
        assert!(a.is_winner);
    }

    #[test]
    fn interactive_drops_candidates_after_the_grace_round() {
        let t = TabulateByRoundInteractive::new(&batch_graph());
        let names = |i: usize| -> Vec<String> { t.rounds[i].iter().map(|c| c.name.clone()).collect() };
        assert_eq!(names(0), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(names(1), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(names(2), vec!["A", "B", "D"]);
    }

    #[test]
    fn winners_stay_winners() {
        let mut builder = ResultsBuilder::new("t")
            .candidates(&tally(&[("A", 6.0), ("B", 3.0), ("C", 1.0)]))
            .unwrap();
        builder.add_round();
        builder.elect("A").unwrap();
        builder.add_round();
        builder.eliminate("C", &tally(&[("B", 1.0)])).unwrap();
        builder.add_round();
        let g = Graph::build(builder.build().unwrap()).unwrap();
        let t = TabulateByRoundInteractive::new(&g);
        for rnd in t.rounds.iter() {
            let a = rnd.iter().find(|c| c.name == "A").unwrap();
            assert!(a.is_winner);
        }
        assert!(t.rounds[0][0].won_this_round);
        assert!(!t.rounds[1][0].won_this_round);
    }

    #[test]
    fn by_candidate_narratives() {
        let t = TabulateByCandidate::new(&batch_graph(), false);
        assert_eq!(t.num_rounds, 3);
        let a = &t.tabulation[0];
        assert_eq!(a.name, "A");
        let summaries: Vec<&str> = a.rounds.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["40 first-round votes", "Gained 1 vote from C and 1 vote from E", ""]
        );
        let b = &t.tabulation[1];
        assert_eq!(b.rounds[1].summary, "Gained 2 votes from C");
        assert_eq!(b.rounds[2].summary, "Elected Gained 9.50 votes from D");
        assert_eq!(b.rounds[2].round_i, 3);
        let d = &t.tabulation[3];
        assert_eq!(d.rounds.len(), 2);
        assert_eq!(d.rounds[1].summary, "Eliminated Gained 1 vote from C");
    }

    #[test]
    fn by_candidate_lists_three_sources() {
        let mut builder = ResultsBuilder::new("t")
            .candidates(&tally(&[("A", 9.0), ("B", 3.0), ("C", 2.0), ("D", 1.0)]))
            .unwrap();
        builder.add_round();
        builder.eliminate("B", &tally(&[("A", 3.0)])).unwrap();
        builder.eliminate("C", &tally(&[("A", 2.0)])).unwrap();
        builder.eliminate("D", &tally(&[("A", 1.0)])).unwrap();
        builder.add_round();
        let g = Graph::build(builder.build().unwrap()).unwrap();
        let t = TabulateByCandidate::new(&g, false);
        assert_eq!(
            t.tabulation[0].rounds[1].summary,
            "Gained 3 votes from B, 2 votes from C and 1 vote from D"
        );
    }

    #[test]
    fn by_candidate_everything_narrative() {
        let t = TabulateByCandidate::with_narrative(&abc_graph(), false, NarrativeMode::Everything);
        assert_eq!(t.tabulation[0].rounds[1].summary, "A elected; Gained 15 votes from C");
        assert_eq!(t.tabulation[1].rounds[1].summary, "A elected; Gained 5 votes from C");
        assert_eq!(t.tabulation[2].rounds[0].summary, "20 first-round votes");
    }

    #[test]
    fn by_candidate_only_winners() {
        let t = TabulateByCandidate::new(&abc_graph(), true);
        assert_eq!(t.tabulation.len(), 1);
        assert_eq!(t.tabulation[0].name, "A");
        assert_eq!(t.tabulation[0].rounds[1].primary_label, "57.5%");
        assert_eq!(t.tabulation[0].rounds[1].secondary_label, "115 votes");
    }

    #[test]
    fn grid_pads_with_empty_cells() {
        let t = TabularCandidateByRound::new(&abc_graph());
        assert_eq!(t.num_rounds, 2);
        let c = &t.tabulation[2];
        assert_eq!(c.name, "C");
        assert_eq!(c.each_round.len(), 2);
        assert_eq!(
            c.each_round[0],
            Some(CandidateRoundCell {
                primary_label: "10.0%".to_string(),
                secondary_label: "20 votes".to_string(),
                is_winner: false,
                is_eliminated: true,
            })
        );
        assert_eq!(c.each_round[1], None);
        assert_eq!(t.tabulation[0].each_round[1].as_ref().map(|cell| cell.is_winner), Some(true));
    }

    #[test]
    fn views_serialize_with_template_names() {
        let t = TabularCandidateByRound::new(&abc_graph());
        let js = serde_json::to_value(&t.tabulation[2]).unwrap();
        assert_eq!(
            js,
            json!({
                "name": "C",
                "eachRound": [
                    {
                        "primaryLabel": "10.0%",
                        "secondaryLabel": "20 votes",
                        "isWinner": false,
                        "isEliminated": true
                    },
                    null
                ]
            })
        );
        let by_candidate = TabulateByCandidate::new(&abc_graph(), true);
        let js = serde_json::to_value(&by_candidate.tabulation[0].rounds[0]).unwrap();
        assert_eq!(js["round_i"], json!(1));
        assert_eq!(js["primaryLabel"], json!("50.0%"));
    }
}
