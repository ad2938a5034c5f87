use log::debug;
use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use rcv_graph::sankey::SankeyData;
use rcv_graph::tabular::*;
use rcv_graph::Graph;

use crate::viz::*;

/// The renderings offered on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum View {
    Sankey,
    Plotly,
    ByRound,
    ByRoundInteractive,
    ByCandidate,
    ByCandidateByRound,
    Record,
    All,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub only_show_winners: bool,
    pub narrative: NarrativeMode,
}

pub fn parse_view(name: Option<&str>) -> VizResult<View> {
    let view = match name {
        None | Some("sankey") => View::Sankey,
        Some("plotly") => View::Plotly,
        Some("by-round") => View::ByRound,
        Some("by-round-interactive") => View::ByRoundInteractive,
        Some("by-candidate") => View::ByCandidate,
        Some("by-candidate-by-round") => View::ByCandidateByRound,
        Some("record") => View::Record,
        Some("all") => View::All,
        Some(x) => whatever!("Unknown view {:?}", x),
    };
    Ok(view)
}

pub fn parse_narrative(name: Option<&str>) -> VizResult<NarrativeMode> {
    match name {
        None | Some("relevant") => Ok(NarrativeMode::RelevantToCandidate),
        Some("everything") => Ok(NarrativeMode::Everything),
        Some(x) => whatever!("Unknown narrative {:?}: use 'relevant' or 'everything'", x),
    }
}

/// Renders one view of the graph as JSON.
pub fn render_view(graph: &Graph, view: View, options: &ViewOptions) -> VizResult<JSValue> {
    debug!("render_view: {:?} {:?}", view, options);
    match view {
        View::Sankey => to_js(&SankeyData::from_graph(graph)),
        View::Plotly => Ok(SankeyData::from_graph(graph).plotly_figure()),
        View::ByRound => to_js(&TabulateByRound::new(graph)),
        View::ByRoundInteractive => to_js(&TabulateByRoundInteractive::new(graph)),
        View::ByCandidate => to_js(&TabulateByCandidate::with_narrative(
            graph,
            options.only_show_winners,
            options.narrative,
        )),
        View::ByCandidateByRound => to_js(&TabularCandidateByRound::new(graph)),
        View::Record => to_js(&graph.election_record()),
        View::All => {
            let sankey = SankeyData::from_graph(graph);
            Ok(json!({
                "record": to_js(&graph.election_record())?,
                "sankey": to_js(&sankey)?,
                "plotly": sankey.plotly_figure(),
                "byRound": render_view(graph, View::ByRound, options)?,
                "byRoundInteractive": render_view(graph, View::ByRoundInteractive, options)?,
                "byCandidate": render_view(graph, View::ByCandidate, options)?,
                "byCandidateByRound": render_view(graph, View::ByCandidateByRound, options)?,
            }))
        }
    }
}

fn to_js<T: Serialize>(x: &T) -> VizResult<JSValue> {
    serde_json::to_value(x).context(SerializingJsonSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mayor() -> Graph {
        rcv_graph::make_graph(
            r#"{
                "config": {"contest": "Mayor"},
                "results": [
                    {"tally": {"A": "100", "B": "80", "C": "20"},
                     "tallyResults": [{"eliminated": "C", "transfers": {"A": "15", "B": "5"}}]},
                    {"tally": {"A": "115", "B": "85"},
                     "tallyResults": [{"elected": "A", "transfers": {}}]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn view_names() {
        assert_eq!(parse_view(None).unwrap(), View::Sankey);
        assert_eq!(
            parse_view(Some("by-candidate-by-round")).unwrap(),
            View::ByCandidateByRound
        );
        assert!(parse_view(Some("pie")).is_err());
        assert_eq!(
            parse_narrative(Some("everything")).unwrap(),
            NarrativeMode::Everything
        );
        assert!(parse_narrative(Some("some")).is_err());
    }

    #[test]
    fn sankey_view() {
        let js = render_view(&mayor(), View::Sankey, &ViewOptions::default()).unwrap();
        assert_eq!(js["title"], json!("Mayor"));
        assert_eq!(js["labels"], json!(["A 100", "B 80", "C 20", "A 115", "B 85"]));
        assert_eq!(js["sources"], json!([0, 1, 2, 2]));
        assert_eq!(js["targets"], json!([3, 4, 3, 4]));
        assert_eq!(js["values"], json!([100.0, 80.0, 15.0, 5.0]));
    }

    #[test]
    fn only_winners_option() {
        let options = ViewOptions {
            only_show_winners: true,
            narrative: NarrativeMode::RelevantToCandidate,
        };
        let js = render_view(&mayor(), View::ByCandidate, &options).unwrap();
        assert_eq!(js["tabulation"].as_array().map(|a| a.len()), Some(1));
        assert_eq!(js["numRounds"], json!(2));
    }

    #[test]
    fn all_views_at_once() {
        let js = render_view(&mayor(), View::All, &ViewOptions::default()).unwrap();
        for key in [
            "record",
            "sankey",
            "plotly",
            "byRound",
            "byRoundInteractive",
            "byCandidate",
            "byCandidateByRound",
        ] {
            assert!(js.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(
            js["record"],
            json!({"title": "Mayor", "num_rounds": 2, "num_candidates": 3})
        );
    }
}
