// Reading the summary documents produced by the tabulators.

use log::{debug, info};
use serde::Deserialize;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::builder::*;
use crate::model::*;

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct ResultsDocument {
    config: Option<DocumentConfig>,
    results: Option<Vec<RawRound>>,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct DocumentConfig {
    contest: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct RawRound {
    // Only read for the first round.
    tally: Option<JSMap<String, JSValue>>,
    #[serde(rename = "tallyResults", default)]
    tally_results: Vec<RawTallyResult>,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct RawTallyResult {
    eliminated: Option<String>,
    elected: Option<JSValue>,
    transfers: Option<JSMap<String, JSValue>>,
}

/// Parses a results document from its JSON text.
pub fn parse_results(contents: &str) -> ResultsResult<LoadedResults> {
    let js: JSValue = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    load_results(js)
}

/// Reads a results document: `config.contest` is the title and `results` the
/// list of rounds.
///
/// Candidates are registered in the order of the first-round tally. The
/// eliminations listed in a round move votes to the next round.
pub fn load_results(js: JSValue) -> ResultsResult<LoadedResults> {
    let doc: ResultsDocument = serde_json::from_value(js).context(ParsingJsonSnafu {})?;
    let title = doc
        .config
        .and_then(|c| c.contest)
        .context(MalformedInputSnafu {
            detail: "missing config.contest",
        })?;
    let rounds = doc.results.context(MalformedInputSnafu {
        detail: "missing results",
    })?;
    let first = rounds.first().context(MissingRoundDataSnafu {
        round: 0_usize,
        detail: "the results list is empty",
    })?;

    let raw_tally = first.tally.as_ref().context(MalformedInputSnafu {
        detail: "the first round has no tally",
    })?;
    let mut tally: Vec<(String, f64)> = Vec::new();
    for (name, count_js) in raw_tally.iter() {
        let count = read_js_count(count_js).context(MalformedInputSnafu {
            detail: format!("cannot read the first-round tally of {:?}", name),
        })?;
        tally.push((name.clone(), count));
    }

    let mut builder = ResultsBuilder::new(&title).candidates(&tally)?;
    if let Some(count) = undeclared_count(first)? {
        debug!("load_results: undeclared votes: {}", count);
        builder.undeclared(count)?;
    }

    for (idx, raw_round) in rounds.iter().enumerate() {
        builder.add_round();
        for tally_result in raw_round.tally_results.iter() {
            load_tally_result(&mut builder, idx, tally_result)?;
        }
    }

    let results = builder.build()?;
    info!(
        "load_results: {:?}: {} candidates, {} rounds",
        results.title,
        results.candidates.len(),
        results.num_rounds()
    );
    Ok(results)
}

fn load_tally_result(
    builder: &mut ResultsBuilder,
    round: RoundId,
    tally_result: &RawTallyResult,
) -> ResultsResult<()> {
    // Winners are not eliminations, even when they carry transfers.
    if let Some(elected) = &tally_result.elected {
        return match elected.as_str() {
            Some(name) => {
                debug!("load_tally_result: round {}: {} elected", round, name);
                builder.elect(name)
            }
            None => {
                // Only a flag: there is no name to record.
                debug!(
                    "load_tally_result: round {}: skipping elected entry {}",
                    round, elected
                );
                Ok(())
            }
        };
    }

    let name = tally_result
        .eliminated
        .as_ref()
        .context(MalformedInputSnafu {
            detail: format!(
                "round {}: tally result has neither 'eliminated' nor 'elected'",
                round + 1
            ),
        })?;

    let transfers = match &tally_result.transfers {
        Some(raw) => read_transfers(raw, round, name)?,
        None => {
            // Only happens for a candidate who had no vote.
            debug!(
                "load_tally_result: round {}: zero-vote elimination of {}",
                round, name
            );
            Vec::new()
        }
    };
    builder.eliminate(name, &transfers)
}

fn read_transfers(
    raw: &JSMap<String, JSValue>,
    round: RoundId,
    from: &str,
) -> ResultsResult<Vec<(String, f64)>> {
    let mut res: Vec<(String, f64)> = Vec::new();
    for (to_name, count_js) in raw.iter() {
        let count = read_js_count(count_js).context(MalformedInputSnafu {
            detail: format!(
                "round {}: cannot read the transfer from {:?} to {:?}: {}",
                round + 1,
                from,
                to_name,
                count_js
            ),
        })?;
        res.push((to_name.clone(), count));
    }
    Ok(res)
}

// The undeclared votes have no tally of their own: they are counted through
// their first-round transfers, exhausted ones included.
fn undeclared_count(first: &RawRound) -> ResultsResult<Option<f64>> {
    let entry = first
        .tally_results
        .iter()
        .find(|tr| tr.eliminated.as_deref() == Some(UNDECLARED));
    let entry = match entry {
        Some(e) => e,
        None => return Ok(None),
    };
    let transfers = match &entry.transfers {
        Some(raw) => read_transfers(raw, 0, UNDECLARED)?,
        None => Vec::new(),
    };
    Ok(Some(transfers.iter().map(|(_, count)| *count).sum()))
}

/// Vote counts are written either as numbers or as strings.
fn read_js_count(x: &JSValue) -> Option<f64> {
    match x {
        JSValue::Number(n) => n.as_f64(),
        JSValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
