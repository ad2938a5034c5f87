use log::{info, warn};
use snafu::{prelude::*, Snafu};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use rcv_graph::ResultsError;

use crate::args::Args;
use crate::viz::io_common::*;
use crate::viz::views::*;

pub mod io_common;
pub mod views;

#[derive(Debug, Snafu)]
pub enum VizError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid election results: {source}"))]
    Results { source: ResultsError },
    #[snafu(display("Error serializing the view"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Difference detected between the rendered view and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type VizResult<T> = Result<T, VizError>;

/// Loads the results, renders the requested view and writes it out.
///
/// When a reference is given, the rendering is compared with it after both
/// are pretty-printed.
pub fn run_visualization(args: &Args) -> VizResult<()> {
    let input = match &args.input {
        Some(p) => p.clone(),
        None => whatever!("No input file given: use --input"),
    };
    let view = parse_view(args.view.as_deref())?;
    let options = ViewOptions {
        only_show_winners: args.only_winners,
        narrative: parse_narrative(args.narrative.as_deref())?,
    };

    info!(
        "Rendering view {:?} of {:?}",
        view,
        simplify_file_name(&input)
    );
    let contents = read_file(&input)?;
    let graph = rcv_graph::make_graph(&contents).context(ResultsSnafu {})?;
    let rendered = render_view(&graph, view, &options)?;
    let pretty_rendered = serde_json::to_string_pretty(&rendered).context(SerializingJsonSnafu {})?;

    write_output(args.out.as_deref(), &pretty_rendered)?;

    // The reference rendering, if provided for comparison
    if let Some(reference_p) = &args.reference {
        let reference = read_reference(reference_p)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
        if pretty_reference != pretty_rendered {
            warn!("Found differences with the reference {:?}", reference_p);
            print_diff(pretty_reference.as_str(), pretty_rendered.as_str(), "\n");
            return ReferenceMismatchSnafu {
                path: reference_p.clone(),
            }
            .fail();
        }
        info!("The rendering matches the reference {:?}", reference_p);
    }
    Ok(())
}

fn read_reference(path: &str) -> VizResult<JSValue> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu { path })
}
