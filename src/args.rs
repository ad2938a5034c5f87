use clap::Parser;

/// Renders the round-by-round transfers of a ranked-choice election.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The summary of the election in JSON format, as written by the usual
    /// tabulators. See the manual of rcv_graph for the fields that are read.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default sankey) The view to render: sankey, plotly, by-round, by-round-interactive,
    /// by-candidate, by-candidate-by-round, record or all.
    #[clap(long, value_parser)]
    pub view: Option<String>,

    /// If passed as an argument, the by-candidate view only shows the candidates elected
    /// in any round.
    #[clap(long, takes_value = false)]
    pub only_winners: bool,

    /// (default relevant) The narrative of the by-candidate view: 'relevant' only describes
    /// what happens to the candidate, 'everything' describes all the events of the round.
    #[clap(long, value_parser)]
    pub narrative: Option<String>,

    /// (file path, 'stdout' or empty) Where the rendered view is written in JSON format.
    /// Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected rendering in JSON format. If provided,
    /// rcvviz will check that the output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
