use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;

use crate::format::intify;
use crate::graph::*;

/// The graph flattened into parallel sequences for a Sankey renderer.
///
/// `labels[i]` and `colors[i]` describe the node with id `i`. The link
/// sequences are in creation order.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SankeyData {
    pub title: String,
    pub labels: Vec<String>,
    pub colors: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub values: Vec<f64>,
}

impl SankeyData {
    pub fn from_graph(graph: &Graph) -> SankeyData {
        let mut labels: Vec<String> = Vec::with_capacity(graph.nodes().len());
        let mut colors: Vec<String> = Vec::with_capacity(graph.nodes().len());
        for node in graph.nodes().iter() {
            let candidate = graph.candidate(node.candidate);
            labels.push(format!("{} {}", candidate.name, intify(node.count)));
            colors.push(candidate.color.clone());
        }

        let links = graph.links();
        SankeyData {
            title: graph.title().to_string(),
            labels,
            colors,
            sources: links.iter().map(|l| l.source.index()).collect(),
            targets: links.iter().map(|l| l.target.index()).collect(),
            values: links.iter().map(|l| l.value).collect(),
        }
    }

    /// The figure description understood by plotly.js.
    pub fn plotly_figure(&self) -> JSValue {
        json!({
            "data": [{
                "type": "sankey",
                "domain": {"x": [0, 1], "y": [0, 1]},
                "orientation": "v",
                "valueformat": ".0f",
                "node": {
                    "pad": 10,
                    "thickness": 30,
                    "line": {"width": 0},
                    "label": self.labels,
                    "color": self.colors,
                },
                "link": {
                    "source": self.sources,
                    "target": self.targets,
                    "value": self.values,
                },
            }],
            "layout": {
                "title": self.title,
                "height": 772,
                "font": {"size": 10},
            },
        })
    }
}
