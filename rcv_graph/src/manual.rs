/*!

This is the long-form manual for `rcv_graph` and `rcvviz`.

## Input format

The input is the JSON summary written by RCTab-style tabulators. Only a few
fields are read, everything else is ignored:

```json
{
  "config": {"contest": "Mayor"},
  "results": [
    {
      "round": 1,
      "tally": {"A": "100", "B": "80", "C": "20"},
      "tallyResults": [
        {"eliminated": "C", "transfers": {"A": "15", "B": "5", "exhausted": "0"}}
      ]
    },
    {
      "round": 2,
      "tally": {"A": "115", "B": "85"},
      "tallyResults": [{"elected": "A", "transfers": {}}]
    }
  ]
}
```

* `config.contest` is the title of the graph.
* `results` is the list of rounds. The `tally` of the first round gives the
  candidates, in order, with their first-round votes. The later tallies are
  not read: the counts are derived from the transfers.
* Each entry of `tallyResults` either elects a candidate (`elected`) or
  eliminates one (`eliminated`). The `transfers` of an elimination say where
  its votes go in the next round. `exhausted` votes leave the election.
* Vote counts can be numbers or strings, with or without decimals.

An elimination without `transfers` is a candidate who had no vote.

The undeclared write-ins (`Undeclared`) are not in the tally. When they are
eliminated in the first round, they become a candidate of their own, with
the sum of their transfers as first-round count.

Eliminations listed in the last round have no following round: they appear
in the round summaries but not in the graph.

## Views

`rcvviz --view <name>` renders one of the following, as JSON:

* `sankey`: labels, colors, sources, targets and values of the graph
* `plotly`: the same, as a plotly.js figure
* `by-round`: one row per round with the eliminated candidates and the winners
* `by-round-interactive`: every candidate still in play, round by round. An
  eliminated candidate stays one more round, losing all its votes.
* `by-candidate`: a narrative for each round of each candidate. Use
  `--only-winners` to keep the winners only, and `--narrative everything` to
  describe all the events of each round.
* `by-candidate-by-round`: one row per candidate, one cell per round.
* `record`: the title, number of rounds and number of candidates.
* `all`: all of the above in a single document.

With `--reference <file>`, the output is compared with the content of the
file. Differences are printed and the program fails.

## Numbers

* Vote counts are printed as integers when they are whole, with two
  decimals otherwise (`15`, `9.50`).
* Percentages have one decimal (`57.5%`).
* Changes are signed (`+15 votes`, `-20 votes`).

*/
