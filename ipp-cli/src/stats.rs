//! Statistics file: which groups were requested and how they render.

use clap::parser::ValueSource;
use clap::ArgMatches;
use ipp_vm::Stats;

/// One line of the statistics file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsItem {
    Insts,
    Hot,
    Vars,
    Stack,
    Print(String),
    Eol,
}

/// Requested items in the order their flags appeared on the command line.
///
/// `matches` are the matches of the `run` subcommand.
pub fn requested_items(matches: &ArgMatches) -> Vec<StatsItem> {
    let mut items: Vec<(usize, StatsItem)> = Vec::new();

    for id in ["insts", "hot", "vars", "stack", "print", "eol"] {
        if matches.value_source(id) != Some(ValueSource::CommandLine) {
            continue;
        }
        let (Some(indices), Some(values)) = (matches.indices_of(id), matches.get_many::<String>(id))
        else {
            continue;
        };
        for (index, value) in indices.zip(values) {
            let item = match id {
                "insts" => StatsItem::Insts,
                "hot" => StatsItem::Hot,
                "vars" => StatsItem::Vars,
                "stack" => StatsItem::Stack,
                "print" => StatsItem::Print(value.clone()),
                _ => StatsItem::Eol,
            };
            items.push((index, item));
        }
    }

    items.sort_by_key(|(index, _)| *index);
    items.into_iter().map(|(_, item)| item).collect()
}

/// Render the statistics file, one line per item.
///
/// `--hot` writes an empty line when no instruction was counted.
pub fn render(items: &[StatsItem], stats: &Stats) -> String {
    let mut out = String::new();
    for item in items {
        let line = match item {
            StatsItem::Insts => stats.executed().to_string(),
            StatsItem::Hot => stats
                .hottest_order()
                .map(|order| order.to_string())
                .unwrap_or_default(),
            StatsItem::Vars => stats.max_variables().to_string(),
            StatsItem::Stack => stats.max_data_stack().to_string(),
            StatsItem::Print(text) => text.clone(),
            StatsItem::Eol => String::new(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
