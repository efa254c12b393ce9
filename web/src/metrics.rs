use memorito_core as game;
use yew::prelude::*;

const COLUMNS: [&str; 7] = [
    "Clicks",
    "Correct",
    "Step in seq",
    "Level",
    "Elapsed",
    "Interval",
    "Total Elapsed",
];

const ABSENT: &str = "-";

fn format_millis(millis: game::Timestamp) -> String {
    format!("{millis:.0}")
}

/// Table cells for one metric, in [`COLUMNS`] order.
fn metric_row(metric: &game::Metric) -> [String; 7] {
    use game::Metric::*;

    match *metric {
        Click {
            click_counter,
            correct,
            step_in_sequence,
            level,
            time_elapsed,
            time_interval,
        } => [
            click_counter.to_string(),
            if correct { "Yes" } else { "No" }.to_string(),
            step_in_sequence.to_string(),
            level.to_string(),
            format_millis(time_elapsed),
            format_millis(time_interval),
            ABSENT.to_string(),
        ],
        RoundTotal { total_time_elapsed } => {
            let mut row = [const { String::new() }; 7];
            for cell in &mut row[..6] {
                cell.push_str(ABSENT);
            }
            row[6] = format_millis(total_time_elapsed);
            row
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct MetricsProps {
    pub metrics: Vec<game::Metric>,
}

#[function_component]
pub(crate) fn MetricsTable(props: &MetricsProps) -> Html {
    html! {
        <table class="metrics">
            <thead>
                <tr>{ for COLUMNS.iter().map(|column| html! { <th>{*column}</th> }) }</tr>
            </thead>
            <tbody>
                {
                    for props.metrics.iter().map(|metric| html! {
                        <tr>{ for metric_row(metric).into_iter().map(|cell| html! { <td>{cell}</td> }) }</tr>
                    })
                }
            </tbody>
        </table>
    }
}
