//! Breakdown charts for the expenses page.
//!
//! Charts are generated as ECharts JSON configuration and initialised by a
//! small script added to the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::bar::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    category::Category,
    expense::ExpenseType,
    html::{CURRENCY_SYMBOL, HeadElement},
};

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the category and expense type charts.
pub(super) fn build_report_charts(
    by_category: &[(Category, f64)],
    by_expense_type: &[(ExpenseType, f64)],
) -> [ReportChart; 2] {
    [
        ReportChart {
            id: "category-chart",
            options: category_chart(by_category).to_string(),
        },
        ReportChart {
            id: "expense-type-chart",
            options: expense_type_chart(by_expense_type).to_string(),
        },
    ]
}

/// Renders the HTML containers for the charts.
pub(super) fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// JavaScript that initialises each chart once the page has loaded.
pub(super) fn charts_script(charts: &[ReportChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                    }};
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

fn category_chart(by_category: &[(Category, f64)]) -> Chart {
    let labels = by_category
        .iter()
        .map(|(category, _)| category.name.to_string())
        .collect::<Vec<_>>();
    let values = by_category
        .iter()
        .map(|(_, total)| round_to_cents(*total))
        .collect::<Vec<_>>();

    bar_chart("Spending by category", labels, values)
}

fn expense_type_chart(by_expense_type: &[(ExpenseType, f64)]) -> Chart {
    let labels = by_expense_type
        .iter()
        .map(|(expense_type, _)| expense_type.to_string())
        .collect::<Vec<_>>();
    let values = by_expense_type
        .iter()
        .map(|(_, total)| round_to_cents(*total))
        .collect::<Vec<_>>();

    bar_chart("Spending by type", labels, values)
}

fn bar_chart(title: &str, labels: Vec<String>, values: Vec<f64>) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Total").data(values))
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        &format!(
            "return (number || number === 0) \
            ? '{CURRENCY_SYMBOL}' + Number(number).toFixed(2) \
            : '-';"
        ),
    )
}
