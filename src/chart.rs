//! Declarative chart objects
//!
//! Each builder is a pure function from a count table to a [`Figure`], which
//! serializes to the JSON shape Plotly.js accepts (`{"data": [...],
//! "layout": {...}}`). The page embeds that JSON and lets Plotly draw it.
//!
//! Bar charts are stacked with one trace per color category, in the order the
//! categories first appear in the table.

use serde::Serialize;

use crate::aggregate::{CountTable, PayerNote, PayerStatus, SectorStatus};
use crate::dataset::{Status, COL_LINK_NOTE, COL_PAYER, COL_SECTOR, COL_STATUS};
use crate::palette::{note_color, status_color};

pub const STATUS_PIE_TITLE: &str = "Situação Vinculo";
pub const PAYER_STATUS_TITLE: &str = "Distribuição de Situação por Nome Cedente";
pub const DISCREPANCY_TITLE: &str = "Diferença por Nome Cedente";
pub const SECTOR_STATUS_TITLE: &str = "Distribuição de Vínculo por Setor";

/// Value axis title, the name of the count column
pub const COUNT_AXIS: &str = "count";

const STATUS_PIE_HOVER: &str = "<b>%{label}</b><br>Quantidade: %{value}<extra></extra>";
const SECTOR_HOVER: &str =
    "<b>Setor: %{x}</b><br>Situação: %{customdata[0]}<br>Quantidade: %{y}<extra></extra>";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Bar(BarTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub marker: PieMarker,
    /// Keep slices in table order
    pub sort: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub legendgroup: String,
    pub x: Vec<String>,
    pub y: Vec<usize>,
    pub marker: BarMarker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMarker {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    pub showticklabels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

/// Status distribution pie
pub fn status_pie(table: &CountTable<Status>) -> Figure {
    let mut labels = Vec::with_capacity(table.len());
    let mut values = Vec::with_capacity(table.len());
    let mut colors = Vec::with_capacity(table.len());

    for (status, count) in table.iter() {
        labels.push(status.label().to_string());
        values.push(count);
        colors.push(status_color(status));
    }

    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels,
            values,
            marker: PieMarker { colors },
            sort: false,
            hovertemplate: Some(STATUS_PIE_HOVER.to_string()),
        })],
        layout: Layout {
            title: Title::new(STATUS_PIE_TITLE),
            barmode: None,
            xaxis: None,
            yaxis: None,
            legend: None,
        },
    }
}

/// Status counts per payer, one stacked trace per status
pub fn payer_status_bar(table: &CountTable<PayerStatus>, show_labels: bool) -> Figure {
    let traces = stacked_bars(table.iter().map(|(key, count)| BarPoint {
        x: &key.payer,
        series: key.status.label(),
        color: status_color(&key.status),
        count,
        custom: None,
    }));

    bar_figure(traces, PAYER_STATUS_TITLE, COL_PAYER, COL_STATUS, show_labels)
}

/// Discrepancy notes per payer, one stacked trace per note
pub fn discrepancy_bar(table: &CountTable<PayerNote>, show_labels: bool) -> Figure {
    let traces = stacked_bars(table.iter().map(|(key, count)| BarPoint {
        x: &key.payer,
        series: &key.note,
        color: note_color(&key.note),
        count,
        custom: None,
    }));

    bar_figure(traces, DISCREPANCY_TITLE, COL_PAYER, COL_LINK_NOTE, show_labels)
}

/// Status counts per sector, with sector/status/count hover text
pub fn sector_status_bar(table: &CountTable<SectorStatus>) -> Figure {
    let mut traces = stacked_bars(table.iter().map(|(key, count)| BarPoint {
        x: &key.sector,
        series: key.status.label(),
        color: status_color(&key.status),
        count,
        custom: Some(key.status.label()),
    }));
    for trace in &mut traces {
        trace.hovertemplate = Some(SECTOR_HOVER.to_string());
    }

    bar_figure(traces, SECTOR_STATUS_TITLE, COL_SECTOR, COL_STATUS, true)
}

struct BarPoint<'a> {
    x: &'a str,
    series: &'a str,
    color: &'static str,
    count: usize,
    custom: Option<&'a str>,
}

fn stacked_bars<'a>(points: impl Iterator<Item = BarPoint<'a>>) -> Vec<BarTrace> {
    let mut traces: Vec<BarTrace> = Vec::new();

    for point in points {
        let idx = match traces.iter().position(|t| t.name == point.series) {
            Some(idx) => idx,
            None => {
                traces.push(BarTrace {
                    name: point.series.to_string(),
                    legendgroup: point.series.to_string(),
                    x: Vec::new(),
                    y: Vec::new(),
                    marker: BarMarker { color: point.color },
                    customdata: None,
                    hovertemplate: None,
                });
                traces.len() - 1
            }
        };

        let trace = &mut traces[idx];
        trace.x.push(point.x.to_string());
        trace.y.push(point.count);
        if let Some(custom) = point.custom {
            trace
                .customdata
                .get_or_insert_with(Vec::new)
                .push(vec![custom.to_string()]);
        }
    }

    traces
}

fn bar_figure(
    traces: Vec<BarTrace>,
    title: &str,
    x_title: &str,
    legend_title: &str,
    show_labels: bool,
) -> Figure {
    Figure {
        data: traces.into_iter().map(Trace::Bar).collect(),
        layout: Layout {
            title: Title::new(title),
            barmode: Some("relative"),
            xaxis: Some(Axis {
                title: Title::new(x_title),
                showticklabels: show_labels,
            }),
            yaxis: Some(Axis {
                title: Title::new(COUNT_AXIS),
                showticklabels: true,
            }),
            legend: Some(Legend {
                title: Title::new(legend_title),
            }),
        },
    }
}
