//! The five dashboard views and what each one renders
//!
//! A request names exactly one [`View`]; nothing carries over from a previous
//! request. Two views accept a payer search and a "show names" toggle, the
//! export view accepts a sector, and the overview adds fixed commentary.

use serde::{Deserialize, Serialize};

use crate::chart::Figure;
use crate::dataset::Status;
use crate::export::StyledTable;
use crate::search::SearchQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    StatusOverview,
    StatusByPayer,
    DiscrepancyByPayer,
    LinksBySector,
    CompaniesBySector,
}

impl View {
    pub const ALL: [View; 5] = [
        View::StatusOverview,
        View::StatusByPayer,
        View::DiscrepancyByPayer,
        View::LinksBySector,
        View::CompaniesBySector,
    ];

    /// Label shown in the sidebar selector
    pub fn label(self) -> &'static str {
        match self {
            View::StatusOverview => "Situação Vinculo",
            View::StatusByPayer => "Situação - Nome Cedente",
            View::DiscrepancyByPayer => "Diferença pelo nome das empresas",
            View::LinksBySector => "Vínculos Agrupados por Setor",
            View::CompaniesBySector => "Empresas por Setores",
        }
    }

    /// URL-safe identifier
    pub fn slug(self) -> &'static str {
        match self {
            View::StatusOverview => "situacao-vinculo",
            View::StatusByPayer => "situacao-nome-cedente",
            View::DiscrepancyByPayer => "diferenca-empresas",
            View::LinksBySector => "vinculos-setor",
            View::CompaniesBySector => "empresas-setores",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.slug() == slug)
    }

    /// Whether the view takes a payer search and the labels toggle
    pub fn accepts_search(self) -> bool {
        matches!(self, View::StatusByPayer | View::DiscrepancyByPayer)
    }
}

/// Query parameters as they arrive from the page form or the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub view: Option<String>,
    /// Comma-separated payer search
    #[serde(default)]
    pub q: Option<String>,
    /// Checkbox value, present when ticked
    #[serde(default)]
    pub labels: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

/// A parsed, validated selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRequest {
    pub view: View,
    pub search: SearchQuery,
    /// Raw search text, echoed back into the search box
    pub search_input: String,
    pub show_labels: bool,
    pub sector: Option<String>,
}

impl ViewRequest {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Unknown or missing views fall back to the overview. Search and labels
    /// are ignored by views that do not take them.
    pub fn from_params(params: &ViewParams) -> Self {
        let view = params
            .view
            .as_deref()
            .and_then(View::from_slug)
            .unwrap_or_default();

        let (search_input, show_labels) = if view.accepts_search() {
            (
                params.q.clone().unwrap_or_default(),
                params.labels.as_deref().is_some_and(|v| !v.is_empty() && v != "off"),
            )
        } else {
            (String::new(), false)
        };

        let sector = match view {
            View::CompaniesBySector => params.sector.clone().filter(|s| !s.is_empty()),
            _ => None,
        };

        Self {
            view,
            search: SearchQuery::parse(&search_input),
            search_input,
            show_labels,
            sector,
        }
    }
}

/// Authored note shown under the overview pie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commentary {
    pub title: &'static str,
    /// Status whose chart color tints the text, if any
    #[serde(skip)]
    pub tint: Option<Status>,
    /// Paragraphs; `**bold**` spans are emphasized by the page
    pub paragraphs: &'static [&'static str],
}

/// Fixed observations for the overview. The percentages are annotations
/// written by the analysts and are not derived from the loaded data.
pub static OVERVIEW_COMMENTARY: [Commentary; 4] = [
    Commentary {
        title: "30,8% Vinculado com Diferença",
        tint: Some(Status::LinkedWithDifference),
        paragraphs: &[
            "Consegue fazer o vínculo manual e processar a remessa.",
            "**Impacto Negativo:** O retrabalho na validação das informações leva o dobro do tempo em comparação ao método atual.",
        ],
    },
    Commentary {
        title: "54% Pendente",
        tint: None,
        paragraphs: &[
            "**Agrupamentos:** Erros com diferença de valor e lançamento posterior ao fechamento (até 7 dias). Requer o mesmo retrabalho do \"Vinculado com Diferença\", pois é necessário acessar outra tela.",
            "Para ajustar a diferença de valor, é preciso realizar um ajuste manual.",
            "**Vencimentos Errados:** Manutenção necessária.",
            "**Ação Requerida:** Trazer por setor os vencimentos incorretos.",
        ],
    },
    Commentary {
        title: "5,02% Manual",
        tint: Some(Status::Manual),
        paragraphs: &[
            "Não consegue vincular automaticamente, resultando no mesmo retrabalho do \"Vinculado com Diferença\".",
            "**Ação Requerida:** Buscar entendimento, pois a causa não foi identificada. Trazer evidências.",
        ],
    },
    Commentary {
        title: "10,2% Automático",
        tint: Some(Status::Automatic),
        paragraphs: &["É vinculado automaticamente, sem necessidade de intervenção manual."],
    },
];

/// Sector picker plus the table for the chosen sector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompaniesView {
    pub sectors: Vec<String>,
    pub selected: Option<String>,
    pub table: StyledTable,
}

/// What a view renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewContent {
    Chart {
        figure: Figure,
        commentary: &'static [Commentary],
    },
    /// Nothing matched; the page shows a message instead of an empty chart
    NoResults { message: String },
    Companies(CompaniesView),
}

impl ViewContent {
    pub fn no_results(request: &ViewRequest) -> Self {
        let message = if request.search.is_empty() {
            "Nenhum registro disponível para esta visão.".to_string()
        } else {
            format!(
                "Nenhum Nome Cedente encontrado para \"{}\".",
                request.search_input.trim()
            )
        };
        ViewContent::NoResults { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(view: &str) -> ViewParams {
        ViewParams {
            view: Some(view.to_string()),
            ..ViewParams::default()
        }
    }

    #[test]
    fn test_slugs_round_trip() {
        for view in View::ALL {
            assert_eq!(View::from_slug(view.slug()), Some(view));
        }
        assert_eq!(View::from_slug("nope"), None);
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut labels: Vec<&str> = View::ALL.iter().map(|v| v.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn test_only_payer_views_accept_search() {
        let searchable: Vec<View> = View::ALL.into_iter().filter(|v| v.accepts_search()).collect();
        assert_eq!(searchable, vec![View::StatusByPayer, View::DiscrepancyByPayer]);
    }

    #[test]
    fn test_unknown_view_falls_back_to_overview() {
        assert_eq!(ViewRequest::from_params(&params("bogus")).view, View::StatusOverview);
        assert_eq!(ViewRequest::from_params(&ViewParams::default()).view, View::StatusOverview);
    }

    #[test]
    fn test_search_params_are_parsed_for_payer_views() {
        let mut p = params("situacao-nome-cedente");
        p.q = Some("Acme, Beta".to_string());
        p.labels = Some("on".to_string());

        let request = ViewRequest::from_params(&p);
        assert_eq!(request.search.terms(), &["acme", "beta"]);
        assert_eq!(request.search_input, "Acme, Beta");
        assert!(request.show_labels);
    }

    #[test]
    fn test_labels_default_off() {
        let request = ViewRequest::from_params(&params("diferenca-empresas"));
        assert!(!request.show_labels);
    }

    #[test]
    fn test_search_ignored_by_other_views() {
        let mut p = params("vinculos-setor");
        p.q = Some("Acme".to_string());
        p.labels = Some("on".to_string());

        let request = ViewRequest::from_params(&p);
        assert!(request.search.is_empty());
        assert!(!request.show_labels);
    }

    #[test]
    fn test_sector_only_kept_for_companies_view() {
        let mut p = params("empresas-setores");
        p.sector = Some("Ops".to_string());
        assert_eq!(ViewRequest::from_params(&p).sector.as_deref(), Some("Ops"));

        p.view = Some("situacao-vinculo".to_string());
        assert_eq!(ViewRequest::from_params(&p).sector, None);
    }

    #[test]
    fn test_params_deserialize_from_query_string() {
        let p: ViewParams =
            serde_urlencoded::from_str("view=empresas-setores&sector=Contas%20a%20Pagar").unwrap();
        assert_eq!(p.sector.as_deref(), Some("Contas a Pagar"));
    }

    #[test]
    fn test_overview_commentary_is_fixed() {
        let titles: Vec<&str> = OVERVIEW_COMMENTARY.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            vec![
                "30,8% Vinculado com Diferença",
                "54% Pendente",
                "5,02% Manual",
                "10,2% Automático"
            ]
        );
    }

    #[test]
    fn test_no_results_message_mentions_search() {
        let mut p = params("situacao-nome-cedente");
        p.q = Some("zzz".to_string());
        let request = ViewRequest::from_params(&p);

        match ViewContent::no_results(&request) {
            ViewContent::NoResults { message } => assert!(message.contains("zzz")),
            other => panic!("expected no results, got {:?}", other),
        }
    }
}
