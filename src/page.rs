//! HTML page with Plotly.js charts
//!
//! One document per request: the sidebar form (logo, view selector) and the
//! content of the selected view. Charts are drawn client-side from the
//! embedded figure JSON.

use std::io::{self, Write};

use crate::palette::status_color;
use crate::view::{Commentary, CompaniesView, View, ViewContent, ViewRequest};

pub const PAGE_TITLE: &str = "Levantamento DDA";
pub const LABELS_TOGGLE: &str = "Mostrar nomes das empresas";
pub const SEARCH_PLACEHOLDER: &str = "Digite os nomes das empresas (separados por vírgula)";

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub fn write<W: Write>(
    writer: &mut W,
    request: &ViewRequest,
    content: &ViewContent,
) -> io::Result<()> {
    write!(writer, r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
            display: grid;
            grid-template-columns: 300px 1fr;
            min-height: 100vh;
        }}

        /* Sidebar */
        .sidebar {{
            background: var(--card);
            border-right: 1px solid var(--border);
            padding: 1.5rem;
        }}
        .sidebar img {{ max-width: 100%; margin-bottom: 1.5rem; }}
        .sidebar label {{ display: block; padding: 0.35rem 0; cursor: pointer; }}
        .sidebar input[type=radio] {{ margin-right: 0.5rem; accent-color: var(--accent); }}

        /* Main */
        .main {{ padding: 2rem; max-width: 1400px; }}
        h1 {{ font-size: 2rem; font-weight: 700; margin-bottom: 1.5rem; }}
        .controls {{ display: flex; gap: 1rem; align-items: center; margin-bottom: 1rem; flex-wrap: wrap; }}
        .controls input[type=text], .controls select {{
            flex: 1;
            min-width: 320px;
            padding: 0.5rem 0.75rem;
            background: var(--bg);
            color: var(--text);
            border: 1px solid var(--border);
            border-radius: 6px;
        }}
        .chart-card {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1rem;
            margin-bottom: 1.5rem;
        }}
        #chart {{ width: 100%; min-height: 520px; }}
        .empty {{ color: var(--dim); padding: 2rem; text-align: center; }}

        /* Commentary */
        details {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 8px;
            margin-bottom: 0.75rem;
            padding: 0.75rem 1rem;
        }}
        summary {{ cursor: pointer; font-weight: 600; }}
        details p {{ margin-top: 0.5rem; }}

        /* Companies table */
        table {{ width: 100%; border-collapse: collapse; font-size: 0.875rem; }}
        th, td {{ border: 1px solid var(--border); padding: 0.4rem 0.6rem; text-align: left; }}
        th {{ background: var(--bg); color: var(--dim); }}
        td.styled {{ color: #000; }}
        .download {{
            display: inline-block;
            margin-top: 1rem;
            padding: 0.5rem 1rem;
            border: 1px solid var(--accent);
            border-radius: 6px;
            color: var(--accent);
            text-decoration: none;
        }}
    </style>
</head>
<body>
"#, title = PAGE_TITLE, plotly = PLOTLY_CDN)?;

    write_sidebar(writer, request.view)?;

    write!(writer, "<main class=\"main\">\n    <h1>{}</h1>\n", PAGE_TITLE)?;

    if request.view.accepts_search() {
        write_search_controls(writer, request)?;
    }

    match content {
        ViewContent::Chart { figure, commentary } => {
            let json = figure.to_json().map_err(io::Error::other)?;
            write!(writer, r#"    <div class="chart-card"><div id="chart"></div></div>
    <script>
        const figure = {json};
        figure.layout.paper_bgcolor = 'rgba(0,0,0,0)';
        figure.layout.plot_bgcolor = 'rgba(0,0,0,0)';
        figure.layout.font = {{ color: '#e6edf3' }};
        Plotly.newPlot('chart', figure.data, figure.layout, {{ responsive: true }});
    </script>
"#, json = script_escape(&json))?;
            write_commentary(writer, commentary)?;
        }
        ViewContent::NoResults { message } => {
            write!(writer, "    <div class=\"chart-card empty\">{}</div>\n", html_escape(message))?;
        }
        ViewContent::Companies(view) => write_companies(writer, view)?,
    }

    write!(writer, "</main>\n</body>\n</html>\n")
}

fn write_sidebar<W: Write>(writer: &mut W, selected: View) -> io::Result<()> {
    write!(writer, r#"<aside class="sidebar">
    <img src="/logo" alt="" onerror="this.style.display='none'">
    <form method="get" action="/">
"#)?;

    for view in View::ALL {
        write!(
            writer,
            "        <label><input type=\"radio\" name=\"view\" value=\"{}\"{} onchange=\"this.form.submit()\">{}</label>\n",
            view.slug(),
            if view == selected { " checked" } else { "" },
            html_escape(view.label()),
        )?;
    }

    write!(writer, "    </form>\n</aside>\n")
}

fn write_search_controls<W: Write>(writer: &mut W, request: &ViewRequest) -> io::Result<()> {
    write!(writer, r#"    <form class="controls" method="get" action="/">
        <input type="hidden" name="view" value="{slug}">
        <input type="text" name="q" value="{query}" placeholder="{placeholder}">
        <label><input type="checkbox" name="labels" value="on"{checked} onchange="this.form.submit()"> {toggle}</label>
    </form>
"#,
        slug = request.view.slug(),
        query = html_escape(&request.search_input),
        placeholder = html_escape(SEARCH_PLACEHOLDER),
        checked = if request.show_labels { " checked" } else { "" },
        toggle = html_escape(LABELS_TOGGLE),
    )
}

fn write_commentary<W: Write>(writer: &mut W, commentary: &[Commentary]) -> io::Result<()> {
    for note in commentary {
        let style = note
            .tint
            .as_ref()
            .map(|status| format!(" style=\"color: {}\"", status_color(status)))
            .unwrap_or_default();

        write!(writer, "    <details><summary>{}</summary>", html_escape(note.title))?;
        for paragraph in note.paragraphs {
            write!(writer, "<p{}>{}</p>", style, emphasize(paragraph))?;
        }
        writeln!(writer, "</details>")?;
    }
    Ok(())
}

fn write_companies<W: Write>(writer: &mut W, view: &CompaniesView) -> io::Result<()> {
    write!(writer, r#"    <form class="controls" method="get" action="/">
        <input type="hidden" name="view" value="{}">
        <select name="sector" onchange="this.form.submit()">
"#, View::CompaniesBySector.slug())?;

    for sector in &view.sectors {
        let selected = view.selected.as_deref() == Some(sector.as_str());
        write!(
            writer,
            "            <option value=\"{0}\"{1}>{0}</option>\n",
            html_escape(sector),
            if selected { " selected" } else { "" },
        )?;
    }
    write!(writer, "        </select>\n    </form>\n")?;

    write!(writer, "    <div class=\"chart-card\">\n    <table>\n        <tr>")?;
    for header in &view.table.headers {
        write!(writer, "<th>{}</th>", html_escape(header))?;
    }
    writeln!(writer, "</tr>")?;

    for row in &view.table.rows {
        write!(writer, "        <tr>")?;
        for cell in row {
            match cell.background {
                Some(color) => write!(
                    writer,
                    "<td class=\"styled\" style=\"background-color: {}\">{}</td>",
                    color,
                    html_escape(&cell.text)
                )?,
                None => write!(writer, "<td>{}</td>", html_escape(&cell.text))?,
            }
        }
        writeln!(writer, "</tr>")?;
    }
    writeln!(writer, "    </table>")?;

    let query = download_query(view.selected.as_deref())?;
    write!(
        writer,
        "    <a class=\"download\" href=\"/download{}\">Baixar tabela filtrada</a>\n    </div>\n",
        html_escape(&query)
    )
}

fn download_query(sector: Option<&str>) -> io::Result<String> {
    match sector {
        Some(sector) => serde_urlencoded::to_string(&[("sector", sector)])
            .map(|q| format!("?{}", q))
            .map_err(io::Error::other),
        None => Ok(String::new()),
    }
}

/// Escape and turn `**bold**` spans into `<strong>`
fn emphasize(text: &str) -> String {
    html_escape(text)
        .split("**")
        .enumerate()
        .map(|(idx, part)| {
            if idx % 2 == 1 {
                format!("<strong>{}</strong>", part)
            } else {
                part.to_string()
            }
        })
        .collect()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Keep embedded JSON from closing the surrounding script tag
fn script_escape(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::dataset::fixtures;
    use crate::view::ViewParams;

    fn render(query: &str) -> String {
        let dashboard = Dashboard::new(fixtures::dataset(&[
            ("Automático", "Acme & Filhos", "Ops", ""),
            ("Vinculado - Com diferença", "Beta", "Ops/Fin", "Número do documento diferente"),
        ]));
        let params: ViewParams = serde_urlencoded::from_str(query).unwrap();
        let request = ViewRequest::from_params(&params);
        let content = dashboard.render(&request);

        let mut out = Vec::new();
        write(&mut out, &request, &content).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sidebar_lists_every_view() {
        let html = render("");
        for view in View::ALL {
            assert!(html.contains(view.slug()));
        }
        assert!(html.contains("value=\"situacao-vinculo\" checked"));
        assert!(html.contains("src=\"/logo\""));
        assert!(html.contains(PAGE_TITLE));
    }

    #[test]
    fn test_overview_embeds_figure_and_commentary() {
        let html = render("view=situacao-vinculo");
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"type\":\"pie\""));
        assert!(html.contains("<summary>54% Pendente</summary>"));
        assert!(html.contains("<strong>Ação Requerida:</strong>"));
        assert!(html.contains("style=\"color: red\""));
    }

    #[test]
    fn test_search_controls_only_on_payer_views() {
        assert!(render("view=situacao-nome-cedente").contains(LABELS_TOGGLE));
        assert!(!render("view=vinculos-setor").contains(LABELS_TOGGLE));
    }

    #[test]
    fn test_search_input_is_escaped() {
        let html = render("view=situacao-nome-cedente&q=%22%3E%3Cscript%3E");
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(!html.contains("\"><script>"));
    }

    #[test]
    fn test_companies_view_has_table_and_download_link() {
        let html = render("view=empresas-setores&sector=Fin");
        assert!(html.contains("<option value=\"Fin\" selected>"));
        assert!(html.contains("background-color: lightcoral"));
        assert!(html.contains("href=\"/download?sector=Fin\""));
        assert!(!html.contains("Acme"));
    }

    #[test]
    fn test_no_results_message() {
        let html = render("view=situacao-nome-cedente&q=zzz");
        assert!(html.contains("class=\"chart-card empty\""));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_emphasize() {
        assert_eq!(emphasize("**A:** b"), "<strong>A:</strong> b");
        assert_eq!(emphasize("a < b"), "a &lt; b");
    }

    #[test]
    fn test_script_escape() {
        assert_eq!(script_escape(r#"{"t":"</script>"}"#), r#"{"t":"<\/script>"}"#);
    }
}
