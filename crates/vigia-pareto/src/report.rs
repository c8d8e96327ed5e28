//! The multi-section HTML report artifact.
//!
//! A self-contained document: cover section, Pareto chart, category
//! breakdown chart, summary table, and narrative paragraphs. Charts are
//! rendered to inline SVG with plotters, so the report needs no
//! external assets and downloads as a single byte stream.

use plotters::prelude::*;

use crate::catalog::Category;
use crate::error::{Error, Result};
use crate::table::{ParetoTable, Segment};

/// Cover-page fields for a report.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Report title.
    pub title: String,
    /// Subtitle (territory, period, campaign...).
    pub subtitle: String,
    /// Issuing unit shown on the cover.
    pub issued_by: String,
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self {
            title: "Informe de priorización de descriptores".to_string(),
            subtitle: String::new(),
            issued_by: "Vigía".to_string(),
        }
    }
}

const STYLE: &str = r#"
body { font-family: "Segoe UI", system-ui, sans-serif; margin: 0; color: #1c2430; }
section { padding: 28px 40px; border-bottom: 1px solid #e3e7ee; }
.cover { background: #10243e; color: #f4f7fb; padding: 72px 40px; }
.cover h1 { margin: 0 0 8px; font-size: 30px; }
.cover p { margin: 4px 0; color: #b9c6d8; }
h2 { font-size: 20px; margin: 0 0 14px; }
.metrics { display: flex; gap: 28px; }
.metric { background: #f2f5f9; border-radius: 8px; padding: 14px 22px; }
.metric .value { font-size: 26px; font-weight: 700; }
.metric .name { font-size: 12px; color: #5b6678; text-transform: uppercase; }
table { border-collapse: collapse; width: 100%; font-size: 13px; }
th, td { border: 1px solid #d7dde6; padding: 6px 10px; text-align: left; }
th { background: #eef1f6; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
tr.eighty { background: #fbfcfe; }
tr.twenty td { color: #7f8ba0; }
.narrative p { max-width: 72ch; line-height: 1.55; }
"#;

/// Render the report as a downloadable byte stream.
pub fn render_html_report(meta: &ReportMeta, table: &ParetoTable) -> Result<Vec<u8>> {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(&meta.title)));
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

    push_cover(&mut html, meta);
    push_summary(&mut html, table);
    if !table.rows.is_empty() {
        html.push_str("<section><h2>Diagrama de Pareto</h2>\n");
        html.push_str(&pareto_chart_svg(table)?);
        html.push_str("</section>\n<section><h2>Distribución por categoría</h2>\n");
        html.push_str(&category_chart_svg(table)?);
        html.push_str("</section>\n");
    }
    push_table(&mut html, table);
    push_narrative(&mut html, table);

    html.push_str("</body>\n</html>\n");
    Ok(html.into_bytes())
}

fn push_cover(html: &mut String, meta: &ReportMeta) {
    let today = chrono::Utc::now().format("%d-%m-%Y");
    html.push_str("<section class=\"cover\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&meta.title)));
    if !meta.subtitle.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", escape(&meta.subtitle)));
    }
    html.push_str(&format!(
        "<p>{} — generado el {today}</p>\n</section>\n",
        escape(&meta.issued_by)
    ));
}

fn push_summary(html: &mut String, table: &ParetoTable) {
    let vital = table.vital_few().count();
    html.push_str("<section><h2>Resumen</h2>\n<div class=\"metrics\">\n");
    for (name, value) in [
        ("Eventos", table.total.to_string()),
        ("Descriptores", table.rows.len().to_string()),
        ("Grupo 80%", vital.to_string()),
    ] {
        html.push_str(&format!(
            "<div class=\"metric\"><div class=\"value\">{value}</div>\
             <div class=\"name\">{name}</div></div>\n"
        ));
    }
    html.push_str("</div>\n</section>\n");
}

fn push_table(html: &mut String, table: &ParetoTable) {
    html.push_str("<section><h2>Tabla de frecuencias</h2>\n<table>\n<tr>");
    for column in ["Descriptor", "Categoría", "Frecuencia", "%", "% acumulado", "Grupo"] {
        html.push_str(&format!("<th>{column}</th>"));
    }
    html.push_str("</tr>\n");
    for row in &table.rows {
        let class = match row.segment {
            Segment::Eighty => "eighty",
            Segment::Twenty => "twenty",
        };
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{:.2}</td><td class=\"num\">{:.2}</td><td>{}</td></tr>\n",
            escape(&row.label),
            row.category,
            row.frequency,
            row.pct,
            row.cum_pct,
            row.segment,
        ));
    }
    if table.rows.is_empty() {
        html.push_str("<tr><td colspan=\"6\">Sin datos: no se registraron frecuencias positivas.</td></tr>\n");
    }
    html.push_str("</table>\n</section>\n");
}

fn push_narrative(html: &mut String, table: &ParetoTable) {
    html.push_str("<section class=\"narrative\"><h2>Lectura del análisis</h2>\n");
    if table.rows.is_empty() {
        html.push_str(
            "<p>El conjunto de datos no contiene frecuencias positivas, por lo que no es \
             posible derivar una priorización. Verifique la tabla de entrada.</p>\n",
        );
        html.push_str("</section>\n");
        return;
    }

    let vital: Vec<_> = table.vital_few().collect();
    let vital_events: u64 = vital.iter().map(|r| r.frequency).sum();
    let vital_share = vital_events as f64 * 100.0 / table.total as f64;
    html.push_str(&format!(
        "<p>Se registraron {} eventos distribuidos en {} descriptores. Los {} descriptores \
         del grupo 80% concentran {} eventos, equivalentes al {:.1}% del total, y deben \
         tratarse como la prioridad de intervención.</p>\n",
        table.total,
        table.rows.len(),
        vital.len(),
        vital_events,
        vital_share,
    ));

    if let Some((category, events)) = table
        .category_totals()
        .into_iter()
        .max_by_key(|(_, events)| *events)
    {
        if events > 0 {
            html.push_str(&format!(
                "<p>La categoría con mayor peso es «{category}», con {events} eventos \
                 ({:.1}% del total registrado).</p>\n",
                events as f64 * 100.0 / table.total as f64,
            ));
        }
    }

    if let Some(top) = table.rows.first() {
        html.push_str(&format!(
            "<p>El descriptor individual más frecuente es «{}» con {} eventos ({:.1}%).</p>\n",
            escape(&top.label),
            top.frequency,
            top.pct,
        ));
    }
    html.push_str("</section>\n");
}

// ----------------------------------------------------------------------------
// Charts
// ----------------------------------------------------------------------------

fn pareto_chart_svg(table: &ParetoTable) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (880, 420)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let n = table.rows.len();
        let y_max = table
            .rows
            .iter()
            .map(|r| r.frequency)
            .max()
            .unwrap_or(1)
            .max(1) as f64
            * 1.1;

        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .x_label_area_size(36)
            .y_label_area_size(52)
            .right_y_label_area_size(52)
            .build_cartesian_2d(0f64..n as f64, 0f64..y_max)
            .map_err(chart_err)?
            .set_secondary_coord(0f64..n as f64, 0f64..105f64);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Frecuencia")
            .x_labels(n.min(12))
            .x_label_formatter(&|x| {
                let index = *x as usize;
                table
                    .rows
                    .get(index)
                    .map(|r| truncate(&r.label, 14))
                    .unwrap_or_default()
            })
            .draw()
            .map_err(chart_err)?;

        chart
            .configure_secondary_axes()
            .y_desc("% acumulado")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(table.rows.iter().enumerate().map(|(i, row)| {
                Rectangle::new(
                    [(i as f64 + 0.12, 0.0), (i as f64 + 0.88, row.frequency as f64)],
                    RGBColor(0x37, 0x7e, 0xb8).mix(0.75).filled(),
                )
            }))
            .map_err(chart_err)?;

        chart
            .draw_secondary_series(LineSeries::new(
                table
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| (i as f64 + 0.5, row.cum_pct)),
                RGBColor(0xe4, 0x1a, 0x1c).stroke_width(2),
            ))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

fn category_chart_svg(table: &ParetoTable) -> Result<String> {
    let totals = table.category_totals();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (560, 320)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let y_max = totals.iter().map(|(_, t)| *t).max().unwrap_or(1).max(1) as f64 * 1.15;
        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .x_label_area_size(32)
            .y_label_area_size(52)
            .build_cartesian_2d(0f64..3f64, 0f64..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Eventos")
            .x_labels(3)
            .x_label_formatter(&|x| {
                Category::ALL
                    .get(*x as usize)
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            })
            .draw()
            .map_err(chart_err)?;

        let palette = [
            RGBColor(0xe4, 0x1a, 0x1c),
            RGBColor(0x4d, 0xaf, 0x4a),
            RGBColor(0x98, 0x4e, 0xa3),
        ];
        chart
            .draw_series(totals.iter().enumerate().map(|(i, (_, total))| {
                Rectangle::new(
                    [(i as f64 + 0.2, 0.0), (i as f64 + 0.8, *total as f64)],
                    palette[i % palette.len()].mix(0.8).filled(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

fn chart_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}

fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Tests
// ============================================================================
