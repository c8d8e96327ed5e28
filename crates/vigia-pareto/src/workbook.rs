//! The XLSX workbook artifact.
//!
//! An XLSX file is a zip of OOXML parts; the computed table goes on a
//! worksheet and a native bar+line combination chart (frequencies on
//! the primary axis, cumulative percentage on the secondary) is
//! embedded through a drawing part, so the chart stays live inside any
//! spreadsheet application.
//!
//! An empty table still produces a valid workbook, just without the
//! chart parts.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::table::ParetoTable;

/// Worksheet name inside the workbook.
const SHEET_NAME: &str = "Pareto";

/// Column headers of the data sheet.
const HEADERS: [&str; 6] = [
    "Descriptor",
    "Categoría",
    "Frecuencia",
    "%",
    "% acumulado",
    "Grupo",
];

/// Build the workbook as a downloadable byte stream.
pub fn render_workbook(table: &ParetoTable) -> Result<Vec<u8>> {
    let with_chart = !table.rows.is_empty();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, body: String| -> Result<()> {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
        Ok(())
    };

    part(&mut zip, "[Content_Types].xml", content_types(with_chart))?;
    part(&mut zip, "_rels/.rels", package_rels())?;
    part(&mut zip, "xl/workbook.xml", workbook_xml())?;
    part(&mut zip, "xl/_rels/workbook.xml.rels", workbook_rels())?;
    part(&mut zip, "xl/styles.xml", styles_xml())?;
    part(&mut zip, "xl/worksheets/sheet1.xml", sheet_xml(table, with_chart))?;
    if with_chart {
        part(&mut zip, "xl/worksheets/_rels/sheet1.xml.rels", sheet_rels())?;
        part(&mut zip, "xl/drawings/drawing1.xml", drawing_xml())?;
        part(&mut zip, "xl/drawings/_rels/drawing1.xml.rels", drawing_rels())?;
        part(&mut zip, "xl/charts/chart1.xml", chart_xml(table))?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn content_types(with_chart: bool) -> String {
    let mut overrides = String::from(
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    if with_chart {
        overrides.push_str(
            r#"
<Override PartName="/xl/drawings/drawing1.xml" ContentType="application/vnd.openxmlformats-officedocument.drawing+xml"/>
<Override PartName="/xl/charts/chart1.xml" ContentType="application/vnd.openxmlformats-officedocument.drawingml.chart+xml"/>"#,
        );
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
{overrides}
</Types>"#
    )
}

fn package_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
        .to_string()
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{SHEET_NAME}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
    )
}

fn workbook_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
        .to_string()
}

fn styles_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="1"><fill><patternFill patternType="none"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf/></cellStyleXfs>
<cellXfs count="1"><xf xfId="0"/></cellXfs>
</styleSheet>"#
        .to_string()
}

fn sheet_xml(table: &ParetoTable, with_chart: bool) -> String {
    let mut rows = String::new();

    rows.push_str("<row r=\"1\">");
    for (col, header) in HEADERS.iter().enumerate() {
        rows.push_str(&inline_str_cell(col, 1, header));
    }
    rows.push_str("</row>\n");

    for (index, row) in table.rows.iter().enumerate() {
        let r = index + 2;
        rows.push_str(&format!("<row r=\"{r}\">"));
        rows.push_str(&inline_str_cell(0, r, &row.label));
        rows.push_str(&inline_str_cell(1, r, &row.category.to_string()));
        rows.push_str(&number_cell(2, r, &row.frequency.to_string()));
        rows.push_str(&number_cell(3, r, &format!("{:.4}", row.pct)));
        rows.push_str(&number_cell(4, r, &format!("{:.4}", row.cum_pct)));
        rows.push_str(&inline_str_cell(5, r, &row.segment.to_string()));
        rows.push_str("</row>\n");
    }

    let drawing = if with_chart {
        r#"<drawing r:id="rId1"/>"#
    } else {
        ""
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheetData>
{rows}</sheetData>
{drawing}
</worksheet>"#
    )
}

fn sheet_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/>
</Relationships>"#
        .to_string()
}

fn drawing_xml() -> String {
    // Anchor the chart to the right of the data columns.
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
<xdr:twoCellAnchor>
<xdr:from><xdr:col>7</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
<xdr:to><xdr:col>16</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>24</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
<xdr:graphicFrame macro="">
<xdr:nvGraphicFramePr>
<xdr:cNvPr id="2" name="Diagrama de Pareto"/>
<xdr:cNvGraphicFramePr/>
</xdr:nvGraphicFramePr>
<xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>
<a:graphic>
<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">
<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId1"/>
</a:graphicData>
</a:graphic>
</xdr:graphicFrame>
<xdr:clientData/>
</xdr:twoCellAnchor>
</xdr:wsDr>"#
        .to_string()
}

fn drawing_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml"/>
</Relationships>"#
        .to_string()
}

fn chart_xml(table: &ParetoTable) -> String {
    let last_row = table.rows.len() + 1;
    let cat_ref = format!("{SHEET_NAME}!$A$2:$A${last_row}");
    let freq_ref = format!("{SHEET_NAME}!$C$2:$C${last_row}");
    let cum_ref = format!("{SHEET_NAME}!$E$2:$E${last_row}");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<c:chart>
<c:title><c:tx><c:rich><a:bodyPr/><a:p><a:r><a:t>Diagrama de Pareto</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title>
<c:autoTitleDeleted val="0"/>
<c:plotArea>
<c:layout/>
<c:barChart>
<c:barDir val="col"/>
<c:grouping val="clustered"/>
<c:varyColors val="0"/>
<c:ser>
<c:idx val="0"/><c:order val="0"/>
<c:tx><c:v>Frecuencia</c:v></c:tx>
<c:cat><c:strRef><c:f>{cat_ref}</c:f></c:strRef></c:cat>
<c:val><c:numRef><c:f>{freq_ref}</c:f></c:numRef></c:val>
</c:ser>
<c:axId val="1"/><c:axId val="2"/>
</c:barChart>
<c:lineChart>
<c:grouping val="standard"/>
<c:varyColors val="0"/>
<c:ser>
<c:idx val="1"/><c:order val="1"/>
<c:tx><c:v>% acumulado</c:v></c:tx>
<c:cat><c:strRef><c:f>{cat_ref}</c:f></c:strRef></c:cat>
<c:val><c:numRef><c:f>{cum_ref}</c:f></c:numRef></c:val>
</c:ser>
<c:marker val="1"/>
<c:axId val="3"/><c:axId val="4"/>
</c:lineChart>
<c:catAx>
<c:axId val="1"/><c:scaling><c:orientation val="minMax"/></c:scaling>
<c:delete val="0"/><c:axPos val="b"/><c:crossAx val="2"/>
</c:catAx>
<c:valAx>
<c:axId val="2"/><c:scaling><c:orientation val="minMax"/></c:scaling>
<c:delete val="0"/><c:axPos val="l"/>
<c:title><c:tx><c:rich><a:bodyPr/><a:p><a:r><a:t>Frecuencia</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title>
<c:crossAx val="1"/>
</c:valAx>
<c:valAx>
<c:axId val="4"/><c:scaling><c:orientation val="minMax"/><c:max val="100"/><c:min val="0"/></c:scaling>
<c:delete val="0"/><c:axPos val="r"/>
<c:title><c:tx><c:rich><a:bodyPr/><a:p><a:r><a:t>% acumulado</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title>
<c:crossAx val="3"/><c:crosses val="max"/>
</c:valAx>
<c:catAx>
<c:axId val="3"/><c:scaling><c:orientation val="minMax"/></c:scaling>
<c:delete val="1"/><c:axPos val="b"/><c:crossAx val="4"/>
</c:catAx>
</c:plotArea>
<c:plotVisOnly val="1"/>
</c:chart>
</c:chartSpace>"#
    )
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn inline_str_cell(col: usize, row: usize, text: &str) -> String {
    format!(
        "<c r=\"{}{row}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        column_letter(col),
        xml_escape(text)
    )
}

fn number_cell(col: usize, row: usize, value: &str) -> String {
    format!("<c r=\"{}{row}\"><v>{value}</v></c>", column_letter(col))
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::{compute, FrequencyEntry};
    use std::io::Read;

    fn sample_table() -> ParetoTable {
        compute(&[
            FrequencyEntry { label: "Homicidio".into(), frequency: 50 },
            FrequencyEntry { label: "Robo a vivienda".into(), frequency: 30 },
            FrequencyEntry { label: "Calles sin iluminación".into(), frequency: 20 },
        ])
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        archive.file_names().map(String::from).collect()
    }

    fn part_text(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_workbook_is_a_readable_archive_with_chart_parts() {
        let bytes = render_workbook(&sample_table()).unwrap();
        let names = part_names(&bytes);
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/worksheets/sheet1.xml",
            "xl/drawings/drawing1.xml",
            "xl/charts/chart1.xml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_sheet_carries_table_rows() {
        let bytes = render_workbook(&sample_table()).unwrap();
        let sheet = part_text(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("Homicidio"));
        assert!(sheet.contains("Delito"));
        assert!(sheet.contains("<v>50</v>"));
        assert!(sheet.contains("80%"));
        assert!(sheet.contains(r#"<drawing r:id="rId1"/>"#));
    }

    #[test]
    fn test_chart_references_the_data_ranges() {
        let bytes = render_workbook(&sample_table()).unwrap();
        let chart = part_text(&bytes, "xl/charts/chart1.xml");
        assert!(chart.contains("c:barChart"));
        assert!(chart.contains("c:lineChart"));
        assert!(chart.contains("Pareto!$A$2:$A$4"));
        assert!(chart.contains("Pareto!$C$2:$C$4"));
        assert!(chart.contains("Pareto!$E$2:$E$4"));
    }

    #[test]
    fn test_empty_table_omits_chart_parts() {
        let bytes = render_workbook(&ParetoTable::default()).unwrap();
        let names = part_names(&bytes);
        assert!(names.iter().all(|n| !n.contains("chart")));
        assert!(names.iter().all(|n| !n.contains("drawing")));
        let sheet = part_text(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("Descriptor"));
        assert!(!sheet.contains("<drawing"));
    }

    #[test]
    fn test_labels_are_xml_escaped() {
        let table = compute(&[FrequencyEntry {
            label: "A & B <C>".into(),
            frequency: 1,
        }]);
        let bytes = render_workbook(&table).unwrap();
        let sheet = part_text(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("A &amp; B &lt;C&gt;"));
    }

    #[test]
    fn test_content_types_match_parts() {
        let bytes = render_workbook(&sample_table()).unwrap();
        let types = part_text(&bytes, "[Content_Types].xml");
        assert!(types.contains("/xl/charts/chart1.xml"));

        let bytes = render_workbook(&ParetoTable::default()).unwrap();
        let types = part_text(&bytes, "[Content_Types].xml");
        assert!(!types.contains("/xl/charts/chart1.xml"));
    }
}
