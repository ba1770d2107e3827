// LasQC - core/export.rs
//
// Report output: human-readable text, JSON of the full report, and CSV of
// the per-curve table.
// Core layer: writes to any Write trait object.

use crate::core::classify::AliasTable;
use crate::core::model::{AnalysisReport, CurveReport, RuleStatus};
use crate::util::error::ExportError;
use std::fmt;
use std::io::Write;
use std::path::Path;

fn fmt_value(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "N/A".to_string())
}

/// Render the report as text: services, header, curve table, verdicts.
///
/// `aliases` is used to list the accepted spellings of missing curve types.
pub fn render_text_report(report: &AnalysisReport, aliases: &AliasTable) -> String {
    let mut out = String::new();
    // fmt::Write for String never returns Err.
    let _ = render(&mut out, report, aliases);
    out
}

fn render(out: &mut impl fmt::Write, report: &AnalysisReport, aliases: &AliasTable) -> fmt::Result {
    let id = &report.identity;

    writeln!(out, "Archivo: {}", report.source)?;
    writeln!(
        out,
        "En el pozo {} la compañía {} ejecutó los siguientes servicios:",
        id.well, id.company
    )?;
    for service in &report.requested_services {
        let mark = if report.detected_services.contains(service) {
            "+"
        } else {
            "-"
        };
        writeln!(out, "  [{mark}] {service}")?;
    }
    if report.detected_services.is_empty() {
        writeln!(out, "  Servicios detectados: ninguno")?;
    } else {
        writeln!(
            out,
            "  Servicios detectados: {}",
            report.detected_services.join(", ")
        )?;
    }

    // -- Header --
    writeln!(out, "\nControl de encabezado")?;
    for row in &report.header_rows {
        let marker = if row.empty { "  [Empty]" } else { "" };
        writeln!(
            out,
            "  {:<8} {:<24} {}{marker}",
            row.mnemonic, row.value, row.description
        )?;
    }

    // -- Curves --
    writeln!(out, "\nResultados de las pruebas de calidad")?;
    for curve in &report.curves {
        curve_line(out, curve)?;
        writeln!(out)?;
    }

    // -- Verdicts --
    writeln!(out)?;
    if report.header.compliant {
        writeln!(out, "El encabezado CUMPLE con el requerimiento")?;
    } else {
        writeln!(out, "El encabezado NO CUMPLE con el requerimiento")?;
        writeln!(
            out,
            "Las siguientes variables no se encontraron en el encabezado: {}",
            report.header.missing.join(", ")
        )?;
    }

    if report.summary.services_compliant {
        writeln!(out, "Se encuentran todas las curvas solicitadas. CUMPLE")?;
    } else {
        writeln!(
            out,
            "No se encuentran todas las curvas solicitadas. NO CUMPLE"
        )?;
        for verdict in report.verdicts.iter().filter(|v| !v.satisfied) {
            writeln!(
                out,
                "El servicio '{}' no cumple. Las siguientes variables faltan o no cumplen con los requerimientos:",
                verdict.service
            )?;
            for reason in verdict.reasons(|t| aliases.aliases_of(t).to_vec()) {
                writeln!(out, "  - {reason}")?;
            }
        }
    }

    for verdict in report.verdicts.iter().filter(|v| !v.advisories.is_empty()) {
        for a in &verdict.advisories {
            writeln!(
                out,
                "  {} {} - {} - {}: {}",
                a.status.symbol(),
                verdict.service,
                a.curve,
                a.rule,
                a.status.label()
            )?;
        }
    }

    let legend: Vec<String> = RuleStatus::all()
        .iter()
        .map(|s| format!("{} {}", s.symbol(), s.label()))
        .collect();
    writeln!(out, "\nReferencias: {}", legend.join("  "))?;

    writeln!(
        out,
        "\nResultado: {}",
        if report.summary.approved {
            "APROBADO"
        } else {
            "NO APROBADO"
        }
    )
}

fn curve_line(out: &mut impl fmt::Write, curve: &CurveReport) -> fmt::Result {
    let unit = curve.unit.as_deref().unwrap_or("N/A");
    write!(
        out,
        "  {:<12} {:<10} {:<8} media {:>10}",
        curve.mnemonic,
        curve.class.as_str(),
        unit,
        fmt_value(curve.stats.mean)
    )?;
    if let Some(expected) = &curve.expected_unit {
        if !expected.eq_ignore_ascii_case(unit) {
            write!(out, " (esperado {expected})")?;
        }
    }
    for o in &curve.outcomes {
        write!(out, "  {} {}", o.status.symbol(), o.label)?;
    }
    Ok(())
}

/// Write the text report.
pub fn write_text_report<W: Write>(
    report: &AnalysisReport,
    aliases: &AliasTable,
    mut writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    writer
        .write_all(render_text_report(report, aliases).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })
}

/// Export the whole report as pretty-printed JSON.
pub fn export_json<W: Write>(
    report: &AnalysisReport,
    writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, report).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })
}

/// Export the per-curve table as CSV: one row per curve, one column per
/// rule id (union of all curves' rules, first-seen order).
///
/// Returns the number of rows written.
pub fn export_curves_csv<W: Write>(
    curves: &[CurveReport],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut rule_ids: Vec<&str> = Vec::new();
    for o in curves.iter().flat_map(|c| &c.outcomes) {
        if !rule_ids.contains(&o.rule.as_str()) {
            rule_ids.push(&o.rule);
        }
    }

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec![
        "mnemonic", "type", "unit", "expected_unit", "mean", "min", "max",
    ];
    header.extend(rule_ids.iter().copied());
    csv_writer.write_record(&header).map_err(csv_err)?;

    let mut count = 0;
    for curve in curves {
        let mut record = vec![
            curve.mnemonic.clone(),
            curve.class.as_str().to_string(),
            curve.unit.clone().unwrap_or_default(),
            curve.expected_unit.clone().unwrap_or_default(),
            fmt_value(curve.stats.mean),
            fmt_value(curve.stats.min),
            fmt_value(curve.stats.max),
        ];
        for id in &rule_ids {
            record.push(
                curve
                    .outcome(id)
                    .map(|o| o.status.short_label().to_string())
                    .unwrap_or_default(),
            );
        }
        csv_writer.write_record(&record).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}
