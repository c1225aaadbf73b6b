//! Single-document HTML rendering
//!
//! Same section coverage as the paginated artifact. Conditional groups that
//! were not collected stay visible as collapsed `<details>` blocks carrying
//! the reason, and diagram markers are positioned in CSS percentages.

use std::fmt::{self, Write as _};

use incident_types::{DamageKind, IncidentReport};

use crate::config::RenderConfig;
use crate::geometry::{map_to_region, Region};
use crate::palette::{damage_color_hex, damage_symbol};
use crate::sections::{marker_rows, parse_data_url, Presence, ReportView, Row, Section, SectionKey};

const STYLE: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 2rem auto; max-width: 52rem; color: #222; }
h1 { text-align: center; }
section { margin-bottom: 1.5rem; }
h2 { border-bottom: 1px solid #ccc; padding-bottom: .25rem; }
dl { display: grid; grid-template-columns: 14rem 1fr; gap: .25rem 1rem; }
dt { font-weight: bold; }
dd { margin: 0; white-space: pre-wrap; }
details { margin: .75rem 0; }
details > summary { font-weight: bold; cursor: pointer; }
.not-collected { color: #777; font-style: italic; }
.status { padding: .15rem .6rem; border-radius: 1rem; background: #eee; }
.status-submitted { background: #dbeafe; }
.status-under_review { background: #fef3c7; }
.status-approved { background: #dcfce7; }
.status-rejected { background: #fee2e2; }
.vehicle-diagram { position: relative; width: 100%; aspect-ratio: 4 / 3; }
.vehicle-diagram svg { position: absolute; inset: 0; width: 100%; height: 100%; }
.marker { position: absolute; transform: translate(-50%, -50%); width: 1.1rem; height: 1.1rem; border-radius: 50%; color: #fff; font-size: .7rem; text-align: center; line-height: 1.1rem; }
.legend { display: grid; grid-template-columns: repeat(3, 1fr); list-style: none; padding: 0; }
.signature { max-width: 20rem; border: 1px solid #ccc; }
"#;

const VEHICLE_SVG: &str = r##"<svg viewBox="0 0 400 300" preserveAspectRatio="none" aria-hidden="true">
<rect x="40" y="0" width="320" height="120" rx="5" fill="#d9d9d9" stroke="#808080"/>
<rect x="40" y="150" width="320" height="60" fill="#d9d9d9" stroke="#808080"/>
<circle cx="80" cy="30" r="8" fill="#808080"/><circle cx="80" cy="90" r="8" fill="#808080"/>
<circle cx="320" cy="30" r="8" fill="#808080"/><circle cx="320" cy="90" r="8" fill="#808080"/>
<circle cx="100" cy="195" r="8" fill="#808080"/><circle cx="300" cy="195" r="8" fill="#808080"/>
<text x="200" y="139" text-anchor="middle" font-size="10">Top View</text>
<text x="200" y="233" text-anchor="middle" font-size="10">Side View</text>
</svg>"##;

/// Escape text for HTML content and attribute values
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_html(report: &IncidentReport, config: &RenderConfig) -> Result<String, fmt::Error> {
    let view = ReportView::build(report, &config.placeholder);
    let mut out = String::new();

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(
        out,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )?;
    writeln!(
        out,
        "<title>{} - {}</title>",
        esc(&config.metadata.title),
        esc(&view.header.report_id)
    )?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    header(&mut out, &view, &config.metadata.title)?;
    for section in &view.sections {
        write_section(&mut out, section, report)?;
        if section.key == SectionKey::VehicleDamage
            && !report.vehicle_damage.rental_vehicle_damage.is_empty()
        {
            diagram(&mut out, report, &config.placeholder)?;
        }
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

fn header(out: &mut String, view: &ReportView, title: &str) -> fmt::Result {
    let status = view.header.status;
    writeln!(out, "<header>")?;
    writeln!(out, "<h1>{}</h1>", esc(title))?;
    writeln!(out, "<dl>")?;
    definition(out, "Report ID", &view.header.report_id)?;
    writeln!(
        out,
        "<dt>Status</dt><dd><span class=\"status status-{}\">{}</span></dd>",
        status.as_str(),
        esc(&status.label())
    )?;
    definition(out, "Reporter", &view.header.reporter)?;
    definition(out, "Date", &view.header.created)?;
    writeln!(out, "</dl>")?;
    writeln!(out, "</header>")
}

fn anchor(key: SectionKey) -> &'static str {
    match key {
        SectionKey::PolicyAgreements => "policy-agreements",
        SectionKey::PersonalInfo => "personal-info",
        SectionKey::VehicleInfo => "vehicle-info",
        SectionKey::IncidentDetails => "incident-details",
        SectionKey::OperatorInfo => "operator-info",
        SectionKey::IncidentLocation => "incident-location",
        SectionKey::VehicleDamage => "vehicle-damage",
        SectionKey::OtherVehicleOwner => "other-vehicle-owner",
        SectionKey::OtherVehicleOperator => "other-vehicle-operator",
        SectionKey::OtherVehicleDetails => "other-vehicle-details",
        SectionKey::Witnesses => "witnesses",
        SectionKey::Witness => "witness",
        SectionKey::AccidentDescription => "accident-description",
        SectionKey::Signature => "signature",
        SectionKey::Metadata => "metadata",
    }
}

fn write_section(out: &mut String, section: &Section, report: &IncidentReport) -> fmt::Result {
    if let Presence::NotCollected(reason) = &section.presence {
        return collapsed(out, section, reason);
    }
    writeln!(out, "<section id=\"{}\">", anchor(section.key))?;
    writeln!(out, "<h2>{}</h2>", esc(&section.title))?;
    rows(out, &section.rows)?;
    if section.key == SectionKey::Signature {
        signature_image(out, &report.signature.signature_data)?;
    }
    for child in &section.children {
        match &child.presence {
            Presence::Always => {
                writeln!(out, "<h3>{}</h3>", esc(&child.title))?;
                rows(out, &child.rows)?;
            }
            Presence::Collected => {
                writeln!(
                    out,
                    "<details class=\"conditional\" id=\"{}\" open>",
                    anchor(child.key)
                )?;
                writeln!(out, "<summary>{}</summary>", esc(&child.title))?;
                rows(out, &child.rows)?;
                writeln!(out, "</details>")?;
            }
            Presence::NotCollected(reason) => collapsed(out, child, reason)?,
        }
    }
    writeln!(out, "</section>")
}

fn collapsed(out: &mut String, section: &Section, reason: &str) -> fmt::Result {
    writeln!(
        out,
        "<details class=\"conditional\" id=\"{}\">",
        anchor(section.key)
    )?;
    writeln!(out, "<summary>{}</summary>", esc(&section.title))?;
    writeln!(out, "<p class=\"not-collected\">{}</p>", esc(reason))?;
    writeln!(out, "</details>")
}

fn rows(out: &mut String, rows: &[Row]) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "<dl>")?;
    for row in rows {
        definition(out, &row.label, &row.value)?;
    }
    writeln!(out, "</dl>")
}

fn definition(out: &mut String, label: &str, value: &str) -> fmt::Result {
    writeln!(out, "<dt>{}</dt><dd>{}</dd>", esc(label), esc(value))
}

/// Embedded only for `data:image/...` captures; anything else stays textual
fn signature_image(out: &mut String, data: &str) -> fmt::Result {
    let data = data.trim();
    match parse_data_url(data) {
        Some((media_type, _)) if media_type.starts_with("image/") => writeln!(
            out,
            "<img class=\"signature\" src=\"{}\" alt=\"Signature\">",
            esc(data)
        ),
        _ => Ok(()),
    }
}

fn diagram(out: &mut String, report: &IncidentReport, placeholder: &str) -> fmt::Result {
    let markers = &report.vehicle_damage.rental_vehicle_damage;
    writeln!(out, "<section id=\"damage-diagram\" class=\"diagram\">")?;
    writeln!(out, "<h2>Vehicle Damage Diagram</h2>")?;
    writeln!(out, "<p class=\"diagram-front\">Front</p>")?;
    writeln!(out, "<div class=\"vehicle-diagram\">")?;
    writeln!(out, "{VEHICLE_SVG}")?;
    for (i, marker) in markers.iter().enumerate() {
        let (left, top) = map_to_region(marker.coordinates, &Region::PERCENT);
        writeln!(
            out,
            "<div class=\"marker marker-{}\" style=\"left:{left}%;top:{top}%;background:{}\" title=\"{}\">{}</div>",
            marker.kind.as_str(),
            damage_color_hex(marker.kind),
            esc(&format!("{} ({})", marker.kind.label(), marker.severity.label())),
            i + 1
        )?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, "<h3>Damage Type Legend</h3>")?;
    writeln!(out, "<ul class=\"legend\">")?;
    for kind in DamageKind::SELECTABLE {
        writeln!(
            out,
            "<li><span style=\"color:{}\">{}</span> {}</li>",
            damage_color_hex(kind),
            damage_symbol(kind),
            esc(&kind.label())
        )?;
    }
    writeln!(out, "</ul>")?;

    writeln!(out, "<h3>Damage Details</h3>")?;
    writeln!(out, "<ol class=\"damage-details\">")?;
    for marker in markers {
        writeln!(out, "<li>")?;
        rows(out, &marker_rows(marker, placeholder))?;
        writeln!(out, "</li>")?;
    }
    writeln!(out, "</ol>")?;
    writeln!(out, "</section>")
}
