//! First layout pass: report content onto fixed-size pages
//!
//! Content flows top to bottom between the margins; anything that would cross
//! the bottom margin moves to a new page. Page numbers are added afterwards by
//! [`crate::footer`].

use incident_types::IncidentReport;

use crate::canvas::{Canvas, Color, PagedDocument};
use crate::config::RenderConfig;
use crate::diagram;
use crate::geometry::Region;
use crate::metrics::{text_width, wrap, Font};
use crate::sections::{marker_rows, ReportView, Row, Section, SectionKey};

const TITLE: &str = "Incident Report";
const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const SUBHEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 14.0;
const LABEL_WIDTH: f32 = 170.0;

/// Lay out the whole report
pub fn layout(report: &IncidentReport, config: &RenderConfig) -> PagedDocument {
    let view = ReportView::build(report, &config.placeholder);
    let mut composer = Composer::new(config);

    composer.header(&view);
    for section in &view.sections {
        if !section.is_collected() {
            continue;
        }
        composer.section(section);
        if section.key == SectionKey::VehicleDamage
            && !report.vehicle_damage.rental_vehicle_damage.is_empty()
        {
            composer.diagram_page(report);
        }
    }
    composer.finish()
}

struct Composer<'a> {
    canvas: Canvas,
    config: &'a RenderConfig,
    y: f32,
}

impl<'a> Composer<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        let (width, height) = config.page_size.dimensions();
        Self {
            canvas: Canvas::new(width, height),
            config,
            y: config.margin,
        }
    }

    fn left(&self) -> f32 {
        self.config.margin
    }

    fn content_width(&self) -> f32 {
        self.canvas.width() - 2.0 * self.config.margin
    }

    fn bottom(&self) -> f32 {
        self.canvas.height() - self.config.margin
    }

    fn new_page(&mut self) {
        self.canvas.show_page();
        self.y = self.config.margin;
    }

    /// Move to a fresh page unless `height` more points fit on this one
    fn ensure_space(&mut self, height: f32) {
        if self.y + height > self.bottom() && !self.canvas.page_is_blank() {
            self.new_page();
        }
    }

    fn header(&mut self, view: &ReportView) {
        let x = (self.canvas.width() - text_width(TITLE, Font::Bold, TITLE_SIZE)) / 2.0;
        self.canvas
            .text(x, self.y + TITLE_SIZE, TITLE, Font::Bold, TITLE_SIZE);
        self.y += TITLE_SIZE + 16.0;

        let rows = [
            ("Report ID", view.header.report_id.clone()),
            ("Status", view.header.status.label()),
            ("Reporter", view.header.reporter.clone()),
            ("Date", view.header.created.clone()),
        ];
        for (label, value) in rows {
            self.row(&Row {
                label: label.to_string(),
                value,
            });
        }
        self.y += 6.0;
        self.rule();
    }

    fn rule(&mut self) {
        let left = self.left();
        let right = left + self.content_width();
        self.canvas.save();
        self.canvas.stroke_color(Color::LIGHT_GRAY);
        self.canvas.line_width(0.5);
        self.canvas.line((left, self.y), (right, self.y));
        self.canvas.stroke();
        self.canvas.restore();
        self.y += 6.0;
    }

    fn heading(&mut self, title: &str, size: f32) {
        // keep a heading together with its first row
        self.ensure_space(size + 8.0 + LINE_HEIGHT);
        self.y += 8.0;
        let x = self.left();
        self.canvas.text(x, self.y + size, title, Font::Bold, size);
        self.y += size + 6.0;
    }

    fn row(&mut self, row: &Row) {
        let label_lines = wrap(
            &format!("{}:", row.label),
            Font::Bold,
            BODY_SIZE,
            LABEL_WIDTH - 8.0,
        );
        let value_lines = wrap(
            &row.value,
            Font::Regular,
            BODY_SIZE,
            self.content_width() - LABEL_WIDTH,
        );
        let x = self.left();
        for i in 0..label_lines.len().max(value_lines.len()) {
            self.ensure_space(LINE_HEIGHT);
            let baseline = self.y + BODY_SIZE;
            if let Some(line) = label_lines.get(i) {
                self.canvas.text(x, baseline, line, Font::Bold, BODY_SIZE);
            }
            if let Some(line) = value_lines.get(i) {
                self.canvas
                    .text(x + LABEL_WIDTH, baseline, line, Font::Regular, BODY_SIZE);
            }
            self.y += LINE_HEIGHT;
        }
    }

    fn section(&mut self, section: &Section) {
        self.heading(&section.title, HEADING_SIZE);
        for row in &section.rows {
            self.row(row);
        }
        for child in section.children.iter().filter(|c| c.is_collected()) {
            self.heading(&child.title, SUBHEADING_SIZE);
            for row in &child.rows {
                self.row(row);
            }
        }
    }

    /// Dedicated page: silhouette with markers, legend, then marker details
    fn diagram_page(&mut self, report: &IncidentReport) {
        if !self.canvas.page_is_blank() {
            self.new_page();
        }
        self.heading("Vehicle Damage Diagram", HEADING_SIZE);

        let area = &self.config.diagram;
        let top = self.y + diagram::LABEL_CLEARANCE;
        let region = Region::new(
            area.origin_x as f64,
            top as f64,
            area.width as f64,
            area.height as f64,
        );
        diagram::draw_vehicle(&mut self.canvas, &region);
        let markers = &report.vehicle_damage.rental_vehicle_damage;
        for (i, marker) in markers.iter().enumerate() {
            diagram::draw_marker(&mut self.canvas, i + 1, marker, &region);
        }
        self.y = top + area.height + 20.0;

        self.ensure_space(diagram::legend_height());
        let x = self.left();
        diagram::draw_legend(&mut self.canvas, x, self.y);
        self.y += diagram::legend_height() + 10.0;

        self.heading("Damage Details", SUBHEADING_SIZE);
        for (i, marker) in markers.iter().enumerate() {
            self.heading(&format!("Damage {}:", i + 1), BODY_SIZE);
            for row in marker_rows(marker, &self.config.placeholder) {
                self.row(&row);
            }
        }
        self.new_page();
    }

    fn finish(self) -> PagedDocument {
        self.canvas.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_report;

    fn all_texts(doc: &PagedDocument) -> Vec<Vec<String>> {
        doc.pages
            .iter()
            .map(|p| p.texts().map(str::to_string).collect())
            .collect()
    }

    fn page_of(doc: &PagedDocument, needle: &str) -> Option<usize> {
        all_texts(doc)
            .iter()
            .position(|texts| texts.iter().any(|t| t == needle))
    }

    #[test]
    fn test_sections_appear_in_order() {
        let doc = layout(&sample_report(), &RenderConfig::default());
        let flat: Vec<String> = all_texts(&doc).concat();
        let order = [
            "Incident Report",
            "Policy Agreements",
            "Personal Information",
            "Vehicle Information",
            "Incident Details",
            "Incident Location",
            "Vehicle Damage",
            "Vehicle Damage Diagram",
            "Witnesses",
            "Accident Description",
            "Signature and Confirmation",
            "Metadata",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|t| flat.iter().position(|s| s == t).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_diagram_has_its_own_page() {
        let doc = layout(&sample_report(), &RenderConfig::default());
        let diagram = page_of(&doc, "Vehicle Damage Diagram").unwrap();
        assert!(diagram > 0);
        assert_eq!(page_of(&doc, diagram::LEGEND_TITLE), Some(diagram));
        assert!(page_of(&doc, "Witnesses").unwrap() > diagram);
        let diagram_texts = &all_texts(&doc)[diagram];
        assert!(diagram_texts.iter().any(|t| t == "Damage 2:"));
        assert!(diagram_texts.iter().any(|t| t == "Rear bumper"));
    }

    #[test]
    fn test_no_diagram_without_markers() {
        let mut report = sample_report();
        report.vehicle_damage.rental_vehicle_damage.clear();
        let doc = layout(&report, &RenderConfig::default());
        assert_eq!(page_of(&doc, "Vehicle Damage Diagram"), None);
        assert_eq!(page_of(&doc, diagram::LEGEND_TITLE), None);
    }

    #[test]
    fn test_uncollected_groups_are_omitted() {
        let mut report = sample_report();
        report.witnesses.clear();
        let doc = layout(&report, &RenderConfig::default());
        assert_eq!(page_of(&doc, "Witnesses"), None);
        assert_eq!(page_of(&doc, "Operator Information"), None);
        assert_eq!(page_of(&doc, "Other Vehicle Owner"), None);
    }

    #[test]
    fn test_long_text_flows_within_margins() {
        let mut report = sample_report();
        report.accident_description.description = "skidded on the wet ramp ".repeat(400);
        let config = RenderConfig::default();
        let doc = layout(&report, &config);
        assert!(doc.page_count() > 3);
        let (_, height) = config.page_size.dimensions();
        for page in &doc.pages {
            for command in &page.commands {
                if let crate::canvas::Command::DrawString { y, .. } = command {
                    assert!(*y <= height - config.margin + BODY_SIZE);
                }
            }
        }
    }
}
