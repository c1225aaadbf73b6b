//! Encoding a laid-out [`PagedDocument`] as PDF bytes

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

use crate::canvas::{Command, PagedDocument};
use crate::config::DocumentMetadata;
use crate::error::RenderError;
use crate::metrics::{encode_win_ansi, Font};

const CREATOR: &str = "report-render";

pub fn write_pdf(
    doc: &PagedDocument,
    metadata: &DocumentMetadata,
    created_at: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut pdf = Document::with_version("1.7");
    let pages_id = pdf.new_object_id();

    let mut fonts = Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let font_id = pdf.add_object(Dictionary::from_iter(vec![
            ("Type", name("Font")),
            ("Subtype", name("Type1")),
            ("BaseFont", name(font.base_font())),
            ("Encoding", name("WinAnsiEncoding")),
        ]));
        fonts.set(font.resource_name(), Object::Reference(font_id));
    }
    let resources_id = pdf.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(fonts),
    )]));

    let mut kids = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let content: Content = Content {
            operations: page
                .commands
                .iter()
                .flat_map(|c| operations(c, doc.height))
                .collect::<Vec<_>>(),
        };
        let content_id = pdf.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = pdf.add_object(Dictionary::from_iter(vec![
            ("Type", name("Page")),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", name("Pages")),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
        ("Resources", Object::Reference(resources_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(doc.width),
                Object::Real(doc.height),
            ]),
        ),
    ]);
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = pdf.add_object(Dictionary::from_iter(vec![
        ("Type", name("Catalog")),
        ("Pages", Object::Reference(pages_id)),
    ]));
    pdf.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = pdf.add_object(Dictionary::from_iter(vec![
        ("Title", literal(&metadata.title)),
        ("Author", literal(&metadata.author)),
        ("Creator", literal(CREATOR)),
        ("CreationDate", literal(&pdf_date(created_at))),
    ]));
    pdf.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

/// `D:YYYYMMDDHHmmSSZ`
fn pdf_date(at: DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%SZ").to_string()
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn literal(value: &str) -> Object {
    Object::String(encode_win_ansi(value), StringFormat::Literal)
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

/// Content-stream operators for one command; `height` flips y to PDF space
fn operations(command: &Command, height: f32) -> Vec<Operation> {
    let flip = |y: f32| height - y;
    match command {
        Command::SaveState => vec![Operation::new("q", vec![])],
        Command::RestoreState => vec![Operation::new("Q", vec![])],
        Command::SetFillColor(c) => vec![Operation::new("rg", reals(&[c.r, c.g, c.b]))],
        Command::SetStrokeColor(c) => vec![Operation::new("RG", reals(&[c.r, c.g, c.b]))],
        Command::SetLineWidth(w) => vec![Operation::new("w", reals(&[*w]))],
        Command::MoveTo { x, y } => vec![Operation::new("m", reals(&[*x, flip(*y)]))],
        Command::LineTo { x, y } => vec![Operation::new("l", reals(&[*x, flip(*y)]))],
        Command::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        } => vec![Operation::new(
            "c",
            reals(&[*x1, flip(*y1), *x2, flip(*y2), *x, flip(*y)]),
        )],
        Command::ClosePath => vec![Operation::new("h", vec![])],
        Command::Fill => vec![Operation::new("f", vec![])],
        Command::Stroke => vec![Operation::new("S", vec![])],
        Command::FillStroke => vec![Operation::new("B", vec![])],
        Command::DrawRect {
            x,
            y,
            width,
            height: h,
        } => vec![Operation::new("re", reals(&[*x, flip(*y + *h), *width, *h]))],
        Command::DrawString {
            x,
            y,
            text,
            font,
            size,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![name(font.resource_name()), Object::Real(*size)],
            ),
            Operation::new("Td", reals(&[*x, flip(*y)])),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
    }
}
