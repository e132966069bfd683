//! Service-note document rendering.
//!
//! Reproduces the fixed office-document template used for printed notes: a
//! boilerplate addressee block, a centered title, one request paragraph
//! interpolated with the cartridge article/model/quantity, and a signature
//! line. Times New Roman, 14pt throughout.

use crate::entities::{cartridge, employee, service_note};
use crate::errors::ServiceError;
use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts};
use std::io::Cursor;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// 14pt in half-points.
const FONT_SIZE: usize = 28;
/// Left indent of the addressee block, 8.25cm in twips.
const HEADER_INDENT: i32 = 4677;

const HEADER_LINES: [&str; 5] = [
    "Исполняющему обязанности начальника",
    "отдела информатизации",
    "Краснодарского филиала",
    "РЭУ им. Г.В. Плеханова",
    "Петровскому Д. А.",
];
const TITLE: &str = "служебная записка.";
const SIGNATURE: &str = "_______________________";
const BLANK_AUTHOR: &str = "_______________";

pub fn document_filename(note_number: &str) -> String {
    format!("service_note_{}.docx", note_number.replace('-', "_"))
}

/// "Ivanov Ivan Ivanovich" -> "Ivanov I. I."
fn short_name(full_name: &str) -> String {
    fn initial(word: &str) -> String {
        word.chars().next().map(String::from).unwrap_or_default()
    }

    let parts: Vec<&str> = full_name.split_whitespace().collect();
    match parts.as_slice() {
        [] => BLANK_AUTHOR.to_string(),
        [surname] => (*surname).to_string(),
        [surname, first] => format!("{} {}.", surname, initial(first)),
        [surname, first, patronymic, ..] => {
            format!("{} {}. {}.", surname, initial(first), initial(patronymic))
        }
    }
}

fn text_run(text: &str) -> Run {
    Run::new()
        .add_text(text)
        .size(FONT_SIZE)
        .fonts(RunFonts::new().ascii("Times New Roman"))
}

fn blank_paragraph() -> Paragraph {
    Paragraph::new()
}

/// Renders the note into a .docx byte buffer.
pub fn render_note(
    note: &service_note::Model,
    author: Option<&employee::Model>,
    cartridge: Option<&cartridge::Model>,
) -> Result<Vec<u8>, ServiceError> {
    let author_short = author
        .map(|a| short_name(&a.full_name))
        .unwrap_or_else(|| BLANK_AUTHOR.to_string());
    let author_position = author.and_then(|a| a.position.clone());

    let mut header = Paragraph::new()
        .align(AlignmentType::Left)
        .indent(Some(HEADER_INDENT), None, None, None);
    for line in HEADER_LINES {
        header = header.add_run(text_run(line).add_break(BreakType::TextWrapping));
    }
    if let Some(position) = author_position {
        header = header.add_run(text_run(&position).add_break(BreakType::TextWrapping));
    }
    header = header.add_run(text_run(&author_short));

    let article = cartridge.map(|c| c.article.as_str()).unwrap_or("картридж");
    let model = cartridge.map(|c| c.model.as_str()).unwrap_or("");
    let body_text = format!(
        "Прошу предоставить картридж {} для лазерного принтера {} в количестве {} шт.",
        article, model, note.quantity
    );

    let docx = Docx::new()
        .add_paragraph(header)
        .add_paragraph(blank_paragraph())
        .add_paragraph(blank_paragraph())
        .add_paragraph(blank_paragraph())
        .add_paragraph(blank_paragraph())
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(text_run(TITLE)),
        )
        .add_paragraph(blank_paragraph())
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(text_run(&body_text)),
        )
        .add_paragraph(blank_paragraph())
        .add_paragraph(blank_paragraph())
        .add_paragraph(blank_paragraph())
        .add_paragraph(blank_paragraph())
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Right)
                .add_run(text_run(SIGNATURE)),
        );

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ServiceError::InternalError(format!("failed to render document: {}", e)))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_replaces_dashes() {
        assert_eq!(
            document_filename("CART-2026-001"),
            "service_note_CART_2026_001.docx"
        );
    }

    #[test]
    fn short_name_handles_name_shapes() {
        assert_eq!(short_name("Иванов Иван Иванович"), "Иванов И. И.");
        assert_eq!(short_name("Иванов Иван"), "Иванов И.");
        assert_eq!(short_name("Иванов"), "Иванов");
        assert_eq!(short_name(""), BLANK_AUTHOR);
    }
}
