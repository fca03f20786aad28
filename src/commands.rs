//! Subcommand implementations.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use brailledit_config::Config;
use brailledit_document::{Document, DocumentOptions, FileFormat, ViewKind};
use brailledit_keyboard::{ascii_to_unicode, BrailleCell};

use crate::cli::Command;

/// Run one subcommand, writing its report to `out`
pub fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Convert { input, output } => convert(config, &input, &output, out),
        Command::Rewrap {
            input,
            output,
            from_line,
            chars_per_line,
        } => rewrap(config, &input, &output, from_line, chars_per_line, out),
        Command::Info { input } => info(config, &input, out),
        Command::Cells { text } => cells(&text, out),
    }
}

fn format_of(path: &Path) -> Result<FileFormat> {
    FileFormat::from_path(path)
        .ok_or_else(|| anyhow!("{}: unknown format, expected .brf or .bzy", path.display()))
}

fn open_document(config: &Config, path: &Path) -> Result<Document> {
    let options = DocumentOptions::from_config(config).context("Invalid configuration")?;
    let mut document = Document::new(options);
    let format = format_of(path)?;
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    document
        .load(format, BufReader::new(file))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(document)
}

fn save_document(document: &mut Document, path: &Path) -> Result<()> {
    let format = format_of(path)?;
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    document
        .save(format, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn convert(config: &Config, input: &Path, output: &Path, out: &mut impl Write) -> Result<()> {
    let mut document = open_document(config, input)?;
    save_document(&mut document, output)?;
    writeln!(
        out,
        "{} -> {} ({} lines)",
        input.display(),
        output.display(),
        document.line_count()
    )?;
    Ok(())
}

fn rewrap(
    config: &Config,
    input: &Path,
    output: &Path,
    from_line: usize,
    chars_per_line: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let mut document = open_document(config, input)?;
    if let Some(chars_per_line) = chars_per_line {
        document.set_chars_per_line(chars_per_line)?;
    }

    let offset = document
        .model()
        .offset_at_line(from_line)
        .with_context(|| format!("Line {} is past the end of {}", from_line, input.display()))?;
    document.set_caret(ViewKind::Braille, offset)?;
    let wrapped = document.rewrap_from_caret()?;

    save_document(&mut document, output)?;
    writeln!(
        out,
        "Rewrapped {} lines to {} cells",
        wrapped,
        document.chars_per_line()
    )?;
    Ok(())
}

fn info(config: &Config, input: &Path, out: &mut impl Write) -> Result<()> {
    let document = open_document(config, input)?;
    let layout = document.layout();
    let paragraphs = (0..document.line_count())
        .filter(|&i| document.has_paragraph_end(i))
        .count();
    let longest = document
        .render_lines(0, document.line_count())
        .iter()
        .map(|line| line.width())
        .max()
        .unwrap_or(0);
    let margin = |m: Option<usize>| m.map_or_else(|| "off".to_string(), |m| m.to_string());

    writeln!(out, "File:            {}", input.display())?;
    writeln!(out, "Format:          {}", format_of(input)?)?;
    writeln!(out, "Line ending:     {}", document.line_ending())?;
    writeln!(out, "Chars per line:  {}", layout.chars_per_line())?;
    writeln!(out, "Lines per page:  {}", layout.lines_per_page())?;
    writeln!(out, "Line margin:     {}", margin(layout.line_margin()))?;
    writeln!(out, "Page margin:     {}", margin(layout.page_margin()))?;
    writeln!(out, "Lines:           {}", document.line_count())?;
    writeln!(out, "Pages:           {}", document.page_count())?;
    writeln!(out, "Paragraphs:      {}", paragraphs)?;
    writeln!(out, "Longest line:    {}", longest)?;
    Ok(())
}

fn cells(text: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", ascii_to_unicode(text))?;
    for ch in text.chars() {
        match BrailleCell::from_ascii(ch) {
            Some(cell) => {
                let dots: String = (1..=6)
                    .filter(|&dot| cell.has_dot(dot))
                    .map(|dot| char::from(b'0' + dot))
                    .collect();
                writeln!(out, "{} {} dots {}", ch, cell.to_unicode(), dots)?
            }
            None => writeln!(out, "{:?} not a braille character", ch)?,
        }
    }
    Ok(())
}
