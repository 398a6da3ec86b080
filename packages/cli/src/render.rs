//! Plain-text presentation of API objects.
//!
//! Content items dispatch on their [`ContentType`]; uploads pick a preview
//! from the file extension.

use std::io::{self, Write};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use common::file_kind::extension_of;
use common::{ContentType, PreviewKind};

use crate::error::ClientError;
use crate::models::{Card, CardStyle, Content, Space, User};

/// Longest text preview printed inline, in characters.
const TEXT_PREVIEW_LIMIT: usize = 4000;

pub fn user(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(out, "{} <{}>  (id {})", user.full_name(), user.email, user.id)?;
    let optional = [
        ("Title", &user.job_title),
        ("Company", &user.company),
        ("Phone", &user.phone),
        ("Website", &user.website),
        ("LinkedIn", &user.linkedin),
        ("Twitter", &user.twitter),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            writeln!(out, "  {label:<9} {value}")?;
        }
    }
    Ok(())
}

pub fn style(out: &mut impl Write, style: &CardStyle) -> io::Result<()> {
    writeln!(out, "{:<10} {}", style.name, style.description)
}

pub fn card(out: &mut impl Write, card: &Card) -> io::Result<()> {
    writeln!(
        out,
        "{}  [{}]  {} {} <{}>",
        card.card_id, card.style_name, card.first_name, card.last_name, card.email
    )?;
    if let Some(qr) = &card.qr_code_url {
        writeln!(out, "  qr: {qr}")?;
    }
    let data = serde_json::to_string_pretty(&card.card_data).map_err(io::Error::other)?;
    for line in data.lines() {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

pub fn space(out: &mut impl Write, space: &Space) -> io::Result<()> {
    write!(out, "{}  {}  /{}", space.space_id, space.name, space.slug())?;
    if let Some(parent) = &space.parent_name {
        write!(out, "  (in {parent})")?;
    }
    if space.child_count > 0 {
        write!(out, "  [{} sub-spaces]", space.child_count)?;
    }
    writeln!(out)?;
    writeln!(out, "  {}", space.description)
}

/// One-line-per-field summary of a content item, as shown in listings.
pub fn content(out: &mut impl Write, item: &Content) -> io::Result<()> {
    let when = item.created_at.format("%Y-%m-%d %H:%M");
    match item.content_type {
        ContentType::Notes => {
            writeln!(out, "{}  note  {when}", item.content_id)?;
            let text = item.data_str("text").unwrap_or_default();
            for line in text.lines() {
                writeln!(out, "  {line}")?;
            }
        }
        ContentType::Url => {
            writeln!(out, "{}  link  {when}", item.content_id)?;
            writeln!(out, "  {}", item.data_str("url").unwrap_or("(no url)"))?;
        }
        ContentType::Upload => {
            let name = item.data_str("fileName").unwrap_or("unnamed");
            writeln!(out, "{}  file  {when}", item.content_id)?;
            write!(out, "  {name}")?;
            if let Some(size) = item.data_str("fileSizeFormatted") {
                write!(out, "  {size}")?;
            }
            if let Some(kind) = item.data_str("uploadType") {
                write!(out, "  {kind}")?;
            }
            writeln!(out)?;
            if let Some(description) = item.data_str("description") {
                writeln!(out, "  {description}")?;
            }
        }
    }
    Ok(())
}

/// How an upload should be previewed, from its recorded extension or name.
pub fn preview_kind(item: &Content) -> PreviewKind {
    let extension = item
        .data_str("fileExtension")
        .map(str::to_string)
        .or_else(|| item.data_str("fileName").map(extension_of))
        .unwrap_or_default();
    PreviewKind::for_extension(&extension)
}

/// Bytes of an upload fetched through the full-content endpoint.
pub fn upload_bytes(item: &Content) -> Result<Vec<u8>, ClientError> {
    let data_url = item
        .data_str("fileContent")
        .ok_or_else(|| ClientError::InvalidInput("content has no file data".into()))?;
    decode_data_url(data_url)
}

/// Decode `data:<mime>;base64,<payload>` or a bare base64 string.
pub fn decode_data_url(value: &str) -> Result<Vec<u8>, ClientError> {
    let payload = match value.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or_else(|| ClientError::InvalidInput("malformed data URL".into()))?,
        None => value,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|e| ClientError::InvalidInput(format!("invalid base64 file data: {e}")))
}

/// Full view of one item. Text-like uploads are printed inline; other
/// uploads are described and left for the caller to save.
pub fn preview(out: &mut impl Write, item: &Content) -> Result<(), ClientError> {
    content(out, item)?;
    match item.content_type {
        ContentType::Notes => {}
        ContentType::Url => {
            if let Some(domain) = item.data_str("domain") {
                writeln!(out, "  domain: {domain}")?;
            }
        }
        ContentType::Upload => {
            let kind = preview_kind(item);
            match kind {
                PreviewKind::Text => {
                    let bytes = upload_bytes(item)?;
                    let text = String::from_utf8_lossy(&bytes);
                    writeln!(out, "  ---")?;
                    let shown: String = text.chars().take(TEXT_PREVIEW_LIMIT).collect();
                    for line in shown.lines() {
                        writeln!(out, "  {line}")?;
                    }
                    if text.chars().count() > TEXT_PREVIEW_LIMIT {
                        writeln!(out, "  ... (truncated)")?;
                    }
                }
                PreviewKind::Download => {
                    writeln!(out, "  No preview available; save it with --output.")?;
                }
                other => {
                    let label = match other {
                        PreviewKind::Image => "image",
                        PreviewKind::Pdf => "PDF document",
                        PreviewKind::Video => "video",
                        _ => "audio",
                    };
                    writeln!(out, "  {label} preview: save it with --output to open it.")?;
                }
            }
        }
    }
    Ok(())
}
