//! Front door: sniffs the input bytes, routes to the XER or XML path, and
//! runs the CPM pass so callers always receive a fully populated schedule.

use crate::error::{ImportError, ImportResult};
use crate::msproject;
use crate::schedule::Schedule;
use crate::xer;

/// OLE compound-file magic; an MPP container, not an export.
const COMPOUND_BINARY_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// How far into the buffer the XML sniff looks.
const XML_SNIFF_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xer,
    ProjectXml,
    CompoundBinary,
}

pub fn detect_format(bytes: &[u8]) -> SourceFormat {
    if bytes.len() >= COMPOUND_BINARY_MAGIC.len()
        && bytes[..COMPOUND_BINARY_MAGIC.len()] == COMPOUND_BINARY_MAGIC
    {
        return SourceFormat::CompoundBinary;
    }
    let window = &bytes[..bytes.len().min(XML_SNIFF_WINDOW)];
    let head = String::from_utf8_lossy(window);
    if head.contains("<?xml") || head.contains("<Project") {
        return SourceFormat::ProjectXml;
    }
    SourceFormat::Xer
}

/// Parses bytes in either supported format and returns the schedule with
/// early/late dates and float already computed.
pub fn import_schedule(bytes: &[u8]) -> ImportResult<Schedule> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    if bytes.len() > xer::reader::MAX_FILE_BYTES {
        return Err(ImportError::FileTooLarge {
            size_mib: (bytes.len() / (1024 * 1024)) as u64,
            max_mib: (xer::reader::MAX_FILE_BYTES / (1024 * 1024)) as u64,
        });
    }

    let mut schedule = match detect_format(bytes) {
        SourceFormat::Xer => {
            let document = xer::read_document(bytes)?;
            xer::build_schedule(&document)?
        }
        SourceFormat::ProjectXml => {
            let text = String::from_utf8_lossy(bytes);
            msproject::parse_project_xml(&text)?
        }
        SourceFormat::CompoundBinary => {
            let embedded = scrape_embedded_xml(bytes)
                .ok_or(ImportError::BinaryFormatNotFullySupported)?;
            tracing::warn!("MPP container with embedded XML payload, attempting XML parse");
            msproject::parse_project_xml(&embedded)?
        }
    };

    schedule.recalculate();
    Ok(schedule)
}

/// Some MPP containers embed a full MSPDI document; pull out the
/// `<?xml … </Project>` span if one exists.
fn scrape_embedded_xml(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let start = text.find("<?xml")?;
    let end_tag = "</Project>";
    let end = text[start..].find(end_tag)? + start + end_tag.len();
    Some(text[start..end].to_string())
}
