use crate::{
    catalog::ProtocolFamily,
    connections::tcp::ConnectionRecord,
    error::{FormatError, WrapFormat},
};

/// Decodes every row of a kernel TCP table.
///
/// The first non-empty line is the column header and is dropped whatever it
/// contains; other empty lines are ignored. Decoding stops at the first bad
/// row and nothing decoded so far is returned.
pub fn decode_table<I, S>(
    lines: I,
    family: ProtocolFamily,
) -> Result<Vec<ConnectionRecord>, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut header_skipped = false;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();

        if line.is_empty() {
            log::trace!("Skipping empty line {}.", index + 1);
            continue;
        }

        if !header_skipped {
            log::debug!("Skipping {family} table header: {:?}", line.trim());
            header_skipped = true;
            continue;
        }

        let record = ConnectionRecord::decode_line(line, family)
            .wrap_format(|| format!("parsing line {}", index + 1))?;
        records.push(record);
    }

    log::debug!("Decoded {} {family} connections.", records.len());

    Ok(records)
}
