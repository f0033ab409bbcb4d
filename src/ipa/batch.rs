use crate::error::ConversionError;

/// Apply `transform` to every item, walking the slice in fixed-size chunks.
///
/// The chunking exists purely for progress-reporting granularity: items are
/// processed sequentially and the output order always matches the input
/// order. A chunk size of zero is clamped to one. The first failing item
/// aborts the whole run; there are no partial results.
pub fn round_robin_map<T, U, F>(
    items: &[T],
    mut transform: F,
    chunk_size: usize,
    label: &str,
) -> Result<Vec<U>, ConversionError>
where
    F: FnMut(&T) -> Result<U, ConversionError>,
{
    let chunk_size = chunk_size.max(1);
    let total = items.len();
    let mut output = Vec::with_capacity(total);

    for chunk in items.chunks(chunk_size) {
        for item in chunk {
            output.push(transform(item)?);
        }
        eprintln!("{label}: {}/{total}", output.len());
    }

    Ok(output)
}
