//! Order-preserving grouping of a sequence into bounded chunks.

use crate::error::InvalidArgument;

/// Lazy iterator over consecutive chunks of at most `batch_size` items.
///
/// Items are pulled from the source only when the next chunk is requested.
/// Every chunk holds exactly `batch_size` items except possibly the last.
#[derive(Debug)]
pub struct Batches<I> {
    source: I,
    batch_size: usize,
}

impl<I: Iterator> Batches<I> {
    pub fn new<S>(source: S, batch_size: usize) -> Result<Self, InvalidArgument>
    where
        S: IntoIterator<IntoIter = I, Item = I::Item>,
    {
        if batch_size == 0 {
            return Err(InvalidArgument("batch size must be at least 1".into()));
        }
        Ok(Batches {
            source: source.into_iter(),
            batch_size,
        })
    }
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<_> = self.source.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// Hand `items` to `consume` in chunks of at most `batch_size`, synchronously
/// and in input order. `consume` is never called with an empty chunk.
pub fn batchify<T, S, F>(items: S, batch_size: usize, mut consume: F) -> Result<(), InvalidArgument>
where
    S: IntoIterator<Item = T>,
    F: FnMut(Vec<T>),
{
    for batch in Batches::new(items, batch_size)? {
        consume(batch);
    }
    Ok(())
}
