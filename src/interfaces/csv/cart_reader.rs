use crate::domain::cart::CartItem;
use crate::error::{OrderError, Result};
use std::io::Read;

/// Reads cart lines from a CSV source.
///
/// Expects the header `productId,name,slug,image,price,qty`. Whitespace around
/// fields is trimmed; a malformed row yields an error without stopping the stream.
pub struct CartReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartReader<R> {
    /// Creates a new `CartReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes cart lines.
    pub fn items(self) -> impl Iterator<Item = Result<CartItem>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(OrderError::from))
    }
}
