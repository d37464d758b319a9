use super::Error;

#[derive(Debug)]
pub(super) struct IndexOutOfBounds {
    index: usize,
    len: usize,
}

impl std::error::Error for IndexOutOfBounds {}

impl core::fmt::Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "index out of bounds: the len is {} but the index is {}",
            self.len, self.index
        )
    }
}

impl Error {
    /// Creates an error for a list access past the end of the materialized list.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Error {
        let err = IndexOutOfBounds { index, len };
        Error::from(super::ErrorKind::IndexOutOfBounds(err))
    }

    /// Returns `true` if this error is an index out of bounds error.
    pub fn is_index_out_of_bounds(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::IndexOutOfBounds(_))
    }
}
