use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid NBT data: {0}")]
    InvalidNbtData(String),
    #[error("Invalid placeholder identifier {0:?}")]
    InvalidPlaceholderIdentifier(String),
    #[error("Slot at row {row}, column {column} is outside of the menu")]
    SlotOutOfBounds { row: usize, column: usize },
    #[error("A menu must have between 1 and 6 rows, got {0}")]
    InvalidRowCount(usize),
}
