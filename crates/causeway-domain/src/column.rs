//! Column labels
//!
//! Columns are rendered as letters in user-facing text: column 0 is `A`,
//! column 1 is `B`, and so on.

/// Number of columns that have a single-letter label (`A` to `Z`)
pub const MAX_LABELLED_COLUMNS: u32 = 26;

/// Letter label of a column, or `None` past `Z`
///
/// # Examples
///
/// ```
/// use causeway_domain::column_label;
///
/// assert_eq!(column_label(0), Some('A'));
/// assert_eq!(column_label(1), Some('B'));
/// assert_eq!(column_label(26), None);
/// ```
pub fn column_label(column: u32) -> Option<char> {
    if column < MAX_LABELLED_COLUMNS {
        char::from_u32('A' as u32 + column)
    } else {
        None
    }
}
