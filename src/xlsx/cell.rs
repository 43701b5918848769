//! A1-style cell references

use std::fmt;
use std::str::FromStr;

use crate::error::DbDictError;

/// Largest column index (`XFD`)
pub const MAX_COL: u32 = 16_384;
/// Largest row index
pub const MAX_ROW: u32 = 1_048_576;

/// A 1-based (column, row) cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Reference for a column letter and row, e.g. `("B", 10)`.
    pub fn at(col: &str, row: u32) -> Result<Self, DbDictError> {
        let col_index = column_index(col).ok_or_else(|| DbDictError::InvalidCellRef {
            reference: format!("{}{}", col, row),
        })?;
        Ok(Self::new(col_index, row))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = DbDictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DbDictError::InvalidCellRef {
            reference: s.to_string(),
        };

        // Absolute markers are accepted and ignored
        let cleaned: String = s.trim().chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = cleaned.split_at(split);

        let col = column_index(letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row > MAX_ROW {
            return Err(invalid());
        }
        Ok(Self { col, row })
    }
}

/// An inclusive rectangular range such as `C12:G12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Build a range, normalizing the corners to top-left / bottom-right.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.start.col..=self.end.col).contains(&cell.col)
            && (self.start.row..=self.end.row).contains(&cell.row)
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.col <= other.end.col
            && other.start.col <= self.end.col
            && self.start.row <= other.end.row
            && other.start.row <= self.end.row
    }

    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| (self.start.col..=self.end.col).map(move |col| CellRef::new(col, row)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = DbDictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((a, b)) => Ok(CellRange::new(a.parse()?, b.parse()?)),
            None => {
                let cell: CellRef = s.parse()?;
                Ok(CellRange::new(cell, cell))
            }
        }
    }
}

/// 1-based index of a column name (`A` = 1, `AA` = 27)
pub fn column_index(name: &str) -> Option<u32> {
    if name.is_empty() || name.len() > 3 {
        return None;
    }
    let mut index: u32 = 0;
    for c in name.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    (index <= MAX_COL).then_some(index)
}

/// Column name for a 1-based column index
pub fn column_name(mut index: u32) -> String {
    let mut name = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        name.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    name.iter().rev().collect()
}
