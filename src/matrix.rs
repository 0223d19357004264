//! Flat DP cost table.
//!
//! One contiguous row-major buffer instead of a vector of rows: a single
//! allocation, cache-friendly row sweeps, and a single place where the
//! O(n*m) memory bill is paid. For long reads the table dominates the
//! footprint (tens of kilobases squared reaches hundreds of megabytes), so
//! allocation is checked and callers drop the table right after
//! backtracking.
use crate::cost::Cost;
use crate::error::AlignError;

#[derive(Debug)]
pub struct DpTable {
    mem: Vec<Cost>,
    rows: usize,
    columns: usize,
}

impl DpTable {
    /// Allocate a `rows` x `columns` table, every cell `Unreachable`.
    pub fn new(rows: usize, columns: usize) -> Result<Self, AlignError> {
        let fail = AlignError::Allocation { rows, columns };
        let total = match rows.checked_mul(columns) {
            Some(total) => total,
            None => return Err(fail),
        };
        let mut mem = Vec::new();
        if mem.try_reserve_exact(total).is_err() {
            return Err(fail);
        }
        mem.extend(std::iter::repeat(Cost::Unreachable).take(total));
        Ok(Self { mem, rows, columns })
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Cost {
        self.mem[i * self.columns + j]
    }
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Cost) {
        self.mem[i * self.columns + j] = value;
    }
    /// The bottom-right cell: the minimum accumulated cost of a full
    /// alignment, once the fill has completed.
    pub fn corner(&self) -> Cost {
        self.get(self.rows - 1, self.columns - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn round_trip_cells() {
        let mut table = DpTable::new(3, 4).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.columns(), 4);
        assert_eq!(table.get(2, 3), Cost::Unreachable);
        table.set(0, 0, Cost::Finite(0));
        table.set(2, 3, Cost::Finite(7));
        table.set(1, 2, Cost::Finite(4));
        assert_eq!(table.get(0, 0), Cost::Finite(0));
        assert_eq!(table.get(1, 2), Cost::Finite(4));
        assert_eq!(table.corner(), Cost::Finite(7));
    }
    #[test]
    fn absurd_shape_is_an_error() {
        let err = DpTable::new(usize::MAX, usize::MAX).unwrap_err();
        assert_eq!(
            err,
            AlignError::Allocation {
                rows: usize::MAX,
                columns: usize::MAX
            }
        );
    }
    #[test]
    fn single_cell_table() {
        let table = DpTable::new(1, 1).unwrap();
        assert_eq!(table.corner(), Cost::Unreachable);
    }
}
