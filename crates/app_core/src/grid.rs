//! Grid placement for multi-item views

/// Row/column of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

/// Deterministic placement of `len` items, left-to-right then top-to-bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlacement {
    item_count: usize,
    columns: usize,
}

/// Plan a grid. A column limit of zero is treated as one.
pub fn plan(item_count: usize, columns_per_row: usize) -> GridPlacement {
    GridPlacement {
        item_count,
        columns: columns_per_row.max(1),
    }
}

impl GridPlacement {
    pub fn len(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.item_count.div_ceil(self.columns)
    }

    /// Cell of item `index`, `None` past the end
    pub fn cell(&self, index: usize) -> Option<GridCell> {
        (index < self.item_count).then(|| GridCell {
            row: index / self.columns,
            column: index % self.columns,
        })
    }

    /// True when `index` is the last item of its row
    pub fn ends_row(&self, index: usize) -> bool {
        index < self.item_count && ((index + 1) % self.columns == 0 || index + 1 == self.item_count)
    }

    /// Item indices grouped by row
    pub fn rows(&self) -> Vec<Vec<usize>> {
        (0..self.row_count())
            .map(|row| {
                let start = row * self.columns;
                let end = (start + self.columns).min(self.item_count);
                (start..end).collect()
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, GridCell)> + '_ {
        (0..self.item_count).filter_map(move |i| self.cell(i).map(|cell| (i, cell)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_thirteen_items_six_columns() {
        let grid = plan(13, 6);
        assert_eq!(
            grid.rows(),
            vec![
                (0..=5).collect::<Vec<_>>(),
                (6..=11).collect::<Vec<_>>(),
                vec![12],
            ]
        );
        assert_eq!(grid.cell(12), Some(GridCell { row: 2, column: 0 }));
        assert_eq!(grid.cell(5), Some(GridCell { row: 0, column: 5 }));
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn test_empty_plan() {
        let grid = plan(0, 6);
        assert!(grid.is_empty());
        assert!(grid.rows().is_empty());
        assert_eq!(grid.cell(0), None);
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn test_area_grid_is_four_wide() {
        let grid = plan(9, 4);
        let cells: Vec<_> = grid.iter().map(|(_, c)| (c.row, c.column)).collect();
        assert_eq!(
            cells,
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2), (1, 3), (2, 0)]
        );
    }

    #[test]
    fn test_single_column_list() {
        let grid = plan(3, 1);
        assert_eq!(grid.rows(), vec![vec![0], vec![1], vec![2]]);
        assert!((0..3).all(|i| grid.ends_row(i)));
    }

    #[test]
    fn test_zero_columns_clamped() {
        let grid = plan(2, 0);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.cell(1), Some(GridCell { row: 1, column: 0 }));
    }

    #[test]
    fn test_ends_row() {
        let grid = plan(7, 3);
        let ends: Vec<_> = (0..7).filter(|&i| grid.ends_row(i)).collect();
        assert_eq!(ends, vec![2, 5, 6]);
        assert!(!grid.ends_row(7));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(plan(20, 6), plan(20, 6));
    }
}
