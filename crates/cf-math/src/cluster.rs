//! Cluster detection
//!
//! Flood fill over 4-connected same-symbol cells using an explicit stack, so
//! stack depth never depends on grid size. Cells are scanned column-major;
//! every cell is visited exactly once, which makes the emitted clusters
//! disjoint and unique for a given grid.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};
use crate::symbols::SymbolSet;

/// A maximal connected region of one pay symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Symbol shared by every cell
    pub symbol_id: u32,
    /// Member cells, sorted (reel, row)
    pub positions: Vec<Position>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }
}

/// Finds every winning cluster on a grid
#[derive(Debug, Clone)]
pub struct ClusterDetector {
    min_size: usize,
}

impl ClusterDetector {
    pub fn new(min_size: usize) -> Self {
        Self { min_size }
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Every maximal region of identical pay symbols with size ≥ minimum
    pub fn detect(&self, grid: &Grid, symbols: &SymbolSet) -> Vec<Cluster> {
        let mut visited = vec![false; grid.len()];
        let mut clusters = Vec::new();
        let mut stack: Vec<usize> = Vec::with_capacity(grid.len());

        for start in 0..grid.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;

            let symbol_id = grid.cells()[start];
            // Scatter, multiplier and unknown ids can neither seed nor join
            if !symbols.is_pay(symbol_id) {
                continue;
            }

            let mut region = vec![grid.position(start)];
            stack.push(start);

            while let Some(idx) = stack.pop() {
                for next in grid.neighbors(grid.position(idx)) {
                    let Some(n) = grid.index(next) else { continue };
                    if !visited[n] && grid.cells()[n] == symbol_id {
                        visited[n] = true;
                        region.push(next);
                        stack.push(n);
                    }
                }
            }

            if region.len() >= self.min_size {
                region.sort_unstable();
                clusters.push(Cluster {
                    symbol_id,
                    positions: region,
                });
            }
        }

        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use crate::symbols::{MULTIPLIER_ID, SCATTER_ID};

    fn detector() -> ClusterDetector {
        ClusterDetector::new(8)
    }

    /// 6×5 grid with no two equal neighbours
    fn checkerboard() -> Grid {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 1);
        for (col, row) in grid.positions().collect::<Vec<_>>() {
            grid.set((col, row), 1 + ((col + row) % 2) as u32 + (col as u32 % 3) * 2);
        }
        grid
    }

    #[test]
    fn test_full_grid_is_one_cluster() {
        let grid = Grid::filled(GridSpec::standard_6x5(), 3);
        let clusters = detector().detect(&grid, &SymbolSet::standard());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 30);
        assert_eq!(clusters[0].symbol_id, 3);
    }

    #[test]
    fn test_no_clusters_on_checkerboard() {
        let clusters = detector().detect(&checkerboard(), &SymbolSet::standard());
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_sub_threshold_region_discarded() {
        let mut grid = checkerboard();
        // 7 cells of symbol 9 in column 0 and the top of column 1
        for row in 0..5 {
            grid.set((0, row), 9);
        }
        grid.set((1, 0), 9);
        grid.set((1, 1), 9);
        assert!(detector().detect(&grid, &SymbolSet::standard()).is_empty());

        grid.set((1, 2), 9);
        let clusters = detector().detect(&grid, &SymbolSet::standard());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 8);
    }

    #[test]
    fn test_diagonal_cells_do_not_connect() {
        let mut grid = checkerboard();
        // Two 4-cell columns touching only diagonally at (0,3)-(1,4)
        for row in 0..4 {
            grid.set((0, row), 9);
        }
        grid.set((0, 4), 8);
        grid.set((1, 3), 8);
        grid.set((1, 4), 9);
        for col in 2..5 {
            grid.set((col, 4), 9);
        }
        let small = ClusterDetector::new(4);
        let clusters = small.detect(&grid, &SymbolSet::standard());
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.size() == 4 && c.symbol_id == 9));
    }

    #[test]
    fn test_specials_never_cluster() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), SCATTER_ID);
        assert!(detector().detect(&grid, &SymbolSet::standard()).is_empty());

        grid = Grid::filled(GridSpec::standard_6x5(), MULTIPLIER_ID);
        assert!(detector().detect(&grid, &SymbolSet::standard()).is_empty());
    }

    #[test]
    fn test_special_cells_split_regions() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 2);
        // A wall of scatters through column 2 splits the board 10 | 15
        for row in 0..5 {
            grid.set((2, row), SCATTER_ID);
        }
        let clusters = detector().detect(&grid, &SymbolSet::standard());
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].size(), 10);
        assert_eq!(clusters[1].size(), 15);
        for cluster in &clusters {
            assert!(!cluster.positions.iter().any(|&(col, _)| col == 2));
        }
    }

    #[test]
    fn test_clusters_emitted_in_scan_order() {
        let mut grid = Grid::filled(GridSpec::standard_6x5(), 4);
        for row in 0..5 {
            grid.set((3, row), MULTIPLIER_ID);
        }
        for col in 4..6 {
            for row in 0..5 {
                grid.set((col, row), 5);
            }
        }
        let clusters = detector().detect(&grid, &SymbolSet::standard());
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].symbol_id, 4);
        assert_eq!(clusters[1].symbol_id, 5);
        assert!(clusters[0].contains((0, 0)));
        assert!(!clusters[0].contains((4, 0)));
    }
}
