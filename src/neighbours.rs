// Copyright (C) Pavlo Hrytsenko <pashagricenko@gmail.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeSet;

use crate::error::StmError;

/// Largest coordinate (exclusive) the bijective cell-key encoding supports.
/// `CoordOverflow` is raised above this bound — widen the encoding in
/// [`encode_cell`] if larger grids are required.
pub const COORD_LIMIT: i32 = 1024;

/// A connectivity stencil used to dilate a cell set. Always includes
/// `(0, 0, 0)` as a self-inclusion safety.
#[derive(Debug, Clone)]
pub enum Neighbourhood {
    /// 0-connectivity: the cell itself only.
    Zero,
    /// 6-connectivity: face neighbours + self.
    Six,
    /// 18-connectivity: face + edge neighbours + self.
    Eighteen,
    /// 26-connectivity: face + edge + corner neighbours + self.
    TwentySix,
    /// An explicit offset list; must include `(0, 0, 0)`.
    Custom(Vec<(i32, i32, i32)>),
}

impl Neighbourhood {
    /// Resolves to the concrete offset stencil.
    pub fn stencil(&self) -> Vec<(i32, i32, i32)> {
        match self {
            Neighbourhood::Zero => vec![(0, 0, 0)],
            Neighbourhood::Six => vec![
                (-1, 0, 0),
                (0, -1, 0),
                (0, 0, -1),
                (0, 0, 1),
                (0, 1, 0),
                (1, 0, 0),
                (0, 0, 0),
            ],
            Neighbourhood::Eighteen => vec![
                (-1, -1, 0),
                (-1, 0, -1),
                (-1, 0, 0),
                (-1, 0, 1),
                (-1, 1, 0),
                (0, -1, -1),
                (0, -1, 0),
                (0, -1, 1),
                (0, 0, -1),
                (0, 0, 1),
                (0, 1, -1),
                (0, 1, 0),
                (0, 1, 1),
                (1, -1, 0),
                (1, 0, -1),
                (1, 0, 0),
                (1, 0, 1),
                (1, 1, 0),
                (0, 0, 0),
            ],
            Neighbourhood::TwentySix => vec![
                (-1, -1, -1),
                (-1, -1, 0),
                (-1, -1, 1),
                (-1, 0, -1),
                (-1, 0, 0),
                (-1, 0, 1),
                (-1, 1, -1),
                (-1, 1, 0),
                (-1, 1, 1),
                (0, -1, -1),
                (0, -1, 0),
                (0, -1, 1),
                (0, 0, -1),
                (0, 0, 1),
                (0, 1, -1),
                (0, 1, 0),
                (0, 1, 1),
                (1, -1, -1),
                (1, -1, 0),
                (1, -1, 1),
                (1, 0, -1),
                (1, 0, 0),
                (1, 0, 1),
                (1, 1, -1),
                (1, 1, 0),
                (1, 1, 1),
                (0, 0, 0),
            ],
            Neighbourhood::Custom(offsets) => offsets.clone(),
        }
    }
}

/// Encodes a non-negative cell coordinate as a bijective 64-bit key,
/// `2^20 * x + 2^10 * y + z`, valid while `0 <= coord < 1024` on every axis.
pub fn encode_cell(cell: (i32, i32, i32)) -> Result<i64, StmError> {
    let (x, y, z) = cell;
    if x < 0 || y < 0 || z < 0 || x >= COORD_LIMIT || y >= COORD_LIMIT || z >= COORD_LIMIT {
        return Err(StmError::CoordOverflow {
            coord: cell,
            limit: COORD_LIMIT,
        });
    }
    Ok((x as i64) * (1 << 20) + (y as i64) * (1 << 10) + z as i64)
}

/// Dilates `cells` by `stencil` and deduplicates the result. The output is
/// sorted by the bijective key, i.e. lexicographic in `(x, y, z)`.
pub fn expand_all_neighbours_uniq(
    cells: &[(i32, i32, i32)],
    stencil: &[(i32, i32, i32)],
) -> Result<Vec<(i32, i32, i32)>, StmError> {
    let mut seen: BTreeSet<i64> = BTreeSet::new();
    let mut by_key: std::collections::HashMap<i64, (i32, i32, i32)> = std::collections::HashMap::new();

    for &(x, y, z) in cells {
        for &(dx, dy, dz) in stencil {
            let p = (x + dx, y + dy, z + dz);
            let key = encode_cell(p)?;
            if seen.insert(key) {
                by_key.insert(key, p);
            }
        }
    }

    Ok(seen.into_iter().map(|k| by_key[&k]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_stencil_is_identity() {
        let cells = [(1, 2, 3), (4, 5, 6)];
        let stencil = Neighbourhood::Zero.stencil();
        let expanded = expand_all_neighbours_uniq(&cells, &stencil).unwrap();
        assert_eq!(expanded, vec![(1, 2, 3), (4, 5, 6)]);
    }

    #[test]
    fn expansion_deduplicates_and_sorts() {
        let cells = [(2, 2, 2), (3, 2, 2)];
        let stencil = Neighbourhood::Six.stencil();
        let expanded = expand_all_neighbours_uniq(&cells, &stencil).unwrap();
        let mut sorted = expanded.clone();
        sorted.sort();
        assert_eq!(expanded, sorted);
        let mut dedup = expanded.clone();
        dedup.dedup();
        assert_eq!(expanded.len(), dedup.len());
        // (3,2,2) is reachable from (2,2,2)'s +x neighbour and (3,2,2) itself.
        assert!(expanded.contains(&(3, 2, 2)));
    }

    #[test]
    fn zero_stencil_expansion_is_idempotent() {
        let cells = [(5, 5, 5), (5, 5, 6)];
        let stencil = Neighbourhood::Zero.stencil();
        let once = expand_all_neighbours_uniq(&cells, &stencil).unwrap();
        let twice = expand_all_neighbours_uniq(&once, &stencil).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn expansion_rejects_coordinate_overflow() {
        let cells = [(1023, 0, 0)];
        let stencil = Neighbourhood::Six.stencil();
        assert!(expand_all_neighbours_uniq(&cells, &stencil).is_err());
    }
}
