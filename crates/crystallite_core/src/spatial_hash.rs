#[derive(Clone, Debug)]
/// Uniform grid over free particles for neighbourhood queries.
///
/// Cleared and re-populated every step; it never holds indices across steps.
///
/// # Performance Characteristics
/// - Insert: O(1) amortised
/// - 3×3 neighbourhood query: O(particles in 9 cells)
/// - Memory: O(particle_count) indices + O(grid_cells) bucket headers
///
/// # Fields
/// - `cell_size`: Width/height of each grid cell in world units
/// - `width/height`: World dimensions in world units
/// - `cols/rows`: Grid dimensions (# cells horizontally/vertically)
/// - `buckets`: Particle indices per cell, row-major
///
/// # Implementation Notes
/// - Buckets keep their capacity across `clear` so steady-state rebuilds do
///   not allocate
/// - Non-finite or out-of-domain positions are not indexed
/// - Overflow protection via i32 boundary checks
///
/// # Examples
/// ```
/// use crystallite_core::spatial_hash::SpatialHash;
///
/// let mut spatial = SpatialHash::new(10.0, 100.0, 100.0);
/// spatial.build(&[(15.0, 15.0), (22.0, 18.0), (85.0, 85.0)]);
///
/// let mut nearby = Vec::new();
/// spatial.neighbors_into(15.0, 15.0, &mut nearby);
/// assert_eq!(nearby.len(), 2);
/// ```
pub struct SpatialHash {
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    pub buckets: Vec<Vec<usize>>,
    len: usize,
}

impl SpatialHash {
    /// Creates an empty grid. `cell_size` should be at least the largest
    /// query distance so that a 3×3 block covers it.
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        let width = width.max(cell_size);
        let height = height.max(cell_size);
        let cols = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
            len: 0,
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell column and row for a world coordinate.
    ///
    /// Returns `None` for non-finite coordinates, coordinates outside the
    /// domain, and values that would overflow an `i32` cell index.
    #[inline]
    pub fn get_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        // Check for i32 overflow before casting
        if x.abs() > i32::MAX as f64 / self.cell_size {
            return None;
        }
        if y.abs() > i32::MAX as f64 / self.cell_size {
            return None;
        }

        let cx = (x / self.cell_size).floor() as i32;
        let cy = (y / self.cell_size).floor() as i32;
        if cx < 0 || cx >= self.cols as i32 || cy < 0 || cy >= self.rows as i32 {
            None
        } else {
            Some((cx as usize, cy as usize))
        }
    }

    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        self.get_cell(x, y).map(|(cx, cy)| cy * self.cols + cx)
    }

    /// Empties every bucket, keeping allocations.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Buckets entry `idx` at `(x, y)`. Returns false when the position
    /// cannot be indexed.
    pub fn insert(&mut self, idx: usize, x: f64, y: f64) -> bool {
        match self.get_cell_idx(x, y) {
            Some(cell) => {
                self.buckets[cell].push(idx);
                self.len += 1;
                true
            }
            None => false,
        }
    }

    /// Clears and re-populates from positions; entry `i` is `positions[i]`.
    pub fn build(&mut self, positions: &[(f64, f64)]) {
        self.clear();
        for (idx, &(x, y)) in positions.iter().enumerate() {
            self.insert(idx, x, y);
        }
    }

    /// Collects every entry in the 3×3 block of cells around `(x, y)` into
    /// `result` (cleared first). The entry at `(x, y)` itself is included.
    pub fn neighbors_into(&self, x: f64, y: f64, result: &mut Vec<usize>) {
        result.clear();
        let Some((cx, cy)) = self.get_cell(x, y) else {
            return;
        };
        let min_cx = cx.saturating_sub(1);
        let max_cx = (cx + 1).min(self.cols - 1);
        let min_cy = cy.saturating_sub(1);
        let max_cy = (cy + 1).min(self.rows - 1);

        for row in min_cy..=max_cy {
            for col in min_cx..=max_cx {
                result.extend_from_slice(&self.buckets[row * self.cols + col]);
            }
        }
    }

    /// Visits every entry in cells overlapping the square of half-width
    /// `radius` around `(x, y)`. Callers filter by exact distance.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        if !x.is_finite() || !y.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        if (x.abs() + radius) > i32::MAX as f64 / self.cell_size
            || (y.abs() + radius) > i32::MAX as f64 / self.cell_size
        {
            return;
        }

        let min_cx = ((x - radius) / self.cell_size).floor() as i32;
        let max_cx = ((x + radius) / self.cell_size).floor() as i32;
        let min_cy = ((y - radius) / self.cell_size).floor() as i32;
        let max_cy = ((y + radius) / self.cell_size).floor() as i32;

        for cy in min_cy..=max_cy {
            if cy < 0 || cy >= self.rows as i32 {
                continue;
            }
            for cx in min_cx..=max_cx {
                if cx < 0 || cx >= self.cols as i32 {
                    continue;
                }

                let cell_idx = (cy as usize * self.cols) + cx as usize;
                for &entity_idx in &self.buckets[cell_idx] {
                    callback(entity_idx);
                }
            }
        }
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let mut count = 0;
        self.query_callback(x, y, radius, |_| count += 1);
        count
    }
}
