//! ore / deposit clusters: randomized blob growth inside a vertical band
//!
//! Each call owns one `used` mask, so clusters from the same call never share
//! a cell; a later call may overwrite whatever an earlier call placed. Growth
//! has no retry cap on rejected neighbours, so a starved cluster simply ends
//! up smaller than its rolled size.

use bevy::log::{debug, warn};
use serde::Deserialize;

use crate::block::{BlockKind, VariantTable};
use crate::config::Span;
use crate::constants::{CLUSTER_SEED_ATTEMPTS, CORE_FRACTION};
use crate::error::{invalid, Result};
use crate::grid::BlockGrid;
use crate::rng::TileRng;

const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/* ===========================================================
   vein description
   =========================================================== */
/// One vein pass: `count` clusters of `size` cells of `kind` in rows `[min_y, max_y)`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClusterSpec {
    pub kind: BlockKind,
    /// denser centre, ~1/5 of each cluster
    #[serde(default)]
    pub core: Option<BlockKind>,
    /// seeds and growth may claim empty cells
    #[serde(default)]
    pub allow_air_seed: bool,
    /// when non‑empty, only cells of these materials are replaced, with the
    /// embedded variant from the [`VariantTable`]
    #[serde(default)]
    pub hosts: Vec<BlockKind>,
    pub min_y: i32,
    pub max_y: i32,
    pub count: Span,
    pub size: Span,
}

impl ClusterSpec {
    pub fn new(kind: BlockKind, min_y: i32, max_y: i32, count: Span, size: Span) -> Self {
        Self {
            kind,
            core: None,
            allow_air_seed: false,
            hosts: Vec::new(),
            min_y,
            max_y,
            count,
            size,
        }
    }

    pub fn with_core(mut self, core: BlockKind) -> Self {
        self.core = Some(core);
        self
    }

    pub fn allow_air(mut self) -> Self {
        self.allow_air_seed = true;
        self
    }

    pub fn hosted_in(mut self, hosts: impl IntoIterator<Item = BlockKind>) -> Self {
        self.hosts = hosts.into_iter().collect();
        self
    }

    pub fn validate(&self, width: usize, height: usize, variants: &VariantTable) -> Result<()> {
        let name = self.kind.name();
        if self.min_y < 0 || self.max_y > height as i32 || self.min_y >= self.max_y {
            return Err(invalid(format!(
                "{name}: band [{}, {}) is empty or outside the grid",
                self.min_y, self.max_y
            )));
        }
        if width == 0 {
            return Err(invalid(format!("{name}: grid has no columns")));
        }
        self.count.check(&format!("{name} count"), 0)?;
        self.size.check(&format!("{name} size"), 1)?;

        let band_cells = width as i64 * (self.max_y - self.min_y) as i64;
        if self.count.max as i64 > band_cells {
            return Err(invalid(format!(
                "{name}: {} clusters cannot have distinct seeds in {band_cells} cells",
                self.count.max
            )));
        }
        for &host in &self.hosts {
            variants.require(self.kind, host)?;
        }
        Ok(())
    }
}

/// What a cluster call did, for logging and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterReport {
    /// every cell claimed by the call, grouped per cluster
    pub clusters: Vec<Vec<(i32, i32)>>,
    /// clusters dropped because no admissible seed turned up
    pub skipped: u32,
    /// cells actually overwritten by the shell (hosts may leave some untouched)
    pub placed: u32,
    pub cores: u32,
}

/* ===========================================================
   growth
   =========================================================== */
/// per‑call claim mask over the band rows only
struct UsedMask {
    width: usize,
    min_y: i32,
    cells: Vec<bool>,
}

impl UsedMask {
    fn new(width: usize, min_y: i32, max_y: i32) -> Self {
        Self {
            width,
            min_y,
            cells: vec![false; width * (max_y - min_y) as usize],
        }
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        (y - self.min_y) as usize * self.width + x as usize
    }

    #[inline]
    fn is_used(&self, x: i32, y: i32) -> bool {
        self.cells[self.idx(x, y)]
    }

    #[inline]
    fn claim(&mut self, x: i32, y: i32) {
        let i = self.idx(x, y);
        self.cells[i] = true;
    }
}

fn pick_seed<R: TileRng + ?Sized>(
    grid: &BlockGrid,
    vein: &ClusterSpec,
    used: &UsedMask,
    rng: &mut R,
) -> Result<Option<(i32, i32)>> {
    let w = grid.width() as i32;
    for _ in 0..CLUSTER_SEED_ATTEMPTS {
        let x = rng.next_int(w);
        let y = rng.next_int(vein.max_y - vein.min_y) + vein.min_y;
        if used.is_used(x, y) {
            continue;
        }
        if !vein.allow_air_seed && grid.foreground(x, y)?.is_none() {
            continue;
        }
        return Ok(Some((x, y)));
    }
    Ok(None)
}

fn grow<R: TileRng + ?Sized>(
    grid: &BlockGrid,
    vein: &ClusterSpec,
    seed: (i32, i32),
    size: i32,
    used: &mut UsedMask,
    rng: &mut R,
) -> Result<Vec<(i32, i32)>> {
    let mut members = Vec::with_capacity(size as usize);
    used.claim(seed.0, seed.1);
    members.push(seed);

    for _ in 1..size {
        let (px, py) = members[rng.next_int(members.len() as i32) as usize];
        let (dx, dy) = NEIGHBOURS[rng.next_int(4) as usize];
        let (nx, ny) = (px + dx, py + dy);

        if !grid.in_bounds(nx, ny) || ny < vein.min_y || ny >= vein.max_y {
            continue;
        }
        if used.is_used(nx, ny) {
            continue;
        }
        if !vein.allow_air_seed && grid.foreground(nx, ny)?.is_none() {
            continue;
        }
        used.claim(nx, ny);
        members.push((nx, ny));
    }
    Ok(members)
}

/// ~1/5 of `members` closest to their rounded centroid
fn core_cells(members: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let n = members.len() / CORE_FRACTION;
    if n == 0 {
        return Vec::new();
    }
    let len = members.len() as f64;
    let cx = (members.iter().map(|m| m.0 as f64).sum::<f64>() / len).round() as i32;
    let cy = (members.iter().map(|m| m.1 as f64).sum::<f64>() / len).round() as i32;

    let mut by_distance = members.to_vec();
    by_distance.sort_by_key(|&(x, y)| (x - cx).pow(2) + (y - cy).pow(2));
    by_distance.truncate(n);
    by_distance
}

/* ===========================================================
   pass entry point
   =========================================================== */
/// Grows and places one vein pass. Shells are placed after every cluster of
/// the call has grown, cores after the shells.
pub fn grow_clusters<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    vein: &ClusterSpec,
    variants: &VariantTable,
    rng: &mut R,
) -> Result<ClusterReport> {
    vein.validate(grid.width(), grid.height(), variants)?;

    let mut used = UsedMask::new(grid.width(), vein.min_y, vein.max_y);
    let mut report = ClusterReport::default();
    let mut cores = Vec::new();

    let count = vein.count.roll(rng);
    for _ in 0..count {
        let size = vein.size.roll(rng);
        let Some(seed) = pick_seed(grid, vein, &used, rng)? else {
            warn!("{}: no admissible seed, cluster skipped", vein.kind.name());
            report.skipped += 1;
            continue;
        };
        let members = grow(grid, vein, seed, size, &mut used, rng)?;
        if vein.core.is_some() {
            cores.extend(core_cells(&members));
        }
        report.clusters.push(members);
    }

    /* shell */
    for &(x, y) in report.clusters.iter().flatten() {
        let place = if vein.hosts.is_empty() {
            Some(vein.kind)
        } else {
            match grid.foreground(x, y)? {
                Some(current) if vein.hosts.contains(&current) => {
                    Some(variants.require(vein.kind, current)?)
                }
                _ => None,
            }
        };
        if let Some(kind) = place {
            grid.set_foreground(x, y, Some(kind))?;
            report.placed += 1;
        }
    }

    /* core */
    if let Some(core) = vein.core {
        for &(x, y) in &cores {
            grid.set_foreground(x, y, Some(core))?;
        }
        report.cores = cores.len() as u32;
    }

    debug!(
        "{}: {} clusters, {} placed, {} core, {} skipped",
        vein.kind.name(),
        report.clusters.len(),
        report.placed,
        report.cores,
        report.skipped,
    );
    Ok(report)
}
