//! two‑layer block storage with bounds‑checked accessors & integer export
use bevy::prelude::*;

use crate::block::BlockKind;
use crate::error::{Result, WorldError};

/// Which of the two parallel layers an access targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// interactive blocks; empty = air
    Foreground,
    /// cosmetic wall behind empty foreground cells
    Background,
}

/// Persisted form of one layer: `rows[y][x]`, `0` = empty, else [`BlockKind::id`].
pub type LayerIds = Vec<Vec<u16>>;

/* ===========================================================
   resource
   =========================================================== */
/// W×H foreground + background cells (row‑0 = top). Dimensions are fixed
/// at construction.
#[derive(Resource, Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    width: usize,
    height: usize,
    foreground: Vec<Option<BlockKind>>,
    background: Vec<Option<BlockKind>>,
}

impl BlockGrid {
    /// empty grid: every cell open in both layers
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            foreground: vec![None; width * height],
            background: vec![None; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// row‑major index, only valid after `in_bounds`
    #[inline]
    pub(crate) fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    fn checked_idx(&self, x: i32, y: i32) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(self.idx(x as usize, y as usize))
        } else {
            Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline]
    fn cells(&self, layer: Layer) -> &[Option<BlockKind>] {
        match layer {
            Layer::Foreground => &self.foreground,
            Layer::Background => &self.background,
        }
    }

    #[inline]
    fn cells_mut(&mut self, layer: Layer) -> &mut Vec<Option<BlockKind>> {
        match layer {
            Layer::Foreground => &mut self.foreground,
            Layer::Background => &mut self.background,
        }
    }

    /* ---------- per‑cell access ---------- */

    pub fn get(&self, layer: Layer, x: i32, y: i32) -> Result<Option<BlockKind>> {
        let i = self.checked_idx(x, y)?;
        Ok(self.cells(layer)[i])
    }

    /// unconditional overwrite
    pub fn set(&mut self, layer: Layer, x: i32, y: i32, kind: Option<BlockKind>) -> Result<()> {
        let i = self.checked_idx(x, y)?;
        self.cells_mut(layer)[i] = kind;
        Ok(())
    }

    #[inline]
    pub fn foreground(&self, x: i32, y: i32) -> Result<Option<BlockKind>> {
        self.get(Layer::Foreground, x, y)
    }

    #[inline]
    pub fn background(&self, x: i32, y: i32) -> Result<Option<BlockKind>> {
        self.get(Layer::Background, x, y)
    }

    #[inline]
    pub fn set_foreground(&mut self, x: i32, y: i32, kind: Option<BlockKind>) -> Result<()> {
        self.set(Layer::Foreground, x, y, kind)
    }

    #[inline]
    pub fn set_background(&mut self, x: i32, y: i32, kind: Option<BlockKind>) -> Result<()> {
        self.set(Layer::Background, x, y, kind)
    }

    /// empty in both layers: open to sky / void
    pub fn is_open(&self, x: i32, y: i32) -> Result<bool> {
        let i = self.checked_idx(x, y)?;
        Ok(self.foreground[i].is_none() && self.background[i].is_none())
    }

    /* ---------- crate‑internal hot paths (index already checked) ---------- */

    #[inline]
    pub(crate) fn fg_at(&self, i: usize) -> Option<BlockKind> {
        self.foreground[i]
    }

    #[inline]
    pub(crate) fn open_at(&self, i: usize) -> bool {
        self.foreground[i].is_none() && self.background[i].is_none()
    }

    /// background := foreground, cell for cell
    pub(crate) fn copy_foreground_to_background(&mut self) {
        self.background.clone_from(&self.foreground);
    }

    /* ---------- persistence boundary ---------- */

    /// lossless integer form of `layer`, `rows[y][x]`
    pub fn export_layer(&self, layer: Layer) -> LayerIds {
        let cells = self.cells(layer);
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| cells[self.idx(x, y)].map_or(0, BlockKind::id))
                    .collect()
            })
            .collect()
    }

    /// replace `layer` from its exported form; nothing is written unless the
    /// whole array decodes
    pub fn import_layer(&mut self, layer: Layer, rows: &[Vec<u16>]) -> Result<()> {
        let found_w = rows.first().map_or(0, Vec::len);
        let mismatch = rows.len() != self.height || rows.iter().any(|r| r.len() != self.width);
        if mismatch {
            return Err(WorldError::DimensionMismatch {
                expected: (self.width, self.height),
                found: (found_w, rows.len()),
            });
        }

        let mut decoded = Vec::with_capacity(self.width * self.height);
        for &id in rows.iter().flatten() {
            let cell = match id {
                0 => None,
                _ => Some(BlockKind::from_id(id).ok_or(WorldError::UnknownBlockId(id))?),
            };
            decoded.push(cell);
        }
        *self.cells_mut(layer) = decoded;
        Ok(())
    }
}
