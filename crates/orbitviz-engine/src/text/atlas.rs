/// Shelf packer for a square glyph atlas.
///
/// Glyphs are placed left to right on the current shelf; a glyph that does
/// not fit horizontally opens a new shelf below the tallest glyph so far.
/// Once a glyph does not fit vertically the atlas is marked full and every
/// later placement fails.
#[derive(Debug, Clone)]
pub(crate) struct ShelfPacker {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    pub(crate) fn new(size: u32, padding: u32) -> Self {
        Self {
            size,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
            full: false,
        }
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn is_full(&self) -> bool {
        self.full
    }

    /// Reserves a `w × h` slot and returns its top-left corner.
    pub(crate) fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }

        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_y + h + self.padding > self.size || self.cursor_x + w + self.padding > self.size
        {
            log::warn!(
                "glyph atlas is full ({0}x{0}); some glyphs will not be rendered",
                self.size
            );
            self.full = true;
            return None;
        }

        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_shelf_then_wraps() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(5, 3), Some((1, 1)));
        assert_eq!(p.place(5, 4), Some((7, 1)));
        // 13 + 5 + 1 > 16: new shelf below the tallest glyph (4 px).
        assert_eq!(p.place(5, 2), Some((1, 6)));
    }

    #[test]
    fn overflow_marks_full_for_good() {
        let mut p = ShelfPacker::new(8, 1);
        assert_eq!(p.place(6, 6), Some((1, 1)));
        assert_eq!(p.place(2, 2), None);
        assert!(p.is_full());
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn glyph_wider_than_atlas_is_rejected() {
        let mut p = ShelfPacker::new(8, 1);
        assert_eq!(p.place(20, 1), None);
        assert!(p.is_full());
    }
}
