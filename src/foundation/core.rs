use crate::foundation::error::{PageError, PageResult};

/// Pixel dimensions of a raster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> PageResult<Self> {
        if width == 0 || height == 0 {
            return Err(PageError::validation(format!(
                "surface size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn of(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    pub fn bounds(self) -> PixelBox {
        PixelBox::new(0, 0, self.width as i32, self.height as i32)
    }
}

impl std::fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned pixel box; `right`/`bottom` are exclusive edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelBox {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains_box(self, other: PixelBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Same size, moved by `(dx, dy)`.
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn with_top(self, top: i32) -> Self {
        self.translate(0, top - self.top)
    }

    pub fn intersect(self, other: PixelBox) -> PixelBox {
        PixelBox {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right).max(self.left.max(other.left)),
            bottom: self.bottom.min(other.bottom).max(self.top.max(other.top)),
        }
    }
}

/// Physical page size in PDF points. One point maps to one pixel (72 DPI).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageSize {
    pub width_pt: u32,
    pub height_pt: u32,
}

impl PageSize {
    pub const A4_PORTRAIT: PageSize = PageSize {
        width_pt: 595,
        height_pt: 842,
    };
    pub const US_LETTER: PageSize = PageSize {
        width_pt: 612,
        height_pt: 792,
    };

    pub fn new(width_pt: u32, height_pt: u32) -> PageResult<Self> {
        if width_pt == 0 || height_pt == 0 {
            return Err(PageError::validation("page size must be non-zero"));
        }
        Ok(Self {
            width_pt,
            height_pt,
        })
    }

    pub fn pixels(self) -> SurfaceSize {
        SurfaceSize {
            width: self.width_pt,
            height: self.height_pt,
        }
    }

    /// Parses `a4`, `letter`, or `<w>x<h>`.
    pub fn parse(s: &str) -> PageResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4_PORTRAIT),
            "letter" | "us-letter" => Ok(Self::US_LETTER),
            other => {
                let (w, h) = other
                    .split_once('x')
                    .ok_or_else(|| PageError::validation(format!("invalid page size '{s}'")))?;
                let w = w
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| PageError::validation(format!("invalid page width in '{s}'")))?;
                let h = h
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| PageError::validation(format!("invalid page height in '{s}'")))?;
                Self::new(w, h)
            }
        }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let mul = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
        [mul(self.r), mul(self.g), mul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
