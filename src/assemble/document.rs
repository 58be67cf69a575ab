use crate::foundation::core::{PageSize, SurfaceSize};
use crate::foundation::error::{PageError, PageResult};

/// One finished page. Ordinal 0 is the cover when present.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub ordinal: usize,
    pub image: image::RgbaImage,
}

/// Ordered pages sharing one physical page size.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    page_size: PageSize,
    pages: Vec<Page>,
}

impl Document {
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn has_cover(&self) -> bool {
        self.pages.first().is_some_and(|p| p.ordinal == 0)
    }
}

/// Collects finished page images into a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct PageAssembler {
    page_size: PageSize,
}

impl PageAssembler {
    pub fn new(page_size: PageSize) -> Self {
        Self { page_size }
    }

    /// Pages in input order, numbered from 1.
    pub fn assemble(&self, pages: Vec<image::RgbaImage>) -> PageResult<Document> {
        self.assemble_with_cover(None, pages)
    }

    /// Optional cover at ordinal 0, then `pages` numbered from 1.
    ///
    /// Every image must already be exactly the page size in pixels; the first
    /// one that is not fails the whole document. An empty input is a valid
    /// zero-page document.
    pub fn assemble_with_cover(
        &self,
        cover: Option<image::RgbaImage>,
        pages: Vec<image::RgbaImage>,
    ) -> PageResult<Document> {
        let expected = self.page_size.pixels();
        let numbered = cover
            .map(|img| (0, img))
            .into_iter()
            .chain(pages.into_iter().enumerate().map(|(i, img)| (i + 1, img)));

        let mut out = Vec::new();
        for (ordinal, image) in numbered {
            let got = SurfaceSize::of(&image);
            if got != expected {
                return Err(PageError::assembly(
                    ordinal,
                    format!("image is {got}, page needs {expected}"),
                ));
            }
            out.push(Page { ordinal, image });
        }

        tracing::debug!(pages = out.len(), "document assembled");
        Ok(Document {
            page_size: self.page_size,
            pages: out,
        })
    }
}
