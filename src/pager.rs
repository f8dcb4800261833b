/// Where a page sits in the full ordered image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_images: usize,
    pub images_per_page: usize,
    pub start: usize,
    pub end: usize,
}

impl PageInfo {
    /// Clamps `requested_page` into range and works out the slice bounds.
    ///
    /// With no images the bounds are `0..0` and the requested page is kept
    /// (raised to at least 1).
    pub fn new(total_images: usize, requested_page: usize, images_per_page: usize) -> Self {
        let images_per_page = images_per_page.max(1);
        let total_pages = total_images.div_ceil(images_per_page);

        let mut current_page = requested_page.max(1);
        if total_pages > 0 && current_page > total_pages {
            current_page = total_pages;
        }

        let (start, end) = if total_images == 0 {
            (0, 0)
        } else {
            let start = (current_page - 1) * images_per_page;
            (start, start.saturating_add(images_per_page).min(total_images))
        };

        PageInfo {
            current_page,
            total_pages,
            total_images,
            images_per_page,
            start,
            end,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1 && self.total_pages > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Reads the `page` query value. Anything that is not a positive integer means page 1.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse::<i64>().ok())
        .filter(|p| *p > 0)
        .map(|p| usize::try_from(p).unwrap_or(usize::MAX))
        .unwrap_or(1)
}

pub fn paginate<T>(items: &[T], requested_page: usize, images_per_page: usize) -> (&[T], PageInfo) {
    let info = PageInfo::new(items.len(), requested_page, images_per_page);
    (&items[info.start..info.end], info)
}
