use serde::Serialize;

use crate::pager::{paginate, PageInfo};

/// An image on the current page together with its position in the full list,
/// used by the full-screen viewer to step to the neighbouring picture.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: String,
    pub index: usize,
}

/// Body of `GET /api/images`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImagesResponse {
    pub images: Vec<String>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_images: usize,
}

#[derive(Debug, Clone)]
pub struct GalleryPage {
    pub images: Vec<String>,
    pub info: PageInfo,
}

impl GalleryPage {
    pub fn new(all_images: &[String], requested_page: usize, images_per_page: usize) -> Self {
        let (slice, info) = paginate(all_images, requested_page, images_per_page);
        GalleryPage {
            images: slice.to_vec(),
            info,
        }
    }

    pub fn indexed_images(&self) -> Vec<ImageRef> {
        self.images
            .iter()
            .enumerate()
            .map(|(i, path)| ImageRef {
                path: path.clone(),
                index: self.info.start + i,
            })
            .collect()
    }
}

impl From<GalleryPage> for ImagesResponse {
    fn from(page: GalleryPage) -> Self {
        ImagesResponse {
            images: page.images,
            current_page: page.info.current_page,
            total_pages: page.info.total_pages,
            total_images: page.info.total_images,
        }
    }
}
