// SPDX-License-Identifier: MIT
//
// Image composition — build a PDF with one page per raster image using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use quire_core::error::{QuireError, Result};
use tracing::{debug, info, instrument};

/// A4 portrait in millimetres.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;

/// Assumed source resolution when sizing images on the page.
const IMAGE_DPI: f32 = 150.0;

/// Builds image-only PDF documents, one page per image.
pub struct ImageComposer {
    title: String,
}

impl Default for ImageComposer {
    fn default() -> Self {
        Self::new("Quire Images")
    }
}

impl ImageComposer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Compose the given encoded images (JPEG/PNG/TIFF) into one PDF.
    ///
    /// Each image is centred on its own A4 page, scaled to fit within the
    /// margins while preserving aspect ratio. Images are never upscaled.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn compose(&self, images: &[Vec<u8>]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(QuireError::ImageError(
                "no images supplied".to_string(),
            ));
        }

        info!(images = images.len(), title = %self.title, "composing image PDF");

        let mut doc = PdfDocument::new(&self.title);
        let mut pages = Vec::with_capacity(images.len());
        for (index, encoded) in images.iter().enumerate() {
            pages.push(self.image_page(&mut doc, index, encoded)?);
        }
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }

    fn image_page(
        &self,
        doc: &mut PdfDocument,
        index: usize,
        encoded: &[u8],
    ) -> Result<PdfPage> {
        let dynamic = image::load_from_memory(encoded).map_err(|err| {
            QuireError::ImageError(format!("failed to decode image #{}: {err}", index + 1))
        })?;

        let img_width = dynamic.width() as usize;
        let img_height = dynamic.height() as usize;

        // printpdf wants raw RGB8 pixel data.
        let rgb = dynamic.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        let usable_w_pt = Mm(PAGE_WIDTH_MM - 2.0 * MARGIN_MM).into_pt().0;
        let usable_h_pt = Mm(PAGE_HEIGHT_MM - 2.0 * MARGIN_MM).into_pt().0;

        let img_w_pt = img_width as f32 / IMAGE_DPI * 72.0;
        let img_h_pt = img_height as f32 / IMAGE_DPI * 72.0;

        // Fit within the margins, never upscale.
        let scale = (usable_w_pt / img_w_pt)
            .min(usable_h_pt / img_h_pt)
            .min(1.0);
        let rendered_w_pt = img_w_pt * scale;
        let rendered_h_pt = img_h_pt * scale;

        let margin_pt = Mm(MARGIN_MM).into_pt().0;
        let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
        let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

        debug!(index, rendered_w_pt, rendered_h_pt, scale, "image placed");

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                rotate: None,
            },
        }];
        Ok(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tiny_png(r: u8, g: u8, b: u8) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([r, g, b]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .expect("png encode");
        buffer
    }

    #[test]
    fn one_page_per_image() {
        let composer = ImageComposer::default();
        let bytes = composer
            .compose(&[tiny_png(255, 0, 0), tiny_png(0, 255, 0)])
            .expect("compose");

        let doc = lopdf::Document::load_mem(&bytes).expect("reload");
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = ImageComposer::default()
            .compose(&[])
            .expect_err("no images");
        assert!(matches!(err, QuireError::ImageError(_)));
    }

    #[test]
    fn undecodable_image_is_rejected() {
        let err = ImageComposer::default()
            .compose(&[b"not an image".to_vec()])
            .expect_err("bad image");
        assert!(matches!(err, QuireError::ImageError(_)));
    }
}
