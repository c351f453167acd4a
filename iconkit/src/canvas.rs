use image::{imageops, RgbaImage};

/// Top left corner of a `width` x `height` image centered in a square of
/// side `max(width, height)`. Odd remainders round towards the origin.
pub fn centering_offset(width: u32, height: u32) -> (u32, u32) {
    let side = width.max(height);
    ((side - width) / 2, (side - height) / 2)
}

/// Letterboxes `img` into a transparent square canvas.
///
/// The source pixels are copied verbatim, including the color of fully
/// transparent pixels, so compositing over the empty canvas is exact.
/// Square images are returned as is.
pub fn pad_to_square(img: RgbaImage) -> RgbaImage {
    let (width, height) = img.dimensions();
    if width == height {
        return img;
    }
    let side = width.max(height);
    let (x, y) = centering_offset(width, height);
    let mut canvas = RgbaImage::new(side, side);
    imageops::replace(&mut canvas, &img, x.into(), y.into());
    canvas
}
