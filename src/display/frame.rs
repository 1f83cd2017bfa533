//! Conversion of an arbitrary image into the SSD1306's page-addressed, 1 bit per pixel RAM
//! layout.
//!
//! A full frame is written as 64 row groups. Row group `i` covers 16 columns starting at column
//! `(i % 8) * 16` of page `i / 8`, so groups 0-7 fill page 0 left to right, groups 8-15 fill page
//! 1, and so on, which is the order the controller consumes data in horizontal addressing mode.
//! Each packed byte is a vertical strip of 8 pixels with the topmost row in bit 0.

use image::{GenericImageView, Pixel};
use itertools::iproduct;

use crate::command::consts::{DATA_MARKER, DISPLAY_HEIGHT, DISPLAY_WIDTH, PAGE_HEIGHT};

/// Number of row groups in a full frame.
pub const ROW_GROUPS: usize = 64;
/// Source pixels sampled per row group.
pub const GROUP_PIXELS: usize = 128;
/// Packed data bytes per row group.
pub const GROUP_BYTES: usize = GROUP_PIXELS / 8;
/// Length of one row group payload on the wire, including the data marker.
pub const PAYLOAD_LEN: usize = GROUP_BYTES + 1;

const GROUPS_PER_PAGE: usize = DISPLAY_WIDTH as usize / GROUP_BYTES;

/// Where one sample of a row group comes from in the source image, and which bit of its packed
/// byte it lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelAddress {
    pub x: u32,
    pub y: u32,
    /// Bit position within the packed byte, 0 being the least significant.
    pub bit: u8,
}

/// Map the `offset`th sample (0-127) of row group `group` (0-63) to its source coordinates and
/// destination bit.
pub fn pixel_address(group: usize, offset: usize) -> PixelAddress {
    debug_assert!(group < ROW_GROUPS && offset < GROUP_PIXELS);
    let col = (group % GROUPS_PER_PAGE) * GROUP_BYTES;
    let row = (group / GROUPS_PER_PAGE) * PAGE_HEIGHT as usize;
    // Samples are shifted in from the right, so the first of each 8 ends up in bit 7. Walking
    // the strip bottom-up puts the topmost row in bit 0.
    let within = offset & 7;
    PixelAddress {
        x: (col + (offset >> 3)) as u32,
        y: (row + 7 - within) as u32,
        bit: (7 - within) as u8,
    }
}

/// Every sample of a full frame, in wire order.
pub fn frame_addresses() -> impl Iterator<Item = PixelAddress> {
    iproduct!(0..ROW_GROUPS, 0..GROUP_PIXELS).map(|(group, offset)| pixel_address(group, offset))
}

/// Pack one row group. `lit` is asked about each sample's source coordinates exactly once, in
/// wire order.
pub fn encode_row_group<F>(group: usize, mut lit: F) -> [u8; PAYLOAD_LEN]
where
    F: FnMut(u32, u32) -> bool,
{
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = DATA_MARKER;
    let mut datum = 0u8;
    for offset in 0..GROUP_PIXELS {
        let addr = pixel_address(group, offset);
        datum <<= 1;
        if lit(addr.x, addr.y) {
            datum |= 1;
        }
        if offset & 7 == 7 {
            payload[1 + (offset >> 3)] = datum;
        }
    }
    payload
}

/// Pack one row group straight from an image. The image must cover at least
/// `DISPLAY_WIDTH` x `DISPLAY_HEIGHT`; sampling outside it is left to `GenericImageView::get_pixel`.
pub fn encode_image_group<I, F>(image: &I, group: usize, predicate: &F) -> [u8; PAYLOAD_LEN]
where
    I: GenericImageView,
    F: Fn(I::Pixel) -> bool,
{
    encode_row_group(group, |x, y| predicate(image.get_pixel(x, y)))
}

/// All 64 row group payloads for `image`, without sending them anywhere.
pub fn encode_frame<I, F>(image: &I, predicate: F) -> Vec<[u8; PAYLOAD_LEN]>
where
    I: GenericImageView,
    F: Fn(I::Pixel) -> bool,
{
    (0..ROW_GROUPS)
        .map(|group| encode_image_group(image, group, &predicate))
        .collect()
}

/// A predicate lighting every pixel whose 8-bit luma is at least `level`.
pub fn luma_threshold<P>(level: u8) -> impl Fn(P) -> bool
where
    P: Pixel,
    P::Subpixel: Into<f32>,
{
    move |px: P| luma8(px) >= level
}

/// A predicate lighting every pixel that is not fully black.
pub fn luma_nonzero<P>() -> impl Fn(P) -> bool
where
    P: Pixel,
    P::Subpixel: Into<f32>,
{
    luma_threshold::<P>(1)
}

/// Rec. 601 luma of `px`, scaled to 0-255 whatever the subpixel type. Alpha is ignored.
fn luma8<P>(px: P) -> u8
where
    P: Pixel,
    P::Subpixel: Into<f32>,
{
    let max: f32 = <P::Subpixel as image::Primitive>::DEFAULT_MAX_VALUE.into();
    let [r, g, b] = px.to_rgb().0;
    let (r, g, b): (f32, f32, f32) = (r.into(), g.into(), b.into());
    let luma = (0.299 * r + 0.587 * g + 0.114 * b) / max;
    (luma * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Whether `image` covers the whole panel.
pub fn covers_display<I: GenericImageView>(image: &I) -> bool {
    let (w, h) = image.dimensions();
    w >= DISPLAY_WIDTH && h >= DISPLAY_HEIGHT
}
