//! Binary morphology with square structuring elements
//!
//! Both operators read from a snapshot of the grid taken before the pass and
//! write into the grid itself, so a pass never sees its own output. Pixels
//! closer than `size / 2` to an edge never trigger a window but can still be
//! overwritten by a neighbour's window.

use crate::models::GrayGrid;

fn spacing(size: usize) -> usize {
    // (size - 1) / 2 for odd sizes, size / 2 for even ones
    size / 2
}

/// Every foreground pixel paints the window `[-spc, spc)` around it
pub fn dilate(gray: &mut GrayGrid, size: usize) {
    let spc = spacing(size);
    let (width, height) = gray.dimensions();
    if width <= 2 * spc || height <= 2 * spc {
        return;
    }
    let src = gray.clone();

    for y in spc..height - spc {
        for x in spc..width - spc {
            if src[(x, y)] == 0 {
                continue;
            }
            for wy in y - spc..y + spc {
                gray.as_mut_slice()[wy * width + x - spc..wy * width + x + spc].fill(255);
            }
        }
    }
}

/// Every background pixel clears the reflected window `(-spc, spc]` around it
///
/// Using the reflection of the dilation window makes `dilate` followed by
/// `erode` with the same size a true closing.
pub fn erode(gray: &mut GrayGrid, size: usize) {
    let spc = spacing(size);
    let (width, height) = gray.dimensions();
    if width <= 2 * spc || height <= 2 * spc {
        return;
    }
    let src = gray.clone();

    for y in spc..height - spc {
        for x in spc..width - spc {
            if src[(x, y)] != 0 {
                continue;
            }
            for wy in y + 1 - spc..=y + spc {
                let start = wy * width + x + 1 - spc;
                let end = (wy * width + x + spc + 1).min((wy + 1) * width);
                gray.as_mut_slice()[start..end].fill(0);
            }
        }
    }
}
