//! Vertical clipping for windows/portals, filled in by the wall code and read
//! by whoever marks floor and ceiling columns.

use log::debug;

pub struct PortalClip {
    /// Clip values are the solid pixel bounding the range.
    ///  floorclip starts out SCREENHEIGHT
    ///  ceilingclip starts out -1
    pub floorclip: Vec<i32>,
    pub ceilingclip: Vec<i32>,
    /// Clip rows saved for masked walls and sprites, handed out by
    /// `alloc_openings`
    pub openings: Vec<i32>,
    last_opening: usize,
    screen_width: usize,
    screen_height: usize,
}

impl PortalClip {
    pub fn new(screen_width: usize, screen_height: usize) -> Self {
        PortalClip {
            floorclip: vec![screen_height as i32; screen_width],
            ceilingclip: vec![-1; screen_width],
            openings: vec![0; screen_width * 64],
            last_opening: 0,
            screen_width,
            screen_height,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.floorclip.fill(self.screen_height as i32);
        self.ceilingclip.fill(-1);
        self.last_opening = 0;
    }

    pub(crate) fn resize(&mut self, screen_width: usize, screen_height: usize) {
        *self = Self::new(screen_width, screen_height);
    }

    /// Reserve `len` entries of `openings`, returning the index of the first.
    /// The buffer doubles when it runs out so indexes stay valid.
    pub fn alloc_openings(&mut self, len: usize) -> usize {
        let start = self.last_opening;
        let needed = start + len;
        if needed > self.openings.len() {
            let size = needed.max(self.openings.len() * 2);
            debug!("Growing openings from {} to {size}", self.openings.len());
            self.openings.resize(size, 0);
        }
        self.last_opening = needed;
        start
    }

    pub fn openings_used(&self) -> usize {
        self.last_opening
    }
}

#[cfg(test)]
mod tests {
    use super::PortalClip;

    #[test]
    fn default_portal_clip() {
        let mut rd = PortalClip::new(640, 400);
        rd.floorclip[3] = 20;
        rd.ceilingclip[3] = 10;
        rd.alloc_openings(8);
        rd.clear();
        assert!(rd.floorclip.iter().all(|&c| c == 400));
        assert!(rd.ceilingclip.iter().all(|&c| c == -1));
        assert_eq!(rd.openings_used(), 0);
    }

    #[test]
    fn openings_grow() {
        let mut rd = PortalClip::new(4, 3);
        let initial = rd.openings.len();
        assert_eq!(rd.alloc_openings(initial - 1), 0);
        let second = rd.alloc_openings(10);
        assert_eq!(second, initial - 1);
        assert!(rd.openings.len() >= second + 10);
        rd.openings[second + 9] = 5;
        assert_eq!(rd.openings_used(), initial + 9);
    }

    #[test]
    fn resize_clip() {
        let mut rd = PortalClip::new(320, 200);
        rd.resize(640, 400);
        assert_eq!(rd.floorclip.len(), 640);
        assert_eq!(rd.floorclip[639], 400);
    }
}
