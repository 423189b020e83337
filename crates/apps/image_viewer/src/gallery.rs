//! Sample image carousel with zoom state, independent of the DOM.

/// Rendered width of every sample image at 100% zoom.
pub const NATURAL_WIDTH: u32 = 200;

const ZOOM_IN_FACTOR: f64 = 1.2;
const ZOOM_OUT_FACTOR: f64 = 0.8;
const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One bundled image: a file name and its SVG source.
pub struct SampleImage {
    pub name: &'static str,
    svg: &'static str,
}

impl SampleImage {
    /// Returns the image as an inline `data:` URL.
    pub fn data_url(&self) -> String {
        svg_data_url(self.svg)
    }
}

pub const SAMPLE_IMAGES: [SampleImage; 3] = [
    SampleImage {
        name: "linux_penguin.jpg",
        svg: "<svg width='200' height='200' xmlns='http://www.w3.org/2000/svg'>\
              <rect width='100%' height='100%' fill='#333'/>\
              <text x='50%' y='50%' font-family='monospace' font-size='14' fill='white' \
              text-anchor='middle' dy='.3em'>Linux Penguin 🐧</text></svg>",
    },
    SampleImage {
        name: "retro_computer.jpg",
        svg: "<svg width='200' height='200' xmlns='http://www.w3.org/2000/svg'>\
              <rect width='100%' height='100%' fill='#404040'/>\
              <text x='50%' y='50%' font-family='monospace' font-size='14' fill='white' \
              text-anchor='middle' dy='.3em'>Retro Computer 🖥</text></svg>",
    },
    SampleImage {
        name: "desktop_wallpaper.jpg",
        svg: "<svg width='200' height='200' xmlns='http://www.w3.org/2000/svg'>\
              <defs><linearGradient id='g' x1='0%' y1='0%' x2='100%' y2='100%'>\
              <stop offset='0%' stop-color='#2F4F4F'/><stop offset='100%' stop-color='#608080'/>\
              </linearGradient></defs><rect width='100%' height='100%' fill='url(#g)'/>\
              <text x='50%' y='50%' font-family='monospace' font-size='14' fill='white' \
              text-anchor='middle' dy='.3em'>Desktop Wallpaper 🎆</text></svg>",
    },
];

/// Percent-encodes the characters that would end or corrupt a `data:` URL.
fn svg_data_url(svg: &str) -> String {
    let mut url = String::from("data:image/svg+xml;utf8,");
    for ch in svg.chars() {
        match ch {
            '%' => url.push_str("%25"),
            '#' => url.push_str("%23"),
            '<' => url.push_str("%3C"),
            '>' => url.push_str("%3E"),
            '"' => url.push_str("%22"),
            '\n' => url.push_str("%0A"),
            _ => url.push(ch),
        }
    }
    url
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zoom {
    /// Scaled down to fit the viewing area.
    Fit,
    /// Fixed multiple of [`NATURAL_WIDTH`].
    Scale(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    index: usize,
    zoom: Zoom,
}

impl Default for Gallery {
    fn default() -> Self {
        Self {
            index: 0,
            zoom: Zoom::Fit,
        }
    }
}

impl Gallery {
    pub fn current(&self) -> SampleImage {
        SAMPLE_IMAGES[self.index % SAMPLE_IMAGES.len()]
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Advances with wraparound; the new image starts fitted.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % SAMPLE_IMAGES.len();
        self.zoom = Zoom::Fit;
    }

    pub fn previous(&mut self) {
        self.index = (self.index + SAMPLE_IMAGES.len() - 1) % SAMPLE_IMAGES.len();
        self.zoom = Zoom::Fit;
    }

    pub fn zoom_in(&mut self) {
        self.rescale(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.rescale(ZOOM_OUT_FACTOR);
    }

    pub fn fit(&mut self) {
        self.zoom = Zoom::Fit;
    }

    fn rescale(&mut self, factor: f64) {
        let scale = match self.zoom {
            Zoom::Fit => 1.0,
            Zoom::Scale(scale) => scale,
        };
        self.zoom = Zoom::Scale((scale * factor).clamp(MIN_SCALE, MAX_SCALE));
    }

    /// Pixel width for the current zoom, or `None` when fitted.
    pub fn image_width(&self) -> Option<u32> {
        match self.zoom {
            Zoom::Fit => None,
            Zoom::Scale(scale) => Some((f64::from(NATURAL_WIDTH) * scale).round() as u32),
        }
    }

    /// Position and name, e.g. `2/3 - retro_computer.jpg`.
    pub fn info_text(&self) -> String {
        format!(
            "{}/{} - {}",
            self.index + 1,
            SAMPLE_IMAGES.len(),
            self.current().name
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn navigation_wraps_in_both_directions() {
        let mut gallery = Gallery::default();
        assert_eq!(gallery.info_text(), "1/3 - linux_penguin.jpg");

        gallery.previous();
        assert_eq!(gallery.info_text(), "3/3 - desktop_wallpaper.jpg");

        gallery.next();
        gallery.next();
        assert_eq!(gallery.info_text(), "2/3 - retro_computer.jpg");
    }

    #[test]
    fn zoom_steps_from_natural_size_and_fit_resets() {
        let mut gallery = Gallery::default();
        assert_eq!(gallery.image_width(), None);

        gallery.zoom_in();
        assert_eq!(gallery.image_width(), Some(240));
        gallery.zoom_in();
        assert_eq!(gallery.image_width(), Some(288));
        gallery.zoom_out();
        assert_eq!(gallery.image_width(), Some(230));

        gallery.fit();
        assert_eq!(gallery.zoom(), Zoom::Fit);
        assert_eq!(gallery.image_width(), None);
    }

    #[test]
    fn zoom_is_bounded_and_navigation_refits() {
        let mut gallery = Gallery::default();
        for _ in 0..40 {
            gallery.zoom_out();
        }
        assert_eq!(gallery.image_width(), Some(20));
        for _ in 0..40 {
            gallery.zoom_in();
        }
        assert_eq!(gallery.image_width(), Some(1600));

        gallery.next();
        assert_eq!(gallery.zoom(), Zoom::Fit);
    }

    #[test]
    fn data_urls_escape_fragment_and_tag_characters() {
        let url = SAMPLE_IMAGES[2].data_url();
        assert!(url.starts_with("data:image/svg+xml;utf8,%3Csvg"));
        assert!(url.contains("url(%23g)"));
        assert!(!url.contains('#'));
        assert!(!url.contains('<'));
    }
}
