/// Furthest a pupil travels from the centre of its eye, in pixels.
pub const MAX_PUPIL_TRAVEL: f64 = 26.0;

/// Pointer distance is divided by this before it is applied to the pupil.
const DISTANCE_DAMPING: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    /// CSS transform that moves a centred pupil by this offset.
    pub fn transform(self) -> String {
        format!(
            "translate(calc(-50% + {:.1}px), calc(-50% + {:.1}px))",
            self.dx, self.dy
        )
    }
}

/// Offsets a pupil towards `pointer`, damped and capped at [`MAX_PUPIL_TRAVEL`].
pub fn pupil_offset(eye_center: (f64, f64), pointer: (f64, f64)) -> Offset {
    let dx = pointer.0 - eye_center.0;
    let dy = pointer.1 - eye_center.1;
    let distance = (dx.hypot(dy) / DISTANCE_DAMPING).min(MAX_PUPIL_TRAVEL);
    let angle = dy.atan2(dx);
    Offset {
        dx: angle.cos() * distance,
        dy: angle.sin() * distance,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rounded(offset: Offset) -> (i64, i64) {
        (offset.dx.round() as i64, offset.dy.round() as i64)
    }

    #[test]
    fn pupils_follow_the_pointer_with_damping() {
        assert_eq!(rounded(pupil_offset((100.0, 100.0), (200.0, 100.0))), (10, 0));
        assert_eq!(rounded(pupil_offset((100.0, 100.0), (100.0, 50.0))), (0, -5));
        assert_eq!(rounded(pupil_offset((0.0, 0.0), (30.0, 40.0))), (3, 4));
    }

    #[test]
    fn travel_is_capped_far_from_the_eye() {
        let offset = pupil_offset((0.0, 0.0), (-3000.0, 4000.0));
        assert!((offset.dx.hypot(offset.dy) - MAX_PUPIL_TRAVEL).abs() < 1e-9);
        assert_eq!(rounded(offset), (-16, 21));
    }

    #[test]
    fn pointer_on_the_centre_leaves_the_pupil_centred() {
        assert_eq!(pupil_offset((5.0, 5.0), (5.0, 5.0)), Offset::default());
        assert_eq!(
            Offset { dx: 3.0, dy: -1.5 }.transform(),
            "translate(calc(-50% + 3.0px), calc(-50% + -1.5px))"
        );
    }
}
