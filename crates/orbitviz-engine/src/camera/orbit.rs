use glam::Vec3;

/// Elevation limits in degrees; the poles themselves are excluded.
pub const MIN_ELEVATION_DEG: f32 = -89.0;
pub const MAX_ELEVATION_DEG: f32 = 89.0;

/// Distance limits from the focus point.
pub const MIN_DISTANCE: f32 = 1e-3;
pub const MAX_DISTANCE: f32 = 1e3;

/// Multiplicative zoom applied per scroll notch.
pub const SCROLL_STEP: f32 = 1.15;

/// Focus translation per pixel of drag, relative to the current distance.
pub const TRANSLATE_SCALE: f32 = 3e-3;

/// Orbit camera parameterized by a focus point and a spherical offset.
///
/// Invariant: `eye() == center() + distance * direction(azimuth, elevation)`,
/// with azimuth in `(-180, 180]`, elevation in `[-89, 89]` and distance in
/// `[1e-3, 1e3]`. All mutation goes through methods that preserve it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    focus: Vec3,
    azimuth_deg: f32,
    elevation_deg: f32,
    distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::new(0.0, 0.0, -2.0),
            azimuth_deg: 60.0,
            elevation_deg: 30.0,
            distance: 10.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Eye position in world space.
    ///
    /// World +Z points down: positive elevation lifts the eye towards -Z.
    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth_deg.to_radians().sin_cos();
        let (sin_el, cos_el) = self.elevation_deg.to_radians().sin_cos();
        self.focus + self.distance * Vec3::new(cos_az * cos_el, sin_az * cos_el, -sin_el)
    }

    /// The orbit pivot.
    pub fn center(&self) -> Vec3 {
        self.focus
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth_deg(&self) -> f32 {
        self.azimuth_deg
    }

    pub fn elevation_deg(&self) -> f32 {
        self.elevation_deg
    }

    /// Orbits by `dx` degrees of azimuth and `dy` degrees of elevation.
    ///
    /// Azimuth wraps with a single ±360 step, which covers per-event pointer
    /// deltas; larger steps fall back to a full normalization. Elevation
    /// saturates.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth_deg = wrap_azimuth(self.azimuth_deg + dx);
        self.elevation_deg =
            (self.elevation_deg + dy).clamp(MIN_ELEVATION_DEG, MAX_ELEVATION_DEG);
    }

    /// Pans the focus in the world XY plane, following the current azimuth.
    pub fn translate_xy(&mut self, dx: f32, dy: f32) {
        let (sin_az, cos_az) = self.azimuth_deg.to_radians().sin_cos();
        let scale = self.distance * TRANSLATE_SCALE;
        self.focus.y += scale * (dx * cos_az - dy * sin_az);
        self.focus.x -= scale * (dx * sin_az + dy * cos_az);
    }

    /// Moves the focus along world Z. `dx` is ignored.
    pub fn translate_z(&mut self, _dx: f32, dy: f32) {
        self.focus.z -= self.distance * TRANSLATE_SCALE * dy;
    }

    /// Zooms one notch out (`amount > 0`) or in (`amount < 0`).
    ///
    /// Only the sign is used. Magnitudes other than exactly 1 are accepted
    /// but logged, since they usually come from a continuous scroll source.
    pub fn scroll(&mut self, amount: f32) {
        if amount > 0.0 {
            self.distance = (self.distance * SCROLL_STEP).min(MAX_DISTANCE);
        } else if amount < 0.0 {
            self.distance = (self.distance / SCROLL_STEP).max(MIN_DISTANCE);
        }

        if amount != 0.0 && amount != 1.0 && amount != -1.0 {
            log::warn!("scroll expected to be in [-1, 0, 1] but it was {amount:.1}");
        }
    }

    // ── programmatic control ─────────────────────────────────────────────

    pub fn set_focus(&mut self, focus: Vec3) {
        self.focus = focus;
    }

    /// Sets the azimuth, normalizing any finite angle into `(-180, 180]`.
    pub fn set_azimuth_deg(&mut self, deg: f32) {
        self.azimuth_deg = normalize_deg(deg);
    }

    pub fn set_elevation_deg(&mut self, deg: f32) {
        self.elevation_deg = deg.clamp(MIN_ELEVATION_DEG, MAX_ELEVATION_DEG);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

fn wrap_azimuth(deg: f32) -> f32 {
    let once = if deg > 180.0 {
        deg - 360.0
    } else if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    };

    if once > -180.0 && once <= 180.0 { once } else { normalize_deg(once) }
}

fn normalize_deg(deg: f32) -> f32 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-4 * b.abs().max(1.0)
    }

    // ── rotate ────────────────────────────────────────────────────────────

    #[test]
    fn rotate_wraps_past_180_once() {
        let mut cam = OrbitCamera::default();
        cam.set_azimuth_deg(170.0);
        cam.rotate(20.0, 0.0);
        assert!(approx(cam.azimuth_deg(), -170.0), "{}", cam.azimuth_deg());
    }

    #[test]
    fn rotate_wraps_past_minus_180() {
        let mut cam = OrbitCamera::default();
        cam.set_azimuth_deg(-170.0);
        cam.rotate(-20.0, 0.0);
        assert!(approx(cam.azimuth_deg(), 170.0), "{}", cam.azimuth_deg());
    }

    #[test]
    fn repeated_rotation_keeps_azimuth_in_range() {
        let mut cam = OrbitCamera::default();
        for dx in [37.0, 170.0, -95.5, 179.9, -179.9, 360.0, -360.0] {
            for _ in 0..200 {
                cam.rotate(dx, 0.0);
                let az = cam.azimuth_deg();
                assert!(az > -180.0 && az <= 180.0, "azimuth {az} after dx {dx}");
            }
        }
    }

    #[test]
    fn rotate_beyond_a_full_turn_stays_in_range() {
        for (dx, expected) in [(540.0, -120.0), (-540.0, -120.0), (1000.0, -20.0), (-1000.0, 140.0)] {
            let mut cam = OrbitCamera::default();
            cam.rotate(dx, 0.0);
            let az = cam.azimuth_deg();
            assert!(az > -180.0 && az <= 180.0, "azimuth {az} after dx {dx}");
            assert!(approx(az, expected), "azimuth {az} after dx {dx}, want {expected}");
        }
    }

    #[test]
    fn landing_on_minus_180_maps_to_180() {
        let mut cam = OrbitCamera::default();
        cam.set_azimuth_deg(-170.0);
        cam.rotate(-10.0, 0.0);
        assert_eq!(cam.azimuth_deg(), 180.0);
    }

    #[test]
    fn elevation_saturates() {
        let mut cam = OrbitCamera::default();
        for _ in 0..1000 {
            cam.rotate(0.0, 5.0);
        }
        assert_eq!(cam.elevation_deg(), MAX_ELEVATION_DEG);

        for _ in 0..1000 {
            cam.rotate(0.0, -7.0);
        }
        assert_eq!(cam.elevation_deg(), MIN_ELEVATION_DEG);
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn scroll_clamps_at_max_distance() {
        let mut cam = OrbitCamera::default();
        cam.set_distance(MAX_DISTANCE);
        cam.scroll(1.0);
        assert_eq!(cam.distance(), MAX_DISTANCE);
    }

    #[test]
    fn scroll_clamps_at_min_distance() {
        let mut cam = OrbitCamera::default();
        for _ in 0..500 {
            cam.scroll(-1.0);
        }
        assert_eq!(cam.distance(), MIN_DISTANCE);
    }

    #[test]
    fn scroll_uses_only_the_sign() {
        let mut a = OrbitCamera::default();
        let mut b = OrbitCamera::default();
        a.scroll(1.0);
        b.scroll(7.5);
        assert_eq!(a.distance(), b.distance());
        assert!(approx(a.distance(), 10.0 * SCROLL_STEP));

        a.scroll(-1.0);
        b.scroll(-0.25);
        assert_eq!(a.distance(), b.distance());
    }

    #[test]
    fn zero_scroll_is_a_no_op() {
        let mut cam = OrbitCamera::default();
        cam.scroll(0.0);
        assert_eq!(cam, OrbitCamera::default());
    }

    // ── eye ───────────────────────────────────────────────────────────────

    #[test]
    fn default_eye_matches_closed_form() {
        let cam = OrbitCamera::default();
        let (az, el) = (60f32.to_radians(), 30f32.to_radians());
        let expected = Vec3::new(
            10.0 * az.cos() * el.cos(),
            10.0 * az.sin() * el.cos(),
            -2.0 - 10.0 * el.sin(),
        );
        assert!((cam.eye() - expected).length() < 1e-4);
    }

    #[test]
    fn eye_stays_at_distance_from_focus() {
        let mut cam = OrbitCamera::default();
        let steps = [(13.0, 7.0), (-91.0, 40.0), (250.0, -300.0), (5.0, 5.0)];
        for (i, (dx, dy)) in steps.iter().cycle().take(64).enumerate() {
            cam.rotate(*dx, *dy);
            cam.scroll(if i % 3 == 0 { -1.0 } else { 1.0 });
            cam.translate_xy(*dx, *dy);
            let r = (cam.eye() - cam.center()).length();
            assert!(approx(r, cam.distance()), "{r} vs {}", cam.distance());
        }
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn translate_xy_leaves_z_untouched() {
        let mut cam = OrbitCamera::default();
        cam.translate_xy(40.0, -12.0);
        assert_eq!(cam.center().z, -2.0);
        assert_ne!(cam.center().x, 0.0);
    }

    #[test]
    fn translate_xy_follows_azimuth() {
        let mut cam = OrbitCamera::default();
        cam.set_azimuth_deg(0.0);
        cam.translate_xy(100.0, 0.0);
        // At azimuth 0 a horizontal drag moves purely along +Y.
        let scale = 10.0 * TRANSLATE_SCALE;
        assert!(approx(cam.center().y, 100.0 * scale));
        assert!(cam.center().x.abs() < 1e-6);
    }

    #[test]
    fn translate_z_ignores_dx() {
        let mut cam = OrbitCamera::default();
        cam.translate_z(1000.0, 0.0);
        assert_eq!(cam.center(), Vec3::new(0.0, 0.0, -2.0));

        cam.translate_z(0.0, 10.0);
        assert!(approx(cam.center().z, -2.0 - 10.0 * TRANSLATE_SCALE * 10.0));
    }

    // ── setters ───────────────────────────────────────────────────────────

    #[test]
    fn setters_enforce_invariants() {
        let mut cam = OrbitCamera::default();
        cam.set_azimuth_deg(540.0);
        assert!(approx(cam.azimuth_deg(), 180.0));
        cam.set_azimuth_deg(-190.0);
        assert!(approx(cam.azimuth_deg(), 170.0));
        cam.set_elevation_deg(120.0);
        assert_eq!(cam.elevation_deg(), MAX_ELEVATION_DEG);
        cam.set_distance(0.0);
        assert_eq!(cam.distance(), MIN_DISTANCE);
    }
}
