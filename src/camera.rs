/// View orientation: a unit facing vector plus the camera plane perpendicular
/// to it. The plane's length is `tan(fov / 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub dir: [f32; 2],
    pub plane: [f32; 2],
}

impl Camera {
    /// Facing `dir` (normalized here), plane to its right-hand side in grid
    /// space (y grows downward), so east pairs with a +y plane.
    pub fn facing(dir: [f32; 2], plane_len: f32) -> Self {
        let len = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt();
        let d = if len > 0.0 {
            [dir[0] / len, dir[1] / len]
        } else {
            [1.0, 0.0]
        };
        Self {
            dir: d,
            plane: [-d[1] * plane_len, d[0] * plane_len],
        }
    }

    pub fn plane_len_from_fov(fov_deg: f32) -> f32 {
        (0.5 * fov_deg.to_radians()).tan()
    }

    pub fn fov_deg(&self) -> f32 {
        let len = (self.plane[0] * self.plane[0] + self.plane[1] * self.plane[1]).sqrt();
        2.0 * len.atan().to_degrees()
    }

    /// Apply one rotation matrix to both vectors so they stay perpendicular.
    pub fn rotate(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        let [dx, dy] = self.dir;
        let [px, py] = self.plane;
        self.dir = [dx * c - dy * s, dx * s + dy * c];
        self.plane = [px * c - py * s, px * s + py * c];
    }

    /// Ray direction for a screen column, `cameraX` running -1..+1 left to right.
    #[inline]
    pub fn ray_dir(&self, column: usize, screen_width: usize) -> [f32; 2] {
        let camera_x = 2.0 * column as f32 / screen_width as f32 - 1.0;
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn east_facing_plane_points_south() {
        let cam = Camera::facing([1.0, 0.0], 0.66);
        assert_eq!(cam.dir, [1.0, 0.0]);
        assert_eq!(cam.plane, [0.0, 0.66]);
    }

    #[test]
    fn fov_round_trips_through_plane_length() {
        let len = Camera::plane_len_from_fov(66.0);
        assert!((len - 0.6494).abs() < 1e-3);
        let cam = Camera::facing([0.0, -3.0], len);
        assert!((cam.fov_deg() - 66.0).abs() < 1e-3);
    }

    #[test]
    fn centre_column_follows_facing() {
        let cam = Camera::facing([0.0, 1.0], 0.66);
        let ray = cam.ray_dir(160, 320);
        assert_eq!(ray, cam.dir);
        let left = cam.ray_dir(0, 320);
        assert!((left[0] - 0.66).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_falls_back_to_east() {
        let cam = Camera::facing([0.0, 0.0], 0.5);
        assert_eq!(cam.dir, [1.0, 0.0]);
    }

    #[test]
    fn quarter_turn() {
        let mut cam = Camera::facing([1.0, 0.0], 0.66);
        cam.rotate(std::f32::consts::FRAC_PI_2);
        assert!(cam.dir[0].abs() < 1e-6 && (cam.dir[1] - 1.0).abs() < 1e-6);
        assert!((cam.plane[0] + 0.66).abs() < 1e-6 && cam.plane[1].abs() < 1e-6);
    }
}
