use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// A rigid-body transform that maps a mobile coordinate set onto a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Superposition {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl Superposition {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    pub fn apply_all(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Optimal least-squares superposition (Kabsch) of `mobile` onto `target`.
///
/// Returns `None` if the sets differ in length, are empty, or the SVD fails to
/// produce both singular vector matrices.
pub fn superpose(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Option<Superposition> {
    if mobile.len() != target.len() {
        return None;
    }
    let mobile_centroid = centroid(mobile)?;
    let target_centroid = centroid(target)?;

    let h = mobile
        .iter()
        .zip(target.iter())
        .fold(Matrix3::zeros(), |acc, (m, t)| {
            acc + (t - target_centroid) * (m - mobile_centroid).transpose()
        });

    let svd = h.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;

    let mut correction = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation = Rotation3::from_matrix_unchecked(u * correction * v_t);
    let translation = target_centroid.coords - rotation * mobile_centroid.coords;

    Some(Superposition {
        rotation,
        translation,
    })
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// RMSD after optimally superposing `mobile` onto `target`.
pub fn superposed_rmsd(mobile: &[Point3<f64>], target: &[Point3<f64>]) -> Option<f64> {
    let transform = superpose(mobile, target)?;
    calculate_rmsd(&transform.apply_all(mobile), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.2, -0.3),
            Point3::new(2.1, 1.7, 0.4),
            Point3::new(0.7, 2.9, 1.8),
            Point3::new(-1.2, 1.1, 2.6),
        ]
    }

    #[test]
    fn superpose_recovers_pure_translation() {
        let target = sample_points();
        let mobile: Vec<_> = target
            .iter()
            .map(|p| p - Vector3::new(10.0, 20.0, 30.0))
            .collect();

        let transform = superpose(&mobile, &target).unwrap();

        assert!(transform.rotation.angle().abs() < 1e-9);
        assert!((transform.translation - Vector3::new(10.0, 20.0, 30.0)).norm() < 1e-9);
    }

    #[test]
    fn superpose_recovers_rotation_and_translation() {
        let target = sample_points();
        let rotation = Rotation3::from_axis_angle(
            &Unit::new_normalize(Vector3::new(1.0, 2.0, -0.5)),
            1.1,
        );
        let mobile: Vec<_> = target
            .iter()
            .map(|p| rotation * p + Vector3::new(-3.0, 4.0, 0.5))
            .collect();

        let rmsd = superposed_rmsd(&mobile, &target).unwrap();
        assert!(rmsd < 1e-9, "rmsd was {}", rmsd);
    }

    #[test]
    fn superpose_never_returns_a_reflection() {
        let target = sample_points();
        let mirrored: Vec<_> = target.iter().map(|p| Point3::new(-p.x, p.y, p.z)).collect();

        let transform = superpose(&mirrored, &target).unwrap();
        assert!((transform.rotation.matrix().determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn superpose_rejects_mismatched_or_empty_sets() {
        let points = sample_points();
        assert!(superpose(&points[..3], &points[..4]).is_none());
        assert!(superpose(&[], &[]).is_none());
    }

    #[test]
    fn calculate_rmsd_for_constant_offset() {
        let a = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let b = vec![Point3::new(0.0, 2.0, 0.0), Point3::new(1.0, 2.0, 0.0)];
        assert!((calculate_rmsd(&a, &b).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(centroid(&[]).is_none());
        let c = centroid(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)]).unwrap();
        assert_eq!(c, Point3::new(1.0, 2.0, 3.0));
    }
}
