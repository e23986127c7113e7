use crate::error::Error;
use crate::Float;
use nalgebra as na;

/// Planar perspective correction: maps image-plane points onto the
/// metric ground plane through a 3x3 homography computed once from four
/// point correspondences.
///
/// The matrix is immutable after construction and every mapping method
/// takes `&self`, so a transformer can be shared across threads freely.
#[derive(Debug)]
pub struct ViewTransformer<F: Float> {
    m: na::Matrix3<F>,
}

impl<F: Float> ViewTransformer<F> {
    /// Solves the homography mapping `source[i]` onto `target[i]`.
    ///
    /// Fails with [`Error::DegenerateGeometry`] when any three points of
    /// either quad are collinear, or when the correspondence system is
    /// singular for another reason (e.g. duplicate points).
    pub fn new(
        source: [na::Point2<F>; 4],
        target: [na::Point2<F>; 4],
    ) -> Result<Self, Error> {
        check_quad(&source, "source")?;
        check_quad(&target, "target")?;

        // Direct linear transform with h33 fixed to 1: two equations per
        // correspondence, eight unknowns.
        let mut a = na::SMatrix::<F, 8, 8>::zeros();
        let mut b = na::SVector::<F, 8>::zeros();

        for i in 0..4 {
            let (x, y) = (source[i].x, source[i].y);
            let (u, v) = (target[i].x, target[i].y);
            let r = i * 2;

            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = F::one();
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = F::one();
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b).ok_or_else(|| {
            Error::DegenerateGeometry("correspondence system is singular".into())
        })?;

        Ok(Self {
            m: na::Matrix3::new(
                h[0],
                h[1],
                h[2],
                h[3],
                h[4],
                h[5],
                h[6],
                h[7],
                F::one(),
            ),
        })
    }

    #[inline]
    pub fn matrix(&self) -> &na::Matrix3<F> {
        &self.m
    }

    /// Applies the homography with projective normalization. No rounding
    /// happens here; callers needing integer coordinates round downstream.
    #[inline]
    pub fn transform_point(&self, p: na::Point2<F>) -> na::Point2<F> {
        let q = self.m * na::Vector3::new(p.x, p.y, F::one());

        na::Point2::new(q.x / q.z, q.y / q.z)
    }

    /// Batched mapping; output order matches input order 1:1 and an
    /// empty input yields an empty output.
    pub fn transform_points(&self, points: &[na::Point2<F>]) -> Vec<na::Point2<F>> {
        points.iter().map(|&p| self.transform_point(p)).collect()
    }
}

/// Rejects quads with a collinear triple; three collinear points leave
/// the homography underdetermined.
fn check_quad<F: Float>(quad: &[na::Point2<F>; 4], name: &str) -> Result<(), Error> {
    let threshold = F::from_f64(1e-6).unwrap();

    for i in 0..2 {
        for j in i + 1..3 {
            for k in j + 1..4 {
                let u = quad[j] - quad[i];
                let v = quad[k] - quad[i];

                let cross = u.x * v.y - u.y * v.x;

                if cross.abs() <= u.norm() * v.norm() * threshold {
                    return Err(Error::DegenerateGeometry(format!(
                        "{} points {}, {} and {} are collinear",
                        name, i, j, k
                    )));
                }
            }
        }
    }

    Ok(())
}
