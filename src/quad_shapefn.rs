//! Shape functions of the quadrilateral element.
//!
//! Reference node numbering:
//!
//! ```text
//!  3 ----- 6 ----- 2
//!  |               |
//!  7       8       5
//!  |               |
//!  0 ----- 4 ----- 1
//! ```
//!
//! Corners 0..4 are used by every topology, mid-sides 4..8 by the
//! serendipity and Lagrange elements, the centre 8 by the Lagrange element
//! only.

use std::convert::TryFrom;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::ShapeFnError;
use crate::shapefn::ShapeFn;
use crate::{lagrange, lagrange_gradient};

const REFERENCE_NODES: [[f64; 2]; 9] = [
    [-1., -1.],
    [ 1., -1.],
    [ 1.,  1.],
    [-1.,  1.],
    [ 0., -1.],
    [ 1.,  0.],
    [ 0.,  1.],
    [-1.,  0.],
    [ 0.,  0.],
];

// mid-side nodes sharing an edge with each corner
const ADJACENT_MIDSIDES: [[usize; 2]; 4] = [[4, 7], [4, 5], [5, 6], [6, 7]];

/// Supported quadrilateral topologies.
///
/// Serialized as the number of nodal functions, so configuration files name a
/// topology as `4`, `8` or `9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum QuadTopology {
    /// Bilinear, 4 corner nodes.
    Bilinear4,
    /// Quadratic serendipity, corners and mid-sides.
    Serendipity8,
    /// Biquadratic Lagrange, corners, mid-sides and centre.
    Lagrange9,
}

impl QuadTopology {
    pub fn nfunctions(self) -> usize {
        match self {
            QuadTopology::Bilinear4 => 4,
            QuadTopology::Serendipity8 => 8,
            QuadTopology::Lagrange9 => 9,
        }
    }
}

impl TryFrom<usize> for QuadTopology {
    type Error = ShapeFnError;

    fn try_from(nfunctions: usize) -> Result<Self, Self::Error> {
        match nfunctions {
            4 => Ok(QuadTopology::Bilinear4),
            8 => Ok(QuadTopology::Serendipity8),
            9 => Ok(QuadTopology::Lagrange9),
            _ => Err(ShapeFnError::UnsupportedTopology { nfunctions }),
        }
    }
}

impl From<QuadTopology> for usize {
    fn from(topology: QuadTopology) -> Self {
        topology.nfunctions()
    }
}

/// Shape functions of a 4-, 8- or 9-node quadrilateral.
#[derive(Debug, Clone)]
pub struct QuadrilateralShapeFn {
    topology: QuadTopology,
    nodes: Array2<f64>,
    shapefn: Array1<f64>,
    grad_shapefn: Array2<f64>,
}

impl QuadrilateralShapeFn {
    /// Build the element with `nfunctions` basis functions.
    ///
    /// The topology is fixed for the lifetime of the element; any size other
    /// than 4, 8 or 9 prints the error and aborts the process. Use
    /// [`QuadrilateralShapeFn::try_new`] to validate untrusted input first.
    pub fn new(nfunctions: usize) -> Self {
        match Self::try_new(nfunctions) {
            Ok(shapefn) => shapefn,
            Err(e) => {
                tracing::error!(nfunctions, "{}", e);
                eprintln!("{}", e);
                std::process::abort();
            }
        }
    }

    pub fn try_new(nfunctions: usize) -> Result<Self, ShapeFnError> {
        QuadTopology::try_from(nfunctions).map(Self::from_topology)
    }

    pub fn from_topology(topology: QuadTopology) -> Self {
        let n = topology.nfunctions();
        tracing::debug!(nfunctions = n, "quadrilateral shape function created");
        Self {
            topology,
            nodes: Array2::from_shape_fn((n, 2), |(i, j)| REFERENCE_NODES[i][j]),
            shapefn: Array1::zeros(n),
            grad_shapefn: Array2::zeros((n, 2)),
        }
    }

    pub fn topology(&self) -> QuadTopology {
        self.topology
    }

    fn eval_bilinear(&mut self, x: f64, y: f64) {
        for i in 0..4 {
            let [xi, eta] = REFERENCE_NODES[i];
            self.shapefn[i] = 0.25*(1. + xi*x)*(1. + eta*y);
        }
    }

    fn eval_serendipity(&mut self, x: f64, y: f64) {
        for i in 4..8 {
            let [xi, eta] = REFERENCE_NODES[i];
            self.shapefn[i] = if xi == 0. {
                0.5*(1. - x*x)*(1. + eta*y)
            } else {
                0.5*(1. + xi*x)*(1. - y*y)
            };
        }
        self.eval_bilinear(x, y);
        for (i, [a, b]) in ADJACENT_MIDSIDES.iter().enumerate() {
            let midsides = self.shapefn[*a] + self.shapefn[*b];
            self.shapefn[i] -= 0.5*midsides;
        }
    }

    fn eval_lagrange(&mut self, x: f64, y: f64) {
        for i in 0..9 {
            let (ix, iy) = lagrange_indices(i);
            self.shapefn[i] = lagrange(2, ix, x)*lagrange(2, iy, y);
        }
    }

    fn grad_bilinear(&mut self, x: f64, y: f64) {
        for i in 0..4 {
            let [xi, eta] = REFERENCE_NODES[i];
            self.grad_shapefn[[i, 0]] = 0.25*xi*(1. + eta*y);
            self.grad_shapefn[[i, 1]] = 0.25*eta*(1. + xi*x);
        }
    }

    fn grad_serendipity(&mut self, x: f64, y: f64) {
        for i in 4..8 {
            let [xi, eta] = REFERENCE_NODES[i];
            if xi == 0. {
                self.grad_shapefn[[i, 0]] = -x*(1. + eta*y);
                self.grad_shapefn[[i, 1]] = 0.5*eta*(1. - x*x);
            } else {
                self.grad_shapefn[[i, 0]] = 0.5*xi*(1. - y*y);
                self.grad_shapefn[[i, 1]] = -y*(1. + xi*x);
            }
        }
        self.grad_bilinear(x, y);
        for (i, [a, b]) in ADJACENT_MIDSIDES.iter().enumerate() {
            for d in 0..2 {
                let midsides = self.grad_shapefn[[*a, d]] + self.grad_shapefn[[*b, d]];
                self.grad_shapefn[[i, d]] -= 0.5*midsides;
            }
        }
    }

    fn grad_lagrange(&mut self, x: f64, y: f64) {
        for i in 0..9 {
            let (ix, iy) = lagrange_indices(i);
            self.grad_shapefn[[i, 0]] = lagrange_gradient(2, ix, x)*lagrange(2, iy, y);
            self.grad_shapefn[[i, 1]] = lagrange(2, ix, x)*lagrange_gradient(2, iy, y);
        }
    }
}

// position of reference node `i` among the quadratic 1-D nodes -1, 0, 1
fn lagrange_indices(i: usize) -> (usize, usize) {
    let [xi, eta] = REFERENCE_NODES[i];
    ((xi + 1.).round() as usize, (eta + 1.).round() as usize)
}

impl ShapeFn<2> for QuadrilateralShapeFn {
    fn nfunctions(&self) -> usize {
        self.topology.nfunctions()
    }

    fn reference_nodes(&self) -> ArrayView2<'_, f64> {
        self.nodes.view()
    }

    fn shapefn(&mut self, xi: &[f64; 2]) -> ArrayView1<'_, f64> {
        let [x, y] = *xi;
        match self.topology {
            QuadTopology::Bilinear4 => self.eval_bilinear(x, y),
            QuadTopology::Serendipity8 => self.eval_serendipity(x, y),
            QuadTopology::Lagrange9 => self.eval_lagrange(x, y),
        }
        self.shapefn.view()
    }

    fn grad_shapefn(&mut self, xi: &[f64; 2]) -> ArrayView2<'_, f64> {
        let [x, y] = *xi;
        match self.topology {
            QuadTopology::Bilinear4 => self.grad_bilinear(x, y),
            QuadTopology::Serendipity8 => self.grad_serendipity(x, y),
            QuadTopology::Lagrange9 => self.grad_lagrange(x, y),
        }
        self.grad_shapefn.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadrature::integrate_quad;
    use proptest::prelude::*;

    const TOPOLOGIES: [usize; 3] = [4, 8, 9];

    fn grid() -> Vec<[f64; 2]> {
        let mut points = Vec::new();
        for i in 0..=8 {
            for j in 0..=8 {
                points.push([-1. + 0.25*i as f64, -1. + 0.25*j as f64]);
            }
        }
        points
    }

    #[test]
    fn test_topology_sizes() {
        for n in TOPOLOGIES.iter() {
            let quad = QuadrilateralShapeFn::new(*n);
            assert_eq!(quad.nfunctions(), *n);
            assert_eq!(usize::from(quad.topology()), *n);
            assert_eq!(quad.reference_nodes().dim(), (*n, 2));
        }
    }

    #[test]
    fn test_unsupported_topology() {
        for n in &[0, 1, 3, 5, 6, 7, 10, 16] {
            let err = QuadrilateralShapeFn::try_new(*n).unwrap_err();
            assert_eq!(err, ShapeFnError::UnsupportedTopology { nfunctions: *n });
        }
    }

    #[test]
    fn test_new_aborts_on_unsupported_topology() {
        const CHILD: &str = "MPM_RS_QUAD_ABORT_CHILD";
        if std::env::var_os(CHILD).is_some() {
            QuadrilateralShapeFn::new(5);
            return;
        }

        let output = std::process::Command::new(std::env::current_exe().unwrap())
            .args(&[
                "quad_shapefn::tests::test_new_aborts_on_unsupported_topology",
                "--exact",
                "--nocapture",
                "--test-threads=1",
            ])
            .env(CHILD, "1")
            .output()
            .unwrap();
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("specified number of shape functions (5) is not defined"), "{}", stderr);
    }

    #[test]
    fn test_partition_of_unity() {
        for n in TOPOLOGIES.iter() {
            let mut quad = QuadrilateralShapeFn::new(*n);
            for xi in grid() {
                assert_approx_eq!(quad.shapefn(&xi).sum(), 1.0, 1e-7);
            }
        }
    }

    #[test]
    fn test_kronecker_delta() {
        for n in TOPOLOGIES.iter() {
            let mut quad = QuadrilateralShapeFn::new(*n);
            let nodes = quad.reference_nodes().to_owned();
            for (i, node) in nodes.outer_iter().enumerate() {
                let values = quad.shapefn(&[node[0], node[1]]);
                for (j, value) in values.iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_approx_eq!(*value, expected, 1e-7);
                }
            }
        }
    }

    #[test]
    fn test_gradient_matches_central_difference() {
        let h = 1e-6;
        for n in TOPOLOGIES.iter() {
            let mut quad = QuadrilateralShapeFn::new(*n);
            for xi in grid() {
                let [x, y] = xi;
                let grad = quad.grad_shapefn(&xi).to_owned();
                let right = quad.shapefn(&[x + h, y]).to_owned();
                let left = quad.shapefn(&[x - h, y]).to_owned();
                let up = quad.shapefn(&[x, y + h]).to_owned();
                let down = quad.shapefn(&[x, y - h]).to_owned();
                let dx = (right - left) / (2.*h);
                let dy = (up - down) / (2.*h);
                for i in 0..*n {
                    assert_approx_eq!(grad[[i, 0]], dx[i], 1e-5);
                    assert_approx_eq!(grad[[i, 1]], dy[i], 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_gradients_sum_to_zero() {
        for n in TOPOLOGIES.iter() {
            let mut quad = QuadrilateralShapeFn::new(*n);
            for xi in grid() {
                let grad = quad.grad_shapefn(&xi);
                assert_approx_eq!(grad.column(0).sum(), 0.0, 1e-12);
                assert_approx_eq!(grad.column(1).sum(), 0.0, 1e-12);
            }
        }
    }

    #[test]
    fn test_bilinear_centroid_gradient() {
        let mut quad = QuadrilateralShapeFn::new(4);
        let grad = quad.grad_shapefn(&[0., 0.]);
        let expected = [[-0.25, -0.25], [0.25, -0.25], [0.25, 0.25], [-0.25, 0.25]];
        for i in 0..4 {
            assert_approx_eq!(grad[[i, 0]], expected[i][0], 1e-12);
            assert_approx_eq!(grad[[i, 1]], expected[i][1], 1e-12);
        }
    }

    #[test]
    fn test_serendipity_centroid() {
        let mut quad = QuadrilateralShapeFn::new(8);
        let values = quad.shapefn(&[0., 0.]).to_owned();
        for i in 0..4 {
            assert_approx_eq!(values[i], -0.25, 1e-12);
        }
        for i in 4..8 {
            assert_approx_eq!(values[i], 0.5, 1e-12);
        }
    }

    #[test]
    fn test_no_clamping_outside_domain() {
        let mut quad = QuadrilateralShapeFn::new(4);
        let values = quad.shapefn(&[2., 0.]);
        assert_approx_eq!(values[0], -0.25, 1e-12);
        assert_approx_eq!(values[1], 0.75, 1e-12);
        assert_approx_eq!(values[2], 0.75, 1e-12);
        assert_approx_eq!(values[3], -0.25, 1e-12);
    }

    #[test]
    fn test_buffers_are_overwritten() {
        for n in TOPOLOGIES.iter() {
            let mut quad = QuadrilateralShapeFn::new(*n);
            let first = quad.shapefn(&[0.3, -0.6]).to_owned();
            quad.shapefn(&[-0.9, 0.1]);
            assert_eq!(quad.shapefn(&[0.3, -0.6]), first);

            let first = quad.grad_shapefn(&[0.3, -0.6]).to_owned();
            quad.grad_shapefn(&[-0.9, 0.1]);
            assert_eq!(quad.grad_shapefn(&[0.3, -0.6]), first);
        }
    }

    #[test]
    fn test_basis_integrals() {
        let expected: [(usize, &[f64]); 3] = [
            (4, &[1., 1., 1., 1.]),
            (8, &[-1./3., -1./3., -1./3., -1./3., 4./3., 4./3., 4./3., 4./3.]),
            (9, &[1./9., 1./9., 1./9., 1./9., 4./9., 4./9., 4./9., 4./9., 16./9.]),
        ];
        for (n, integrals) in expected.iter() {
            let mut quad = QuadrilateralShapeFn::new(*n);
            for (i, integral) in integrals.iter().enumerate() {
                let value = integrate_quad(|x, y| quad.shapefn(&[x, y])[i]);
                assert_approx_eq!(value, *integral, 1e-12);
            }
        }
    }

    #[test]
    fn test_topology_from_config() {
        #[derive(Debug, Deserialize)]
        struct Element {
            topology: QuadTopology,
        }

        let element: Element = toml::from_str("topology = 8").unwrap();
        assert_eq!(element.topology, QuadTopology::Serendipity8);
        assert_eq!(QuadrilateralShapeFn::from_topology(element.topology).nfunctions(), 8);

        let err = toml::from_str::<Element>("topology = 5").unwrap_err();
        assert!(err.to_string().contains("not defined"));
    }

    #[test]
    fn test_distinct_instances_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QuadrilateralShapeFn>();

        let handles: Vec<_> = TOPOLOGIES
            .iter()
            .map(|n| {
                let mut quad = QuadrilateralShapeFn::new(*n);
                std::thread::spawn(move || quad.shapefn(&[0.2, 0.7]).sum())
            })
            .collect();
        for handle in handles {
            assert_approx_eq!(handle.join().unwrap(), 1.0, 1e-12);
        }
    }

    proptest! {
        #[test]
        fn prop_partition_of_unity(x in -1.0f64..=1.0, y in -1.0f64..=1.0) {
            for n in TOPOLOGIES.iter() {
                let mut quad = QuadrilateralShapeFn::new(*n);
                prop_assert!((quad.shapefn(&[x, y]).sum() - 1.0).abs() < 1e-7);
            }
        }
    }
}
