//! Mesh entity bookkeeping and isoparametric shape functions for
//! material-point simulations.
//!
//! Nodes live in an [`EntityRegistry`] keyed by their [`Index`]; fields are
//! mapped between nodes and interior points with a [`ShapeFn`] such as
//! [`QuadrilateralShapeFn`].

#[cfg(test)]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr, $eps:expr) => {{
        let (a, b) = (&$a, &$b);
        let eps = $eps;
        assert!(
            (*a - *b).abs() < eps,
            "assertion failed: `(left !== right)` \
            (left: `{:?}`, right: `{:?}`, expect diff: `{:?}`, real diff: `{:?}`)",
            *a,
            *b,
            eps,
            (*a - *b).abs()
        );
    }};
}

pub mod error;
pub mod node;
pub mod quad_shapefn;
pub mod quadrature;
pub mod registry;
pub mod shapefn;

pub use error::{NodeError, RegistryError, ShapeFnError};
pub use node::Node;
pub use quad_shapefn::{QuadTopology, QuadrilateralShapeFn};
pub use registry::{Entity, EntityRegistry};
pub use shapefn::ShapeFn;

/// Identity of a mesh entity, assigned by whoever constructs it.
pub type Index = u64;

/// Position of node `index` among `order + 1` equally spaced points on [-1, 1].
pub fn xi(order: usize, index: usize) -> f64 {
    -1.0 + 2.0*index as f64/order as f64
}

/// 1-D Lagrange basis of the given order, tied to node `index`.
pub fn lagrange(order: usize, index: usize, x: f64) -> f64 {
    let mut result = 1.0;
    for m in 0..=order {
        if m == index { continue; }
        result *= (x - xi(order, m))/(xi(order, index) - xi(order, m));
    }
    result
}

pub fn lagrange_gradient(order: usize, index: usize, x: f64) -> f64 {
    let mut result = 0.0;
    for i in 0..=order {
        if i == index { continue; }
        let mut inner = 1.0;
        for m in 0..=order {
            if m == index || m == i { continue; }
            inner *= (x - xi(order, m))/(xi(order, index) - xi(order, m));
        }
        result += inner / (xi(order, index) - xi(order, i));
    }
    result
}
