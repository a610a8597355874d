use ndarray::{ArrayView1, ArrayView2};

/// Basis functions of an isoparametric element, evaluated in natural
/// coordinates.
///
/// Inside the reference domain ([-1, 1] along every axis) the values form a
/// partition of unity and function `i` is 1 at reference node `i` and 0 at
/// every other reference node. Points outside are evaluated without clamping.
///
/// Evaluation overwrites buffers owned by the instance and returns views into
/// them, so one instance serves one caller at a time.
pub trait ShapeFn<const DIM: usize> {
    /// Number of basis functions, fixed at construction.
    fn nfunctions(&self) -> usize;

    /// Natural coordinates of the node tied to each basis function.
    fn reference_nodes(&self) -> ArrayView2<'_, f64>;

    /// Values of every basis function at `xi`.
    fn shapefn(&mut self, xi: &[f64; DIM]) -> ArrayView1<'_, f64>;

    /// Derivatives of every basis function at `xi` along each natural axis,
    /// one row per function. Mapping to physical coordinates through the
    /// inverse Jacobian is left to the caller.
    fn grad_shapefn(&mut self, xi: &[f64; DIM]) -> ArrayView2<'_, f64>;
}
