//! Gauss-Legendre integration over the reference segment and quadrilateral.

/// `(point, weight)` pairs of the 4-point Gauss-Legendre rule on [-1, 1],
/// ordered by point.
///
/// Exact for polynomials up to degree 7 along each axis.
pub fn gauss_legendre4() -> [(f64, f64); 4] {
    let spread = 2./7.*(6./5_f64).sqrt();
    let inner = (3./7. - spread).sqrt();
    let outer = (3./7. + spread).sqrt();
    let shift = 30_f64.sqrt()/36.;
    [(-outer, 0.5 - shift), (-inner, 0.5 + shift), (inner, 0.5 + shift), (outer, 0.5 - shift)]
}

/// Integral of `f` over [-1, 1].
pub fn integrate<F>(mut f: F) -> f64
where
    F: FnMut(f64) -> f64,
{
    gauss_legendre4().iter().map(|(x, w)| f(*x)*w).sum()
}

/// Integral of `f(xi, eta)` over the reference quadrilateral [-1, 1]²,
/// as the tensor product of the 1-D rule.
pub fn integrate_quad<F>(mut f: F) -> f64
where
    F: FnMut(f64, f64) -> f64,
{
    integrate(|eta| integrate(|xi| f(xi, eta)))
}
