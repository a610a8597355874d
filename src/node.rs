use ndarray::Array1;

use crate::error::NodeError;
use crate::registry::Entity;
use crate::Index;

/// A mesh node carrying the nodal fields of a material-point step.
///
/// `DIM` is the spatial dimension of the position. The force, velocity,
/// momentum and acceleration vectors have one entry per degree of freedom,
/// which may exceed `DIM` (rotational freedoms, for instance).
#[derive(Debug, Clone, PartialEq)]
pub struct Node<const DIM: usize> {
    id: Index,
    dof: usize,
    coordinates: [f64; DIM],
    // f64::MAX until a mass is mapped onto the node
    mass: f64,
    force: Array1<f64>,
    velocity: Array1<f64>,
    momentum: Array1<f64>,
    acceleration: Array1<f64>,
}

impl<const DIM: usize> Node<DIM> {
    pub fn new(id: Index, coordinates: [f64; DIM], dof: usize) -> Self {
        tracing::trace!(id, dim = DIM, dof, "node created");
        Self {
            id,
            dof,
            coordinates,
            mass: f64::MAX,
            force: Array1::zeros(dof),
            velocity: Array1::zeros(dof),
            momentum: Array1::zeros(dof),
            acceleration: Array1::zeros(dof),
        }
    }

    pub fn id(&self) -> Index { self.id }

    pub fn dof(&self) -> usize { self.dof }

    pub fn coordinates(&self) -> &[f64; DIM] { &self.coordinates }

    pub fn assign_coordinates(&mut self, coordinates: [f64; DIM]) {
        self.coordinates = coordinates;
    }

    pub fn mass(&self) -> f64 { self.mass }

    pub fn assign_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    pub fn force(&self) -> &Array1<f64> { &self.force }

    pub fn assign_force(&mut self, force: Array1<f64>) -> Result<(), NodeError> {
        self.check_dof("force", &force)?;
        self.force = force;
        Ok(())
    }

    pub fn velocity(&self) -> &Array1<f64> { &self.velocity }

    pub fn assign_velocity(&mut self, velocity: Array1<f64>) -> Result<(), NodeError> {
        self.check_dof("velocity", &velocity)?;
        self.velocity = velocity;
        Ok(())
    }

    pub fn momentum(&self) -> &Array1<f64> { &self.momentum }

    pub fn assign_momentum(&mut self, momentum: Array1<f64>) -> Result<(), NodeError> {
        self.check_dof("momentum", &momentum)?;
        self.momentum = momentum;
        Ok(())
    }

    pub fn acceleration(&self) -> &Array1<f64> { &self.acceleration }

    pub fn assign_acceleration(&mut self, acceleration: Array1<f64>) -> Result<(), NodeError> {
        self.check_dof("acceleration", &acceleration)?;
        self.acceleration = acceleration;
        Ok(())
    }

    fn check_dof(&self, field: &'static str, values: &Array1<f64>) -> Result<(), NodeError> {
        if values.len() != self.dof {
            return Err(NodeError::DofMismatch { field, expected: self.dof, actual: values.len() });
        }
        Ok(())
    }
}

impl<const DIM: usize> Entity for Node<DIM> {
    fn id(&self) -> Index { self.id }
}
