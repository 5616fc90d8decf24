use super::FunctionSpace;
use crate::basis::FieldKind;
use crate::element::apply_covariant;
use crate::error::Error;
use nalgebra::{Point3, Vector3};

impl<'a> FunctionSpace<'a> {
    fn check_interpolation(&self, element: usize, coefficients: &[f64], expected: FieldKind) -> Result<(), Error> {
        let group = self
            .group_of_element(element)
            .ok_or(Error::ElementNotInSupport(element))?;
        if group.len() != coefficients.len() {
            return Err(Error::CoefficientCountMismatch {
                expected: group.len(),
                found: coefficients.len(),
            });
        }
        if self.field_kind() != expected {
            return Err(Error::FieldKindMismatch {
                expected,
                found: self.field_kind(),
            });
        }
        Ok(())
    }

    /// Evaluates `Σ u_i φ_i(ξ)` on the element, with coefficients in the order of the element's
    /// dofs.
    pub fn interpolate_scalar(&self, element: usize, coefficients: &[f64], xi: &Point3<f64>) -> Result<f64, Error> {
        self.check_interpolation(element, coefficients, FieldKind::Scalar)?;
        let orientation = self.mesh().orientation(element);
        let mut values = vec![0.0; coefficients.len()];
        self.basis().populate_values(orientation, xi, &mut values);
        Ok(values
            .iter()
            .zip(coefficients)
            .map(|(phi, u)| phi * u)
            .sum())
    }

    /// Physical gradient of the scalar interpolant at the reference point `xi`.
    pub fn interpolate_scalar_gradient(
        &self,
        element: usize,
        coefficients: &[f64],
        xi: &Point3<f64>,
    ) -> Result<Vector3<f64>, Error> {
        self.check_interpolation(element, coefficients, FieldKind::Scalar)?;
        let orientation = self.mesh().orientation(element);
        let covariant = self
            .mesh()
            .geometry(element)
            .covariant(xi)
            .ok_or(Error::DegenerateElement(element))?;
        let mut gradients = vec![Vector3::zeros(); coefficients.len()];
        self.basis()
            .populate_derivatives(orientation, xi, &mut gradients);

        let reference_gradient = gradients
            .iter()
            .zip(coefficients)
            .fold(Vector3::zeros(), |sum, (grad, u)| sum + grad * *u);
        Ok(apply_covariant(&covariant, &reference_gradient))
    }

    /// Evaluates the vector interpolant at the reference point `xi`, with basis functions mapped
    /// to the physical element by the covariant map.
    pub fn interpolate_vector(
        &self,
        element: usize,
        coefficients: &[f64],
        xi: &Point3<f64>,
    ) -> Result<Vector3<f64>, Error> {
        self.check_interpolation(element, coefficients, FieldKind::Vector)?;
        let orientation = self.mesh().orientation(element);
        let covariant = self
            .mesh()
            .geometry(element)
            .covariant(xi)
            .ok_or(Error::DegenerateElement(element))?;
        let mut values = vec![Vector3::zeros(); coefficients.len()];
        self.basis().populate_vectors(orientation, xi, &mut values);

        let reference_value = values
            .iter()
            .zip(coefficients)
            .fold(Vector3::zeros(), |sum, (v, u)| sum + v * *u);
        Ok(apply_covariant(&covariant, &reference_value))
    }
}
