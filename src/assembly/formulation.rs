use crate::basis::FieldKind;
use crate::element::{apply_covariant, covariant_from_jacobian, measure_from_jacobian};
use crate::error::Error;
use crate::quadrature::QuadratureRule;
use crate::space::FunctionSpace;
use nalgebra::{DMatrix, DVector, Point3, Vector3};
use rayon::prelude::*;

/// Local bilinear and linear forms evaluated per element group.
///
/// `group_index` is the position of the group in
/// [`FunctionSpace::groups`](crate::space::FunctionSpace::groups), and `i`, `j` index the test
/// and trial functions of that group.
pub trait Formulation: Sync {
    fn term(&self, i: usize, j: usize, group_index: usize) -> f64;

    fn rhs(&self, i: usize, group_index: usize) -> f64;
}

/// A function of physical coordinates, either scalar or vector valued.
#[derive(Copy, Clone)]
pub enum TargetFunction<'f> {
    Scalar(&'f (dyn Fn(&Point3<f64>) -> f64 + Sync)),
    Vector(&'f (dyn Fn(&Point3<f64>) -> Vector3<f64> + Sync)),
}

impl<'f> TargetFunction<'f> {
    pub fn field_kind(&self) -> FieldKind {
        match self {
            Self::Scalar(_) => FieldKind::Scalar,
            Self::Vector(_) => FieldKind::Vector,
        }
    }
}

/// Precomputed element matrices and vectors.
#[derive(Debug, Clone)]
struct LocalSystems {
    matrices: Vec<DMatrix<f64>>,
    vectors: Vec<DVector<f64>>,
}

impl LocalSystems {
    fn compute<F>(space: &FunctionSpace, compute_local: F) -> Result<Self, Error>
    where
        F: Fn(usize) -> Result<(DMatrix<f64>, DVector<f64>), Error> + Sync + Send,
    {
        let locals = (0..space.num_groups())
            .into_par_iter()
            .map(compute_local)
            .collect::<Result<Vec<_>, Error>>()?;
        let (matrices, vectors) = locals.into_iter().unzip();
        Ok(Self { matrices, vectors })
    }

    fn term(&self, i: usize, j: usize, group_index: usize) -> f64 {
        self.matrices[group_index][(i, j)]
    }

    fn rhs(&self, i: usize, group_index: usize) -> f64 {
        self.vectors[group_index][i]
    }
}

/// Quadrature strength that integrates products of two basis functions exactly on affine
/// elements, with some headroom for the load term.
fn default_strength(space: &FunctionSpace) -> usize {
    2 * space.basis().order() + 2
}

/// L² projection of a target function onto a function space: mass matrix and load vector.
///
/// Vector basis functions are mapped to the physical element with the covariant map.
#[derive(Debug, Clone)]
pub struct Projection {
    local: LocalSystems,
}

impl Projection {
    pub fn new(space: &FunctionSpace, target: TargetFunction) -> Result<Self, Error> {
        Self::with_quadrature_strength(space, target, default_strength(space))
    }

    pub fn scalar(space: &FunctionSpace, target: &(dyn Fn(&Point3<f64>) -> f64 + Sync)) -> Result<Self, Error> {
        Self::new(space, TargetFunction::Scalar(target))
    }

    pub fn vector(
        space: &FunctionSpace,
        target: &(dyn Fn(&Point3<f64>) -> Vector3<f64> + Sync),
    ) -> Result<Self, Error> {
        Self::new(space, TargetFunction::Vector(target))
    }

    pub fn with_quadrature_strength(
        space: &FunctionSpace,
        target: TargetFunction,
        strength: usize,
    ) -> Result<Self, Error> {
        if target.field_kind() != space.field_kind() {
            return Err(Error::FieldKindMismatch {
                expected: space.field_kind(),
                found: target.field_kind(),
            });
        }
        let rule = QuadratureRule::for_element(space.basis().reference(), strength);
        let local = LocalSystems::compute(space, |group_index| {
            local_projection(space, group_index, &rule, target)
        })?;
        Ok(Self { local })
    }
}

impl Formulation for Projection {
    fn term(&self, i: usize, j: usize, group_index: usize) -> f64 {
        self.local.term(i, j, group_index)
    }

    fn rhs(&self, i: usize, group_index: usize) -> f64 {
        self.local.rhs(i, group_index)
    }
}

fn local_projection(
    space: &FunctionSpace,
    group_index: usize,
    rule: &QuadratureRule,
    target: TargetFunction,
) -> Result<(DMatrix<f64>, DVector<f64>), Error> {
    let element = space.groups()[group_index].element();
    let mesh = space.mesh();
    let geometry = mesh.geometry(element);
    let orientation = mesh.orientation(element);
    let basis = space.basis();
    let n = basis.num_functions();

    let mut matrix = DMatrix::zeros(n, n);
    let mut vector = DVector::zeros(n);
    let mut values = vec![0.0; n];
    let mut vectors = vec![Vector3::zeros(); n];

    for (weight, xi) in rule.iter() {
        let jacobian = geometry.reference_jacobian(xi);
        let measure = measure_from_jacobian(&jacobian);
        if measure <= 0.0 {
            return Err(Error::DegenerateElement(element));
        }
        let x = geometry.map_reference_coords(xi);
        let w = weight * measure;

        match target {
            TargetFunction::Scalar(f) => {
                basis.populate_values(orientation, xi, &mut values);
                let f_x = f(&x);
                for i in 0..n {
                    vector[i] += w * f_x * values[i];
                    for j in 0..n {
                        matrix[(i, j)] += w * values[i] * values[j];
                    }
                }
            }
            TargetFunction::Vector(f) => {
                let covariant = covariant_from_jacobian(&jacobian).ok_or(Error::DegenerateElement(element))?;
                basis.populate_vectors(orientation, xi, &mut vectors);
                for v in vectors.iter_mut() {
                    *v = apply_covariant(&covariant, v);
                }
                let f_x = f(&x);
                for i in 0..n {
                    vector[i] += w * f_x.dot(&vectors[i]);
                    for j in 0..n {
                        matrix[(i, j)] += w * vectors[i].dot(&vectors[j]);
                    }
                }
            }
        }
    }
    Ok((matrix, vector))
}

/// The Poisson problem `-Δu = f`: stiffness matrix and source vector of a scalar space.
#[derive(Debug, Clone)]
pub struct Laplace {
    local: LocalSystems,
}

impl Laplace {
    pub fn new(space: &FunctionSpace, source: &(dyn Fn(&Point3<f64>) -> f64 + Sync)) -> Result<Self, Error> {
        Self::with_quadrature_strength(space, source, default_strength(space))
    }

    pub fn with_quadrature_strength(
        space: &FunctionSpace,
        source: &(dyn Fn(&Point3<f64>) -> f64 + Sync),
        strength: usize,
    ) -> Result<Self, Error> {
        if !space.is_scalar() {
            return Err(Error::FieldKindMismatch {
                expected: FieldKind::Scalar,
                found: space.field_kind(),
            });
        }
        let rule = QuadratureRule::for_element(space.basis().reference(), strength);
        let local = LocalSystems::compute(space, |group_index| local_laplace(space, group_index, &rule, source))?;
        Ok(Self { local })
    }
}

impl Formulation for Laplace {
    fn term(&self, i: usize, j: usize, group_index: usize) -> f64 {
        self.local.term(i, j, group_index)
    }

    fn rhs(&self, i: usize, group_index: usize) -> f64 {
        self.local.rhs(i, group_index)
    }
}

fn local_laplace(
    space: &FunctionSpace,
    group_index: usize,
    rule: &QuadratureRule,
    source: &(dyn Fn(&Point3<f64>) -> f64 + Sync),
) -> Result<(DMatrix<f64>, DVector<f64>), Error> {
    let element = space.groups()[group_index].element();
    let mesh = space.mesh();
    let geometry = mesh.geometry(element);
    let orientation = mesh.orientation(element);
    let basis = space.basis();
    let n = basis.num_functions();

    let mut matrix = DMatrix::zeros(n, n);
    let mut vector = DVector::zeros(n);
    let mut values = vec![0.0; n];
    let mut gradients = vec![Vector3::zeros(); n];

    for (weight, xi) in rule.iter() {
        let jacobian = geometry.reference_jacobian(xi);
        let measure = measure_from_jacobian(&jacobian);
        let covariant = covariant_from_jacobian(&jacobian).ok_or(Error::DegenerateElement(element))?;
        if measure <= 0.0 {
            return Err(Error::DegenerateElement(element));
        }
        let w = weight * measure;

        basis.populate_values(orientation, xi, &mut values);
        basis.populate_derivatives(orientation, xi, &mut gradients);
        for g in gradients.iter_mut() {
            *g = apply_covariant(&covariant, g);
        }

        let f_x = source(&geometry.map_reference_coords(xi));
        for i in 0..n {
            vector[i] += w * f_x * values[i];
            for j in 0..n {
                matrix[(i, j)] += w * gradients[i].dot(&gradients[j]);
            }
        }
    }
    Ok((matrix, vector))
}
