use crate::Error;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::once;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Exponents of `x`, `y` and `z` in a monomial.
pub type Powers = [u32; 3];

const VARIABLE_NAMES: [char; 3] = ['x', 'y', 'z'];

/// A single term `c * x^a * y^b * z^c`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monomial {
    coefficient: f64,
    powers: Powers,
}

impl Monomial {
    pub fn new(coefficient: f64, powers: Powers) -> Self {
        Self { coefficient, powers }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn powers(&self) -> &Powers {
        &self.powers
    }

    /// Total degree of the monomial.
    pub fn degree(&self) -> u32 {
        self.powers.iter().sum()
    }

    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let [a, b, c] = self.powers;
        self.coefficient * x.powi(a as i32) * y.powi(b as i32) * z.powi(c as i32)
    }
}

/// The total order used for canonical monomial lists: total degree first, then lexicographic
/// on the exponents.
pub fn compare_powers(a: &Powers, b: &Powers) -> Ordering {
    let degree = |p: &Powers| p.iter().sum::<u32>();
    degree(a).cmp(&degree(b)).then_with(|| a.cmp(b))
}

/// A polynomial in `x`, `y` and `z` with `f64` coefficients.
///
/// Every operation except [`Polynomial::empty`] (and `Default`) returns a polynomial in
/// canonical form. An empty polynomial takes part in arithmetic as if it were zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    monomials: Vec<Monomial>,
}

impl Polynomial {
    /// A polynomial without any monomials.
    ///
    /// Note that this is *not* the zero polynomial, which holds exactly one monomial `0`.
    pub fn empty() -> Self {
        Self { monomials: Vec::new() }
    }

    pub fn zero() -> Self {
        Self {
            monomials: vec![Monomial::new(0.0, [0, 0, 0])],
        }
    }

    pub fn one() -> Self {
        Self::constant(1.0)
    }

    pub fn constant(value: f64) -> Self {
        Self::monomial(value, [0, 0, 0])
    }

    pub fn monomial(coefficient: f64, powers: Powers) -> Self {
        Self::from_monomials(once(Monomial::new(coefficient, powers)))
    }

    /// The coordinate polynomial for the given dimension (`0` is `x`, `1` is `y`, `2` is `z`).
    ///
    /// # Panics
    ///
    /// Panics if `dim >= 3`.
    pub fn variable(dim: usize) -> Self {
        assert!(dim < 3, "dimension must be 0, 1 or 2, got {}", dim);
        let mut powers = [0, 0, 0];
        powers[dim] = 1;
        Self::monomial(1.0, powers)
    }

    pub fn x() -> Self {
        Self::variable(0)
    }

    pub fn y() -> Self {
        Self::variable(1)
    }

    pub fn z() -> Self {
        Self::variable(2)
    }

    /// Builds the canonical polynomial from an arbitrary collection of monomials.
    pub fn from_monomials<I>(monomials: I) -> Self
    where
        I: IntoIterator<Item = Monomial>,
    {
        let mut terms: Vec<Monomial> = monomials.into_iter().collect();
        terms.sort_by(|a, b| compare_powers(&a.powers, &b.powers));

        let mut merged: Vec<Monomial> = Vec::with_capacity(terms.len());
        for term in terms {
            match merged.last_mut() {
                Some(last) if last.powers == term.powers => last.coefficient += term.coefficient,
                _ => merged.push(term),
            }
        }
        merged.retain(|m| m.coefficient != 0.0);

        if merged.is_empty() {
            Self::zero()
        } else {
            Self { monomials: merged }
        }
    }

    /// The monomials, in ascending canonical order.
    pub fn monomials(&self) -> &[Monomial] {
        &self.monomials
    }

    pub fn num_monomials(&self) -> usize {
        self.monomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.monomials.len() == 1 && self.monomials[0].coefficient == 0.0
    }

    /// Total degree of the polynomial. Zero and empty polynomials have degree zero.
    pub fn degree(&self) -> u32 {
        self.monomials.iter().map(Monomial::degree).max().unwrap_or(0)
    }

    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.monomials.iter().map(|m| m.evaluate(x, y, z)).sum()
    }

    pub fn evaluate_at(&self, point: &[f64; 3]) -> f64 {
        self.evaluate(point[0], point[1], point[2])
    }

    /// Multiplies the polynomial by a scalar in place.
    pub fn scale(&mut self, alpha: f64) {
        *self = &*self * alpha;
    }

    /// Raises the polynomial to the power `n`. `p^0` is one for every `p`.
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Raises the polynomial to the power `n` in place.
    ///
    /// A negative `n` is rejected and the polynomial is left untouched.
    pub fn power(&mut self, n: i32) -> Result<(), Error> {
        if n < 0 {
            return Err(Error::NegativePower(n));
        }
        *self = self.pow(n as u32);
        Ok(())
    }

    /// Partial derivative with respect to the given dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dim >= 3`.
    pub fn derivative(&self, dim: usize) -> Self {
        assert!(dim < 3, "dimension must be 0, 1 or 2, got {}", dim);
        let terms = self
            .monomials
            .iter()
            .filter(|m| m.powers[dim] > 0)
            .map(|m| {
                let mut powers = m.powers;
                let p = powers[dim];
                powers[dim] -= 1;
                Monomial::new(m.coefficient * f64::from(p), powers)
            });
        Self::from_monomials(terms)
    }

    /// Differentiates the polynomial in place.
    pub fn differentiate(&mut self, dim: usize) {
        *self = self.derivative(dim);
    }

    pub fn gradient(&self) -> [Polynomial; 3] {
        [self.derivative(0), self.derivative(1), self.derivative(2)]
    }

    /// Returns `P(Q(x, y, z), y, z)`, where `P` is `self`.
    pub fn compose(&self, q: &Polynomial) -> Self {
        self.substitute([Some(q), None, None])
    }

    /// Returns `P(Q(x, y, z), R(x, y, z), z)`, where `P` is `self`.
    pub fn compose2(&self, q: &Polynomial, r: &Polynomial) -> Self {
        self.substitute([Some(q), Some(r), None])
    }

    /// Returns `P(Q(x, y, z), R(x, y, z), S(x, y, z))`, where `P` is `self`.
    pub fn compose3(&self, q: &Polynomial, r: &Polynomial, s: &Polynomial) -> Self {
        self.substitute([Some(q), Some(r), Some(s)])
    }

    fn substitute(&self, substitutes: [Option<&Polynomial>; 3]) -> Self {
        // powers[dim][n] holds substitutes[dim]^n, filled on demand
        let mut powers: [Vec<Polynomial>; 3] = Default::default();
        let mut terms = Vec::new();

        for monomial in &self.monomials {
            let mut kept = [0, 0, 0];
            let mut term = Polynomial::constant(monomial.coefficient);
            for dim in 0..3 {
                match substitutes[dim] {
                    Some(substitute) => {
                        let power = cached_power(&mut powers[dim], substitute, monomial.powers[dim]);
                        term = &term * power;
                    }
                    None => kept[dim] = monomial.powers[dim],
                }
            }
            term = &term * &Polynomial::monomial(1.0, kept);
            terms.extend_from_slice(&term.monomials);
        }

        Self::from_monomials(terms)
    }
}

fn cached_power<'a>(cache: &'a mut Vec<Polynomial>, base: &Polynomial, n: u32) -> &'a Polynomial {
    if cache.is_empty() {
        cache.push(Polynomial::one());
    }
    while cache.len() <= n as usize {
        let next = &cache[cache.len() - 1] * base;
        cache.push(next);
    }
    &cache[n as usize]
}

fn sum(a: &Polynomial, b: &Polynomial) -> Polynomial {
    Polynomial::from_monomials(a.monomials.iter().chain(&b.monomials).copied())
}

fn difference(a: &Polynomial, b: &Polynomial) -> Polynomial {
    let negated = b
        .monomials
        .iter()
        .map(|m| Monomial::new(-m.coefficient, m.powers));
    Polynomial::from_monomials(a.monomials.iter().copied().chain(negated))
}

fn product(a: &Polynomial, b: &Polynomial) -> Polynomial {
    let terms = a
        .monomials
        .iter()
        .cartesian_product(b.monomials.iter())
        .map(|(p, q)| {
            let powers = [
                p.powers[0] + q.powers[0],
                p.powers[1] + q.powers[1],
                p.powers[2] + q.powers[2],
            ];
            Monomial::new(p.coefficient * q.coefficient, powers)
        });
    Polynomial::from_monomials(terms)
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $function:ident) => {
        impl<'a, 'b> $trait<&'b Polynomial> for &'a Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: &'b Polynomial) -> Polynomial {
                $function(self, rhs)
            }
        }

        impl<'b> $trait<&'b Polynomial> for Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: &'b Polynomial) -> Polynomial {
                $function(&self, rhs)
            }
        }

        impl<'a> $trait<Polynomial> for &'a Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: Polynomial) -> Polynomial {
                $function(self, &rhs)
            }
        }

        impl $trait<Polynomial> for Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: Polynomial) -> Polynomial {
                $function(&self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, sum);
impl_binary_op!(Sub, sub, difference);
impl_binary_op!(Mul, mul, product);

impl<'a> Mul<f64> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, alpha: f64) -> Polynomial {
        let terms = self
            .monomials
            .iter()
            .map(|m| Monomial::new(alpha * m.coefficient, m.powers));
        Polynomial::from_monomials(terms)
    }
}

impl Mul<f64> for Polynomial {
    type Output = Polynomial;

    fn mul(self, alpha: f64) -> Polynomial {
        &self * alpha
    }
}

impl<'a> Neg for &'a Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self * -1.0
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        &self * -1.0
    }
}

impl<'a> AddAssign<&'a Polynomial> for Polynomial {
    fn add_assign(&mut self, rhs: &'a Polynomial) {
        *self = sum(self, rhs);
    }
}

impl<'a> SubAssign<&'a Polynomial> for Polynomial {
    fn sub_assign(&mut self, rhs: &'a Polynomial) {
        *self = difference(self, rhs);
    }
}

impl<'a> MulAssign<&'a Polynomial> for Polynomial {
    fn mul_assign(&mut self, rhs: &'a Polynomial) {
        *self = product(self, rhs);
    }
}

impl MulAssign<f64> for Polynomial {
    fn mul_assign(&mut self, alpha: f64) {
        self.scale(alpha);
    }
}

/// Renders the monomials from highest to lowest order, e.g. `x^2*y - 3*z + 0.5`.
///
/// The zero polynomial renders as `0` and the empty polynomial as an empty string.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for (k, monomial) in self.monomials.iter().rev().enumerate() {
            let coefficient = monomial.coefficient;
            if k == 0 {
                if coefficient < 0.0 {
                    write!(f, "-")?;
                }
            } else if coefficient < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }

            let variables = monomial
                .powers
                .iter()
                .zip(VARIABLE_NAMES)
                .filter(|(power, _)| **power > 0)
                .map(|(power, name)| {
                    if *power == 1 {
                        name.to_string()
                    } else {
                        format!("{}^{}", name, power)
                    }
                })
                .join("*");

            let magnitude = coefficient.abs();
            if variables.is_empty() {
                write!(f, "{}", magnitude)?;
            } else if magnitude == 1.0 {
                write!(f, "{}", variables)?;
            } else {
                write!(f, "{}*{}", magnitude, variables)?;
            }
        }

        Ok(())
    }
}
