use galerkin_polynomial::proptest::{lattice_point, point, polynomial};
use galerkin_polynomial::{compare_powers, Error, Monomial, Polynomial};
use matrixcompare::assert_scalar_eq;
use proptest::prelude::*;
use std::cmp::Ordering;

fn x() -> Polynomial {
    Polynomial::x()
}

fn y() -> Polynomial {
    Polynomial::y()
}

fn z() -> Polynomial {
    Polynomial::z()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

#[test]
fn zero_and_empty_are_distinct() {
    let zero = Polynomial::zero();
    let empty = Polynomial::empty();

    assert_eq!(zero.num_monomials(), 1);
    assert!(zero.is_zero());
    assert!(!zero.is_empty());

    assert_eq!(empty.num_monomials(), 0);
    assert!(empty.is_empty());
    assert!(!empty.is_zero());

    assert_ne!(zero, empty);
    assert_eq!(Polynomial::default(), empty);
    assert_eq!(zero.evaluate(1.0, 2.0, 3.0), 0.0);
    assert_eq!(empty.evaluate(1.0, 2.0, 3.0), 0.0);
}

#[test]
fn empty_polynomial_behaves_as_zero_in_arithmetic() {
    let empty = Polynomial::empty();
    assert_eq!(&empty + &x(), x());
    assert_eq!(&x() - &empty, x());
    assert_eq!(&empty * &x(), Polynomial::zero());
    assert_eq!(-&empty, Polynomial::zero());
    assert_eq!(empty.derivative(0), Polynomial::zero());
    assert_eq!(empty.compose(&y()), Polynomial::zero());
}

#[test]
fn cancellation_produces_canonical_zero() {
    let p = &(&x() * &y()) + &z();
    let difference = &p - &p;
    assert!(difference.is_zero());
    assert_eq!(difference, Polynomial::zero());

    let from_terms = Polynomial::from_monomials(vec![
        Monomial::new(2.0, [1, 0, 0]),
        Monomial::new(-2.0, [1, 0, 0]),
    ]);
    assert_eq!(from_terms, Polynomial::zero());
}

#[test]
fn equal_polynomials_have_identical_representations() {
    // (x + y)^2 built in two different ways
    let squared = (x() + y()).pow(2);
    let expanded = Polynomial::from_monomials(vec![
        Monomial::new(1.0, [0, 2, 0]),
        Monomial::new(1.0, [1, 1, 0]),
        Monomial::new(1.0, [2, 0, 0]),
        Monomial::new(1.0, [1, 1, 0]),
    ]);
    assert_eq!(squared, expanded);
    assert_eq!(squared.monomials(), expanded.monomials());

    // Canonical order: by degree, then lexicographic in the powers
    let powers: Vec<_> = squared.monomials().iter().map(|m| *m.powers()).collect();
    assert_eq!(powers, vec![[0, 2, 0], [1, 1, 0], [2, 0, 0]]);
}

#[test]
fn monomials_are_sorted_and_nonzero() {
    let p = Polynomial::from_monomials(vec![
        Monomial::new(3.0, [0, 0, 2]),
        Monomial::new(0.0, [5, 0, 0]),
        Monomial::new(1.0, [0, 0, 0]),
        Monomial::new(-1.0, [1, 0, 0]),
    ]);
    let powers: Vec<_> = p.monomials().iter().map(|m| *m.powers()).collect();
    assert_eq!(powers, vec![[0, 0, 0], [1, 0, 0], [0, 0, 2]]);
    assert_eq!(p.degree(), 2);
}

#[test]
fn scalar_multiplication_and_negation() {
    let p = &x() + &Polynomial::constant(2.0);
    assert_eq!(&p * 3.0, &(&x() * 3.0) + &Polynomial::constant(6.0));
    assert_eq!(&p * 0.0, Polynomial::zero());
    assert_eq!(-&p, &p * -1.0);

    let mut q = p.clone();
    q.scale(0.5);
    assert_eq!(q.evaluate(4.0, 0.0, 0.0), 3.0);
}

#[test]
fn assign_operators_agree_with_binary_operators() {
    let p = &x() + &y();
    let q = &z() - &Polynomial::one();

    let mut r = p.clone();
    r += &q;
    assert_eq!(r, &p + &q);

    let mut r = p.clone();
    r -= &q;
    assert_eq!(r, &p - &q);

    let mut r = p.clone();
    r *= &q;
    assert_eq!(r, &p * &q);

    let mut r = p.clone();
    r *= 2.0;
    assert_eq!(r, &p * 2.0);
}

#[test]
fn power_rejects_negative_exponents() {
    let mut p = &x() + &Polynomial::one();
    let original = p.clone();
    assert_eq!(p.power(-1), Err(Error::NegativePower(-1)));
    assert_eq!(p, original);

    p.power(3).unwrap();
    assert_eq!(p, original.pow(3));
    assert_eq!(p.evaluate(1.0, 0.0, 0.0), 8.0);
}

#[test]
fn zero_to_the_power_zero_is_one() {
    assert_eq!(Polynomial::zero().pow(0), Polynomial::one());
    assert_eq!(Polynomial::empty().pow(0), Polynomial::one());
    assert_eq!(x().pow(0), Polynomial::one());
    assert_eq!(Polynomial::zero().pow(2), Polynomial::zero());
}

#[test]
fn derivatives_of_simple_polynomials() {
    // p = 3 x^2 y + z
    let p = &(&x().pow(2) * &y()) * 3.0 + z();

    assert_eq!(p.derivative(0), &(&x() * &y()) * 6.0);
    assert_eq!(p.derivative(1), &x().pow(2) * 3.0);
    assert_eq!(p.derivative(2), Polynomial::one());
    assert_eq!(x().derivative(2), Polynomial::zero());
    assert_eq!(Polynomial::constant(4.0).derivative(1), Polynomial::zero());

    let mut q = p.clone();
    q.differentiate(0);
    assert_eq!(q, p.derivative(0));

    let [dx, dy, dz] = p.gradient();
    assert_eq!(dx, p.derivative(0));
    assert_eq!(dy, p.derivative(1));
    assert_eq!(dz, p.derivative(2));
}

#[test]
#[should_panic]
fn derivative_with_invalid_dimension_panics() {
    x().derivative(3);
}

#[test]
#[should_panic]
fn variable_with_invalid_dimension_panics() {
    Polynomial::variable(3);
}

#[test]
fn composition_substitutes_variables() {
    // x^2 composed with (y + 1) gives y^2 + 2 y + 1
    let p = x().pow(2);
    let q = &y() + &Polynomial::one();
    assert_eq!(p.compose(&q), &(&y().pow(2) + &(&y() * 2.0)) + &Polynomial::one());

    // Unsubstituted variables are kept
    let p = &x() * &z();
    assert_eq!(p.compose(&y()), &y() * &z());

    // x y composed with (x + 1, x - 1) gives x^2 - 1
    let p = &x() * &y();
    let q = &x() + &Polynomial::one();
    let r = &x() - &Polynomial::one();
    assert_eq!(p.compose2(&q, &r), &x().pow(2) - &Polynomial::one());

    // Cyclic permutation of the variables
    let p = &(&x() + &(&y() * 2.0)) + &(&z() * 3.0);
    assert_eq!(p.compose3(&y(), &z(), &x()), &(&y() + &(&z() * 2.0)) + &(&x() * 3.0));
}

#[test]
fn evaluation_of_a_known_polynomial() {
    // p = x^2 y - 3 z + 0.5
    let p = &(&(&x().pow(2) * &y()) - &(&z() * 3.0)) + &Polynomial::constant(0.5);
    assert_scalar_eq!(p.evaluate(2.0, 3.0, 1.0), 9.5, comp = abs, tol = 1e-14);
    assert_scalar_eq!(p.evaluate_at(&[0.0, 0.0, 0.0]), 0.5, comp = abs, tol = 1e-14);
}

#[test]
fn monomial_ordering_helper() {
    assert_eq!(compare_powers(&[2, 0, 0], &[0, 0, 1]), Ordering::Greater);
    assert_eq!(compare_powers(&[0, 1, 1], &[1, 0, 1]), Ordering::Less);
}

#[test]
fn display() {
    insta::assert_snapshot!(Polynomial::zero().to_string(), @"0");
    insta::assert_snapshot!(Polynomial::empty().to_string(), @"");
    insta::assert_snapshot!(Polynomial::constant(-2.5).to_string(), @"-2.5");
    insta::assert_snapshot!((x() + Polynomial::one()).pow(2).to_string(), @"x^2 + 2*x + 1");
    insta::assert_snapshot!((&(&x().pow(2) * &y()) - &(&z() * 3.0)).to_string(), @"x^2*y - 3*z");
    insta::assert_snapshot!((-&(&x() * &y())).to_string(), @"-x*y");
    insta::assert_snapshot!((&(&y() * 0.5) - &x()).to_string(), @"-x + 0.5*y");
}

#[test]
fn serde_roundtrip_preserves_representation() {
    let p = &(&x() * &y()) - &Polynomial::constant(2.0);
    let json = serde_json::to_string(&p).unwrap();
    let deserialized: Polynomial = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, p);
}

proptest! {
    #[test]
    fn addition_is_pointwise(p in polynomial(6, 3), q in polynomial(6, 3), [a, b, c] in point()) {
        let sum = &p + &q;
        prop_assert!(close(sum.evaluate(a, b, c), p.evaluate(a, b, c) + q.evaluate(a, b, c)));
    }

    #[test]
    fn multiplication_is_pointwise(p in polynomial(5, 2), q in polynomial(5, 2), [a, b, c] in lattice_point()) {
        // All values are integers well below 2^53, so evaluation is exact
        let product = &p * &q;
        prop_assert_eq!(product.evaluate(a, b, c), p.evaluate(a, b, c) * q.evaluate(a, b, c));
    }

    #[test]
    fn arithmetic_preserves_canonical_form(p in polynomial(6, 3), q in polynomial(6, 3)) {
        for r in [&p + &q, &p - &q, &p * &q, p.derivative(1), p.compose(&q)] {
            prop_assert!(r.num_monomials() >= 1);
            if !r.is_zero() {
                prop_assert!(r.monomials().iter().all(|m| m.coefficient() != 0.0));
            }
            for pair in r.monomials().windows(2) {
                prop_assert_eq!(compare_powers(pair[0].powers(), pair[1].powers()), Ordering::Less);
            }
        }
    }

    #[test]
    fn addition_is_commutative_and_exact(p in polynomial(6, 3), q in polynomial(6, 3)) {
        // Integer coefficients make both sides bitwise identical
        prop_assert_eq!(&p + &q, &q + &p);
        prop_assert_eq!(&(&p + &q) - &q, p);
    }

    #[test]
    fn composition_commutes_with_evaluation(
        p in polynomial(3, 1),
        q in polynomial(2, 1),
        r in polynomial(2, 1),
        s in polynomial(2, 1),
        [a, b, c] in lattice_point()
    ) {
        let composed = p.compose3(&q, &r, &s);
        let expected = p.evaluate(q.evaluate(a, b, c), r.evaluate(a, b, c), s.evaluate(a, b, c));
        prop_assert_eq!(composed.evaluate(a, b, c), expected);

        let composed = p.compose(&q);
        let expected = p.evaluate(q.evaluate(a, b, c), b, c);
        prop_assert_eq!(composed.evaluate(a, b, c), expected);
    }

    #[test]
    fn pow_agrees_with_repeated_multiplication(p in polynomial(3, 2), n in 0u32..4) {
        let mut expected = Polynomial::one();
        for _ in 0..n {
            expected = &expected * &p;
        }
        prop_assert_eq!(p.pow(n), expected);
    }
}
