//! Quantity type - an exact decimal value bound to a registered unit

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use dunit_core::{Number, NumberError};

use crate::{Dimension, Registry, Unit, UnitError};

/// Target of a conversion: a unit, or a key resolved through the registry
#[derive(Debug, Clone, Copy)]
pub enum UnitRef<'a> {
    Unit(&'a Arc<Unit>),
    Key(&'a str),
}

impl UnitRef<'_> {
    fn resolve(self, registry: &Registry) -> Result<Arc<Unit>, UnitError> {
        match self {
            UnitRef::Unit(unit) => Ok(Arc::clone(unit)),
            UnitRef::Key(key) => registry.lookup(key),
        }
    }
}

impl<'a> From<&'a Arc<Unit>> for UnitRef<'a> {
    fn from(unit: &'a Arc<Unit>) -> Self {
        UnitRef::Unit(unit)
    }
}

impl<'a> From<&'a str> for UnitRef<'a> {
    fn from(key: &'a str) -> Self {
        UnitRef::Key(key)
    }
}

impl<'a> From<&'a String> for UnitRef<'a> {
    fn from(key: &'a String) -> Self {
        UnitRef::Key(key)
    }
}

/// Right-hand side of an arithmetic or comparison operation
///
/// A plain number is only meaningful as the literal zero, which stands for
/// the additive identity in the left operand's unit.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    Number(Number),
    Quantity(&'a Quantity<'a>),
}

impl From<i64> for Operand<'_> {
    fn from(n: i64) -> Self {
        Operand::Number(Number::from_i64(n))
    }
}

impl From<Number> for Operand<'_> {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

impl<'a, 'r: 'a> From<&'a Quantity<'r>> for Operand<'a> {
    fn from(q: &'a Quantity<'r>) -> Self {
        Operand::Quantity(q)
    }
}

/// A physical quantity: an exact decimal value with a registered unit
///
/// The quantity borrows the registry it was built against (string targets
/// in [`Quantity::to`] resolve there) and shares its unit with it.
#[derive(Clone)]
pub struct Quantity<'r> {
    registry: &'r Registry,
    value: Number,
    unit: Arc<Unit>,
}

impl<'r> Quantity<'r> {
    pub fn new(registry: &'r Registry, value: Number, unit: Arc<Unit>) -> Self {
        Quantity { registry, value, unit }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn value(&self) -> &Number {
        &self.value
    }

    pub fn unit(&self) -> &Arc<Unit> {
        &self.unit
    }

    pub fn dimension(&self) -> &Dimension {
        self.unit.dimension()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// Same registry, same unit, new value
    fn with_value(&self, value: Number) -> Quantity<'r> {
        Quantity { registry: self.registry, value, unit: Arc::clone(&self.unit) }
    }

    // ========== Conversion ==========

    /// Express this quantity in another unit of the same dimension
    ///
    /// Returns `Cow::Borrowed(self)` when `target` is the very unit this
    /// quantity already uses, so the value is not pushed through a
    /// multiply/divide round trip.
    pub fn to<'a>(&self, target: impl Into<UnitRef<'a>>) -> Result<Cow<'_, Quantity<'r>>, UnitError> {
        let target = target.into().resolve(self.registry)?;

        if Arc::ptr_eq(&target, &self.unit) {
            return Ok(Cow::Borrowed(self));
        }

        if !self.unit.is_compatible(&target) {
            return Err(UnitError::incompatible(self.unit.dimension(), target.dimension()));
        }

        // value * (from.scale / to.scale); multiplying first keeps exact results exact
        let value = self.value.mul(self.unit.scale()).checked_div(target.scale())?;
        Ok(Cow::Owned(Quantity { registry: self.registry, value, unit: target }))
    }

    /// The value of `other` in this quantity's unit.
    ///
    /// Guard order: zero literal, then operand type, then dimension.
    fn align(&self, other: Operand<'_>) -> Result<Number, UnitError> {
        match other {
            Operand::Number(n) if n.is_zero() => Ok(Number::zero()),
            Operand::Number(_) => Err(UnitError::UnsupportedOperation(
                "combining a quantity with a non-zero plain number",
            )),
            Operand::Quantity(q) => {
                if !self.unit.is_compatible(&q.unit) {
                    return Err(UnitError::incompatible(self.unit.dimension(), q.unit.dimension()));
                }
                Ok(q.to(&self.unit)?.value.clone())
            }
        }
    }

    /// The plain number of a multiplicative operand
    fn scalar(other: Operand<'_>, op: &'static str) -> Result<Number, UnitError> {
        match other {
            Operand::Number(n) => Ok(n),
            Operand::Quantity(_) => Err(UnitError::UnsupportedOperation(op)),
        }
    }

    // ========== Comparison ==========

    /// Order against another quantity of the same dimension (or zero)
    pub fn compare<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Ordering, UnitError> {
        let other = self.align(other.into())?;
        Ok(self.value.cmp(&other))
    }

    // ========== Additive arithmetic ==========

    /// `self + other`, in self's unit
    pub fn add<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let other = self.align(other.into())?;
        Ok(self.with_value(self.value.add(&other)))
    }

    /// `self - other`, in self's unit
    pub fn sub<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let other = self.align(other.into())?;
        Ok(self.with_value(self.value.sub(&other)))
    }

    /// `other - self`, in self's unit
    pub fn rsub<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let other = self.align(other.into())?;
        Ok(self.with_value(other.sub(&self.value)))
    }

    /// Fold quantities with `add`, starting from zero
    ///
    /// The total is expressed in the first item's unit. Returns `None` for
    /// an empty input, where the total is the bare number zero.
    pub fn sum<I>(items: I) -> Result<Option<Quantity<'r>>, UnitError>
    where
        I: IntoIterator<Item = Quantity<'r>>,
    {
        let mut total: Option<Quantity<'r>> = None;
        for item in items {
            total = Some(match total {
                None => item,
                Some(acc) => acc.add(&item)?,
            });
        }
        Ok(total)
    }

    // ========== Scalar arithmetic ==========

    /// `self * n`; multiplying two quantities is unsupported
    pub fn mul<'a>(&self, factor: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let factor = Self::scalar(factor.into(), "multiplying two quantities")?;
        Ok(self.with_value(self.value.mul(&factor)))
    }

    /// `self / n`
    pub fn div<'a>(&self, divisor: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let divisor = Self::scalar(divisor.into(), "dividing a quantity by a quantity")?;
        Ok(self.with_value(self.value.checked_div(&divisor)?))
    }

    /// `self // n`, truncating toward zero
    pub fn floor_div<'a>(&self, divisor: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let divisor = Self::scalar(divisor.into(), "dividing a quantity by a quantity")?;
        Ok(self.with_value(self.value.checked_div_trunc(&divisor)?))
    }

    /// `self % n`, with the sign of `self`
    pub fn rem<'a>(&self, divisor: impl Into<Operand<'a>>) -> Result<Quantity<'r>, UnitError> {
        let divisor = Self::scalar(divisor.into(), "taking the remainder of a quantity by a quantity")?;
        Ok(self.with_value(self.value.checked_rem_trunc(&divisor)?))
    }

    /// `(self // n, self % n)`
    pub fn div_rem<'a>(&self, divisor: impl Into<Operand<'a>>) -> Result<(Quantity<'r>, Quantity<'r>), UnitError> {
        let divisor = Self::scalar(divisor.into(), "dividing a quantity by a quantity")?;
        let quotient = self.value.checked_div_trunc(&divisor)?;
        let remainder = self.value.checked_rem_trunc(&divisor)?;
        Ok((self.with_value(quotient), self.with_value(remainder)))
    }

    /// Always fails: powers would change the dimension
    pub fn pow(&self, _exponent: &Number) -> Result<Quantity<'r>, UnitError> {
        Err(UnitError::UnsupportedOperation("raising a quantity to a power"))
    }

    /// Always fails: bitwise inversion has no meaning for a quantity
    pub fn invert(&self) -> Result<Quantity<'r>, UnitError> {
        Err(UnitError::UnsupportedOperation("bitwise inversion of a quantity"))
    }

    // ========== Unary ==========

    pub fn neg(&self) -> Quantity<'r> {
        self.with_value(self.value.neg())
    }

    pub fn abs(&self) -> Quantity<'r> {
        self.with_value(self.value.abs())
    }

    /// Unary plus: the quantity itself
    pub fn pos(&self) -> &Self {
        self
    }

    /// Round to `places` decimal places (default 0), ties to even
    pub fn round(&self, places: Option<u32>) -> Quantity<'r> {
        self.with_value(self.value.round_dp(places.unwrap_or(0)))
    }

    pub fn trunc(&self) -> Quantity<'r> {
        self.with_value(self.value.trunc())
    }

    pub fn floor(&self) -> Quantity<'r> {
        self.with_value(self.value.floor())
    }

    pub fn ceil(&self) -> Quantity<'r> {
        self.with_value(self.value.ceil())
    }

    // ========== Numeric coercion ==========

    fn require_dimensionless(&self) -> Result<(), UnitError> {
        if self.is_dimensionless() {
            Ok(())
        } else {
            Err(UnitError::DimensionError {
                unit: self.unit.name().to_string(),
                dimension: self.unit.dimension().clone(),
            })
        }
    }

    /// Integer value, truncated toward zero; dimensionless quantities only
    pub fn to_i64(&self) -> Result<i64, UnitError> {
        self.require_dimensionless()?;
        Ok(self.value.to_i64().ok_or(NumberError::Overflow)?)
    }

    /// Lossy float value; dimensionless quantities only
    pub fn to_f64(&self) -> Result<f64, UnitError> {
        self.require_dimensionless()?;
        Ok(self.value.to_f64().ok_or(NumberError::Overflow)?)
    }
}

impl fmt::Display for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}

impl fmt::Debug for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("value", &self.value.to_string())
            .field("unit", &self.unit.name())
            .finish()
    }
}

/// Equal when dimensions match and values agree after conversion.
/// Never fails; a failed conversion compares unequal.
impl<'o> PartialEq<Quantity<'o>> for Quantity<'_> {
    fn eq(&self, other: &Quantity<'o>) -> bool {
        if !self.unit.is_compatible(&other.unit) {
            return false;
        }
        match other.to(&self.unit) {
            Ok(converted) => converted.value == self.value,
            Err(_) => false,
        }
    }
}

/// A zero quantity of any dimension equals the number zero
impl PartialEq<i64> for Quantity<'_> {
    fn eq(&self, other: &i64) -> bool {
        *other == 0 && self.value.is_zero()
    }
}

impl PartialEq<Number> for Quantity<'_> {
    fn eq(&self, other: &Number) -> bool {
        other.is_zero() && self.value.is_zero()
    }
}

/// `None` across dimensions; use [`Quantity::compare`] to get the error
impl<'o> PartialOrd<Quantity<'o>> for Quantity<'_> {
    fn partial_cmp(&self, other: &Quantity<'o>) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::empty();
        registry.register("meter", "m", "length", n("1"), &["meters"]).unwrap();
        registry.register("centimeter", "cm", "length", n("0.01"), &[]).unwrap();
        registry.register("kilometer", "km", "length", n("1000"), &[]).unwrap();
        registry.register("foot", "ft", "length", n("0.3048"), &["feet"]).unwrap();
        registry.register("inch", "in", "length", n("0.0254"), &[]).unwrap();
        registry.register("second", "s", "time", n("1"), &[]).unwrap();
        registry.register("each", "ea", None::<&str>, n("1"), &[]).unwrap();
        registry.register("dozen", "dz", None::<&str>, n("12"), &[]).unwrap();
        registry
    }

    fn q<'r>(registry: &'r Registry, value: &str, key: &str) -> Quantity<'r> {
        Quantity::new(registry, n(value), registry.lookup(key).unwrap())
    }

    #[test]
    fn test_quantity_creation() {
        let reg = registry();
        let length = q(&reg, "5", "m");
        assert_eq!(length.value(), &n("5"));
        assert_eq!(length.unit().symbol(), "m");
        assert_eq!(length.dimension(), &Dimension::named("length"));
        assert!(std::ptr::eq(length.registry(), &reg));
    }

    #[test]
    fn test_meter_to_centimeter() {
        let reg = registry();
        let one = q(&reg, "1", "meter");
        let converted = one.to("centimeter").unwrap();
        assert_eq!(converted.value(), &n("100"));
        assert_eq!(converted.unit().symbol(), "cm");
    }

    #[test]
    fn test_to_unit_reference() {
        let reg = registry();
        let km = reg.lookup("km").unwrap();
        let length = q(&reg, "2500", "m");
        let converted = length.to(&km).unwrap();
        assert_eq!(converted.value(), &n("2.5"));
        assert!(Arc::ptr_eq(converted.unit(), &km));
    }

    #[test]
    fn test_to_same_unit_returns_self() {
        let reg = registry();
        let length = q(&reg, "3.14", "m");
        let meter = reg.lookup("meter").unwrap();

        match length.to(&meter).unwrap() {
            Cow::Borrowed(same) => assert!(std::ptr::eq(same, &length)),
            Cow::Owned(_) => panic!("expected the original quantity back"),
        }
        // Keys resolving to the same unit short-circuit too
        assert!(matches!(length.to("meters").unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_to_equal_but_distinct_unit_converts() {
        let reg = registry();
        let twin = Arc::new(Unit::clone(&reg.lookup("m").unwrap()));
        let length = q(&reg, "2", "m");
        let converted = length.to(&twin).unwrap();
        assert!(matches!(converted, Cow::Owned(_)));
        assert_eq!(converted.value(), &n("2"));
    }

    #[test]
    fn test_to_errors() {
        let reg = registry();
        let length = q(&reg, "1", "m");
        assert!(matches!(length.to("furlong"), Err(UnitError::UnitNotFound(k)) if k == "furlong"));
        assert!(matches!(length.to("s"), Err(UnitError::IncompatibleDimension { .. })));
        assert!(matches!(length.to("dz"), Err(UnitError::IncompatibleDimension { .. })));
    }

    #[test]
    fn test_to_resolves_keys_in_own_registry() {
        let reg_a = registry();
        let mut reg_b = Registry::empty();
        reg_b.register("meter", "m", "length", n("1"), &[]).unwrap();
        reg_b.register("furlong", "fur", "length", n("201.168"), &[]).unwrap();

        let length = q(&reg_a, "1", "m");
        assert!(matches!(length.to("fur"), Err(UnitError::UnitNotFound(_))));

        // An explicit unit from another registry is still usable
        let furlong = reg_b.lookup("fur").unwrap();
        assert_eq!(q(&reg_a, "402.336", "m").to(&furlong).unwrap().value(), &n("2"));
    }

    #[test]
    fn test_round_trip_conversion() {
        let reg = registry();
        let metric = ["m", "cm", "km"];
        let all = ["m", "cm", "km", "ft", "in"];
        let cases = [
            ("5", "ft", &all[..]),
            ("12", "in", &all[..]),
            ("3.14", "m", &metric[..]),
            ("0.75", "km", &metric[..]),
        ];
        for (value, from, targets) in cases {
            let original = q(&reg, value, from);
            for &target in targets {
                let there = original.to(target).unwrap().into_owned();
                let back = there.to(original.unit()).unwrap();
                assert_eq!(back.value(), original.value(), "{} via {}", original, target);
            }
        }
    }

    #[test]
    fn test_feet_to_meters_exact() {
        let reg = registry();
        assert_eq!(q(&reg, "5", "ft").to("m").unwrap().value(), &n("1.524"));
        assert_eq!(q(&reg, "1", "ft").to("in").unwrap().value(), &n("12"));
    }

    #[test]
    fn test_equality_across_units() {
        let reg = registry();
        assert_eq!(q(&reg, "1", "km"), q(&reg, "1000", "m"));
        assert_eq!(q(&reg, "100", "cm"), q(&reg, "1", "m"));
        assert_ne!(q(&reg, "1", "km"), q(&reg, "999", "m"));
        // Different dimensions are never equal, not even at zero
        assert_ne!(q(&reg, "1", "m"), q(&reg, "1", "s"));
        assert_ne!(q(&reg, "0", "m"), q(&reg, "0", "s"));
    }

    #[test]
    fn test_zero_equals_number_zero() {
        let reg = registry();
        assert_eq!(q(&reg, "0", "m"), 0);
        assert_eq!(q(&reg, "0.00", "s"), Number::zero());
        assert_ne!(q(&reg, "1", "m"), 0);
        assert_ne!(q(&reg, "1", "ea"), 1);
    }

    #[test]
    fn test_compare() {
        let reg = registry();
        let a = q(&reg, "1", "m");
        let b = q(&reg, "99", "cm");
        assert_eq!(a.compare(&b).unwrap(), Ordering::Greater);
        assert_eq!(b.compare(&a).unwrap(), Ordering::Less);
        assert_eq!(a.compare(&q(&reg, "100", "cm")).unwrap(), Ordering::Equal);
        assert!(a > b);
        assert!(b <= a);
        assert_eq!(a.compare(0).unwrap(), Ordering::Greater);
        assert_eq!(a.neg().compare(0).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_compare_incompatible() {
        let reg = registry();
        let length = q(&reg, "1", "m");
        let time = q(&reg, "1", "s");
        assert!(matches!(length.compare(&time), Err(UnitError::IncompatibleDimension { .. })));
        assert_eq!(length.partial_cmp(&time), None);
        assert!(!(length < time) && !(length > time));
    }

    #[test]
    fn test_add_keeps_left_unit() {
        let reg = registry();
        let sum = q(&reg, "1", "km").add(&q(&reg, "500", "m")).unwrap();
        assert_eq!(sum.value(), &n("1.5"));
        assert_eq!(sum.unit().symbol(), "km");

        let sum = q(&reg, "500", "m").add(&q(&reg, "1", "km")).unwrap();
        assert_eq!(sum.value(), &n("1500"));
        assert_eq!(sum.unit().symbol(), "m");
    }

    #[test]
    fn test_add_commutative_and_associative() {
        let reg = registry();
        let a = q(&reg, "1.25", "m");
        let b = q(&reg, "30", "cm");
        let c = q(&reg, "2", "ft");

        assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        let left = a.add(&b).unwrap().add(&c).unwrap();
        let right = a.add(&b.add(&c).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_zero_is_identity() {
        let reg = registry();
        let length = q(&reg, "3.5", "ft");
        assert_eq!(length.add(0).unwrap(), length);
        assert_eq!(length.sub(0).unwrap(), length);
        assert_eq!(length.add(Number::zero()).unwrap(), length);
        assert_eq!(length.rsub(0).unwrap(), length.neg());
    }

    #[test]
    fn test_add_incompatible() {
        let reg = registry();
        let result = q(&reg, "3", "m").add(&q(&reg, "5", "s"));
        assert!(matches!(result, Err(UnitError::IncompatibleDimension { .. })));
        let result = q(&reg, "3", "m").sub(&q(&reg, "5", "ea"));
        assert!(matches!(result, Err(UnitError::IncompatibleDimension { .. })));
    }

    #[test]
    fn test_add_non_zero_number() {
        let reg = registry();
        assert!(matches!(q(&reg, "3", "m").add(5), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(q(&reg, "3", "m").compare(2), Err(UnitError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_sub_and_rsub() {
        let reg = registry();
        let a = q(&reg, "1", "m");
        let b = q(&reg, "25", "cm");

        let diff = a.sub(&b).unwrap();
        assert_eq!(diff.value(), &n("0.75"));
        assert_eq!(diff.unit().symbol(), "m");

        // b - a, expressed in a's unit
        let rdiff = a.rsub(&b).unwrap();
        assert_eq!(rdiff.value(), &n("-0.75"));
        assert_eq!(rdiff.unit().symbol(), "m");
    }

    #[test]
    fn test_sum() {
        let reg = registry();
        let parts = vec![q(&reg, "1", "m"), q(&reg, "50", "cm"), q(&reg, "1", "ft")];
        let total = Quantity::sum(parts).unwrap().unwrap();
        assert_eq!(total.value(), &n("1.8048"));
        assert_eq!(total.unit().symbol(), "m");

        assert!(Quantity::sum(Vec::new()).unwrap().is_none());

        let mixed = vec![q(&reg, "1", "m"), q(&reg, "1", "s")];
        assert!(matches!(Quantity::sum(mixed), Err(UnitError::IncompatibleDimension { .. })));
    }

    #[test]
    fn test_scalar_arithmetic() {
        let reg = registry();
        let length = q(&reg, "7.5", "m");

        assert_eq!(length.mul(2).unwrap().value(), &n("15"));
        assert_eq!(length.mul(n("0.1")).unwrap().value(), &n("0.75"));
        assert_eq!(length.div(3).unwrap().value(), &n("2.5"));
        assert_eq!(length.floor_div(2).unwrap().value(), &n("3"));
        assert_eq!(length.rem(2).unwrap().value(), &n("1.5"));
        assert_eq!(length.mul(2).unwrap().unit().symbol(), "m");

        let (quotient, remainder) = length.div_rem(2).unwrap();
        assert_eq!(quotient.value(), &n("3"));
        assert_eq!(remainder.value(), &n("1.5"));
        assert_eq!(remainder.unit().symbol(), "m");
    }

    #[test]
    fn test_negative_floor_div_truncates() {
        let reg = registry();
        let (quotient, remainder) = q(&reg, "-7", "m").div_rem(2).unwrap();
        assert_eq!(quotient.value(), &n("-3"));
        assert_eq!(remainder.value(), &n("-1"));
    }

    #[test]
    fn test_div_rem_beyond_working_precision() {
        let reg = registry();
        let length = q(&reg, "99999999999999999999999999999999999999999999999999", "m");
        let divisor = n("0.7");
        let (quotient, remainder) = length.div_rem(divisor.clone()).unwrap();

        assert_eq!(quotient.value(), &n("142857142857142857142857142857142857142857142857141"));
        assert_eq!(remainder.value(), &n("0.3"));
        assert!(remainder.value().abs() < divisor);
        assert_eq!(quotient.value().mul(&divisor).add(remainder.value()), *length.value());
    }

    #[test]
    fn test_divide_by_zero() {
        let reg = registry();
        let result = q(&reg, "1", "m").div(0);
        assert!(matches!(result, Err(UnitError::Number(NumberError::DivisionByZero))));
        assert!(q(&reg, "1", "m").rem(0).is_err());
    }

    #[test]
    fn test_quantity_by_quantity_unsupported() {
        let reg = registry();
        let a = q(&reg, "2", "m");
        let b = q(&reg, "3", "m");
        assert!(matches!(a.mul(&b), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(a.div(&b), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(a.floor_div(&b), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(a.rem(&b), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(a.div_rem(&b), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(a.pow(&n("2")), Err(UnitError::UnsupportedOperation(_))));
        assert!(matches!(a.invert(), Err(UnitError::UnsupportedOperation(_))));
    }

    #[test]
    fn test_unary() {
        let reg = registry();
        let length = q(&reg, "-2.5", "ft");
        assert_eq!(length.neg().value(), &n("2.5"));
        assert_eq!(length.abs().value(), &n("2.5"));
        assert_eq!(length.abs().unit().symbol(), "ft");
        assert!(std::ptr::eq(length.pos(), &length));
    }

    #[test]
    fn test_rounding() {
        let reg = registry();
        let length = q(&reg, "2.675", "m");
        assert_eq!(length.round(None).value(), &n("3"));
        assert_eq!(length.round(Some(2)).value(), &n("2.68"));
        assert_eq!(q(&reg, "2.5", "m").round(None).value(), &n("2"));
        assert_eq!(length.trunc().value(), &n("2"));
        assert_eq!(length.floor().value(), &n("2"));
        assert_eq!(length.ceil().value(), &n("3"));
        assert_eq!(length.neg().floor().value(), &n("-3"));
        assert_eq!(length.round(Some(1)).unit().symbol(), "m");
    }

    #[test]
    fn test_numeric_coercion() {
        let reg = registry();
        let length = q(&reg, "5", "m");
        assert!(matches!(length.to_i64(), Err(UnitError::DimensionError { .. })));
        assert!(matches!(length.to_f64(), Err(UnitError::DimensionError { .. })));

        let count = q(&reg, "5", "ea");
        assert_eq!(count.to_i64().unwrap(), 5);
        assert_eq!(q(&reg, "2.5", "dz").to_f64().unwrap(), 2.5);
        assert_eq!(q(&reg, "-2.9", "ea").to_i64().unwrap(), -2);
    }

    #[test]
    fn test_dimensionless_conversion() {
        let reg = registry();
        assert_eq!(q(&reg, "2", "dz").to("ea").unwrap().value(), &n("24"));
    }

    #[test]
    fn test_display() {
        let reg = registry();
        assert_eq!(q(&reg, "3.14", "meter").to_string(), "3.14m");
        assert_eq!(q(&reg, "100", "cm").to_string(), "100cm");
        assert_eq!(q(&reg, "-0.5", "ft").to_string(), "-0.5ft");
        assert_eq!(q(&reg, "1", "m").to("cm").unwrap().to_string(), "100cm");
    }

    #[test]
    fn test_display_keeps_written_scale() {
        let reg = registry();
        assert_eq!(q(&reg, "1.50", "m").to_string(), "1.50m");
        assert_eq!(q(&reg, "0.00", "s").to_string(), "0.00s");
        assert_eq!(q(&reg, "50", "cm").to("m").unwrap().to_string(), "0.50m");
        assert_eq!(q(&reg, "1.50", "m").add(&q(&reg, "25", "cm")).unwrap().to_string(), "1.75m");
        assert_eq!(q(&reg, "2.675", "m").round(Some(1)).to_string(), "2.7m");
    }

    #[test]
    fn test_debug() {
        let reg = registry();
        let debug = format!("{:?}", q(&reg, "3.14", "m"));
        assert!(debug.contains("3.14"));
        assert!(debug.contains("meter"));
    }

    #[test]
    fn test_arithmetic_allocates_new_quantity() {
        let reg = registry();
        let length = q(&reg, "1", "m");
        let same = length.add(0).unwrap();
        assert!(!std::ptr::eq(&same, &length));
        assert!(Arc::ptr_eq(same.unit(), length.unit()));
    }
}
