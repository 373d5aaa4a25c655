use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul, MulAssign, Neg};

/// Document units. There are 72 points per inch, and the y-axis grows upwards
/// from the bottom of the page (the PDF convention).
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Deref,
    Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// Inches, convertible into [Pt]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, From, Into, Display)]
#[display("{_0}in")]
pub struct In(pub f32);

/// Millimetres, convertible into [Pt]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, From, Into, Display)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * 72.0)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    /// The larger of two lengths. Shadows [f32::max] which would otherwise be
    /// reached through `Deref` and lose the unit.
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl MulAssign<f32> for Pt {
    fn mul_assign(&mut self, rhs: f32) {
        self.0 *= rhs;
    }
}

/// Dividing one length by another yields a unitless ratio
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_imperial_and_metric() {
        assert_eq!(Pt::from(In(1.0)), Pt(72.0));
        let a4_width: Pt = Mm(210.0).into();
        assert!((a4_width.0 - 595.2756).abs() < 0.001);
    }

    #[test]
    fn arithmetic_keeps_units() {
        let mut p = Pt(10.0) + Pt(5.0) - Pt(3.0);
        p *= 2.0;
        assert_eq!(p, Pt(24.0));
        assert_eq!(p / Pt(12.0), 2.0);
        assert_eq!(p / 4.0, Pt(6.0));
        assert_eq!(-p, Pt(-24.0));
        assert_eq!(Pt(3.0).max(Pt(4.0)), Pt(4.0));
        let total: Pt = [Pt(1.0), Pt(2.0), Pt(3.5)].into_iter().sum();
        assert_eq!(total, Pt(6.5));
    }
}
