use num::{NumCast, Zero, Float};
use std::{
    fmt::{Debug, Display, LowerExp}, iter::Sum, ops::{Add, AddAssign, Sub, SubAssign}, str::FromStr
};
use rand::distributions::uniform::SampleUniform;

/// Floating point primitive a [`crate::KMeans`] calculation can run on.
///
/// Implemented for [`f32`] and [`f64`].
pub trait Primitive: Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast + SampleUniform + FromStr
                + PartialOrd + Copy + Default + Display + Debug + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> + for<'a> Sub<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}
