//! Cell value trait for rasters

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Types that can be stored in a raster cell.
///
/// Accumulation and deviation surfaces are `f64`; stamped path layers use
/// integer line identifiers.
pub trait RasterElement:
    Copy + Debug + PartialOrd + NumCast + Zero + Send + Sync + 'static
{
    /// Check if this value represents no-data
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

macro_rules! impl_exact_element {
    ($($t:ty),*) => {
        $(impl RasterElement for $t {
            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata == Some(*self)
            }
        })*
    };
}

macro_rules! impl_float_element {
    ($($t:ty),*) => {
        $(impl RasterElement for $t {
            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                // NaN never compares equal, so it is always treated as missing
                self.is_nan() || nodata.map_or(false, |nd| (self - nd).abs() < <$t>::EPSILON * 100.0)
            }
        })*
    };
}

impl_exact_element!(i64);
impl_float_element!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!((-9999.0_f64).is_nodata(Some(-9999.0)));
        assert!(!0.0_f64.is_nodata(Some(-9999.0)));
    }

    #[test]
    fn test_int_nodata() {
        assert!(0_i64.is_nodata(Some(0)));
        assert!(!7_i64.is_nodata(Some(0)));
        assert!(!7_i64.is_nodata(None));
    }
}
